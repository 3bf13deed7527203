//! insures that `ord_multimap` is `no_std` and also has some `cargo-show-asm`
//! targets to check
//!
//! `cargo asm --target=riscv32i-unknown-none-elf -p no_std_test`

#![no_std]
#![allow(clippy::all)]

use core::num::NonZeroUsize;

use ord_multimap::{ptr_struct, Arena, KeySequence, OrdMultiMap, QueryError};

ptr_struct!(P0());
ptr_struct!(P1);

pub fn asm_arena_get(a: &Arena<P0, u64>, inx: P0) -> u64 {
    *a.get(inx).unwrap()
}

pub fn asm_arena_get_gen(a: &Arena<P1, u64>, inx: P1) -> u64 {
    *a.get(inx).unwrap()
}

// make sure this especially is minimal
pub fn asm_arena_get_nogen(a: &Arena<P1, u64>, inx: NonZeroUsize) -> u64 {
    *a.get_inx_unwrap(inx)
}

pub fn asm_find_key(m: &OrdMultiMap<P1, u64, u64>, k: u64) -> Option<P1> {
    m.find_key(&k)
}

pub fn asm_insert(m: &mut OrdMultiMap<P1, u64, u64>, k: u64, v: u64) -> P1 {
    m.insert(k, v)
}

pub fn asm_range(
    m: &OrdMultiMap<P1, u64, u64>,
    low: u64,
    high: u64,
) -> Result<KeySequence<u64>, QueryError> {
    m.range_sequence(&low, &high)
}
