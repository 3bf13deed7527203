use core::{
    fmt::Debug,
    hash::Hash,
    num::{NonZeroU128, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU8, NonZeroUsize},
    panic::{RefUnwindSafe, UnwindSafe},
};

/// Generation counter type of a `Ptr`.
///
/// Implemented only for the `NonZeroU...` types and for `()` (which disables
/// generation checking).
pub trait PtrGen:
    Debug
    + Hash
    + Clone
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + Unpin
    + RefUnwindSafe
    + UnwindSafe
{
    /// The generation used by `Ptr::invalid`. Arenas start at generation 2, so
    /// a `Ptr` with this generation never validates.
    fn one() -> Self;
    /// The starting generation of an arena
    fn two() -> Self;
    /// Returns `this + 1`, panicking on overflow
    fn increment(this: Self) -> Self;
}

macro_rules! impl_gen {
    ($($x: ident)*) => {
        $(
            impl PtrGen for $x {
                #[inline]
                fn one() -> Self {
                    Self::MIN
                }

                #[inline]
                fn two() -> Self {
                    Self::MIN.saturating_add(1)
                }

                #[inline]
                fn increment(this: Self) -> Self {
                    match this.checked_add(1) {
                        Some(x) => x,
                        None => panic!("generation overflow"),
                    }
                }
            }
        )*
    };
}

impl_gen!(NonZeroU8 NonZeroU16 NonZeroU32 NonZeroU64 NonZeroU128);

impl PtrGen for () {
    #[inline]
    fn one() -> Self {}

    #[inline]
    fn two() -> Self {}

    #[inline]
    fn increment(_this: Self) -> Self {}
}

/// Index type of a `Ptr`. Internally the arena stores entry `i` at
/// `m[i - 1]`, so indexes are nonzero and `Option<P::Inx>` costs nothing
/// extra.
///
/// Implemented only for the `NonZeroU...` types.
pub trait PtrInx:
    Debug
    + Hash
    + Clone
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + Unpin
    + RefUnwindSafe
    + UnwindSafe
{
    /// Truncating conversion, higher level functions check the limits
    fn new(inx: NonZeroUsize) -> Self;
    /// Zero extending conversion
    fn get(this: Self) -> NonZeroUsize;
    /// The maximum representable index, truncated to `usize::MAX` if needed
    fn max() -> NonZeroUsize;
}

macro_rules! impl_ptr_inx {
    ($($nz:ident $x:ident);*;) => {
        $(
            impl PtrInx for $nz {
                #[inline]
                fn new(inx: NonZeroUsize) -> Self {
                    match $nz::new(inx.get() as $x) {
                        Some(x) => x,
                        None => panic!("`PtrInx` truncated to zero"),
                    }
                }

                #[inline]
                fn get(this: Self) -> NonZeroUsize {
                    match NonZeroUsize::new(this.get() as usize) {
                        Some(x) => x,
                        None => unreachable!(),
                    }
                }

                #[inline]
                fn max() -> NonZeroUsize {
                    match NonZeroUsize::new(if (<$x>::MAX as u128) > (usize::MAX as u128) {
                        usize::MAX
                    } else {
                        <$x>::MAX as usize
                    }) {
                        Some(x) => x,
                        None => unreachable!(),
                    }
                }
            }
        )*
    };
}

impl_ptr_inx!(
    NonZeroUsize usize;
    NonZeroU8 u8;
    NonZeroU16 u16;
    NonZeroU32 u32;
    NonZeroU64 u64;
    NonZeroU128 u128;
);

/// Index and generation information for handles into an `Arena`,
/// `ChainArena`, or `OrdMultiMap`.
///
/// Use the `ptr_struct` macro instead of implementing this manually. The
/// `PartialEq` implementation must differentiate between pointers at the same
/// index but different generation, and `Default` should use `invalid`.
pub trait Ptr:
    Debug
    + Hash
    + Clone
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + Unpin
    + RefUnwindSafe
    + UnwindSafe
{
    /// The recommended general purpose type for this is `NonZeroUsize`
    type Inx: PtrInx;

    /// `NonZeroU64` if generation tracking is wanted, otherwise `()`
    type Gen: PtrGen;

    /// Returns a `Ptr` with generation `PtrGen::one()` and index
    /// `Inx::max()`, which never validates against an arena using generation
    /// counters.
    fn invalid() -> Self;

    /// Returns the raw index
    fn inx(self) -> Self::Inx;

    /// Returns the generation
    fn gen(self) -> Self::Gen;

    /// Do not use this unless you are manually managing internal details
    fn _from_raw(inx: Self::Inx, gen: Self::Gen) -> Self;
}

/// Declares new structs implementing `Ptr`. By default the index type is
/// `NonZeroUsize` and the generation type is `NonZeroU64`. The struct name
/// can be followed by square brackets with a custom index type, then by
/// parenthesis with a custom generation type. Empty parenthesis disable
/// generation counting. Attributes may follow as a comma separated list.
///
/// ```
/// use core::num::{NonZeroU16, NonZeroU32};
/// use ord_multimap::{ptr_struct, OrdMultiMap};
///
/// // default index and generation types, with a doc attribute
/// ptr_struct!(P0 doc="handle to a word occurrence");
/// let _: OrdMultiMap<P0, String, usize>;
///
/// // smaller index type
/// ptr_struct!(P1[NonZeroU32]);
///
/// // smaller generation type
/// ptr_struct!(P2(NonZeroU16));
///
/// // no generation counter, multiple structs in one invocation
/// ptr_struct!(Q0(); Q1());
/// ```
#[macro_export]
macro_rules! ptr_struct {
    ($($struct_name:ident[$inx_type:path]() $($attributes:meta),*);*) => {
        $(
            $(#[$attributes])*
            #[derive(
                core::hash::Hash,
                core::clone::Clone,
                core::marker::Copy,
                core::cmp::PartialEq,
                core::cmp::Eq,
                core::cmp::PartialOrd,
                core::cmp::Ord
            )]
            pub struct $struct_name {
                #[doc(hidden)]
                _internal_inx: $inx_type,
            }

            impl $crate::Ptr for $struct_name {
                type Inx = $inx_type;
                type Gen = ();

                #[inline]
                fn invalid() -> Self {
                    Self {
                        _internal_inx: $crate::PtrInx::new(
                            <Self::Inx as $crate::PtrInx>::max()
                        ),
                    }
                }

                #[inline]
                fn inx(self) -> Self::Inx {
                    self._internal_inx
                }

                #[inline]
                fn gen(self) -> Self::Gen {}

                #[inline]
                #[doc(hidden)]
                fn _from_raw(_internal_inx: Self::Inx, _internal_gen: Self::Gen) -> Self {
                    Self { _internal_inx }
                }
            }

            impl core::default::Default for $struct_name {
                #[inline]
                fn default() -> Self {
                    $crate::Ptr::invalid()
                }
            }

            impl core::fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    f.write_fmt(format_args!(
                        "{}[{:?}]",
                        stringify!($struct_name),
                        $crate::Ptr::inx(*self),
                    ))
                }
            }

            impl core::fmt::Display for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    core::fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
    ($($struct_name:ident[$inx_type:path]($gen_type:path) $($attributes:meta),*);*) => {
        $(
            $(#[$attributes])*
            #[derive(
                core::hash::Hash,
                core::clone::Clone,
                core::marker::Copy,
                core::cmp::PartialEq,
                core::cmp::Eq,
                core::cmp::PartialOrd,
                core::cmp::Ord
            )]
            pub struct $struct_name {
                #[doc(hidden)]
                _internal_inx: $inx_type,
                #[doc(hidden)]
                _internal_gen: $gen_type,
            }

            impl $crate::Ptr for $struct_name {
                type Inx = $inx_type;
                type Gen = $gen_type;

                #[inline]
                fn invalid() -> Self {
                    Self {
                        _internal_inx: $crate::PtrInx::new(
                            <Self::Inx as $crate::PtrInx>::max()
                        ),
                        _internal_gen: $crate::PtrGen::one()
                    }
                }

                #[inline]
                fn inx(self) -> Self::Inx {
                    self._internal_inx
                }

                #[inline]
                fn gen(self) -> Self::Gen {
                    self._internal_gen
                }

                #[inline]
                #[doc(hidden)]
                fn _from_raw(_internal_inx: Self::Inx, _internal_gen: Self::Gen) -> Self {
                    Self {
                        _internal_inx,
                        _internal_gen,
                    }
                }
            }

            impl core::default::Default for $struct_name {
                #[inline]
                fn default() -> Self {
                    $crate::Ptr::invalid()
                }
            }

            // single line so that arena `Debug` output stays readable
            impl core::fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    f.write_fmt(format_args!(
                        "{}[{:?}]({:?})",
                        stringify!($struct_name),
                        $crate::Ptr::inx(*self),
                        $crate::Ptr::gen(*self),
                    ))
                }
            }

            impl core::fmt::Display for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    core::fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
    ($($struct_name:ident[$inx_type:path] $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                $struct_name[$inx_type](core::num::NonZeroU64)
                $($attributes),*
            );
        )*
    };
    ($($struct_name:ident() $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                $struct_name[core::num::NonZeroUsize]()
                $($attributes),*
            );
        )*
    };
    ($($struct_name:ident($gen_type:path) $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                $struct_name[core::num::NonZeroUsize]($gen_type)
                $($attributes),*
            );
        )*
    };
    ($($struct_name:ident $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                $struct_name[core::num::NonZeroUsize](core::num::NonZeroU64)
                $($attributes),*
            );
        )*
    };
}
