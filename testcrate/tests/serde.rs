#![cfg(feature = "serde_support")]

use ord_multimap::{KeySequence, OrdMultiMap};
use serde::{de::DeserializeOwned, Serialize};
use testcrate::P0;

fn round_trip<T: Serialize + DeserializeOwned>(t: &T) -> T {
    let v = postcard::to_allocvec(t).unwrap();
    let res: T = postcard::from_bytes(&v).unwrap();
    res
}

fn round_trip_ron<T: Serialize + DeserializeOwned>(t: &T) -> T {
    let s = ron::to_string(t).unwrap();
    let res: T = ron::from_str(&s).unwrap();
    res
}

#[test]
fn serde() {
    let mut map: OrdMultiMap<P0, u16, u64> = OrdMultiMap::new();
    for i in 0..100u64 {
        map.insert((i % 17) as u16, i);
    }

    let seq = map.in_order_sequence().unwrap();
    let b = round_trip(&seq);
    assert_eq!(b, seq);
    let b = round_trip_ron(&seq);
    assert_eq!(b, seq);

    let seq = map.range_sequence(&3, &9).unwrap();
    assert_eq!(round_trip(&seq), seq);

    let seq: KeySequence<String> = KeySequence::new();
    assert_eq!(round_trip(&seq), seq);
    assert_eq!(ron::to_string(&seq).unwrap(), "[]");

    let seq = KeySequence::from(vec!["AN".to_owned(), "IS".to_owned()]);
    assert_eq!(round_trip_ron(&seq), seq);
}
