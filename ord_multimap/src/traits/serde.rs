//! Serialization of query results
//!
//! Only `KeySequence` is serializable, as a plain sequence of its elements.
//! The map itself is not, `Ptr`s are only meaningful for the map instance
//! that handed them out.
//!
//! ```
//! // Example using the `ron` crate
//! use ord_multimap::{ptr_struct, KeySequence, OrdMultiMap};
//! use ron::{from_str, to_string};
//!
//! ptr_struct!(P0);
//!
//! let mut map: OrdMultiMap<P0, &str, usize> = OrdMultiMap::new();
//! map.insert("B", 5);
//! map.insert("A", 3);
//! map.insert("B", 42);
//!
//! let seq = map.in_order_sequence().unwrap();
//! let serialized = to_string(&seq).unwrap();
//! assert_eq!(serialized, "[3,5,42]");
//!
//! let seq: KeySequence<usize> = from_str(&serialized).unwrap();
//! assert_eq!(seq.as_slice(), [3, 5, 42]);
//! ```

use core::{fmt, marker::PhantomData};

use serde::{
    de::{Error, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::KeySequence;

impl<T: Serialize> Serialize for KeySequence<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_seq(Some(self.len()))?;
        for t in self {
            s.serialize_element(t)?;
        }
        s.end()
    }
}

struct KeySequenceVisitor<T>(PhantomData<fn() -> T>);

impl<'de, T> Visitor<'de> for KeySequenceVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = KeySequence<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of key values")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        // the hint is untrusted, so it is only used up to a bound
        let hint = access.size_hint().unwrap_or(0).min(4096);
        let mut seq = KeySequence::with_capacity(hint)
            .map_err(|_| Error::custom("failed to allocate a `KeySequence`"))?;
        while let Some(t) = access.next_element::<T>()? {
            seq.push(t)
                .map_err(|_| Error::custom("failed to grow a `KeySequence`"))?;
        }
        Ok(seq)
    }
}

impl<'de, T> Deserialize<'de> for KeySequence<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(KeySequenceVisitor(PhantomData))
    }
}
