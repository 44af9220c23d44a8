//! Serde serialization for `arkworks-rs` objects they themselves don't implement serde

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

/// Serializes any `T: CanonicalSerialize + CanonicalDeserialize` as its canonical compressed
/// byte encoding
pub struct ArkObjectBytes;

impl<T> SerializeAs<T> for ArkObjectBytes
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bytes = Vec::with_capacity(x.compressed_size());
        x.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }
}

impl<'de, T> DeserializeAs<'de, T> for ArkObjectBytes
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}
