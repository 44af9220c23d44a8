use ark_serialize::SerializationError;
use ark_std::fmt::Debug;

#[derive(Debug)]
pub enum DleqError {
    ExpectedSameSizeSequences(usize, usize),
    Serialization(SerializationError),
}

impl From<SerializationError> for DleqError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
