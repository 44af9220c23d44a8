use crate::common::ShareId;
use ark_serialize::SerializationError;
use dleq::DleqError;

#[derive(Debug)]
pub enum PvssError {
    InvalidThreshold(ShareId),
    InvalidThresholdOrTotal(ShareId, ShareId),
    BelowThreshold(ShareId, ShareId),
    ShareIdCantBeZero,
    DuplicateShareIds,
    NoCommitments,
    UnequalNoOfSharesAndParticipants(usize, usize),
    InvalidShare,
    InvalidShareCommitments,
    InvalidDecryption,
    InvalidSecret,
    ZeroSecretKey,
    Serialization(SerializationError),
    Dleq(DleqError),
}

impl From<DleqError> for PvssError {
    fn from(e: DleqError) -> Self {
        Self::Dleq(e)
    }
}

impl From<SerializationError> for PvssError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
