use crate::concat_slices;
use ark_ff::PrimeField;
use digest::Digest;

/// Hash bytes to a field element. This is vulnerable to timing attack and is only used when
/// input is public anyway, like when deriving a challenge from a proof transcript.
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let mut f = F::from_random_bytes(&hash);
    let mut j = 1u64;
    while f.is_none() {
        hash = D::digest(&concat_slices!(bytes, b"-attempt-", j.to_le_bytes()));
        f = F::from_random_bytes(&hash);
        j += 1;
    }
    f.unwrap()
}
