//! Symmetric key material derived from a group element, for callers that key a cipher off a
//! shared point.

use ark_ec::AffineRepr;
use ark_serialize::{CanonicalSerialize, SerializationError};
use ark_std::vec;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 32 bytes of symmetric key material bound to a group element. Derived with HKDF-SHA256 over
/// the canonical compressed encoding of the point.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DhSecret(pub [u8; 32]);

impl DhSecret {
    pub fn from_point<G: AffineRepr>(point: &G) -> Result<Self, SerializationError> {
        let mut bytes = vec![];
        point.serialize_compressed(&mut bytes)?;
        let hk = Hkdf::<Sha256>::new(None, &bytes);
        let mut out = [0u8; 32];
        hk.expand(&[], &mut out)
            .expect("32 is a valid output length for HKDF-SHA256");
        Ok(Self(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::G1Affine;
    use ark_ec::CurveGroup;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };

    #[test]
    fn key_material_is_deterministic_per_point() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let p = G1Affine::rand(&mut rng);
        let q = (p.into_group() + p).into_affine();

        assert_eq!(DhSecret::from_point(&p).unwrap(), DhSecret::from_point(&p).unwrap());
        assert_ne!(DhSecret::from_point(&p).unwrap(), DhSecret::from_point(&q).unwrap());
    }
}
