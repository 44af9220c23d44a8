use crate::{compute_random_oracle_challenge, error::DleqError};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{io::Write, vec};
use digest::Digest;
use pvss_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Statement of discrete log equality: the prover knows `a` such that `h1 = g1 * a` and
/// `h2 = g2 * a`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dleq<'a, G: AffineRepr> {
    pub g1: &'a G,
    pub h1: &'a G,
    pub g2: &'a G,
    pub h2: &'a G,
}

/// Proof of discrete log equality. Transmits only the challenge and the response; the verifier
/// reconstructs the prover's commitments from the statement.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Proof<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub response: G::ScalarField,
}

impl<'a, G: AffineRepr> Dleq<'a, G> {
    /// Prover's commitment pair `(g1 * blinding, g2 * blinding)`
    pub(crate) fn commit(&self, blinding: &G::ScalarField) -> (G::Group, G::Group) {
        let w = blinding.into_bigint();
        (self.g1.mul_bigint(w), self.g2.mul_bigint(w))
    }

    /// Verifier's reconstruction of the commitment pair,
    /// `(g1 * response - h1 * challenge, g2 * response - h2 * challenge)`
    pub(crate) fn recommit(
        &self,
        response: &G::ScalarField,
        challenge: &G::ScalarField,
    ) -> (G::Group, G::Group) {
        let z = response.into_bigint();
        let c = challenge.into_bigint();
        (
            self.g1.mul_bigint(z) - self.h1.mul_bigint(c),
            self.g2.mul_bigint(z) - self.h2.mul_bigint(c),
        )
    }
}

/// Serialize the canonical encodings of commitments into the challenge transcript, in
/// statement order
pub(crate) fn challenge_contribution<G: AffineRepr, W: Write>(
    commitments: &[G::Group],
    mut writer: W,
) -> Result<(), DleqError> {
    for p in G::Group::normalize_batch(commitments) {
        p.serialize_compressed(&mut writer)?;
    }
    Ok(())
}

impl<G: AffineRepr> Proof<G> {
    /// Create a proof for `statement` with witness `a`. `blinding` must be a fresh uniform
    /// scalar per proof; reusing it across proofs leaks the witness.
    pub fn new<D: Digest>(
        witness: &G::ScalarField,
        blinding: &G::ScalarField,
        statement: &Dleq<G>,
    ) -> Result<Self, DleqError> {
        let (a1, a2) = statement.commit(blinding);
        let mut chal_bytes = vec![];
        challenge_contribution::<G, _>(&[a1, a2], &mut chal_bytes)?;
        let challenge = compute_random_oracle_challenge::<G::ScalarField, D>(&chal_bytes);
        let response = *blinding + (*witness * challenge);
        Ok(Self {
            challenge,
            response,
        })
    }

    /// Recompute the commitments from the challenge and the response, rehash and compare.
    /// Returns false on any mismatch; rejected proofs are data, not errors.
    pub fn verify<D: Digest>(&self, statement: &Dleq<G>) -> bool {
        let (a1, a2) = statement.recommit(&self.response, &self.challenge);
        let mut chal_bytes = vec![];
        if challenge_contribution::<G, _>(&[a1, a2], &mut chal_bytes).is_err() {
            return false;
        }
        self.challenge == compute_random_oracle_challenge::<G::ScalarField, D>(&chal_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;
    use test_utils::test_serialization;

    #[test]
    fn proof_of_equal_discrete_logs() {
        let mut rng = StdRng::seed_from_u64(0u64);

        fn check<G: AffineRepr>(rng: &mut StdRng) {
            let witness = G::ScalarField::rand(rng);
            let blinding = G::ScalarField::rand(rng);
            let g1 = G::Group::rand(rng).into_affine();
            let g2 = G::Group::rand(rng).into_affine();
            let h1 = (g1 * witness).into_affine();
            let h2 = (g2 * witness).into_affine();
            let statement = Dleq {
                g1: &g1,
                h1: &h1,
                g2: &g2,
                h2: &h2,
            };

            let proof = Proof::new::<Blake2b512>(&witness, &blinding, &statement).unwrap();
            assert!(proof.verify::<Blake2b512>(&statement));
        }

        check::<G1Affine>(&mut rng);
        check::<G2Affine>(&mut rng);
    }

    #[test]
    fn tampered_proof_or_statement_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1u64);

        let witness = Fr::rand(&mut rng);
        let blinding = Fr::rand(&mut rng);
        let g1 = G1Affine::rand(&mut rng);
        let g2 = G1Affine::rand(&mut rng);
        let h1 = (g1 * witness).into_affine();
        let h2 = (g2 * witness).into_affine();
        let statement = Dleq {
            g1: &g1,
            h1: &h1,
            g2: &g2,
            h2: &h2,
        };
        let proof = Proof::new::<Blake2b512>(&witness, &blinding, &statement).unwrap();
        assert!(proof.verify::<Blake2b512>(&statement));

        let mut wrong_challenge = proof.clone();
        wrong_challenge.challenge += Fr::from(1u64);
        assert!(!wrong_challenge.verify::<Blake2b512>(&statement));

        let mut wrong_response = proof.clone();
        wrong_response.response += Fr::from(1u64);
        assert!(!wrong_response.verify::<Blake2b512>(&statement));

        // second pair does not share the witness
        let other = (g2 * (witness + Fr::from(1u64))).into_affine();
        let wrong_statement = Dleq {
            g1: &g1,
            h1: &h1,
            g2: &g2,
            h2: &other,
        };
        assert!(!proof.verify::<Blake2b512>(&wrong_statement));

        test_serialization!(Proof<G1Affine>, proof);
    }
}
