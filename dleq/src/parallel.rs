//! Batched proofs of many discrete log equality statements sharing one challenge. This is what
//! keeps the verifier cost of checking `n` encrypted shares linear: all `2n` commitments are
//! hashed into a single challenge and the proof carries one response per statement.

use crate::{
    compute_random_oracle_challenge,
    error::DleqError,
    proof::{challenge_contribution, Dleq},
};
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, vec, vec::Vec};
use digest::Digest;
use pvss_utils::{expect_equality, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Proof for `m` discrete log equality statements with distinct witnesses under a single
/// challenge binding every statement's commitments
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ParallelProofs<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub responses: Vec<G::ScalarField>,
}

impl<G: AffineRepr> ParallelProofs<G> {
    /// Create a batched proof. `witnesses[i]` is the pair `(witness, blinding)` for
    /// `statements[i]`; every blinding must be fresh uniform randomness.
    pub fn new<D: Digest>(
        witnesses: &[(G::ScalarField, G::ScalarField)],
        statements: &[Dleq<G>],
    ) -> Result<Self, DleqError> {
        expect_equality!(
            witnesses.len(),
            statements.len(),
            DleqError::ExpectedSameSizeSequences
        );
        let commitments = cfg_iter!(witnesses)
            .zip(cfg_iter!(statements))
            .map(|((_, blinding), statement)| statement.commit(blinding))
            .collect::<Vec<_>>();
        let challenge = Self::shared_challenge::<D>(commitments)?;
        let responses = cfg_iter!(witnesses)
            .map(|(witness, blinding)| *blinding + (*witness * challenge))
            .collect::<Vec<_>>();
        Ok(Self {
            challenge,
            responses,
        })
    }

    /// Recompute every statement's commitment pair using the shared challenge, rehash and
    /// compare. Returns false on a response count mismatch or any algebraic mismatch; rejected
    /// proofs are data, not errors.
    pub fn verify<D: Digest>(&self, statements: &[Dleq<G>]) -> bool {
        if self.responses.len() != statements.len() {
            return false;
        }
        let commitments = cfg_iter!(self.responses)
            .zip(cfg_iter!(statements))
            .map(|(response, statement)| statement.recommit(response, &self.challenge))
            .collect::<Vec<_>>();
        match Self::shared_challenge::<D>(commitments) {
            Ok(challenge) => self.challenge == challenge,
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Hash of all commitment pairs, `Hash(a1_1 || a2_1 || .. || a1_m || a2_m)`
    fn shared_challenge<D: Digest>(
        commitments: Vec<(G::Group, G::Group)>,
    ) -> Result<G::ScalarField, DleqError> {
        let mut flat = Vec::with_capacity(commitments.len() * 2);
        for (a1, a2) in commitments {
            flat.push(a1);
            flat.push(a2);
        }
        let mut chal_bytes = vec![];
        challenge_contribution::<G, _>(&flat, &mut chal_bytes)?;
        Ok(compute_random_oracle_challenge::<G::ScalarField, D>(
            &chal_bytes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use ark_ec::CurveGroup;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;
    use test_utils::test_serialization;

    fn statements_of<'a, G: AffineRepr>(
        bases: &'a [(G, G)],
        targets: &'a [(G, G)],
    ) -> Vec<Dleq<'a, G>> {
        bases
            .iter()
            .zip(targets.iter())
            .map(|((g1, g2), (h1, h2))| Dleq { g1, h1, g2, h2 })
            .collect()
    }

    fn setup<G: AffineRepr>(
        rng: &mut StdRng,
        count: usize,
    ) -> (
        Vec<(G::ScalarField, G::ScalarField)>,
        Vec<(G, G)>,
        Vec<(G, G)>,
    ) {
        let witnesses = (0..count)
            .map(|_| (G::ScalarField::rand(rng), G::ScalarField::rand(rng)))
            .collect::<Vec<_>>();
        let bases = (0..count)
            .map(|_| {
                (
                    G::Group::rand(rng).into_affine(),
                    G::Group::rand(rng).into_affine(),
                )
            })
            .collect::<Vec<_>>();
        let targets = witnesses
            .iter()
            .zip(bases.iter())
            .map(|((w, _), (g1, g2))| ((*g1 * w).into_affine(), (*g2 * w).into_affine()))
            .collect::<Vec<_>>();
        (witnesses, bases, targets)
    }

    #[test]
    fn batched_proofs_share_one_challenge() {
        let mut rng = StdRng::seed_from_u64(0u64);

        fn check<G: AffineRepr>(rng: &mut StdRng) {
            let (witnesses, bases, targets) = setup::<G>(rng, 7);
            let statements = statements_of(&bases, &targets);

            let proofs = ParallelProofs::new::<Blake2b512>(&witnesses, &statements).unwrap();
            assert_eq!(proofs.len(), 7);
            assert!(proofs.verify::<Blake2b512>(&statements));
        }

        check::<G1Affine>(&mut rng);
        check::<G2Affine>(&mut rng);
    }

    #[test]
    fn tampering_any_statement_invalidates_the_batch() {
        let mut rng = StdRng::seed_from_u64(1u64);

        let (witnesses, bases, mut targets) = setup::<G1Affine>(&mut rng, 5);
        {
            let statements = statements_of(&bases, &targets);
            let proofs = ParallelProofs::new::<Blake2b512>(&witnesses, &statements).unwrap();

            let mut wrong_response = proofs.clone();
            wrong_response.responses[3] += Fr::from(1u64);
            assert!(!wrong_response.verify::<Blake2b512>(&statements));

            let mut wrong_count = proofs.clone();
            wrong_count.responses.pop();
            assert!(!wrong_count.verify::<Blake2b512>(&statements));

            test_serialization!(ParallelProofs<G1Affine>, proofs);
        }

        // a single altered target breaks the shared challenge
        let proofs = {
            let statements = statements_of(&bases, &targets);
            ParallelProofs::new::<Blake2b512>(&witnesses, &statements).unwrap()
        };
        targets[2].1 = (targets[2].1 * Fr::from(2u64)).into_affine();
        let tampered = statements_of(&bases, &targets);
        assert!(!proofs.verify::<Blake2b512>(&tampered));
    }

    #[test]
    fn witness_and_statement_counts_must_match() {
        let mut rng = StdRng::seed_from_u64(2u64);

        let (witnesses, bases, targets) = setup::<G1Affine>(&mut rng, 3);
        let statements = statements_of(&bases, &targets);
        assert!(ParallelProofs::new::<Blake2b512>(&witnesses[..2], &statements).is_err());
    }
}
