//! The DDH variant of [SCRAPE](https://eprint.iacr.org/2017/216). The dealer publishes one
//! commitment `V_i = h * p(i)` per participant instead of one per polynomial coefficient, a
//! bare encryption `E_i = pk_i * p(i)` per participant and a single batched proof tying every
//! `(V_i, E_i)` pair together. A verifier checks the batched proof and then that the commitment
//! vector is a codeword of the Reed-Solomon code of polynomials of degree below the threshold,
//! by contracting it against a random codeword of the dual code. Both checks are `O(n)`.

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{batch_inversion, Field, Zero};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, cfg_iter, rand::RngCore, vec::Vec, UniformRand};
use digest::Digest;
use dleq::{Dleq, ParallelProofs, Proof};
use pvss_utils::{expect_equality, misc::n_rand, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    common::{self, Escrow, Participants, PublicKey, SecretKey, ShareId},
    error::PvssError,
};

/// Everything the dealer publishes for one sharing run: per-participant commitments
/// `V_i = h * p(i)` and encryptions `E_i = pk_i * p(i)` in participant order, the batched proof
/// that each pair shares its discrete log, and the escrow proof binding the committed secret.
/// Enough for anyone to verify the whole sharing and for each participant to decrypt its share.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicShares<G: AffineRepr> {
    pub threshold: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub extra_generator: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub secret_proof: Proof<G>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub commitments: Vec<G>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub encrypted_shares: Vec<G>,
    #[serde_as(as = "ArkObjectBytes")]
    pub proofs: ParallelProofs<G>,
}

/// Share point recovered by a participant, with a proof that the decryption used the key the
/// share was encrypted to. Carries no id; the participant order preserves it, see
/// [`reorder_decrypted_shares`].
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct DecryptedShare<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub share: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub proof: Proof<G>,
}

/// Deal one share per participant: evaluations of the escrow polynomial committed under the
/// extra generator, encrypted to each public key, and one batched proof over all of them
pub fn create_shares<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    escrow: &Escrow<G>,
    participants: &Participants<G>,
) -> Result<PublicShares<G>, PvssError> {
    let n = participants.len();
    if (escrow.threshold as usize) > n {
        return Err(PvssError::InvalidThresholdOrTotal(
            escrow.threshold,
            n as ShareId,
        ));
    }
    let shares = cfg_into_iter!(1..=n as ShareId)
        .map(|i| escrow.share_scalar(i))
        .collect::<Vec<_>>();
    let commitments = G::Group::normalize_batch(
        &cfg_iter!(shares)
            .map(|s| escrow.extra_generator * *s)
            .collect::<Vec<_>>(),
    );
    let encrypted_shares = G::Group::normalize_batch(
        &cfg_iter!(shares)
            .zip(cfg_iter!(participants.0))
            .map(|(s, pk)| pk.0 * *s)
            .collect::<Vec<_>>(),
    );

    let blindings = n_rand::<G::ScalarField, _>(rng, n);
    let witnesses = shares
        .iter()
        .zip(blindings)
        .map(|(s, blinding)| (*s, blinding))
        .collect::<Vec<_>>();
    let statements = commitments
        .iter()
        .zip(encrypted_shares.iter())
        .zip(participants.0.iter())
        .map(|((vi, ei), pk)| Dleq {
            g1: &escrow.extra_generator,
            h1: vi,
            g2: &pk.0,
            h2: ei,
        })
        .collect::<Vec<_>>();
    let proofs = ParallelProofs::new::<D>(&witnesses, &statements)?;

    Ok(PublicShares {
        threshold: escrow.threshold,
        extra_generator: escrow.extra_generator,
        secret_proof: escrow.proof.clone(),
        commitments,
        encrypted_shares,
        proofs,
    })
}

impl<G: AffineRepr> PublicShares<G> {
    pub fn number_of_participants(&self) -> usize {
        self.commitments.len()
    }

    /// Verify every encrypted share in one pass: the batched proof checks the discrete log
    /// equalities, and the dual code check catches commitment vectors that are not evaluations
    /// of a polynomial of degree below the threshold. Soundness error of the latter is `1/q`
    /// per invocation.
    pub fn verify<R: RngCore, D: Digest>(
        &self,
        rng: &mut R,
        participants: &Participants<G>,
    ) -> Result<(), PvssError> {
        let n = participants.len();
        expect_equality!(
            self.commitments.len(),
            n,
            PvssError::UnequalNoOfSharesAndParticipants
        );
        expect_equality!(
            self.encrypted_shares.len(),
            n,
            PvssError::UnequalNoOfSharesAndParticipants
        );
        if self.threshold < 1 || (self.threshold as usize) > n {
            return Err(PvssError::InvalidThresholdOrTotal(
                self.threshold,
                n as ShareId,
            ));
        }

        let statements = self
            .commitments
            .iter()
            .zip(self.encrypted_shares.iter())
            .zip(participants.0.iter())
            .map(|((vi, ei), pk)| Dleq {
                g1: &self.extra_generator,
                h1: vi,
                g2: &pk.0,
                h2: ei,
            })
            .collect::<Vec<_>>();
        if !self.proofs.verify::<D>(&statements) {
            return Err(PvssError::InvalidShare);
        }

        self.perp_check(rng)
    }

    /// Contract the commitment vector against a random codeword of the dual of the
    /// Reed-Solomon code `{(p(1), .., p(n)) : deg p < threshold}`. Valid commitments sum to the
    /// identity; anything else survives with probability `1/q`. For `threshold == n` the dual
    /// code is trivial and the check passes vacuously.
    fn perp_check<R: RngCore>(&self, rng: &mut R) -> Result<(), PvssError> {
        let n = self.commitments.len() as ShareId;
        let t = self.threshold;
        if n == t {
            return Ok(());
        }
        let dual = <DensePolynomial<G::ScalarField> as DenseUVPolynomial<
            G::ScalarField,
        >>::rand((n - t - 1) as usize, rng);

        // c_perp_i = dual(i) * prod_{j != i} (i - j)^-1 over the 1-based evaluation points
        let mut denominators = cfg_into_iter!(1..=n)
            .map(|i| {
                let i_f = G::ScalarField::from(i as u64);
                (1..=n)
                    .filter(|j| *j != i)
                    .map(|j| i_f - G::ScalarField::from(j as u64))
                    .product::<G::ScalarField>()
            })
            .collect::<Vec<_>>();
        batch_inversion(&mut denominators);
        let coefficients = cfg_into_iter!(denominators)
            .zip(cfg_into_iter!(1..(n + 1)))
            .map(|(v, i)| v * dual.evaluate(&G::ScalarField::from(i as u64)))
            .collect::<Vec<_>>();

        if !G::Group::msm_unchecked(&self.commitments, &coefficients).is_zero() {
            return Err(PvssError::InvalidShareCommitments);
        }
        Ok(())
    }
}

/// Decrypt this participant's encrypted share `E_i` as `S_i = E_i * sk^{-1}`, with a proof of
/// `log_generator(pk) = log_S(E_i)`
pub fn decrypt_share<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    secret_key: &SecretKey<G::ScalarField>,
    public_key: &PublicKey<G>,
    encrypted_share: &G,
) -> Result<DecryptedShare<G>, PvssError> {
    let sk_inv = secret_key.0.inverse().ok_or(PvssError::ZeroSecretKey)?;
    let si = (*encrypted_share * sk_inv).into_affine();
    let generator = G::generator();
    let proof = Proof::new::<D>(
        &secret_key.0,
        &G::ScalarField::rand(rng),
        &Dleq {
            g1: &generator,
            h1: &public_key.0,
            g2: &si,
            h2: encrypted_share,
        },
    )?;
    Ok(DecryptedShare { share: si, proof })
}

impl<G: AffineRepr> DecryptedShare<G> {
    /// Check the decryption proof against the encrypted share it came from
    pub fn verify<D: Digest>(
        &self,
        public_key: &PublicKey<G>,
        encrypted_share: &G,
    ) -> Result<(), PvssError> {
        let generator = G::generator();
        let valid = self.proof.verify::<D>(&Dleq {
            g1: &generator,
            h1: &public_key.0,
            g2: &self.share,
            h2: encrypted_share,
        });
        if !valid {
            return Err(PvssError::InvalidDecryption);
        }
        Ok(())
    }
}

/// Recover each decrypted share's 1-based id from the participant list, for share lists that
/// arrive in arbitrary order. Returns `None` when any key is not a participant. Output order
/// follows the input order.
pub fn reorder_decrypted_shares<G: AffineRepr>(
    participants: &Participants<G>,
    shares: &[(PublicKey<G>, DecryptedShare<G>)],
) -> Option<Vec<(ShareId, DecryptedShare<G>)>> {
    shares
        .iter()
        .map(|(pk, dec)| participants.share_id_of(pk).map(|id| (id, dec.clone())))
        .collect()
}

/// Recover the secret by Lagrange interpolation at zero in the exponent over the given
/// id-carrying shares. The caller selects exactly `threshold` distinct valid shares;
/// supplying fewer yields a wrong point, which [`verify_secret`] rejects.
pub fn recover<G: AffineRepr>(shares: &[(ShareId, DecryptedShare<G>)]) -> Result<G, PvssError> {
    let ids = shares.iter().map(|(id, _)| *id).collect::<Vec<_>>();
    let basis = common::lagrange_basis_at_0_for_all::<G::ScalarField>(ids)?;
    let points = shares.iter().map(|(_, s)| s.share).collect::<Vec<_>>();
    Ok(G::Group::msm_unchecked(&points, &basis).into_affine())
}

/// Verify a recovered secret against the dealer's escrow proof. The commitment to `p(0)` under
/// the extra generator is not published directly; it is interpolated from the first
/// `threshold` share commitments, which the dual code check already certified as evaluations
/// of the dealer polynomial.
pub fn verify_secret<G: AffineRepr, D: Digest>(
    secret: &G,
    shares: &PublicShares<G>,
) -> Result<(), PvssError> {
    let t = shares.threshold;
    if t < 1 || (t as usize) > shares.commitments.len() {
        return Err(PvssError::BelowThreshold(
            t,
            shares.commitments.len() as ShareId,
        ));
    }
    let basis = common::lagrange_basis_at_0_for_all::<G::ScalarField>((1..=t).collect())?;
    let c0 = G::Group::msm_unchecked(&shares.commitments[..t as usize], &basis).into_affine();
    let generator = G::generator();
    let valid = shares.secret_proof.verify::<D>(&Dleq {
        g1: &generator,
        h1: secret,
        g2: &shares.extra_generator,
        h2: &c0,
    });
    if !valid {
        return Err(PvssError::InvalidSecret);
    }
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::common::keygen;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_ec::pairing::Pairing;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use test_utils::test_serialization;

    type D = Blake2b512;

    fn deal<G: AffineRepr>(
        rng: &mut StdRng,
        threshold: ShareId,
        total: usize,
    ) -> (
        Vec<(SecretKey<G::ScalarField>, PublicKey<G>)>,
        Participants<G>,
        Escrow<G>,
        PublicShares<G>,
    ) {
        let keypairs = (0..total).map(|_| keygen::<_, G>(rng)).collect::<Vec<_>>();
        let participants = Participants(keypairs.iter().map(|(_, pk)| pk.clone()).collect());
        let escrow = Escrow::new::<_, D>(rng, threshold).unwrap();
        let shares = create_shares::<_, _, D>(rng, &escrow, &participants).unwrap();
        (keypairs, participants, escrow, shares)
    }

    #[test]
    fn share_verify_and_recover() {
        let mut rng = StdRng::seed_from_u64(0u64);

        fn check<G: AffineRepr>(rng: &mut StdRng) {
            for (threshold, total) in [(1, 3), (2, 2), (3, 5), (3, 3), (4, 9), (5, 13), (7, 15)] {
                let (keypairs, participants, escrow, shares) = deal::<G>(rng, threshold, total);
                assert_eq!(shares.number_of_participants(), total);
                shares.verify::<_, D>(rng, &participants).unwrap();

                let mut decrypted = Vec::with_capacity(total);
                for (i, (sk, pk)) in keypairs.iter().enumerate() {
                    let dec = decrypt_share::<_, _, D>(
                        rng,
                        sk,
                        pk,
                        &shares.encrypted_shares[i],
                    )
                    .unwrap();
                    dec.verify::<D>(pk, &shares.encrypted_shares[i]).unwrap();
                    assert_eq!(
                        dec.share,
                        (G::generator() * escrow.share_scalar(i as ShareId + 1)).into_affine()
                    );
                    decrypted.push((pk.clone(), dec));
                }

                let reordered = reorder_decrypted_shares(&participants, &decrypted).unwrap();
                let secret = recover(&reordered[..threshold as usize]).unwrap();
                assert_eq!(secret, escrow.secret);
                verify_secret::<_, D>(&secret, &shares).unwrap();

                // any subset of `threshold` shares recovers the same secret
                let last = &reordered[total - threshold as usize..];
                assert_eq!(recover(last).unwrap(), secret);
            }
        }

        check::<<Bls12_381 as Pairing>::G1Affine>(&mut rng);
        check::<<Bls12_381 as Pairing>::G2Affine>(&mut rng);
    }

    #[test]
    fn shuffled_share_lists_are_reindexed_by_participant_order() {
        let mut rng = StdRng::seed_from_u64(1u64);
        type G = <Bls12_381 as Pairing>::G1Affine;

        let (keypairs, participants, escrow, shares) = deal::<G>(&mut rng, 3, 5);
        let mut decrypted = keypairs
            .iter()
            .enumerate()
            .map(|(i, (sk, pk))| {
                let dec =
                    decrypt_share::<_, _, D>(&mut rng, sk, pk, &shares.encrypted_shares[i])
                        .unwrap();
                (pk.clone(), dec)
            })
            .collect::<Vec<_>>();

        decrypted.reverse();
        decrypted.swap(0, 2);

        let reordered = reorder_decrypted_shares(&participants, &decrypted).unwrap();
        for ((pk, _), (id, _)) in decrypted.iter().zip(reordered.iter()) {
            assert_eq!(participants.share_id_of(pk), Some(*id));
        }
        assert_eq!(recover(&reordered[..3]).unwrap(), escrow.secret);

        // a key outside the participant list has no id
        let (_, stranger) = keygen::<_, G>(&mut rng);
        let mut with_stranger = decrypted.clone();
        with_stranger[0].0 = stranger;
        assert!(reorder_decrypted_shares(&participants, &with_stranger).is_none());
    }

    #[test]
    fn forged_commitments_fail_the_dual_code_check() {
        let mut rng = StdRng::seed_from_u64(2u64);
        type G = <Bls12_381 as Pairing>::G1Affine;

        let (_, participants, escrow, shares) = deal::<G>(&mut rng, 3, 5);

        // Re-deal share 2 for a value off the polynomial and regenerate the batched proof so
        // every discrete log equality still holds. Only the dual code check can notice.
        let mut scalars = (1..=5)
            .map(|i| escrow.share_scalar(i))
            .collect::<Vec<_>>();
        scalars[2] += Fr::from(1u64);

        let mut forged = shares.clone();
        forged.commitments[2] = (escrow.extra_generator * scalars[2]).into_affine();
        forged.encrypted_shares[2] = (participants.0[2].0 * scalars[2]).into_affine();
        let witnesses = scalars
            .iter()
            .map(|s| (*s, Fr::rand(&mut rng)))
            .collect::<Vec<_>>();
        let statements = forged
            .commitments
            .iter()
            .zip(forged.encrypted_shares.iter())
            .zip(participants.0.iter())
            .map(|((vi, ei), pk)| Dleq {
                g1: &forged.extra_generator,
                h1: vi,
                g2: &pk.0,
                h2: ei,
            })
            .collect::<Vec<_>>();
        forged.proofs = ParallelProofs::new::<D>(&witnesses, &statements).unwrap();

        assert!(matches!(
            forged.verify::<_, D>(&mut rng, &participants),
            Err(PvssError::InvalidShareCommitments)
        ));

        // and an honest bundle with a tampered batch proof fails the proof check
        let mut bad_proofs = shares.clone();
        bad_proofs.proofs.responses[0] += Fr::from(1u64);
        assert!(matches!(
            bad_proofs.verify::<_, D>(&mut rng, &participants),
            Err(PvssError::InvalidShare)
        ));
    }

    #[test]
    fn all_participants_threshold_skips_the_dual_code_check() {
        let mut rng = StdRng::seed_from_u64(3u64);
        type G = <Bls12_381 as Pairing>::G1Affine;

        // threshold == n: the dual code is trivial, verification rests on the proofs alone
        let (_, participants, _, shares) = deal::<G>(&mut rng, 4, 4);
        shares.verify::<_, D>(&mut rng, &participants).unwrap();
    }

    #[test]
    fn mismatched_participant_count_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4u64);
        type G = <Bls12_381 as Pairing>::G1Affine;

        let (_, participants, _, shares) = deal::<G>(&mut rng, 2, 4);
        let fewer = Participants(participants.0[..3].to_vec());
        assert!(matches!(
            shares.verify::<_, D>(&mut rng, &fewer),
            Err(PvssError::UnequalNoOfSharesAndParticipants(_, _))
        ));
    }

    #[test]
    fn serialization() {
        let mut rng = StdRng::seed_from_u64(5u64);
        type G = <Bls12_381 as Pairing>::G1Affine;

        let (keypairs, _, _, shares) = deal::<G>(&mut rng, 2, 3);
        let dec = decrypt_share::<_, _, D>(
            &mut rng,
            &keypairs[0].0,
            &keypairs[0].1,
            &shares.encrypted_shares[0],
        )
        .unwrap();

        test_serialization!(PublicShares<G>, shares);
        test_serialization!(DecryptedShare<G>, dec);
    }
}
