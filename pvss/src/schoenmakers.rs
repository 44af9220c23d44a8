//! The PVSS scheme of [Schoenmakers](https://www.win.tue.nl/~berry/papers/crypto99.pdf). The
//! dealer commits to every coefficient of the sharing polynomial under a fresh extra generator
//! `h` and proves, share by share, that the value encrypted to a participant's public key is
//! the evaluation the commitments dictate. Each verification recomputes
//! `X_i = sum_j C_j * i^j = h * p(i)` from the commitments, so checking all `n` shares costs
//! `O(n * threshold)` group operations; see [`crate::scrape`] for the linear-cost variant.

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, rand::RngCore, vec::Vec, UniformRand};
use digest::Digest;
use dleq::{Dleq, Proof};
use pvss_utils::{ff::powers, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    common::{self, Escrow, Participants, PublicKey, SecretKey, ShareId},
    error::PvssError,
};

/// Commitments `h * a_j` to the coefficients of the dealer polynomial, exactly `threshold` of
/// them. Share verification evaluates these in the exponent.
#[serde_as]
#[derive(
    Default,
    Clone,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct CoefficientCommitments<G: AffineRepr>(
    #[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<G>,
);

impl<G: AffineRepr> From<Vec<G>> for CoefficientCommitments<G> {
    fn from(points: Vec<G>) -> Self {
        CoefficientCommitments(points)
    }
}

/// Share `p(id)` encrypted to the participant's public key as `Y_id = pk * p(id)`, with a proof
/// that the same scalar links `Y_id` to the committed polynomial
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct EncryptedShare<G: AffineRepr> {
    pub id: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub encrypted_share: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub proof: Proof<G>,
}

/// Share point `S_id = generator * p(id)` recovered by the participant, with a proof that the
/// decryption used the same key the share was encrypted to
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct DecryptedShare<G: AffineRepr> {
    pub id: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub share: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub proof: Proof<G>,
}

/// Commitments to the dealer polynomial coefficients under the escrow's extra generator
pub fn commitments<G: AffineRepr>(escrow: &Escrow<G>) -> CoefficientCommitments<G> {
    G::Group::normalize_batch(
        &cfg_iter!(escrow.polynomial.coeffs)
            .map(|a| escrow.extra_generator.mul_bigint(a.into_bigint()))
            .collect::<Vec<_>>(),
    )
    .into()
}

/// Encrypt the share `p(id)` for one participant: `Y_id = pk * p(id)` with a proof of
/// `log_h(h * p(id)) = log_pk(Y_id)`
pub fn create_share<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    escrow: &Escrow<G>,
    id: ShareId,
    public_key: &PublicKey<G>,
) -> Result<EncryptedShare<G>, PvssError> {
    if id == 0 {
        return Err(PvssError::ShareIdCantBeZero);
    }
    let s = escrow.share_scalar(id);
    let xi = (escrow.extra_generator * s).into_affine();
    let yi = (public_key.0 * s).into_affine();
    let proof = Proof::new::<D>(
        &s,
        &G::ScalarField::rand(rng),
        &Dleq {
            g1: &escrow.extra_generator,
            h1: &xi,
            g2: &public_key.0,
            h2: &yi,
        },
    )?;
    Ok(EncryptedShare {
        id,
        encrypted_share: yi,
        proof,
    })
}

/// Encrypt one share per participant, in participant order with 1-based ids
pub fn create_shares<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    escrow: &Escrow<G>,
    participants: &Participants<G>,
) -> Result<Vec<EncryptedShare<G>>, PvssError> {
    participants
        .0
        .iter()
        .enumerate()
        .map(|(i, pk)| create_share::<_, _, D>(rng, escrow, i as ShareId + 1, pk))
        .collect()
}

impl<G: AffineRepr> EncryptedShare<G> {
    /// Verify against the published commitments. Recomputes
    /// `X_id = sum_j commitments[j] * id^j`, which for honest commitments equals `h * p(id)`,
    /// then checks the share's proof over `(h, X_id, pk, Y_id)`.
    pub fn verify<D: Digest>(
        &self,
        public_key: &PublicKey<G>,
        extra_generator: &G,
        commitments: &CoefficientCommitments<G>,
    ) -> Result<(), PvssError> {
        if commitments.0.is_empty() {
            return Err(PvssError::NoCommitments);
        }
        if self.id == 0 {
            return Err(PvssError::ShareIdCantBeZero);
        }
        let powers = powers(&G::ScalarField::from(self.id as u64), commitments.0.len());
        let xi = G::Group::msm_unchecked(&commitments.0, &powers).into_affine();
        let valid = self.proof.verify::<D>(&Dleq {
            g1: extra_generator,
            h1: &xi,
            g2: &public_key.0,
            h2: &self.encrypted_share,
        });
        if !valid {
            return Err(PvssError::InvalidShare);
        }
        Ok(())
    }
}

/// Decrypt an encrypted share with the participant's secret key: `S_id = Y_id * sk^{-1}`, with
/// a proof of `log_generator(pk) = log_S(Y_id)`, i.e. that the key that decrypted is the key
/// the share was encrypted to
pub fn decrypt_share<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    secret_key: &SecretKey<G::ScalarField>,
    public_key: &PublicKey<G>,
    share: &EncryptedShare<G>,
) -> Result<DecryptedShare<G>, PvssError> {
    let sk_inv = secret_key.0.inverse().ok_or(PvssError::ZeroSecretKey)?;
    let si = (share.encrypted_share * sk_inv).into_affine();
    let generator = G::generator();
    let proof = Proof::new::<D>(
        &secret_key.0,
        &G::ScalarField::rand(rng),
        &Dleq {
            g1: &generator,
            h1: &public_key.0,
            g2: &si,
            h2: &share.encrypted_share,
        },
    )?;
    Ok(DecryptedShare {
        id: share.id,
        share: si,
        proof,
    })
}

impl<G: AffineRepr> DecryptedShare<G> {
    /// Check the decryption proof against the encrypted share it came from
    pub fn verify<D: Digest>(
        &self,
        public_key: &PublicKey<G>,
        encrypted: &EncryptedShare<G>,
    ) -> Result<(), PvssError> {
        let generator = G::generator();
        let valid = self.proof.verify::<D>(&Dleq {
            g1: &generator,
            h1: &public_key.0,
            g2: &self.share,
            h2: &encrypted.encrypted_share,
        });
        if !valid {
            return Err(PvssError::InvalidDecryption);
        }
        Ok(())
    }
}

/// Filter decrypted shares by their proofs and keep the first `threshold` valid ones. Returns
/// fewer when not enough valid shares exist; callers must check before recovering.
pub fn valid_recovery_shares<'a, G: AffineRepr, D: Digest, I>(
    threshold: ShareId,
    shares: I,
) -> Vec<&'a DecryptedShare<G>>
where
    I: IntoIterator<Item = (&'a EncryptedShare<G>, &'a PublicKey<G>, &'a DecryptedShare<G>)>,
{
    shares
        .into_iter()
        .filter(|(enc, pk, dec)| dec.verify::<D>(pk, enc).is_ok())
        .map(|(_, _, dec)| dec)
        .take(threshold as usize)
        .collect()
}

/// Recover the secret by Lagrange interpolation at zero in the exponent,
/// `sum_i S_i * lambda_i`. The caller selects exactly `threshold` distinct valid shares;
/// supplying fewer yields a wrong point, which [`verify_secret`] rejects.
pub fn recover<G: AffineRepr>(shares: &[&DecryptedShare<G>]) -> Result<G, PvssError> {
    let ids = shares.iter().map(|s| s.id).collect::<Vec<_>>();
    let basis = common::lagrange_basis_at_0_for_all::<G::ScalarField>(ids)?;
    let points = shares.iter().map(|s| s.share).collect::<Vec<_>>();
    Ok(G::Group::msm_unchecked(&points, &basis).into_affine())
}

/// Verify a recovered secret against the dealer's escrow proof, over
/// `(generator, secret, h, commitments[0])`
pub fn verify_secret<G: AffineRepr, D: Digest>(
    secret: &G,
    extra_generator: &G,
    commitments: &CoefficientCommitments<G>,
    proof: &Proof<G>,
) -> Result<(), PvssError> {
    let c0 = commitments.0.first().ok_or(PvssError::NoCommitments)?;
    let generator = G::generator();
    let valid = proof.verify::<D>(&Dleq {
        g1: &generator,
        h1: secret,
        g2: extra_generator,
        h2: c0,
    });
    if !valid {
        return Err(PvssError::InvalidSecret);
    }
    Ok(())
}
