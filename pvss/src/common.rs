use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, cfg_iter, rand::RngCore, vec::Vec, UniformRand};
use digest::Digest;
use dleq::{Dleq, Proof};
use pvss_utils::{dh::DhSecret, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::PvssError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// ShareId must be greater than 0. Participant `i` (1-based position in the participant list)
/// holds the share `p(i)`.
pub type ShareId = u32;

#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
)]
pub struct SecretKey<F: PrimeField>(pub F);

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<G: AffineRepr>(#[serde_as(as = "ArkObjectBytes")] pub G);

impl<F: PrimeField> SecretKey<F> {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }
}

impl<G: AffineRepr> PublicKey<G> {
    pub fn new(secret_key: &SecretKey<G::ScalarField>) -> Self {
        Self(
            G::generator()
                .mul_bigint(secret_key.0.into_bigint())
                .into_affine(),
        )
    }
}

/// Generate a keypair `(sk, pk)` with `pk = generator * sk`
pub fn keygen<R: RngCore, G: AffineRepr>(
    rng: &mut R,
) -> (SecretKey<G::ScalarField>, PublicKey<G>) {
    let sk = SecretKey::new(rng);
    let pk = PublicKey::new(&sk);
    (sk, pk)
}

/// Ordered list of the participants' public keys. The position of a key determines the
/// participant's 1-based share id, so the order must be stable across every call of one
/// protocol instance.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Participants<G: AffineRepr>(pub Vec<PublicKey<G>>);

impl<G: AffineRepr> Participants<G> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 1-based share id of `pk`, `None` when the key is not a participant
    pub fn share_id_of(&self, pk: &PublicKey<G>) -> Option<ShareId> {
        self.0.iter().position(|p| p == pk).map(|i| i as ShareId + 1)
    }
}

/// Dealer side state of one sharing run: the secret polynomial, the extra generator `h` the
/// commitments will live under, the committed secret `generator * p(0)` and the proof binding
/// the secret to `h * p(0)`. Created per secret, used to emit commitments and shares, then
/// dropped; the polynomial coefficients are zeroed on drop.
#[derive(Clone)]
pub struct Escrow<G: AffineRepr> {
    pub threshold: ShareId,
    pub extra_generator: G,
    pub polynomial: DensePolynomial<G::ScalarField>,
    pub secret: G,
    pub proof: Proof<G>,
}

impl<G: AffineRepr> Escrow<G> {
    /// Create the dealer state for a `threshold`-of-n sharing: a fresh uniform polynomial of
    /// degree `threshold - 1`, so any `threshold` evaluations determine `p(0)`.
    pub fn new<R: RngCore, D: Digest>(rng: &mut R, threshold: ShareId) -> Result<Self, PvssError> {
        if threshold < 1 {
            return Err(PvssError::InvalidThreshold(threshold));
        }
        let polynomial = <DensePolynomial<G::ScalarField> as DenseUVPolynomial<
            G::ScalarField,
        >>::rand(threshold as usize - 1, rng);
        let extra_generator = (G::generator() * G::ScalarField::rand(rng)).into_affine();

        let s = polynomial.evaluate(&G::ScalarField::zero());
        let secret = (G::generator() * s).into_affine();
        let h_s = (extra_generator * s).into_affine();
        let generator = G::generator();
        let proof = Proof::new::<D>(
            &s,
            &G::ScalarField::rand(rng),
            &Dleq {
                g1: &generator,
                h1: &secret,
                g2: &extra_generator,
                h2: &h_s,
            },
        )?;

        Ok(Self {
            threshold,
            extra_generator,
            polynomial,
            secret,
            proof,
        })
    }

    /// Share scalar `p(id)` of the participant with the given 1-based id
    pub(crate) fn share_scalar(&self, id: ShareId) -> G::ScalarField {
        self.polynomial.evaluate(&G::ScalarField::from(id as u64))
    }
}

impl<G: AffineRepr> Zeroize for Escrow<G> {
    fn zeroize(&mut self) {
        self.polynomial
            .coeffs
            .iter_mut()
            .for_each(Zeroize::zeroize);
    }
}

impl<G: AffineRepr> Drop for Escrow<G> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Symmetric key material bound to a protocol output point (a recovered secret or a decrypted
/// share), for callers that key a cipher off it
pub fn point_to_dh_secret<G: AffineRepr>(point: &G) -> Result<DhSecret, PvssError> {
    Ok(DhSecret::from_point(point)?)
}

/// Return the Lagrange basis polynomial at x = 0 given the `x` coordinates
/// `(x_coords[0]) * (x_coords[1]) * ... / ((x_coords[0] - i) * (x_coords[1] - i) * ...)`
/// Expects distinct `x` coordinates; a duplicate makes the denominator vanish and is reported
/// as an error.
pub fn lagrange_basis_at_0<F: PrimeField>(x_coords: &[ShareId], i: ShareId) -> Result<F, PvssError> {
    let mut numerator = F::one();
    let mut denominator = F::one();
    let i_f = F::from(i as u64);
    for x in x_coords {
        // Ensure no x-coordinate can be 0 since we are evaluating basis polynomial at 0
        if *x == 0 {
            return Err(PvssError::ShareIdCantBeZero);
        }
        if *x == i {
            continue;
        }
        let x = F::from(*x as u64);
        numerator *= x;
        denominator *= x - i_f;
    }
    let denominator = denominator
        .inverse()
        .ok_or(PvssError::DuplicateShareIds)?;
    Ok(numerator * denominator)
}

/// Return the Lagrange basis polynomial at x = 0 for each of the given `x` coordinates. Faster
/// than doing multiple calls to `lagrange_basis_at_0`
pub fn lagrange_basis_at_0_for_all<F: PrimeField>(
    x_coords: Vec<ShareId>,
) -> Result<Vec<F>, PvssError> {
    let x = cfg_into_iter!(x_coords.as_slice())
        .map(|x| F::from(*x as u64))
        .collect::<Vec<_>>();
    // Ensure no x-coordinate can be 0 since we are evaluating basis polynomials at 0
    if cfg_iter!(x).any(|x_i| x_i.is_zero()) {
        return Err(PvssError::ShareIdCantBeZero);
    }

    // Product of all `x`, i.e. \prod_{i}(x_i}
    let product = cfg_iter!(x).product::<F>();

    cfg_into_iter!(x.clone())
        .map(move |i| {
            let denominator = cfg_iter!(x)
                .filter(|&j| &i != j)
                .map(|&j| j - i)
                .product::<F>()
                .inverse()
                .ok_or(PvssError::DuplicateShareIds)?;

            // The numerator is of the form `x_1*x_2*...x_{i-1}*x_{i+1}*x_{i+2}*..` which is a
            // product of all `x` except `x_i` and thus can be calculated as
            // \prod_{i}(x_i} * (1 / x_i)
            let numerator = product * i.inverse().ok_or(PvssError::ShareIdCantBeZero)?;

            Ok(denominator * numerator)
        })
        .collect::<Result<Vec<_>, _>>()
}
