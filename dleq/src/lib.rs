#![cfg_attr(not(feature = "std"), no_std)]

//! Chaum-Pedersen protocol to prove in zero knowledge that two pairs of group elements share a
//! discrete log, made non-interactive with the Fiat-Shamir heuristic.
//!
//! Prover wants to prove knowledge of `a` in `h1 = g1 * a` and `h2 = g2 * a` (`g1`, `h1`, `g2`
//! and `h2` are public knowledge).
//!
//! 1. Prover generates randomness `w`, and computes the commitments `a1 = g1 * w` and
//!    `a2 = g2 * w`.
//! 2. Prover computes the challenge as `c = Hash(a1 || a2)` over the canonical encodings of the
//!    commitments.
//! 3. Prover produces the response `z = w + a*c`. The proof is `(c, z)`.
//! 4. Verifier recomputes `a1' = g1 * z - h1 * c` and `a2' = g2 * z - h2 * c` and accepts if
//!    hashing them again yields `c`.
//!
//! For a legitimate proof `a1' = g1 * (w + a*c) - (g1 * a) * c = g1 * w` and likewise for
//! `a2'`, so the recomputed hash matches. Only the challenge and the response are transmitted.
//!
//! [`ParallelProofs`] batches `m` statements of the above shape under one challenge hashing all
//! `2m` commitments, so a verifier processes a single challenge value for the whole batch.
//!
//! [`ParallelProofs`]: crate::parallel::ParallelProofs

pub mod error;
pub mod parallel;
pub mod proof;

pub use error::DleqError;
pub use parallel::ParallelProofs;
pub use proof::{Dleq, Proof};

use ark_ff::PrimeField;
use digest::Digest;
use pvss_utils::hashing_utils::field_elem_from_try_and_incr;

/// Uses try-and-increment. Vulnerable to side channel attacks. But this is only used when its
/// input is public data.
pub fn compute_random_oracle_challenge<F: PrimeField, D: Digest>(challenge_bytes: &[u8]) -> F {
    field_elem_from_try_and_incr::<F, D>(challenge_bytes)
}
