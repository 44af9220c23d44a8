#![cfg_attr(not(feature = "std"), no_std)]

//! Publicly verifiable secret sharing over a prime order group. A dealer splits a group element
//! secret among `n` participants so that any `threshold` of them can reconstruct it, and every
//! protocol step (distribution, decryption, reconstruction) comes with a proof that any third
//! party can check without learning anything secret.
//!
//! Two schemes over a common substrate of polynomial dealing and discrete log equality proofs:
//! - [`schoenmakers`]: the scheme of [Schoenmakers](https://www.win.tue.nl/~berry/papers/crypto99.pdf),
//!   with one coefficient commitment per polynomial coefficient and one proof per encrypted
//!   share. Verifying all shares costs `O(n * threshold)` group operations.
//! - [`scrape`]: the DDH variant of [SCRAPE](https://eprint.iacr.org/2017/216), with one
//!   commitment per share, a single batched proof for all encrypted shares and a dual code
//!   check that brings verification of the whole sharing to `O(n)`.

pub mod common;
pub mod error;
pub mod schoenmakers;
pub mod scrape;
