//! A collection of utilities used by the PVSS crates. Serde serialization for arkworks objects,
//! hashing arbitrary bytes to a field element, symmetric key material derived from a group
//! element and small finite field helpers like incremental scalar powers.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
extern crate core;

/// Symmetric key material derived from a group element
pub mod dh;
/// Finite field utilities
pub mod ff;
/// Hashing utilities like hashing arbitrary bytes to a field element
pub mod hashing_utils;
pub mod macros;
pub mod misc;
pub mod serde_utils;
