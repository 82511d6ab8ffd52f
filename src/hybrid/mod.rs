//! Hybrid Classical/Post-Quantum Key Encapsulation
//!
//! This module implements the combiner that composes one post-quantum KEM
//! with one classical key exchange into a single encapsulation operation,
//! yielding one composite ciphertext and one composite shared secret. The
//! combined scheme stays secure as long as either underlying primitive
//! does.
//!
//! Byte layouts follow the TLS hybrid-design draft convention: fixed-size
//! components concatenated KEM-first, with length-prefixed composite keys.

pub mod codec;

mod context;
mod decapsulate;
mod encapsulate;
mod key;


pub use context::{Decapsulation, Encapsulation, HybridContext, HybridRole};
pub use key::{AlgorithmDescriptor, HybridKeyHandle, HybridKeyMaterial};
