//! # eof-primitives
//!
//! Constants and primitive types shared by the EOF container crates.
//!
//! This crate provides:
//! - Protocol limits for the EOF v1 container format
//! - Re-exports of alloy primitive types for convenience
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod constants;

pub use constants::*;

// Reexport alloy primitives.
pub use alloy_primitives::{self, b256, bytes, fixed_bytes, hex, Bytes, FixedBytes, B256};
