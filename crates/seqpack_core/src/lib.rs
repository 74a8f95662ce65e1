//! # seqpack_core
//!
//! Core types for packing paired time series into training records.
//!
//! This crate provides:
//! - [`TSShape`] for time series tensor shape metadata
//! - [`TSTensor`] and [`TSMaskTensor`] wrappers for Burn tensors
//! - [`SeqBatch`], an input/target pair with optional padding masks
//! - Error types shared by the other seqpack crates
//!
//! ## Shape Convention
//!
//! Time series data follows the convention `(B, V, L)`:
//! - `B`: Batch size (number of samples)
//! - `V`: Variables/channels/features
//! - `L`: Sequence length (time steps)
//!
//! Masks drop the channel axis and are shaped `(B, L)`.
//!
//! ## Example
//!
//! ```rust
//! use seqpack_core::TSShape;
//!
//! let shape = TSShape::new(1, 3, 100); // one example, 3 channels, 100 steps
//! assert_eq!(shape.mask_dims(), [1, 100]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod shape;
mod tensor;

pub use error::{CoreError, Result};
pub use shape::TSShape;
pub use tensor::{SeqBatch, TSMaskTensor, TSTensor};

/// Backend type aliases for convenience
pub mod backend {
    #[cfg(feature = "backend-ndarray")]
    pub use burn_ndarray::NdArray;
}
