//! # seqpack
//!
//! Packing of variable-length sequence records into masked training tensors.
//!
//! seqpack turns pairs of raw sequences (features, labels) into `(1, V, L)`
//! records ready for time series models:
//!
//! - **Alignment**: equal-length, align-start or align-end reconciliation
//! - **Masking**: the padded side carries a `(1, L)` mask of real steps
//! - **Hooks**: value converters before packing, pre-processors after
//! - **Devices**: records upload to any Burn backend as a [`core::SeqBatch`]
//!
//! ## Quick Start
//!
//! ```rust
//! use seqpack::prelude::*;
//!
//! let config = PackerConfig::regression().with_alignment(AlignmentMode::AlignStart);
//! let packer = TwoSequencePacker::new(config)?;
//!
//! let features = vec![vec![Value::from(0.1)], vec![Value::from(0.2)], vec![Value::from(0.3)]];
//! let labels = vec![vec![Value::from(1.0)]];
//!
//! let ds = packer.pack(&features, &labels)?;
//! assert_eq!(ds.labels_mask().unwrap().row(0).to_vec(), vec![1.0, 0.0, 0.0]);
//! # Ok::<(), DataError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `backend-ndarray` (default): CPU backend using ndarray

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use seqpack_core as core;
pub use seqpack_data as data;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use seqpack::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use seqpack_core::{SeqBatch, TSMaskTensor, TSShape, TSTensor};

    // Data
    pub use seqpack_data::{
        AlignmentMode, DataError, DataSetPreProcessor, LabelEncoding, PackerConfig, Sequence,
        SequenceDataSet, SingleSequencePacker, Step, TargetSpec, TwoSequencePacker, Value,
        ValueConverter,
    };
}

/// All module for importing everything.
pub mod all {
    pub use super::prelude::*;

    pub use seqpack_core::backend;
    pub use seqpack_data::{
        Compose, LabelIndexConverter, SequenceSide,
    };
}
