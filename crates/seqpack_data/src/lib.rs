//! # seqpack_data
//!
//! Alignment and packing of paired time series records for seqpack.
//!
//! This crate provides:
//! - [`Value`], [`Step`] and [`Sequence`] for raw record data
//! - [`ValueConverter`] hooks that normalize raw values before packing
//! - [`AlignmentMode`] and [`PackerConfig`] for length reconciliation
//! - [`TwoSequencePacker`] for separate feature and label sequences
//! - [`SingleSequencePacker`] for sequences with an inline label column
//! - [`SequenceDataSet`], the packed record, and [`DataSetPreProcessor`] hooks
//!
//! ## Example
//!
//! ```rust
//! use seqpack_data::{AlignmentMode, LabelEncoding, PackerConfig, TwoSequencePacker, Value};
//!
//! // Ten input steps, one class label at the end.
//! let config = PackerConfig::classification(3, LabelEncoding::OneHot)
//!     .with_alignment(AlignmentMode::AlignEnd);
//! let packer = TwoSequencePacker::new(config)?;
//!
//! let features: Vec<Vec<Value>> = (0..10).map(|t| vec![Value::from(t as f64)]).collect();
//! let labels = vec![vec![Value::Int(2)]];
//!
//! let ds = packer.pack(&features, &labels)?;
//! assert_eq!(ds.labels_shape().as_array(), [1, 3, 10]);
//! assert!(ds.features_mask().is_none());
//! # Ok::<(), seqpack_data::DataError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod alignment;
mod config;
mod converter;
mod dataset;
mod error;
mod packer;
mod preprocess;
mod single;
mod value;

pub use alignment::AlignmentMode;
pub use config::{LabelEncoding, PackerConfig, TargetSpec};
pub use converter::{LabelIndexConverter, ValueConverter};
pub use dataset::SequenceDataSet;
pub use error::{DataError, Result};
pub use packer::TwoSequencePacker;
pub use preprocess::{Compose, DataSetPreProcessor};
pub use single::SingleSequencePacker;
pub use value::{Sequence, SequenceSide, Step, Value};
