//! Packing of sequences whose labels live in one of their own columns.

use std::sync::Arc;

use ndarray::Array3;

use crate::config::{LabelEncoding, TargetSpec};
use crate::converter::ValueConverter;
use crate::dataset::SequenceDataSet;
use crate::error::{DataError, Result};
use crate::packer::{class_index, put, scalar};
use crate::preprocess::DataSetPreProcessor;
use crate::value::{SequenceSide, Step};

/// Packs a single sequence that carries its label in column `label_index`.
///
/// Every other column becomes a feature channel, in order. Features and labels
/// always have the same length, so the packed record never carries masks.
///
/// | Target | Label channels |
/// |--------|----------------|
/// | `Regression` | 1, the raw label value |
/// | `Classification { encoding: OneHot, .. }` | `num_classes`, one-hot |
///
/// Dense classification is rejected: a single column cannot hold a row.
#[derive(Clone)]
pub struct SingleSequencePacker {
    label_index: usize,
    target: TargetSpec,
    converter: Option<Arc<dyn ValueConverter>>,
    pre_processor: Option<Arc<dyn DataSetPreProcessor>>,
}

impl SingleSequencePacker {
    /// Create a packer reading labels from column `label_index`.
    pub fn new(label_index: usize, target: TargetSpec) -> Result<Self> {
        target.validate()?;
        if let TargetSpec::Classification {
            encoding: LabelEncoding::Dense,
            ..
        } = target
        {
            return Err(DataError::InvalidInput(
                "a single label column requires one-hot encoding for classification".to_string(),
            ));
        }

        Ok(Self {
            label_index,
            target,
            converter: None,
            pre_processor: None,
        })
    }

    /// Apply `converter` to every raw value before scalar conversion.
    #[must_use]
    pub fn with_converter<C: ValueConverter + 'static>(mut self, converter: C) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Run `pre_processor` on every packed record before it is returned.
    #[must_use]
    pub fn with_pre_processor<P: DataSetPreProcessor + 'static>(mut self, pre_processor: P) -> Self {
        self.pre_processor = Some(Arc::new(pre_processor));
        self
    }

    /// Column holding the label.
    #[must_use]
    pub const fn label_index(&self) -> usize {
        self.label_index
    }

    /// Pack one sequence.
    pub fn pack(&self, sequence: &[Step]) -> Result<SequenceDataSet> {
        let first = sequence.first().ok_or(DataError::EmptySequence {
            side: SequenceSide::Features,
        })?;

        let width = first.len();
        if width < 2 {
            return Err(DataError::MalformedStep {
                side: SequenceSide::Features,
                step: 0,
                expected: 2,
                got: width,
            });
        }
        if self.label_index >= width {
            return Err(DataError::IndexOutOfBounds {
                index: self.label_index,
                length: width,
            });
        }

        let len = sequence.len();
        let label_channels = self.target.num_classes().unwrap_or(1);
        let mut features = Array3::<f32>::zeros((1, width - 1, len));
        let mut labels = Array3::<f32>::zeros((1, label_channels, len));
        let converter = self.converter.as_deref();

        for (t, step) in sequence.iter().enumerate() {
            if step.len() != width {
                return Err(DataError::MalformedStep {
                    side: SequenceSide::Features,
                    step: t,
                    expected: width,
                    got: step.len(),
                });
            }

            for (c, value) in step.iter().enumerate() {
                if c == self.label_index {
                    match self.target {
                        TargetSpec::Regression => put(&mut labels, 0, t, scalar(value, converter)?)?,
                        TargetSpec::Classification { num_classes, .. } => {
                            let class = class_index(value, num_classes, converter)?;
                            put(&mut labels, class, t, 1.0)?;
                        }
                    }
                } else {
                    let channel = if c < self.label_index { c } else { c - 1 };
                    put(&mut features, channel, t, scalar(value, converter)?)?;
                }
            }
        }

        let mut dataset = SequenceDataSet::new(features, labels)?;
        if let Some(pre_processor) = &self.pre_processor {
            pre_processor.pre_process(&mut dataset)?;
        }
        Ok(dataset)
    }
}

impl std::fmt::Debug for SingleSequencePacker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleSequencePacker")
            .field("label_index", &self.label_index)
            .field("target", &self.target)
            .field("converter", &self.converter.as_ref().map(|c| c.name()))
            .field("pre_processor", &self.pre_processor.as_ref().map(|p| p.name()))
            .finish()
    }
}
