//! Packing of feature/label sequence pairs into aligned, masked records.

use std::sync::Arc;

use ndarray::{s, Array2, Array3};
use rayon::prelude::*;

use crate::config::{LabelEncoding, PackerConfig, TargetSpec};
use crate::converter::ValueConverter;
use crate::dataset::SequenceDataSet;
use crate::error::{DataError, Result};
use crate::preprocess::DataSetPreProcessor;
use crate::value::{Sequence, SequenceSide, Step, Value};

/// Packs a feature sequence and a label sequence into a [`SequenceDataSet`].
///
/// Each sequence becomes a `(1, V, L)` array with step `t` at time index `t`.
/// If the lengths differ, the configured [`AlignmentMode`] decides where the
/// shorter side sits inside a zero-padded array of the longer length, and the
/// shorter side gets a `(1, L)` mask. Supports one-to-many and many-to-one
/// layouts, such as a single label at the end of a long input.
///
/// The packer holds no mutable state and is `Send + Sync`; one instance can
/// pack many examples concurrently, see [`TwoSequencePacker::pack_all`].
///
/// # Example
///
/// ```rust
/// use seqpack_data::{AlignmentMode, PackerConfig, TwoSequencePacker, Value};
///
/// let config = PackerConfig::regression().with_alignment(AlignmentMode::AlignEnd);
/// let packer = TwoSequencePacker::new(config).unwrap();
///
/// let features: Vec<Vec<Value>> = (0..5).map(|t| vec![Value::from(t as f64)]).collect();
/// let labels = vec![vec![Value::from(1.0)]];
///
/// let ds = packer.pack(&features, &labels).unwrap();
/// assert_eq!(ds.labels_shape().len(), 5);
/// assert_eq!(ds.labels_mask().unwrap().row(0).to_vec(), vec![0.0, 0.0, 0.0, 0.0, 1.0]);
/// ```
///
/// [`AlignmentMode`]: crate::AlignmentMode
#[derive(Clone)]
pub struct TwoSequencePacker {
    config: PackerConfig,
    converter: Option<Arc<dyn ValueConverter>>,
    pre_processor: Option<Arc<dyn DataSetPreProcessor>>,
}

impl TwoSequencePacker {
    /// Create a packer without converter or pre-processor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
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

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Pack one feature/label pair.
    ///
    /// # Errors
    ///
    /// - [`DataError::EmptySequence`] if either sequence has no steps
    /// - [`DataError::MalformedStep`] if a step has the wrong number of values
    /// - [`DataError::Conversion`] if a value cannot be made numeric
    /// - [`DataError::InvalidLabel`] if a one-hot label is not a valid class
    /// - [`DataError::LengthMismatch`] if lengths differ under `EQUAL_LENGTH`
    /// - any error returned by the pre-processor
    pub fn pack(&self, features: &[Step], labels: &[Step]) -> Result<SequenceDataSet> {
        let converter = self.converter.as_deref();
        let x = materialize(features, SequenceSide::Features, ChannelLayout::Raw, converter)?;
        let y = materialize(labels, SequenceSide::Labels, self.label_layout(), converter)?;

        tracing::trace!(
            features = features.len(),
            labels = labels.len(),
            "Packing sequence pair"
        );

        let mut dataset = self.align(x, y)?;
        if let Some(pre_processor) = &self.pre_processor {
            pre_processor.pre_process(&mut dataset)?;
        }
        Ok(dataset)
    }

    /// Pack many pairs in parallel.
    ///
    /// Results are returned in input order. A failing pair only affects its
    /// own slot; the caller decides whether to skip it or abort.
    pub fn pack_all(&self, pairs: &[(Sequence, Sequence)]) -> Vec<Result<SequenceDataSet>> {
        let results: Vec<Result<SequenceDataSet>> = pairs
            .par_iter()
            .map(|(features, labels)| self.pack(features, labels))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::debug!(pairs = pairs.len(), failed, "Packed sequence pairs");
        results
    }

    fn label_layout(&self) -> ChannelLayout {
        match self.config.target {
            TargetSpec::Regression => ChannelLayout::Raw,
            TargetSpec::Classification {
                num_classes,
                encoding: LabelEncoding::Dense,
            } => ChannelLayout::Fixed(num_classes),
            TargetSpec::Classification {
                num_classes,
                encoding: LabelEncoding::OneHot,
            } => ChannelLayout::OneHot(num_classes),
        }
    }

    fn align(&self, features: Array3<f32>, labels: Array3<f32>) -> Result<SequenceDataSet> {
        let f_len = features.dim().2;
        let l_len = labels.dim().2;
        if f_len == l_len {
            return SequenceDataSet::new(features, labels);
        }

        let total = f_len.max(l_len);
        let short = f_len.min(l_len);
        let Some(offset) = self.config.alignment.window_offset(short, total) else {
            return Err(DataError::LengthMismatch {
                features: f_len,
                labels: l_len,
            });
        };

        if f_len > l_len {
            tracing::debug!(
                mode = %self.config.alignment,
                from = l_len,
                to = total,
                "Padding labels"
            );
            let (labels, mask) = pad_time(&labels, total, offset)?;
            SequenceDataSet::from_parts(features, labels, None, Some(mask))
        } else {
            tracing::debug!(
                mode = %self.config.alignment,
                from = f_len,
                to = total,
                "Padding features"
            );
            let (features, mask) = pad_time(&features, total, offset)?;
            SequenceDataSet::from_parts(features, labels, Some(mask), None)
        }
    }
}

impl std::fmt::Debug for TwoSequencePacker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoSequencePacker")
            .field("config", &self.config)
            .field("converter", &self.converter.as_ref().map(|c| c.name()))
            .field("pre_processor", &self.pre_processor.as_ref().map(|p| p.name()))
            .finish()
    }
}

/// How the values of a step map onto tensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChannelLayout {
    /// One channel per value; the width is taken from the first step.
    Raw,
    /// One channel per value; every step must carry exactly this many.
    Fixed(usize),
    /// Each step carries one class index, written as a one-hot row.
    OneHot(usize),
}

/// Apply the optional converter and read the value as a finite `f32`.
///
/// NaN, infinities and values beyond the `f32` range are conversion errors.
pub(crate) fn scalar(value: &Value, converter: Option<&dyn ValueConverter>) -> Result<f32> {
    let wide = match converter {
        Some(c) => c.convert(value)?.to_f64()?,
        None => value.to_f64()?,
    };
    let narrow = wide as f32;
    if !narrow.is_finite() {
        return Err(DataError::Conversion(format!(
            "{} is not representable as a finite f32",
            wide
        )));
    }
    Ok(narrow)
}

/// Apply the optional converter and read the value as a class index below
/// `num_classes`.
pub(crate) fn class_index(
    value: &Value,
    num_classes: usize,
    converter: Option<&dyn ValueConverter>,
) -> Result<usize> {
    let class = match converter {
        Some(c) => c.convert(value)?.to_class_index()?,
        None => value.to_class_index()?,
    };
    if class >= num_classes {
        return Err(DataError::InvalidLabel(format!(
            "class {} out of range for {} classes",
            class, num_classes
        )));
    }
    Ok(class)
}

/// Bounds-checked scalar write at `(0, channel, step)`.
pub(crate) fn put(array: &mut Array3<f32>, channel: usize, step: usize, value: f32) -> Result<()> {
    let (_, vars, len) = array.dim();
    match array.get_mut((0, channel, step)) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None if channel >= vars => Err(DataError::IndexOutOfBounds {
            index: channel,
            length: vars,
        }),
        None => Err(DataError::IndexOutOfBounds {
            index: step,
            length: len,
        }),
    }
}

fn materialize(
    sequence: &[Step],
    side: SequenceSide,
    layout: ChannelLayout,
    converter: Option<&dyn ValueConverter>,
) -> Result<Array3<f32>> {
    let first = sequence
        .first()
        .ok_or(DataError::EmptySequence { side })?;

    let (channels, step_width) = match layout {
        ChannelLayout::Raw => (first.len(), first.len()),
        ChannelLayout::Fixed(n) => (n, n),
        ChannelLayout::OneHot(n) => (n, 1),
    };
    if step_width == 0 {
        return Err(DataError::MalformedStep {
            side,
            step: 0,
            expected: 1,
            got: 0,
        });
    }

    let mut array = Array3::<f32>::zeros((1, channels, sequence.len()));
    for (t, step) in sequence.iter().enumerate() {
        if step.len() != step_width {
            return Err(DataError::MalformedStep {
                side,
                step: t,
                expected: step_width,
                got: step.len(),
            });
        }

        match layout {
            ChannelLayout::OneHot(n) => {
                let class = class_index(&step[0], n, converter)?;
                put(&mut array, class, t, 1.0)?;
            }
            ChannelLayout::Raw | ChannelLayout::Fixed(_) => {
                for (c, value) in step.iter().enumerate() {
                    put(&mut array, c, t, scalar(value, converter)?)?;
                }
            }
        }
    }
    Ok(array)
}

/// Copy `array` into a zero array of `total` time steps starting at `offset`,
/// returning it with a `(1, total)` mask that is 1.0 over the copied window.
fn pad_time(array: &Array3<f32>, total: usize, offset: usize) -> Result<(Array3<f32>, Array2<f32>)> {
    let (batch, vars, len) = array.dim();
    let end = offset + len;
    if end > total {
        return Err(DataError::IndexOutOfBounds {
            index: end - 1,
            length: total,
        });
    }

    let mut padded = Array3::<f32>::zeros((batch, vars, total));
    padded.slice_mut(s![.., .., offset..end]).assign(array);

    let mut mask = Array2::<f32>::zeros((batch, total));
    mask.slice_mut(s![.., offset..end]).fill(1.0);

    Ok((padded, mask))
}
