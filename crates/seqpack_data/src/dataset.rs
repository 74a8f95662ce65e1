//! The packed feature/label record produced for one example.

use burn::tensor::backend::Backend;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, ArrayViewMut3};

use crate::error::{DataError, Result};
use seqpack_core::{SeqBatch, TSMaskTensor, TSShape, TSTensor};

/// One example's packed input and target time series.
///
/// Stores host arrays in the `(1, V, L)` format with optional `(1, L)` masks:
/// - `features`: input series, `V_in` channels
/// - `labels`: target series, `V_out` channels
/// - `features_mask` / `labels_mask`: 1.0 for real steps, 0.0 for padding
///
/// At most one mask is present, on whichever side was padded. Pre-processors
/// get mutable views of the values but cannot change shapes or masks.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDataSet {
    features: Array3<f32>,
    labels: Array3<f32>,
    features_mask: Option<Array2<f32>>,
    labels_mask: Option<Array2<f32>>,
}

impl SequenceDataSet {
    /// Create an unmasked record.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch dimensions don't match.
    pub fn new(features: Array3<f32>, labels: Array3<f32>) -> Result<Self> {
        Self::from_parts(features, labels, None, None)
    }

    /// Create a record from arrays and optional masks.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch dimensions don't match, a mask is not
    /// shaped `(batch, len)` of the side it covers, or both masks are given.
    pub fn from_parts(
        features: Array3<f32>,
        labels: Array3<f32>,
        features_mask: Option<Array2<f32>>,
        labels_mask: Option<Array2<f32>>,
    ) -> Result<Self> {
        let fb = features.shape()[0];
        let lb = labels.shape()[0];
        if fb != lb {
            return Err(DataError::InvalidInput(format!(
                "features have batch size {} but labels have {}",
                fb, lb
            )));
        }

        if features_mask.is_some() && labels_mask.is_some() {
            return Err(seqpack_core::CoreError::MaskConflict.into());
        }
        if let Some(mask) = &features_mask {
            check_mask(mask, &features, "features")?;
        }
        if let Some(mask) = &labels_mask {
            check_mask(mask, &labels, "labels")?;
        }

        Ok(Self {
            features,
            labels,
            features_mask,
            labels_mask,
        })
    }

    /// Shape of the feature array.
    #[must_use]
    pub fn features_shape(&self) -> TSShape {
        shape_of(&self.features)
    }

    /// Shape of the label array.
    #[must_use]
    pub fn labels_shape(&self) -> TSShape {
        shape_of(&self.labels)
    }

    /// Get the feature values.
    #[must_use]
    pub fn features(&self) -> ArrayView3<'_, f32> {
        self.features.view()
    }

    /// Get the label values.
    #[must_use]
    pub fn labels(&self) -> ArrayView3<'_, f32> {
        self.labels.view()
    }

    /// Mutable view of the feature values.
    pub fn features_mut(&mut self) -> ArrayViewMut3<'_, f32> {
        self.features.view_mut()
    }

    /// Mutable view of the label values.
    pub fn labels_mut(&mut self) -> ArrayViewMut3<'_, f32> {
        self.labels.view_mut()
    }

    /// Mask over the feature time steps, present when features were padded.
    #[must_use]
    pub fn features_mask(&self) -> Option<ArrayView2<'_, f32>> {
        self.features_mask.as_ref().map(|m| m.view())
    }

    /// Mask over the label time steps, present when labels were padded.
    #[must_use]
    pub fn labels_mask(&self) -> Option<ArrayView2<'_, f32>> {
        self.labels_mask.as_ref().map(|m| m.view())
    }

    /// Check if either side carries a padding mask.
    #[must_use]
    pub fn has_masks(&self) -> bool {
        self.features_mask.is_some() || self.labels_mask.is_some()
    }

    /// Upload the record to a device as a [`SeqBatch`].
    pub fn to_batch<B: Backend>(&self, device: &B::Device) -> Result<SeqBatch<B>> {
        let x = TSTensor::from_vec(to_vec3(&self.features), self.features_shape(), device)?;
        let y = TSTensor::from_vec(to_vec3(&self.labels), self.labels_shape(), device)?;
        let mut batch = SeqBatch::new(x, y)?;

        if let Some(mask) = &self.features_mask {
            batch = batch.with_x_mask(mask_tensor(mask, device)?)?;
        }
        if let Some(mask) = &self.labels_mask {
            batch = batch.with_y_mask(mask_tensor(mask, device)?)?;
        }
        Ok(batch)
    }
}

fn shape_of(array: &Array3<f32>) -> TSShape {
    let (b, v, l) = array.dim();
    TSShape::new(b, v, l)
}

fn check_mask(mask: &Array2<f32>, array: &Array3<f32>, side: &str) -> Result<()> {
    let expected = shape_of(array).mask_dims();
    if mask.dim() != (expected[0], expected[1]) {
        return Err(DataError::InvalidInput(format!(
            "{} mask has shape {:?}, expected {:?}",
            side,
            mask.shape(),
            expected
        )));
    }
    Ok(())
}

// `iter()` walks in logical order, so non-standard layouts flatten correctly.
fn to_vec3(array: &Array3<f32>) -> Vec<f32> {
    array.iter().copied().collect()
}

fn mask_tensor<B: Backend>(mask: &Array2<f32>, device: &B::Device) -> Result<TSMaskTensor<B>> {
    let (b, l) = mask.dim();
    Ok(TSMaskTensor::from_vec(mask.iter().copied().collect(), b, l, device)?)
}
