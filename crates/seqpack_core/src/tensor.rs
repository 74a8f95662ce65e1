//! Time series tensor types.

use burn::prelude::*;
use burn::tensor::TensorData;

use crate::error::{CoreError, Result};
use crate::shape::TSShape;

/// A time series tensor wrapper with shape metadata.
///
/// Wraps a Burn tensor and ensures the shape follows the `(B, V, L)` convention:
/// - `B`: Batch size
/// - `V`: Variables/channels
/// - `L`: Sequence length
///
/// # Type Parameters
///
/// * `B` - The Burn backend type
#[derive(Debug, Clone)]
pub struct TSTensor<B: Backend> {
    inner: Tensor<B, 3>,
    shape: TSShape,
}

impl<B: Backend> TSTensor<B> {
    /// Create a TSTensor from row-major `(B, V, L)` data.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not hold exactly `shape.numel()` values.
    pub fn from_vec(data: Vec<f32>, shape: TSShape, device: &B::Device) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(CoreError::InvalidShape {
                expected: format!("{} values for {}", shape.numel(), shape),
                got: format!("{} values", data.len()),
            });
        }
        let tensor = Tensor::from_data(TensorData::new(data, shape.as_array()), device);
        Ok(Self {
            inner: tensor,
            shape,
        })
    }

    /// Get the shape metadata.
    #[must_use]
    pub const fn shape(&self) -> TSShape {
        self.shape
    }

    /// Get the batch size.
    #[must_use]
    pub const fn batch(&self) -> usize {
        self.shape.batch()
    }

    /// Consume self and return the underlying Burn tensor.
    #[must_use]
    pub fn into_inner(self) -> Tensor<B, 3> {
        self.inner
    }
}

/// A padding mask for one side of a sequence batch.
///
/// Shaped `(B, L)`. Values of 1.0 mark real time steps, 0.0 mark padding.
#[derive(Debug, Clone)]
pub struct TSMaskTensor<B: Backend> {
    inner: Tensor<B, 2>,
}

impl<B: Backend> TSMaskTensor<B> {
    /// Create a mask from row-major `(B, L)` data.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not hold exactly `batch * len` values.
    pub fn from_vec(data: Vec<f32>, batch: usize, len: usize, device: &B::Device) -> Result<Self> {
        if data.len() != batch * len {
            return Err(CoreError::InvalidShape {
                expected: format!("{} mask values for [{}, {}]", batch * len, batch, len),
                got: format!("{} values", data.len()),
            });
        }
        let tensor = Tensor::from_data(TensorData::new(data, [batch, len]), device);
        Ok(Self { inner: tensor })
    }

    /// Get the mask dimensions `[B, L]`.
    #[must_use]
    pub fn dims(&self) -> [usize; 2] {
        self.inner.dims()
    }

    /// Consume self and return the underlying tensor.
    #[must_use]
    pub fn into_inner(self) -> Tensor<B, 2> {
        self.inner
    }
}

/// An input/target pair of time series with optional padding masks.
///
/// Input and target may have different channel counts and, when a mask is
/// present, the mask covers the side that was padded. At most one side carries
/// a mask: padding is only ever applied to the shorter sequence.
#[derive(Debug, Clone)]
pub struct SeqBatch<B: Backend> {
    /// Input time series tensor (B, V_in, L).
    pub x: TSTensor<B>,

    /// Target time series tensor (B, V_out, L').
    pub y: TSTensor<B>,

    /// Mask over the input time steps, present when the input was padded.
    pub x_mask: Option<TSMaskTensor<B>>,

    /// Mask over the target time steps, present when the target was padded.
    pub y_mask: Option<TSMaskTensor<B>>,
}

impl<B: Backend> SeqBatch<B> {
    /// Create a batch without masks.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree on the batch size.
    pub fn new(x: TSTensor<B>, y: TSTensor<B>) -> Result<Self> {
        if x.batch() != y.batch() {
            return Err(CoreError::ShapeMismatch(format!(
                "x batch size {} != y batch size {}",
                x.batch(),
                y.batch()
            )));
        }

        Ok(Self {
            x,
            y,
            x_mask: None,
            y_mask: None,
        })
    }

    /// Attach a mask over the input time steps.
    pub fn with_x_mask(mut self, mask: TSMaskTensor<B>) -> Result<Self> {
        check_mask(&self.x, &mask)?;
        if self.y_mask.is_some() {
            return Err(CoreError::MaskConflict);
        }
        self.x_mask = Some(mask);
        Ok(self)
    }

    /// Attach a mask over the target time steps.
    pub fn with_y_mask(mut self, mask: TSMaskTensor<B>) -> Result<Self> {
        check_mask(&self.y, &mask)?;
        if self.x_mask.is_some() {
            return Err(CoreError::MaskConflict);
        }
        self.y_mask = Some(mask);
        Ok(self)
    }
}

fn check_mask<B: Backend>(tensor: &TSTensor<B>, mask: &TSMaskTensor<B>) -> Result<()> {
    let expected = tensor.shape().mask_dims();
    if mask.dims() != expected {
        return Err(CoreError::ShapeMismatch(format!(
            "mask dims {:?} != expected {:?} for tensor {}",
            mask.dims(),
            expected,
            tensor.shape()
        )));
    }
    Ok(())
}
