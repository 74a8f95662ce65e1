//! Shape of a packed sequence array.

use serde::{Deserialize, Serialize};

/// Dimensions `(B, V, L)` of a packed sequence array: batch, channels, steps.
///
/// Packed records use `B = 1`. The matching padding mask drops the channel
/// axis, see [`TSShape::mask_dims`].
///
/// ```rust
/// use seqpack_core::TSShape;
///
/// let shape = TSShape::new(1, 3, 100);
/// assert_eq!(shape.numel(), 300);
/// assert_eq!(shape.mask_dims(), [1, 100]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TSShape {
    batch: usize,
    vars: usize,
    len: usize,
}

impl TSShape {
    /// Shape with `batch` samples of `vars` channels over `len` steps.
    #[must_use]
    pub const fn new(batch: usize, vars: usize, len: usize) -> Self {
        Self { batch, vars, len }
    }

    /// Number of samples.
    #[must_use]
    pub const fn batch(&self) -> usize {
        self.batch
    }

    /// Number of channels.
    #[must_use]
    pub const fn vars(&self) -> usize {
        self.vars
    }

    /// Number of time steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Total element count.
    #[must_use]
    pub const fn numel(&self) -> usize {
        self.batch * self.vars * self.len
    }

    /// Dimensions as `[B, V, L]`.
    #[must_use]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.batch, self.vars, self.len]
    }

    /// Dimensions of the padding mask for this shape: `[B, L]`.
    #[must_use]
    pub const fn mask_dims(&self) -> [usize; 2] {
        [self.batch, self.len]
    }
}

impl std::fmt::Display for TSShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(B={}, V={}, L={})", self.batch, self.vars, self.len)
    }
}
