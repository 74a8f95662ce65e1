//! Hooks that run on a packed record before it is returned.

use crate::dataset::SequenceDataSet;
use crate::error::Result;

/// A hook applied in place to every packed [`SequenceDataSet`].
///
/// Typical uses are scaling or normalization. Pre-processors see mutable views
/// of the feature and label values, so they can change values but never the
/// record's shapes or masks. Any `Fn(&mut SequenceDataSet) -> Result<()> +
/// Send + Sync` closure is a pre-processor.
///
/// # Example
///
/// ```rust
/// use seqpack_data::{DataSetPreProcessor, SequenceDataSet};
///
/// let scale = |ds: &mut SequenceDataSet| -> seqpack_data::Result<()> {
///     ds.features_mut().mapv_inplace(|v| v / 10.0);
///     Ok(())
/// };
/// # let _ = scale.name();
/// ```
pub trait DataSetPreProcessor: Send + Sync {
    /// Process the record in place.
    fn pre_process(&self, dataset: &mut SequenceDataSet) -> Result<()>;

    /// Get the name of this pre-processor for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> DataSetPreProcessor for F
where
    F: Fn(&mut SequenceDataSet) -> Result<()> + Send + Sync,
{
    fn pre_process(&self, dataset: &mut SequenceDataSet) -> Result<()> {
        self(dataset)
    }
}

/// Several pre-processors applied in order.
#[derive(Default)]
pub struct Compose {
    steps: Vec<Box<dyn DataSetPreProcessor>>,
}

impl Compose {
    /// Create a new empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a pre-processor to the composition.
    pub fn push<P: DataSetPreProcessor + 'static>(&mut self, step: P) {
        self.steps.push(Box::new(step));
    }

    /// Builder form of [`Compose::push`].
    #[must_use]
    pub fn then<P: DataSetPreProcessor + 'static>(mut self, step: P) -> Self {
        self.push(step);
        self
    }
}

impl DataSetPreProcessor for Compose {
    fn pre_process(&self, dataset: &mut SequenceDataSet) -> Result<()> {
        for step in &self.steps {
            tracing::trace!("Applying pre-processor {}", step.name());
            step.pre_process(dataset)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Compose"
    }
}
