//! Value converters applied to raw fields before they are packed.

use std::collections::HashMap;

use crate::error::{DataError, Result};
use crate::value::Value;

/// Normalizes a raw field value into a form [`Value::to_f64`] understands.
///
/// Converters run on every value of both sequences, before scalar conversion.
/// Any `Fn(&Value) -> Result<Value> + Send + Sync` closure is a converter.
///
/// # Example
///
/// ```rust
/// use seqpack_data::{Value, ValueConverter};
///
/// let yes_no = |v: &Value| -> seqpack_data::Result<Value> {
///     Ok(match v {
///         Value::Text(s) if s == "yes" => Value::Int(1),
///         Value::Text(s) if s == "no" => Value::Int(0),
///         other => other.clone(),
///     })
/// };
/// assert_eq!(yes_no.convert(&Value::from("yes")).unwrap(), Value::Int(1));
/// ```
pub trait ValueConverter: Send + Sync {
    /// Convert one raw value.
    fn convert(&self, value: &Value) -> Result<Value>;

    /// Get the name of this converter for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> ValueConverter for F
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    fn convert(&self, value: &Value) -> Result<Value> {
        self(value)
    }
}

/// Maps category names to their position in a fixed label list.
///
/// Text values are looked up by name; numeric values pass through untouched so
/// already-indexed labels keep working.
#[derive(Debug, Clone)]
pub struct LabelIndexConverter {
    index: HashMap<String, usize>,
}

impl LabelIndexConverter {
    /// Create a converter for the given labels; index `i` is `labels[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or contains duplicates.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        for (i, label) in labels.into_iter().enumerate() {
            let label: String = label.into();
            if index.contains_key(&label) {
                return Err(DataError::InvalidInput(format!(
                    "duplicate label {:?}",
                    label
                )));
            }
            index.insert(label, i);
        }

        if index.is_empty() {
            return Err(DataError::InvalidInput(
                "label list must not be empty".to_string(),
            ));
        }
        Ok(Self { index })
    }
}

impl ValueConverter for LabelIndexConverter {
    fn convert(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Text(name) => self
                .index
                .get(name.trim())
                .map(|&i| Value::Int(i as i64))
                .ok_or_else(|| DataError::Conversion(format!("unknown label {:?}", name))),
            other => Ok(other.clone()),
        }
    }

    fn name(&self) -> &str {
        "LabelIndexConverter"
    }
}
