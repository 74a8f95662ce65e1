//! Raw record values and sequence types.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// One raw field value of a sequence step, as produced by a record reader.
///
/// Deserializes from plain JSON scalars, so a step such as `[1.5, 3, "0.25"]`
/// maps to `[Float(1.5), Int(3), Text("0.25")]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean flag, read as 0 or 1.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value; must parse as a number unless a converter maps it first.
    Text(String),
}

impl Value {
    /// Convert to a floating-point scalar.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Conversion`] for `Null` and for text that does not
    /// parse as a number.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Self::Null => Err(DataError::Conversion(
                "null value has no numeric form".to_string(),
            )),
            Self::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Ok(*i as f64),
            Self::Float(f) => Ok(*f),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| DataError::Conversion(format!("cannot parse {:?} as a number", s))),
        }
    }

    /// Read the value as a class index.
    ///
    /// Accepts integers and integral floats or text, rejecting negatives.
    pub fn to_class_index(&self) -> Result<usize> {
        if let Self::Int(i) = self {
            return usize::try_from(*i)
                .map_err(|_| DataError::InvalidLabel(format!("negative class index {}", i)));
        }
        let v = self.to_f64()?;
        if v < 0.0 || v.fract() != 0.0 || !v.is_finite() {
            return Err(DataError::InvalidLabel(format!(
                "{} is not a class index",
                v
            )));
        }
        Ok(v as usize)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// The values of one time step, one per channel.
pub type Step = Vec<Value>;

/// One example's time series: an ordered list of steps.
pub type Sequence = Vec<Step>;

/// Which half of a feature/label pair a sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceSide {
    /// The input (feature) sequence.
    Features,
    /// The target (label) sequence.
    Labels,
}

impl std::fmt::Display for SequenceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Features => write!(f, "features"),
            Self::Labels => write!(f, "labels"),
        }
    }
}
