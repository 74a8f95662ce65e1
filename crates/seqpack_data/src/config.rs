//! Packer configuration.

use serde::{Deserialize, Serialize};

use crate::alignment::AlignmentMode;
use crate::error::{DataError, Result};

/// How classification labels are laid out in the label sequence.
///
/// There is no default: a classifier's label steps either already hold a
/// dense row per class, or hold a single class index that must be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelEncoding {
    /// Each label step already carries `num_classes` values (e.g. one-hot rows).
    Dense,
    /// Each label step carries one class index, expanded to a one-hot row.
    OneHot,
}

/// What the label sequence represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetSpec {
    /// Real-valued targets; the target width is the label step width.
    Regression,
    /// Class targets; the target width is always `num_classes`.
    Classification {
        /// Number of classes.
        num_classes: usize,
        /// Layout of the label steps.
        encoding: LabelEncoding,
    },
}

impl TargetSpec {
    /// Fixed target channel count, if the target kind determines one.
    #[must_use]
    pub const fn num_classes(&self) -> Option<usize> {
        match self {
            Self::Regression => None,
            Self::Classification { num_classes, .. } => Some(*num_classes),
        }
    }

    /// Validate the target description.
    pub fn validate(&self) -> Result<()> {
        if let Self::Classification { num_classes: 0, .. } = self {
            return Err(DataError::InvalidInput(
                "classification requires at least one class".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for packing a feature/label sequence pair.
///
/// # Example
///
/// ```rust
/// use seqpack_data::{AlignmentMode, LabelEncoding, PackerConfig};
///
/// let config = PackerConfig::classification(4, LabelEncoding::OneHot)
///     .with_alignment(AlignmentMode::AlignEnd);
///
/// let json = config.to_json().unwrap();
/// assert_eq!(PackerConfig::from_json(&json).unwrap(), config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Target description.
    pub target: TargetSpec,
    /// Length reconciliation policy.
    #[serde(default)]
    pub alignment: AlignmentMode,
}

impl PackerConfig {
    /// Regression targets with equal-length alignment.
    #[must_use]
    pub const fn regression() -> Self {
        Self {
            target: TargetSpec::Regression,
            alignment: AlignmentMode::EqualLength,
        }
    }

    /// Classification targets with equal-length alignment.
    #[must_use]
    pub const fn classification(num_classes: usize, encoding: LabelEncoding) -> Self {
        Self {
            target: TargetSpec::Classification {
                num_classes,
                encoding,
            },
            alignment: AlignmentMode::EqualLength,
        }
    }

    /// Set the alignment mode.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: AlignmentMode) -> Self {
        self.alignment = alignment;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.target.validate()
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Unknown alignment mode names are reported as
    /// [`DataError::UnsupportedMode`].
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPackerConfig =
            serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))?;
        let alignment = match raw.alignment {
            Some(name) => name.parse()?,
            None => AlignmentMode::default(),
        };
        let config = Self {
            target: raw.target,
            alignment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DataError::Parse(e.to_string()))
    }
}

/// On-disk form of [`PackerConfig`]; the mode stays a string so an unknown
/// name surfaces as [`DataError::UnsupportedMode`].
#[derive(Deserialize)]
struct RawPackerConfig {
    target: TargetSpec,
    #[serde(default)]
    alignment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = PackerConfig::from_json(
            r#"{
                "target": { "kind": "classification", "num_classes": 3, "encoding": "one_hot" },
                "alignment": "ALIGN_END"
            }"#,
        )
        .unwrap();
        assert_eq!(config.alignment, AlignmentMode::AlignEnd);
        assert_eq!(config.target.num_classes(), Some(3));
    }

    #[test]
    fn test_alignment_defaults_to_equal_length() {
        let config = PackerConfig::from_json(r#"{ "target": { "kind": "regression" } }"#).unwrap();
        assert_eq!(config, PackerConfig::regression());
    }

    #[test]
    fn test_unsupported_mode_in_json() {
        let err = PackerConfig::from_json(
            r#"{ "target": { "kind": "regression" }, "alignment": "ALIGN_MIDDLE" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::UnsupportedMode(ref m) if m == "ALIGN_MIDDLE"));
    }

    #[test]
    fn test_unsupported_mode_name_kept_whole() {
        let err = PackerConfig::from_json(
            r#"{ "target": { "kind": "regression" }, "alignment": "FOO at line 3" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::UnsupportedMode(ref m) if m == "FOO at line 3"));
    }

    #[test]
    fn test_non_string_mode_is_parse_error() {
        let err = PackerConfig::from_json(r#"{ "target": { "kind": "regression" }, "alignment": 3 }"#)
            .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_zero_classes_rejected() {
        let err = PackerConfig::from_json(
            r#"{ "target": { "kind": "classification", "num_classes": 0, "encoding": "dense" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_encoding_is_parse_error() {
        let err = PackerConfig::from_json(
            r#"{ "target": { "kind": "classification", "num_classes": 2 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
