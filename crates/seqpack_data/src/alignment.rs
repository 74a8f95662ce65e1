//! Alignment modes for feature/label sequences of differing length.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// How to reconcile feature and label sequences of different lengths.
///
/// Covers one-to-many and many-to-one setups, e.g. ten input steps with a
/// single label at the end for sequence classification. When padding is
/// needed, the shorter side is zero-padded to the longer length and receives
/// a mask marking which of its time steps are real.
///
/// Serialized names are `EQUAL_LENGTH`, `ALIGN_START` and `ALIGN_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlignmentMode {
    /// Feature and label sequences must have the same length. No padding.
    #[default]
    EqualLength,
    /// Align at the first time step; the shorter side is padded at the end.
    AlignStart,
    /// Align at the last time step; the shorter side is padded at the front.
    AlignEnd,
}

impl AlignmentMode {
    /// All supported modes.
    pub const ALL: [Self; 3] = [Self::EqualLength, Self::AlignStart, Self::AlignEnd];

    /// Canonical name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EqualLength => "EQUAL_LENGTH",
            Self::AlignStart => "ALIGN_START",
            Self::AlignEnd => "ALIGN_END",
        }
    }

    /// Start of the window holding `short` real steps inside a padded
    /// sequence of `total` steps, or `None` if this mode never pads.
    ///
    /// ```rust
    /// use seqpack_data::AlignmentMode;
    ///
    /// assert_eq!(AlignmentMode::AlignStart.window_offset(3, 5), Some(0));
    /// assert_eq!(AlignmentMode::AlignEnd.window_offset(3, 5), Some(2));
    /// assert_eq!(AlignmentMode::EqualLength.window_offset(3, 5), None);
    /// ```
    #[must_use]
    pub const fn window_offset(&self, short: usize, total: usize) -> Option<usize> {
        match self {
            Self::EqualLength => None,
            Self::AlignStart => Some(0),
            Self::AlignEnd => Some(total.saturating_sub(short)),
        }
    }
}

impl std::fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlignmentMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| DataError::UnsupportedMode(s.to_string()))
    }
}

impl TryFrom<String> for AlignmentMode {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlignmentMode> for String {
    fn from(mode: AlignmentMode) -> Self {
        mode.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("EQUAL_LENGTH".parse::<AlignmentMode>().unwrap(), AlignmentMode::EqualLength);
        assert_eq!("align_start".parse::<AlignmentMode>().unwrap(), AlignmentMode::AlignStart);
        assert_eq!("align-end".parse::<AlignmentMode>().unwrap(), AlignmentMode::AlignEnd);
    }

    #[test]
    fn test_unsupported_mode() {
        let err = "ALIGN_MIDDLE".parse::<AlignmentMode>().unwrap_err();
        assert!(matches!(err, DataError::UnsupportedMode(ref m) if m == "ALIGN_MIDDLE"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AlignmentMode::AlignEnd).unwrap();
        assert_eq!(json, "\"ALIGN_END\"");
        let mode: AlignmentMode = serde_json::from_str("\"ALIGN_START\"").unwrap();
        assert_eq!(mode, AlignmentMode::AlignStart);

        let err = serde_json::from_str::<AlignmentMode>("\"SIDEWAYS\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported alignment mode"));
    }

    #[test]
    fn test_window_offset_equal_lengths() {
        assert_eq!(AlignmentMode::AlignEnd.window_offset(4, 4), Some(0));
    }

    #[test]
    fn test_default_is_equal_length() {
        assert_eq!(AlignmentMode::default(), AlignmentMode::EqualLength);
    }
}
