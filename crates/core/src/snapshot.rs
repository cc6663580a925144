use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ConfidenceRating, RatingError};

/// Current on-disk format of a progress snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion { found: u32 },

    #[error("snapshot has {ratings} ratings at index {index}")]
    RatingsMismatch { index: u32, ratings: usize },

    #[error("snapshot index {index} is past the last question ({total} total)")]
    IndexOutOfRange { index: u32, total: usize },

    #[error(transparent)]
    Rating(#[from] RatingError),
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Serialized mirror of quiz progress kept in a single storage slot.
///
/// Direction is not part of the snapshot; a restored session always starts
/// without a transition direction.
///
/// ```
/// # use quiz_core::snapshot::ProgressSnapshot;
/// let snapshot = ProgressSnapshot::new(2, vec![3, 1]);
/// let json = snapshot.encode().unwrap();
/// assert_eq!(ProgressSnapshot::decode(&json).unwrap(), snapshot);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub version: u32,
    pub index: u32,
    pub ratings: Vec<u8>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(index: u32, ratings: Vec<u8>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            index,
            ratings,
        }
    }

    /// Serialize to the JSON slot payload.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Malformed` if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    /// Parse a JSON slot payload. Only the shape and version are checked here;
    /// use [`ProgressSnapshot::validate`] against the question count before use.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Malformed` for invalid JSON and
    /// `SnapshotError::UnsupportedVersion` for other format versions.
    pub fn decode(payload: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(payload).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Check the snapshot against a quiz of `total` questions and convert ratings.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the version is unknown, `index > total`,
    /// the ratings count differs from `index`, or a rating is out of range.
    pub fn validate(&self, total: usize) -> Result<Vec<ConfidenceRating>, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
            });
        }
        let index = usize::try_from(self.index).map_err(|_| SnapshotError::IndexOutOfRange {
            index: self.index,
            total,
        })?;
        if index > total {
            return Err(SnapshotError::IndexOutOfRange {
                index: self.index,
                total,
            });
        }
        if self.ratings.len() != index {
            return Err(SnapshotError::RatingsMismatch {
                index: self.index,
                ratings: self.ratings.len(),
            });
        }
        self.ratings
            .iter()
            .map(|raw| ConfidenceRating::from_u8(*raw).map_err(SnapshotError::from))
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage_and_missing_fields() {
        assert!(matches!(
            ProgressSnapshot::decode("not json"),
            Err(SnapshotError::Malformed(_))
        ));
        assert!(matches!(
            ProgressSnapshot::decode(r#"{"currentQuestion":1,"userAnswers":[2]}"#),
            Err(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_other_versions() {
        let err = ProgressSnapshot::decode(r#"{"version":7,"index":0,"ratings":[]}"#).unwrap_err();
        assert_eq!(err, SnapshotError::UnsupportedVersion { found: 7 });
    }

    #[test]
    fn validate_enforces_ratings_length() {
        let snapshot = ProgressSnapshot::new(2, vec![1]);
        assert_eq!(
            snapshot.validate(5).unwrap_err(),
            SnapshotError::RatingsMismatch { index: 2, ratings: 1 }
        );
    }

    #[test]
    fn validate_enforces_index_bound() {
        let snapshot = ProgressSnapshot::new(4, vec![0, 0, 0, 0]);
        assert_eq!(
            snapshot.validate(3).unwrap_err(),
            SnapshotError::IndexOutOfRange { index: 4, total: 3 }
        );
        assert!(snapshot.validate(4).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_ratings() {
        let snapshot = ProgressSnapshot::new(2, vec![3, 4]);
        assert_eq!(
            snapshot.validate(5).unwrap_err(),
            SnapshotError::Rating(RatingError::OutOfRange(4))
        );
    }
}
