use thiserror::Error;

use crate::model::ConfidenceRating;
use crate::snapshot::{ProgressSnapshot, SnapshotError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected transitions. The state is left unchanged whenever one is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("quiz is already complete")]
    Complete,

    #[error("already at the first question")]
    AtStart,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Animation hint for the last transition. Never affects scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Backward,
    #[default]
    Still,
    Forward,
}

impl Direction {
    #[must_use]
    pub fn value(self) -> i8 {
        match self {
            Self::Backward => -1,
            Self::Still => 0,
            Self::Forward => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionPhase {
    InProgress,
    Complete,
}

/// Raw progression state. `ratings.len() == index` holds at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionState {
    pub index: usize,
    pub direction: Direction,
    pub ratings: Vec<ConfidenceRating>,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Linear walk over `total` questions collecting one confidence rating each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    total: usize,
    state: ProgressionState,
}

impl Progression {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            state: ProgressionState::default(),
        }
    }

    /// Rebuild a progression from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot does not describe a reachable
    /// state for `total` questions.
    pub fn try_restore(total: usize, snapshot: &ProgressSnapshot) -> Result<Self, SnapshotError> {
        let ratings = snapshot.validate(total)?;
        Ok(Self {
            total,
            state: ProgressionState {
                index: ratings.len(),
                direction: Direction::Still,
                ratings,
            },
        })
    }

    /// Like [`Progression::try_restore`] but falls back to a fresh state.
    #[must_use]
    pub fn restore(total: usize, snapshot: &ProgressSnapshot) -> Self {
        Self::try_restore(total, snapshot).unwrap_or_else(|_| Self::new(total))
    }

    /// Record a rating for the current question and move on.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Complete` once every question has been rated.
    pub fn advance(&mut self, rating: ConfidenceRating) -> Result<&ProgressionState, ProgressionError> {
        if self.is_complete() {
            return Err(ProgressionError::Complete);
        }
        self.state.ratings.push(rating);
        self.state.index += 1;
        // Finishing keeps the last animation hint.
        if self.state.index < self.total {
            self.state.direction = Direction::Forward;
        }
        Ok(&self.state)
    }

    /// Step back one question, dropping the rating given for it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::AtStart` at the first question and
    /// `ProgressionError::Complete` once the quiz is finished.
    pub fn retreat(&mut self) -> Result<&ProgressionState, ProgressionError> {
        if self.is_complete() {
            return Err(ProgressionError::Complete);
        }
        if self.state.index == 0 {
            return Err(ProgressionError::AtStart);
        }
        self.state.index -= 1;
        self.state.ratings.pop();
        self.state.direction = Direction::Backward;
        Ok(&self.state)
    }

    pub fn restart(&mut self) -> &ProgressionState {
        self.state = ProgressionState::default();
        &self.state
    }

    /// Percentage of the maximum confidence sum, available once complete.
    ///
    /// An empty quiz scores `0.0`.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        if !self.is_complete() {
            return None;
        }
        if self.total == 0 {
            return Some(0.0);
        }
        let sum: u32 = self.state.ratings.iter().map(|r| u32::from(r.value())).sum();
        let max = self.total as f64 * f64::from(ConfidenceRating::MAX_VALUE);
        Some(f64::from(sum) / max * 100.0)
    }

    /// Score where each question counts in proportion to its points.
    ///
    /// `points[i]` belongs to question `i`. Falls back to [`Progression::score`]
    /// when the lengths disagree or all points are zero.
    #[must_use]
    pub fn weighted_score(&self, points: &[u32]) -> Option<f64> {
        if !self.is_complete() {
            return None;
        }
        let total_points: u64 = points.iter().map(|p| u64::from(*p)).sum();
        if points.len() != self.total || total_points == 0 {
            return self.score();
        }
        let earned: u64 = self
            .state
            .ratings
            .iter()
            .zip(points)
            .map(|(r, p)| u64::from(r.value()) * u64::from(*p))
            .sum();
        let max = total_points as f64 * f64::from(ConfidenceRating::MAX_VALUE);
        Some(earned as f64 / max * 100.0)
    }

    /// Fill level of the progress bar: `(index + 1) / total`, capped at 1.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        let shown = (self.state.index + 1).min(self.total);
        shown as f64 / self.total as f64
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(
            u32::try_from(self.state.index).unwrap_or(u32::MAX),
            self.state.ratings.iter().map(|r| r.value()).collect(),
        )
    }

    // Accessors
    #[must_use]
    pub fn phase(&self) -> ProgressionPhase {
        if self.is_complete() {
            ProgressionPhase::Complete
        } else {
            ProgressionPhase::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.index >= self.total
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    #[must_use]
    pub fn ratings(&self) -> &[ConfidenceRating] {
        &self.state.ratings
    }

    #[must_use]
    pub fn state(&self) -> &ProgressionState {
        &self.state
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use ConfidenceRating::{DidNotKnow, GotItCorrect, KnewIt, MaybeSaw};

    fn rate_all(total: usize, ratings: &[ConfidenceRating]) -> Progression {
        let mut p = Progression::new(total);
        for r in ratings {
            p.advance(*r).unwrap();
        }
        p
    }

    #[test]
    fn scores_for_five_questions() {
        let all = rate_all(5, &[GotItCorrect; 5]);
        assert_eq!(all.score(), Some(100.0));

        let none = rate_all(5, &[DidNotKnow; 5]);
        assert_eq!(none.score(), Some(0.0));

        let mixed = rate_all(
            5,
            &[GotItCorrect, DidNotKnow, GotItCorrect, DidNotKnow, GotItCorrect],
        );
        let score = mixed.score().unwrap();
        assert!((score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn score_is_undefined_while_in_progress() {
        let p = rate_all(3, &[KnewIt]);
        assert_eq!(p.phase(), ProgressionPhase::InProgress);
        assert_eq!(p.score(), None);
    }

    #[test]
    fn empty_quiz_is_complete_with_zero_score() {
        let mut p = Progression::new(0);
        assert!(p.is_complete());
        assert_eq!(p.score(), Some(0.0));
        assert_eq!(p.advance(KnewIt), Err(ProgressionError::Complete));
        assert!((p.progress_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn advance_past_completion_is_rejected() {
        let mut p = rate_all(2, &[KnewIt, KnewIt]);
        let before = p.clone();
        assert_eq!(p.advance(GotItCorrect), Err(ProgressionError::Complete));
        assert_eq!(p.retreat(), Err(ProgressionError::Complete));
        assert_eq!(p, before);
    }

    #[test]
    fn retreat_at_start_leaves_state_unchanged() {
        let mut p = Progression::new(4);
        let before = p.clone();
        assert_eq!(p.retreat(), Err(ProgressionError::AtStart));
        assert_eq!(p, before);
    }

    #[test]
    fn advance_then_retreat_restores_index_and_ratings() {
        let mut p = rate_all(5, &[KnewIt, MaybeSaw]);
        let before = p.state().clone();

        p.advance(GotItCorrect).unwrap();
        assert_eq!(p.direction(), Direction::Forward);
        p.retreat().unwrap();

        assert_eq!(p.current_index(), before.index);
        assert_eq!(p.ratings(), before.ratings.as_slice());
        assert_eq!(p.direction(), Direction::Backward);
    }

    #[test]
    fn ratings_track_index_through_mixed_walks() {
        let mut p = Progression::new(4);
        let steps: [Option<ConfidenceRating>; 9] = [
            Some(KnewIt),
            None,
            None,
            Some(MaybeSaw),
            Some(GotItCorrect),
            None,
            Some(DidNotKnow),
            Some(KnewIt),
            Some(KnewIt),
        ];
        for step in steps {
            let _ = match step {
                Some(r) => p.advance(r).map(|_| ()),
                None => p.retreat().map(|_| ()),
            };
            assert_eq!(p.ratings().len(), p.current_index());
        }
        assert!(p.is_complete());
    }

    #[test]
    fn score_is_monotone_in_each_rating() {
        let base = [MaybeSaw, KnewIt, DidNotKnow];
        for position in 0..base.len() {
            let mut previous = -1.0;
            for candidate in ConfidenceRating::ALL {
                let mut ratings = base;
                ratings[position] = candidate;
                let score = rate_all(3, &ratings).score().unwrap();
                assert!(score >= previous);
                previous = score;
            }
        }
    }

    #[test]
    fn restart_resets_everything() {
        let mut p = rate_all(3, &[KnewIt, MaybeSaw, GotItCorrect]);
        p.restart();
        assert_eq!(p.state(), &ProgressionState::default());
        assert_eq!(p.phase(), ProgressionPhase::InProgress);
    }

    #[test]
    fn snapshot_round_trips_reachable_states() {
        for n in 0..=3 {
            let mut p = rate_all(3, &vec![KnewIt; n]);
            if n > 0 && n < 3 {
                p.retreat().unwrap();
            }
            let restored = Progression::try_restore(3, &p.snapshot()).unwrap();
            assert_eq!(restored.current_index(), p.current_index());
            assert_eq!(restored.ratings(), p.ratings());
            assert_eq!(restored.direction(), Direction::Still);
        }
    }

    #[test]
    fn invalid_snapshots_fall_back_to_fresh() {
        let mismatched = ProgressSnapshot::new(2, vec![1]);
        let restored = Progression::restore(5, &mismatched);
        assert_eq!(restored, Progression::new(5));

        let too_far = ProgressSnapshot::new(6, vec![0; 6]);
        assert_eq!(Progression::restore(5, &too_far), Progression::new(5));
    }

    #[test]
    fn weighted_score_uses_points() {
        let p = rate_all(2, &[GotItCorrect, DidNotKnow]);
        let weighted = p.weighted_score(&[30, 10]).unwrap();
        assert!((weighted - 75.0).abs() < 1e-9);
        assert_eq!(p.weighted_score(&[1]), p.score());
    }

    #[test]
    fn progress_fraction_follows_question_number() {
        let mut p = Progression::new(4);
        assert!((p.progress_fraction() - 0.25).abs() < 1e-9);
        p.advance(KnewIt).unwrap();
        assert!((p.progress_fraction() - 0.5).abs() < 1e-9);
        for _ in 0..3 {
            p.advance(KnewIt).unwrap();
        }
        assert!((p.progress_fraction() - 1.0).abs() < 1e-9);
    }
}
