//! Session state and core ranking types
//!
//! All state a voting session carries between user inputs lives here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine;

/// Identity of one image within its level.
///
/// A level holds exactly one image per variant, so the id doubles as the
/// variant index. Ids are per-level: the same id in two levels names two
/// different files belonging to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub u32);

impl ImageId {
    /// Variant index this image belongs to
    #[inline]
    pub fn variant(self) -> usize {
        self.0 as usize
    }
}

/// Ranking slots of one level; index 0 is the best rank
pub type Slots = Vec<Option<ImageId>>;

/// Where an image currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// Not in any slot (being dragged or never placed)
    Free,
    /// Occupying exactly this slot index
    Slotted(usize),
}

/// Errors surfaced by session commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("level {level} still has empty slots")]
    LevelIncomplete { level: usize },
    #[error("image {0} is not part of this level")]
    UnknownImage(u32),
    #[error("all levels are already judged")]
    AlreadyFinished,
}

/// Live ranking state of one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSession {
    level: usize,
    slots: Slots,
}

impl LevelSession {
    /// Fresh level: every slot empty, every image free
    pub fn new(level: usize, variant_count: usize) -> Self {
        Self {
            level,
            slots: vec![None; variant_count],
        }
    }

    /// Level index within the session (0-based)
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn variant_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ImageId>] {
        &self.slots
    }

    /// Where `image` currently sits
    pub fn image_state(&self, image: ImageId) -> ImageState {
        match self.slots.iter().position(|s| *s == Some(image)) {
            Some(slot) => ImageState::Slotted(slot),
            None => ImageState::Free,
        }
    }

    /// Clear the slot holding `image`, if any (the user picked it back up).
    /// No-op when the image is already free. Returns the updated slots.
    pub fn vacate(&mut self, image: ImageId) -> &[Option<ImageId>] {
        if let Some(slot) = self.slots.iter_mut().find(|s| **s == Some(image)) {
            *slot = None;
        }
        &self.slots
    }

    /// Drop `image` onto `target`, displacing any occupant per the
    /// directional nearest-free-slot rule. Returns the updated slots.
    /// `target` must be a valid slot index; slot resolution only produces
    /// indices in range.
    pub fn place(
        &mut self,
        image: ImageId,
        target: usize,
    ) -> Result<&[Option<ImageId>], SessionError> {
        if image.variant() >= self.slots.len() {
            return Err(SessionError::UnknownImage(image.0));
        }
        // A drag implicitly freed the image; clearing here keeps the
        // one-slot-per-image invariant even for slot-to-slot drags.
        self.vacate(image);
        engine::resolve_drop(&mut self.slots, image, target);
        Ok(&self.slots)
    }

    /// True when every slot is occupied; the UI may only advance past a
    /// complete level
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Snapshot the final slot order of a complete level
    pub fn freeze(&self) -> Result<LevelResult, SessionError> {
        let order: Vec<ImageId> = self.slots.iter().flatten().copied().collect();
        if order.len() != self.slots.len() {
            return Err(SessionError::LevelIncomplete { level: self.level });
        }
        Ok(LevelResult {
            level: self.level,
            order,
        })
    }
}

/// Final slot order of a judged level, best rank first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: usize,
    pub order: Vec<ImageId>,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The user is ranking this level
    Judging { level: usize },
    /// Every level is frozen; results are ready for scoring
    Finished,
}

/// Whole-session driver: one live level at a time, frozen results behind it.
///
/// One-shot: there is no save or resume of a running session.
#[derive(Debug, Clone)]
pub struct VoteSession {
    variant_count: usize,
    level_count: usize,
    phase: SessionPhase,
    current: LevelSession,
    results: Vec<LevelResult>,
}

impl VoteSession {
    /// Start a session over `level_count` levels of `variant_count` images.
    ///
    /// Panics if either count is zero; the loader never produces an empty
    /// set.
    pub fn new(variant_count: usize, level_count: usize) -> Self {
        assert!(variant_count > 0 && level_count > 0, "empty variant set");
        Self {
            variant_count,
            level_count,
            phase: SessionPhase::Judging { level: 0 },
            current: LevelSession::new(0, variant_count),
            results: Vec::with_capacity(level_count),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// The level being judged, or None once finished
    pub fn current_level(&self) -> Option<&LevelSession> {
        match self.phase {
            SessionPhase::Judging { .. } => Some(&self.current),
            SessionPhase::Finished => None,
        }
    }

    pub fn current_level_mut(&mut self) -> Option<&mut LevelSession> {
        match self.phase {
            SessionPhase::Judging { .. } => Some(&mut self.current),
            SessionPhase::Finished => None,
        }
    }

    /// Results frozen so far, in level order
    pub fn results(&self) -> &[LevelResult] {
        &self.results
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Freeze the current level and activate the next one. Freezing the
    /// last level finishes the session.
    pub fn advance(&mut self) -> Result<SessionPhase, SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        self.results.push(self.current.freeze()?);
        self.phase = if self.results.len() == self.level_count {
            SessionPhase::Finished
        } else {
            self.current = LevelSession::new(self.results.len(), self.variant_count);
            SessionPhase::Judging {
                level: self.results.len(),
            }
        };
        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_level_is_empty() {
        let level = LevelSession::new(0, 5);
        assert_eq!(level.slots().len(), 5);
        assert!(!level.is_complete());
        assert_eq!(level.image_state(ImageId(3)), ImageState::Free);
    }

    #[test]
    fn test_place_and_vacate_round_trip() {
        let mut level = LevelSession::new(0, 3);
        level.place(ImageId(0), 1).unwrap();
        assert_eq!(level.image_state(ImageId(0)), ImageState::Slotted(1));

        level.vacate(ImageId(0));
        assert_eq!(level.image_state(ImageId(0)), ImageState::Free);
        assert!(level.slots().iter().all(Option::is_none));

        // Vacating a free image is a no-op
        level.vacate(ImageId(0));
        assert!(level.slots().iter().all(Option::is_none));
    }

    #[test]
    fn test_place_rejects_foreign_image() {
        let mut level = LevelSession::new(0, 3);
        assert_eq!(
            level.place(ImageId(7), 0),
            Err(SessionError::UnknownImage(7))
        );
    }

    #[test]
    fn test_slot_to_slot_drag_keeps_one_slot_per_image() {
        let mut level = LevelSession::new(0, 4);
        level.place(ImageId(0), 0).unwrap();
        // Dragging the same image to another slot must not leave a copy behind
        level.place(ImageId(0), 2).unwrap();
        assert_eq!(level.image_state(ImageId(0)), ImageState::Slotted(2));
        assert_eq!(level.slots().iter().flatten().count(), 1);
    }

    #[test]
    fn test_completeness_gating() {
        let mut level = LevelSession::new(0, 5);
        for v in 0..4 {
            level.place(ImageId(v), v as usize).unwrap();
            assert!(!level.is_complete());
        }
        assert!(level.freeze().is_err());

        level.place(ImageId(4), 4).unwrap();
        assert!(level.is_complete());
        let result = level.freeze().unwrap();
        assert_eq!(result.order, (0..5).map(ImageId).collect::<Vec<_>>());
    }

    #[test]
    fn test_advance_blocked_until_complete() {
        let mut session = VoteSession::new(3, 2);
        assert_eq!(
            session.advance(),
            Err(SessionError::LevelIncomplete { level: 0 })
        );

        let level = session.current_level_mut().unwrap();
        for v in 0..3 {
            level.place(ImageId(v), v as usize).unwrap();
        }
        assert_eq!(session.advance(), Ok(SessionPhase::Judging { level: 1 }));
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn test_session_runs_to_finished() {
        let mut session = VoteSession::new(2, 2);
        for _ in 0..2 {
            let level = session.current_level_mut().unwrap();
            level.place(ImageId(1), 0).unwrap();
            level.place(ImageId(0), 1).unwrap();
            session.advance().unwrap();
        }
        assert!(session.is_finished());
        assert!(session.current_level().is_none());
        assert_eq!(session.advance(), Err(SessionError::AlreadyFinished));
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.results()[1].order, vec![ImageId(1), ImageId(0)]);
    }
}
