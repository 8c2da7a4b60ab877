//! Drop resolution and command dispatch
//!
//! The slot-assignment algorithm: dropping an image onto an occupied slot
//! behaves like insertion into a ranked list. The displaced occupant moves
//! to the nearest free slot, preferring slots below the target (worse
//! rank); the occupied run between the target and the chosen free slot
//! shifts one position toward it, preserving relative order.

use glam::Vec2;

use super::geometry::SlotLayout;
use super::state::{ImageId, SessionError, Slots, VoteSession};

/// A single user input, decoupled from any UI event binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pick an image up; frees its slot if it had one
    Grab(ImageId),
    /// Drop an image onto a resolved slot index
    Drop { image: ImageId, target: usize },
    /// Freeze the current level and move to the next
    Advance,
}

/// What a continuous-position release did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// The image snapped into a slot
    Placed { slot: usize },
    /// Too far from every slot; the image stays free at the clamped position
    Unplaced { at: Vec2 },
}

/// Apply one command to the session, synchronously
pub fn apply(session: &mut VoteSession, cmd: Command) -> Result<(), SessionError> {
    match cmd {
        Command::Grab(image) => {
            let level = session
                .current_level_mut()
                .ok_or(SessionError::AlreadyFinished)?;
            level.vacate(image);
            Ok(())
        }
        Command::Drop { image, target } => {
            let level = session
                .current_level_mut()
                .ok_or(SessionError::AlreadyFinished)?;
            level.place(image, target).map(|_| ())
        }
        Command::Advance => session.advance().map(|_| ()),
    }
}

/// Resolve a pointer release at a continuous canvas position.
///
/// The position is first clamped into the canvas, then snapped to the
/// nearest slot center when within one image height of it; otherwise the
/// image stays unslotted at the clamped position.
pub fn release(
    session: &mut VoteSession,
    layout: &SlotLayout,
    image: ImageId,
    at: Vec2,
) -> Result<ReleaseOutcome, SessionError> {
    let at = layout.clamp(at);
    match layout.snap(at) {
        Some(target) => {
            apply(session, Command::Drop { image, target })?;
            Ok(ReleaseOutcome::Placed { slot: target })
        }
        None => Ok(ReleaseOutcome::Unplaced { at }),
    }
}

/// Resolve a drop of `image` onto `target`.
///
/// An empty target takes the image directly. An occupied target bumps its
/// occupant to the nearest free slot below (greater index), or, when no
/// slot below is free, the nearest free slot above; occupied slots between
/// the target and the chosen free slot shift one position toward it.
///
/// `image` must not already be slotted and `target` must be in range.
/// Panics when every slot is occupied: the session keeps at most one image
/// free during a drag, so a full array mid-drop is a corrupted state.
pub fn resolve_drop(slots: &mut Slots, image: ImageId, target: usize) {
    debug_assert!(
        !slots.contains(&Some(image)),
        "dragged image must be free before the drop resolves"
    );
    if slots[target].is_none() {
        slots[target] = Some(image);
        return;
    }

    let free = nearest_free(slots, target)
        .expect("drop onto a full slot array: more images than slots in flight");
    if free > target {
        // Push the occupied run down one into the free slot.
        for i in (target + 1..=free).rev() {
            slots[i] = slots[i - 1];
        }
    } else {
        // No room below: pull the run up one.
        for i in free..target {
            slots[i] = slots[i + 1];
        }
    }
    slots[target] = Some(image);
}

/// Nearest free index to `target`, preferring below (greater index)
fn nearest_free(slots: &[Option<ImageId>], target: usize) -> Option<usize> {
    slots[target + 1..]
        .iter()
        .position(Option::is_none)
        .map(|i| target + 1 + i)
        .or_else(|| slots[..target].iter().rposition(Option::is_none))
}
