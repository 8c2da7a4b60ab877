//! Slot geometry and spawn placement
//!
//! Pure presentation math derived from the canvas size and the loaded
//! aspect ratio. Logical slot indices stay the source of truth; pixel
//! centers are recomputed from them on every resize and never drive the
//! ranking state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{SNAP_RADIUS_FACTOR, SPAWN_MAX_ATTEMPTS, SPAWN_SPACING_FACTOR};

/// Pixel layout of the slot column for one canvas size.
///
/// Slots stack vertically in a centered column, each exactly one fitted
/// image tall; slot 0 (best rank) is at the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotLayout {
    /// Canvas size in pixels
    pub canvas: Vec2,
    /// Fitted image size
    pub image: Vec2,
    /// Number of slots
    pub slot_count: usize,
}

impl SlotLayout {
    /// Fit `slot_count` slots into `canvas`, bounded by the source image
    /// resolution `base` and keeping the reduced `aspect` ratio.
    pub fn fit(canvas: Vec2, base: Vec2, aspect: (u32, u32), slot_count: usize) -> Self {
        let (aw, ah) = (aspect.0 as f32, aspect.1 as f32);
        let vertical = (canvas.y / slot_count as f32).min(base.y);
        let horizontal = canvas.x.min(base.x);
        let bottleneck = (vertical * aw).min(horizontal * ah);
        let image = Vec2::new((bottleneck / ah).floor(), (bottleneck / aw).floor());
        Self {
            canvas,
            image,
            slot_count,
        }
    }

    /// Center of slot `index`
    pub fn slot_center(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.canvas.x / 2.0,
            self.image.y * index as f32 + self.image.y / 2.0,
        )
    }

    /// Nearest slot to `pos` and its center distance
    pub fn nearest_slot(&self, pos: Vec2) -> (usize, f32) {
        let mut best = (0, pos.distance(self.slot_center(0)));
        for index in 1..self.slot_count {
            let dist = pos.distance(self.slot_center(index));
            if dist < best.1 {
                best = (index, dist);
            }
        }
        best
    }

    /// Slot a release at `pos` snaps into, if within one image height
    pub fn snap(&self, pos: Vec2) -> Option<usize> {
        let (index, dist) = self.nearest_slot(pos);
        (dist < self.image.y * SNAP_RADIUS_FACTOR).then_some(index)
    }

    /// Clamp an image center so the image lies fully inside the canvas.
    /// The lower bound wins on canvases smaller than one image.
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        let half = self.image / 2.0;
        Vec2::new(
            pos.x.max(half.x).min(self.canvas.x - half.x),
            pos.y.max(half.y).min(self.canvas.y - half.y),
        )
    }
}

/// Scatter spawn points for unplaced images beside the slot column.
///
/// Each point lands in the band left or right of the column, at least one
/// image height away from every earlier point. Retries are bounded: on a
/// crowded canvas the last candidate is kept and clamped instead of
/// spinning forever.
pub fn scatter_spawns(layout: &SlotLayout, count: usize, seed: u64) -> Vec<Vec2> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let w = layout.image.x;
    let h = layout.image.y;
    let min_dist = h * SPAWN_SPACING_FACTOR;

    // Seed point keeps the first image off the top-left corner.
    let mut points: Vec<Vec2> = vec![Vec2::ZERO];
    for _ in 0..count {
        let mut candidate = Vec2::ZERO;
        for _ in 0..SPAWN_MAX_ATTEMPTS {
            let x = if rng.random_range(0..2u32) == 0 {
                sample(&mut rng, w * 3.0, w * 3.5)
            } else {
                sample(&mut rng, w * 0.5, w)
            };
            let y = sample(&mut rng, h * 0.5, h * layout.slot_count as f32 - h * 0.5);
            candidate = Vec2::new(x, y);
            if points.iter().all(|p| p.distance(candidate) > min_dist) {
                break;
            }
        }
        points.push(layout.clamp(candidate));
    }
    points.split_off(1)
}

/// Uniform sample in [lo, hi); degenerate ranges collapse to `lo`
fn sample(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo).max(0.0)
}
