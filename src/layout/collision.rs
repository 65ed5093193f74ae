use rand::Rng;

use super::radial::Target;
use super::types::{Placement, RepairOutcome};
use crate::config::LayoutConfig;
use crate::ir::Point;

/// True when a circle at `center` overlaps any placed circle, counting
/// `clearance` as part of the required gap.
pub fn collides(center: Point, radius: f32, placed: &[Placement], clearance: f32) -> bool {
    placed.iter().any(|other| {
        let min_gap = radius + other.radius + clearance;
        center.distance(other.center()) < min_gap
    })
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

/// Places a node at its formula position, or retries with random angular and
/// radial perturbations of that position until one is clear. Each attempt
/// perturbs the original target, not the previous candidate. When every
/// attempt collides the last candidate is kept.
pub fn place_with_repair<R: Rng + ?Sized>(
    target: &Target,
    radius: f32,
    placed: &[Placement],
    config: &LayoutConfig,
    rng: &mut R,
) -> (Point, RepairOutcome) {
    let clearance = config.collision_clearance;
    let mut candidate = target.position();
    if !collides(candidate, radius, placed, clearance) {
        return (candidate, RepairOutcome::Clear);
    }

    let spread = config.jitter_angle.abs();
    for attempt in 1..=config.max_repair_attempts {
        let angle = target.angle + jitter(rng, -spread, spread);
        let distance = target.distance
            + jitter(rng, config.jitter_radius_min, config.jitter_radius_max);
        candidate = target.anchor.polar(angle, distance);
        if !collides(candidate, radius, placed, clearance) {
            return (candidate, RepairOutcome::Repaired { attempts: attempt });
        }
    }
    (
        candidate,
        RepairOutcome::Exhausted {
            attempts: config.max_repair_attempts,
        },
    )
}
