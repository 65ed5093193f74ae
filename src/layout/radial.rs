use crate::config::LayoutConfig;
use crate::ir::{Level, Point};
use std::f32::consts::TAU;

/// Formula position of a node: `distance` from `anchor` along `angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub anchor: Point,
    pub angle: f32,
    pub distance: f32,
}

impl Target {
    pub fn position(&self) -> Point {
        self.anchor.polar(self.angle, self.distance)
    }
}

/// Offset of sibling `index` in a fan of `count` centered on the parent
/// direction: `(index - (count - 1) / 2) * step`.
fn fan_offset(index: usize, count: usize, step: f32) -> f32 {
    (index as f32 - (count.max(1) as f32 - 1.0) / 2.0) * step
}

pub fn branch_target(index: usize, count: usize, config: &LayoutConfig) -> Target {
    let count = count.max(1);
    Target {
        anchor: Point::ORIGIN,
        angle: TAU * index as f32 / count as f32,
        distance: config
            .branch_min_radius
            .max(config.branch_radius_per_sibling * count as f32),
    }
}

pub fn concept_target(
    branch: Point,
    branch_angle: f32,
    index: usize,
    count: usize,
    config: &LayoutConfig,
) -> Target {
    Target {
        anchor: branch,
        angle: branch_angle + fan_offset(index, count, config.concept_fan_step),
        distance: config
            .concept_min_radius
            .max(config.concept_radius_per_sibling * count.max(1) as f32),
    }
}

/// Points sit in rings of at most `point_ring_capacity`; each ring spreads its
/// members evenly over an arc centered on the concept direction.
pub fn point_target(
    concept: Point,
    concept_angle: f32,
    index: usize,
    count: usize,
    config: &LayoutConfig,
) -> Target {
    let capacity = config.point_ring_capacity.max(1);
    let ring = index / capacity;
    let slot = index % capacity;
    let in_ring = count.saturating_sub(ring * capacity).clamp(1, capacity);
    let distance = config
        .point_min_radius
        .max(config.point_ring_base + config.point_ring_step * ring as f32);
    let spread = config
        .point_max_spread
        .min(config.point_spread_per_node * in_ring as f32);
    let offset = if in_ring <= 1 {
        0.0
    } else {
        -spread / 2.0 + spread * slot as f32 / (in_ring - 1) as f32
    };
    Target {
        anchor: concept,
        angle: concept_angle + offset,
        distance,
    }
}

pub fn detail_target(
    point: Point,
    point_angle: f32,
    index: usize,
    count: usize,
    config: &LayoutConfig,
) -> Target {
    Target {
        anchor: point,
        angle: point_angle + fan_offset(index, count, config.detail_fan_step),
        distance: config.detail_radius,
    }
}

/// Dispatches on `level`; `parent` and `parent_angle` are ignored for branches.
pub fn target_for(
    level: Level,
    parent: Point,
    parent_angle: f32,
    index: usize,
    count: usize,
    config: &LayoutConfig,
) -> Target {
    match level {
        Level::Center => Target {
            anchor: Point::ORIGIN,
            angle: 0.0,
            distance: 0.0,
        },
        Level::Branch => branch_target(index, count, config),
        Level::Concept => concept_target(parent, parent_angle, index, count, config),
        Level::Point => point_target(parent, parent_angle, index, count, config),
        Level::Detail => detail_target(parent, parent_angle, index, count, config),
    }
}
