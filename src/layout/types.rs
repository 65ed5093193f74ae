use serde::Serialize;

use crate::ir::{MindTree, Point};

/// A committed circle used for collision tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Placement {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// How collision repair went for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RepairOutcome {
    /// The formula position was free.
    Clear,
    /// A perturbed candidate was free after `attempts` tries.
    Repaired { attempts: usize },
    /// Every attempt collided; the last candidate was kept.
    Exhausted { attempts: usize },
}

impl RepairOutcome {
    pub fn is_exhausted(self) -> bool {
        matches!(self, RepairOutcome::Exhausted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn from_placements(placements: &[Placement]) -> Self {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for placement in placements {
            min_x = min_x.min(placement.x - placement.radius);
            min_y = min_y.min(placement.y - placement.radius);
            max_x = max_x.max(placement.x + placement.radius);
            max_y = max_y.max(placement.y + placement.radius);
        }
        if min_x == f32::MAX {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            };
        }
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A positioned tree. `placements` and `outcomes` follow placement order and
/// `order[i]` is the tree index of the i-th placement. `angles` is indexed by
/// tree index and holds the formula direction each node was placed along.
#[derive(Debug, Clone)]
pub struct Layout {
    pub tree: MindTree,
    pub placements: Vec<Placement>,
    pub order: Vec<usize>,
    pub angles: Vec<f32>,
    pub outcomes: Vec<RepairOutcome>,
    pub bounds: Bounds,
}

impl Layout {
    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|placement| placement.id == id)
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.placement(id).map(Placement::center)
    }

    /// Ids of nodes whose collision repair ran out of attempts.
    pub fn exhausted(&self) -> Vec<&str> {
        self.placements
            .iter()
            .zip(&self.outcomes)
            .filter(|(_, outcome)| outcome.is_exhausted())
            .map(|(placement, _)| placement.id.as_str())
            .collect()
    }
}
