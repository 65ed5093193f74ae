mod collision;
pub mod radial;
pub(crate) mod types;
pub use collision::collides;
pub use types::*;

use collision::place_with_repair;
use radial::target_for;

use crate::config::LayoutConfig;
use crate::ir::{MindTree, Point};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::{debug_span, trace, warn};

/// Positions every node of `tree`, seeding collision repair from
/// `config.seed` so the same tree and config always give the same layout.
pub fn compute_layout(tree: MindTree, config: &LayoutConfig) -> Layout {
    let mut rng = StdRng::seed_from_u64(config.seed);
    compute_layout_with_rng(tree, config, &mut rng)
}

/// Same as [`compute_layout`] with a caller-supplied random source.
pub fn compute_layout_with_rng<R: Rng + ?Sized>(
    mut tree: MindTree,
    config: &LayoutConfig,
    rng: &mut R,
) -> Layout {
    let _span = debug_span!("layout", nodes = tree.len()).entered();
    let walk = breadth_first(&tree);
    let mut placements: Vec<Placement> = Vec::with_capacity(walk.len());
    let mut outcomes: Vec<RepairOutcome> = Vec::with_capacity(walk.len());
    let mut angles = vec![0.0_f32; tree.len()];

    for step in &walk {
        let node = &tree.nodes[step.node];
        let (position, outcome) = match node.parent {
            None => (Point::ORIGIN, RepairOutcome::Clear),
            Some(parent) => {
                let anchor = tree.nodes[parent].position.unwrap_or(Point::ORIGIN);
                let target = target_for(
                    node.level,
                    anchor,
                    angles[parent],
                    step.sibling,
                    step.siblings,
                    config,
                );
                angles[step.node] = target.angle;
                place_with_repair(&target, node.radius, &placements, config, rng)
            }
        };
        if let RepairOutcome::Exhausted { attempts } = outcome {
            warn!(
                node = %node.id,
                attempts,
                "collision repair exhausted, keeping overlapping position"
            );
        }
        trace!(node = %node.id, x = position.x, y = position.y, ?outcome, "placed");
        placements.push(Placement {
            id: node.id.clone(),
            x: position.x,
            y: position.y,
            radius: node.radius,
        });
        outcomes.push(outcome);
        tree.nodes[step.node].position = Some(position);
    }

    let bounds = Bounds::from_placements(&placements);
    Layout {
        tree,
        placements,
        order: walk.iter().map(|step| step.node).collect(),
        angles,
        outcomes,
        bounds,
    }
}

struct WalkStep {
    node: usize,
    sibling: usize,
    siblings: usize,
}

/// Breadth-first from the center so every parent is placed before its
/// children, whatever order the nodes are stored in.
fn breadth_first(tree: &MindTree) -> Vec<WalkStep> {
    let mut steps = Vec::with_capacity(tree.len());
    if tree.is_empty() {
        return steps;
    }
    let mut visited = vec![false; tree.len()];
    let mut queue: VecDeque<WalkStep> = VecDeque::new();
    queue.push_back(WalkStep {
        node: 0,
        sibling: 0,
        siblings: 1,
    });
    visited[0] = true;
    while let Some(step) = queue.pop_front() {
        let children = &tree.nodes[step.node].children;
        for (sibling, &child) in children.iter().enumerate() {
            if child < visited.len() && !visited[child] {
                visited[child] = true;
                queue.push_back(WalkStep {
                    node: child,
                    sibling,
                    siblings: children.len(),
                });
            }
        }
        steps.push(step);
    }
    steps
}
