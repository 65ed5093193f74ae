use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Depth of a node in the topic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    Center,
    Branch,
    Concept,
    Point,
    Detail,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Center,
        Level::Branch,
        Level::Concept,
        Level::Point,
        Level::Detail,
    ];

    pub fn index(self) -> usize {
        match self {
            Level::Center => 0,
            Level::Branch => 1,
            Level::Concept => 2,
            Level::Point => 3,
            Level::Detail => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The level one step deeper, or `None` below details.
    pub fn child(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Center => "center",
            Level::Branch => "branch",
            Level::Concept => "concept",
            Level::Point => "point",
            Level::Detail => "detail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from `self` along `angle` (radians).
    pub fn polar(self, angle: f32, distance: f32) -> Self {
        Self {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone)]
pub struct MindNode {
    pub id: String,
    pub label: String,
    pub description: String,
    pub level: Level,
    pub color: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub radius: f32,
    pub position: Option<Point>,
}

/// A normalized topic tree. Nodes are stored breadth-first; index 0 is the
/// center and every parent index is smaller than its children's.
#[derive(Debug, Clone)]
pub struct MindTree {
    pub nodes: Vec<MindNode>,
}

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("node 0 must be the center, found {0:?}")]
    CenterNotFirst(Level),
    #[error("node {0} is a second center")]
    ExtraCenter(String),
    #[error("duplicate node id {0}")]
    DuplicateId(String),
    #[error("node {0} has no parent")]
    Orphan(String),
    #[error("node {0} references parent index {1} which is not placed before it")]
    ForwardParent(String, usize),
    #[error("node {child} is at {child_level:?} under a {parent_level:?} parent")]
    LevelGap {
        child: String,
        child_level: Level,
        parent_level: Level,
    },
    #[error("children of node {0} do not match parent links")]
    ChildMismatch(String),
}

impl MindTree {
    pub fn center(&self) -> &MindNode {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MindNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn parent_id(&self, index: usize) -> Option<&str> {
        self.nodes[index]
            .parent
            .map(|parent| self.nodes[parent].id.as_str())
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.nodes.iter().filter(|node| node.level == level).count()
    }

    /// Parent→child id pairs in breadth-first order.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.nodes
            .iter()
            .filter_map(|node| {
                node.parent
                    .map(|parent| (self.nodes[parent].id.clone(), node.id.clone()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(first) = self.nodes.first() else {
            return Err(TreeError::Empty);
        };
        if first.level != Level::Center || first.parent.is_some() {
            return Err(TreeError::CenterNotFirst(first.level));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if !seen.insert(node.id.as_str()) {
                return Err(TreeError::DuplicateId(node.id.clone()));
            }
            if idx == 0 {
                continue;
            }
            if node.level == Level::Center {
                return Err(TreeError::ExtraCenter(node.id.clone()));
            }
            let Some(parent) = node.parent else {
                return Err(TreeError::Orphan(node.id.clone()));
            };
            if parent >= idx {
                return Err(TreeError::ForwardParent(node.id.clone(), parent));
            }
            let parent_level = self.nodes[parent].level;
            if parent_level.child() != Some(node.level) {
                return Err(TreeError::LevelGap {
                    child: node.id.clone(),
                    child_level: node.level,
                    parent_level,
                });
            }
            if !self.nodes[parent].children.contains(&idx) {
                return Err(TreeError::ChildMismatch(self.nodes[parent].id.clone()));
            }
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if node
                .children
                .iter()
                .any(|&child| self.nodes.get(child).and_then(|c| c.parent) != Some(idx))
            {
                return Err(TreeError::ChildMismatch(node.id.clone()));
            }
        }
        Ok(())
    }
}
