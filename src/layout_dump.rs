use crate::layout::{Bounds, Layout, RepairOutcome};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub node_count: usize,
    pub exhausted_count: usize,
    pub bounds: Bounds,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub parent_id: Option<String>,
    pub level: usize,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub angle_degrees: f32,
    pub repair: RepairOutcome,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes: Vec<NodeDump> = layout
            .order
            .iter()
            .zip(&layout.placements)
            .zip(&layout.outcomes)
            .map(|((&idx, placement), outcome)| {
                let node = &layout.tree.nodes[idx];
                NodeDump {
                    id: placement.id.clone(),
                    parent_id: layout.tree.parent_id(idx).map(str::to_string),
                    level: node.level.index(),
                    x: placement.x,
                    y: placement.y,
                    radius: placement.radius,
                    angle_degrees: layout.angles[idx].to_degrees(),
                    repair: *outcome,
                }
            })
            .collect();

        LayoutDump {
            node_count: nodes.len(),
            exhausted_count: layout.outcomes.iter().filter(|o| o.is_exhausted()).count(),
            bounds: layout.bounds,
            nodes,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
