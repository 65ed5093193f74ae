use crate::config::Config;
use crate::ir::{Level, MindNode, MindTree};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:```|~~~)[ \t]*(?:json5?|JSON)?[ \t]*\r?\n(.*?)(?:```|~~~)").unwrap()
});
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])\s+").unwrap());

const LABEL_KEYS: [&str; 3] = ["label", "title", "name"];

/// Turns raw model output into a JSON value. Never fails: text that cannot be
/// read as JSON, JSON5 or an indented outline yields `Value::Null`, which
/// [`normalize_tree`] maps to the fallback tree.
pub fn parse_raw(input: &str) -> Value {
    let candidate = extract_json_candidate(input);
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return value;
    }
    if let Ok(value) = json5::from_str::<Value>(candidate) {
        debug!("raw tree accepted by json5 fallback");
        return value;
    }
    if !input.contains('{')
        && let Some(value) = parse_outline(input)
    {
        debug!("raw tree read as indented outline");
        return value;
    }
    debug!(len = input.len(), "raw tree is not parseable");
    Value::Null
}

fn extract_json_candidate(input: &str) -> &str {
    if let Some(body) = FENCE_RE.captures(input).and_then(|caps| caps.get(1)) {
        return body.as_str().trim();
    }
    match (input.find('{'), input.rfind('}')) {
        (Some(start), Some(end)) if start < end => &input[start..=end],
        _ => input.trim(),
    }
}

/// Reads an indented bullet outline (two spaces per level) into the raw
/// tree shape. The first line is the center.
fn parse_outline(input: &str) -> Option<Value> {
    let mut lines = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let text = BULLET_RE.replace(line.trim(), "").trim().to_string();
            (indent, text)
        });
    let (base_indent, center_label) = lines.next()?;
    let rest: Vec<(usize, String)> = lines.collect();
    if rest.is_empty() || rest.iter().any(|(indent, _)| *indent <= base_indent) {
        return None;
    }

    let child_base = rest.iter().map(|(indent, _)| *indent).min()?;
    // (depth, node) pairs; depth 1 = branch
    let mut stack: Vec<(usize, Map<String, Value>)> = Vec::new();
    let mut branches: Vec<Value> = Vec::new();
    for (indent, text) in rest {
        let depth = ((indent - child_base) / 2 + 1).min(Level::Detail.index());
        while let Some((top_depth, _)) = stack.last() {
            if *top_depth < depth {
                break;
            }
            fold_outline_top(&mut stack, &mut branches);
        }
        let mut node = Map::new();
        node.insert("label".to_string(), Value::String(text));
        stack.push((depth, node));
    }
    while !stack.is_empty() {
        fold_outline_top(&mut stack, &mut branches);
    }
    Some(json!({ "center": { "label": center_label }, "branches": branches }))
}

fn fold_outline_top(stack: &mut Vec<(usize, Map<String, Value>)>, branches: &mut Vec<Value>) {
    let Some((_, node)) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some((parent_depth, parent)) => {
            let key = Level::from_index(*parent_depth)
                .and_then(children_key)
                .unwrap_or("children");
            let list = parent
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = list {
                items.push(Value::Object(node));
            }
        }
        None => branches.push(Value::Object(node)),
    }
}

fn children_key(level: Level) -> Option<&'static str> {
    match level {
        Level::Center => Some("branches"),
        Level::Branch => Some("concepts"),
        Level::Concept => Some("points"),
        Level::Point => Some("details"),
        Level::Detail => None,
    }
}

/// Coerces an untrusted nested value into a canonical tree. Missing fields are
/// defaulted, excess children truncated, and anything without a usable
/// `center` object becomes a center-only fallback tree.
pub fn normalize_tree(raw: &Value, config: &Config) -> MindTree {
    let Some(root) = raw.as_object() else {
        debug!("raw tree is not an object, using fallback");
        return fallback_tree(config);
    };
    let Some(center) = root.get("center").and_then(Value::as_object) else {
        debug!("raw tree has no center object, using fallback");
        return fallback_tree(config);
    };

    let mut builder = TreeBuilder::new(config);
    let center_source = Value::Object(center.clone());
    builder.push(&center_source, None, Level::Center, 0);

    // Branches normally sit beside `center`; some generations nest them inside.
    let has_root_children = root.contains_key("branches") || root.contains_key("children");
    let branch_source = if has_root_children { raw } else { &center_source };

    let mut queue: VecDeque<(usize, &Value)> = VecDeque::new();
    queue.push_back((0, branch_source));
    while let Some((parent, source)) = queue.pop_front() {
        let level = builder.nodes[parent].level;
        let Some(child_level) = level.child() else {
            continue;
        };
        let entries = child_entries(source, level);
        let cap = config.normalize.max_children(level);
        if entries.len() > cap {
            debug!(
                parent = %builder.nodes[parent].id,
                kept = cap,
                dropped = entries.len() - cap,
                "truncating {} list",
                child_level.name()
            );
        }
        for (index, entry) in entries.into_iter().take(cap).enumerate() {
            let child = builder.push(entry, Some(parent), child_level, index);
            if child_level.child().is_some() {
                queue.push_back((child, entry));
            }
        }
    }

    let tree = builder.finish();
    debug_assert!(tree.validate().is_ok());
    tree
}

/// A center-only tree used when the raw input is structurally unusable.
pub fn fallback_tree(config: &Config) -> MindTree {
    let mut builder = TreeBuilder::new(config);
    let label = config.normalize.fallback_label.trim();
    let center = if label.is_empty() {
        json!({})
    } else {
        json!({ "label": label })
    };
    builder.push(&center, None, Level::Center, 0);
    builder.finish()
}

fn child_entries(source: &Value, level: Level) -> Vec<&Value> {
    let Some(key) = children_key(level) else {
        return Vec::new();
    };
    let list = source.get(key).or_else(|| source.get("children"));
    match list {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.is_object() || item.is_string())
            .collect(),
        Some(other) if !other.is_null() => {
            debug!(key, "child list is not an array, ignoring");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn text_value(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

struct TreeBuilder<'a> {
    config: &'a Config,
    nodes: Vec<MindNode>,
    used_ids: HashSet<String>,
}

impl<'a> TreeBuilder<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            used_ids: HashSet::new(),
        }
    }

    fn push(&mut self, entry: &Value, parent: Option<usize>, level: Level, index: usize) -> usize {
        let config = self.config;
        let (label, description, supplied_id, supplied_color) = match entry {
            Value::Object(obj) => (
                LABEL_KEYS.iter().find_map(|key| text_value(obj.get(*key))),
                text_value(obj.get("description")),
                text_value(obj.get("id")),
                text_value(obj.get("color")),
            ),
            other => (text_value(Some(other)), None, None, None),
        };

        let id = self.assign_id(supplied_id, parent, level, index);
        let color = match (level, parent) {
            (Level::Center, _) => config.theme.root_fill.clone(),
            (Level::Branch, _) => supplied_color.unwrap_or_else(|| config.style.palette_color(index)),
            (_, Some(parent)) => self.nodes[parent].color.clone(),
            (_, None) => config.style.palette_color(index),
        };

        let node_index = self.nodes.len();
        self.nodes.push(MindNode {
            id,
            label: label.unwrap_or_else(|| config.normalize.label_placeholder(level)),
            description: description
                .unwrap_or_else(|| config.normalize.description_placeholder(level)),
            level,
            color,
            parent,
            children: Vec::new(),
            radius: config.style.node_radius(level),
            position: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(node_index);
        }
        node_index
    }

    fn assign_id(
        &mut self,
        supplied: Option<String>,
        parent: Option<usize>,
        level: Level,
        index: usize,
    ) -> String {
        if let Some(id) = supplied
            && !self.used_ids.contains(&id)
        {
            self.used_ids.insert(id.clone());
            return id;
        }
        let base = match (level, parent) {
            (Level::Center, _) | (_, None) => "center".to_string(),
            (Level::Branch, _) => format!("b{index}"),
            (_, Some(parent)) => {
                let tag = &level.name()[..1];
                format!("{}-{tag}{index}", self.nodes[parent].id)
            }
        };
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used_ids.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.used_ids.insert(candidate.clone());
        candidate
    }

    fn finish(self) -> MindTree {
        MindTree { nodes: self.nodes }
    }
}
