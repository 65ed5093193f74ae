use proptest::prelude::*;
use radial_mindmap::{Config, build_scene, compute_layout, normalize_tree, parse_raw};
use serde_json::{Map, Value, json};

fn arb_text() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[A-Za-z][A-Za-z ]{0,40}".prop_map(Value::String),
        Just(Value::String("   ".to_string())),
        any::<i32>().prop_map(|n| json!(n)),
        Just(Value::Null),
    ]
}

fn arb_node(
    children_key: &'static str,
    child: BoxedStrategy<Value>,
    max: usize,
) -> BoxedStrategy<Value> {
    (arb_text(), arb_text(), prop::collection::vec(child, 0..max))
        .prop_map(move |(label, description, children)| {
            let mut node = Map::new();
            node.insert("label".to_string(), label);
            node.insert("description".to_string(), description);
            node.insert(children_key.to_string(), Value::Array(children));
            Value::Object(node)
        })
        .boxed()
}

/// Raw trees shaped like model output, with noisy labels and oversize lists.
fn arb_raw_tree() -> impl Strategy<Value = Value> {
    let detail = prop_oneof![
        "[a-z ]{1,20}".prop_map(Value::String),
        arb_text().prop_map(|label| json!({ "label": label })),
        Just(json!(42)),
    ]
    .boxed();
    let point = arb_node("details", detail, 5);
    let concept = arb_node("points", point, 4);
    let branch = arb_node("concepts", concept, 4);
    (arb_text(), prop::collection::vec(branch, 0..11))
        .prop_map(|(label, branches)| json!({ "center": { "label": label }, "branches": branches }))
}

/// Arbitrary JSON, mostly not tree-shaped at all.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("center".to_string()),
                    Just("branches".to_string()),
                    Just("concepts".to_string()),
                    Just("children".to_string()),
                    Just("label".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..5,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn normalized_trees_are_well_formed(raw in arb_raw_tree()) {
        let config = Config::default();
        let tree = normalize_tree(&raw, &config);
        prop_assert!(tree.validate().is_ok());
        for node in &tree.nodes {
            prop_assert!(!node.label.trim().is_empty());
            prop_assert!(!node.description.is_empty());
            prop_assert!(node.children.len() <= config.normalize.max_children(node.level));
        }
    }

    #[test]
    fn arbitrary_json_never_breaks_the_pipeline(raw in arb_json()) {
        let config = Config::default();
        let tree = normalize_tree(&raw, &config);
        prop_assert!(tree.validate().is_ok());
        let layout = compute_layout(tree, &config.layout);
        let scene = build_scene(&layout, &config.style, &config.theme);
        prop_assert_eq!(scene.circles.len(), scene.lines.len() + 1);
    }

    #[test]
    fn arbitrary_text_never_breaks_intake(input in "\\PC{0,200}") {
        let tree = normalize_tree(&parse_raw(&input), &Config::default());
        prop_assert!(tree.validate().is_ok());
    }

    #[test]
    fn layout_keeps_center_fixed_and_clearance(raw in arb_raw_tree()) {
        let config = Config::default();
        let layout = compute_layout(normalize_tree(&raw, &config), &config.layout);
        prop_assert_eq!((layout.placements[0].x, layout.placements[0].y), (0.0, 0.0));
        prop_assert_eq!(layout.placements.len(), layout.tree.len());
        let clearance = config.layout.collision_clearance;
        for (i, (placement, outcome)) in layout.placements.iter().zip(&layout.outcomes).enumerate() {
            if outcome.is_exhausted() {
                continue;
            }
            for earlier in &layout.placements[..i] {
                let gap = placement.center().distance(earlier.center());
                prop_assert!(gap >= placement.radius + earlier.radius + clearance - 1e-2);
            }
        }
    }

    #[test]
    fn scene_bytes_are_reproducible(raw in arb_raw_tree(), seed in any::<u64>()) {
        let mut config = Config::default();
        config.layout.seed = seed;
        let render = || {
            let layout = compute_layout(normalize_tree(&raw, &config), &config.layout);
            build_scene(&layout, &config.style, &config.theme).to_json().unwrap()
        };
        prop_assert_eq!(render(), render());
    }
}
