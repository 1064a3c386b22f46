use std::path::Path;

use pedigree_rs_renderer::config::LayoutConfig;
use pedigree_rs_renderer::ir::{FATHER, GraphPayload, LayoutError, MOTHER, Pedigree};
use pedigree_rs_renderer::layout::{BoxLayout, ChartKind, Layout, compute_layout, sizing};
use pedigree_rs_renderer::layout_dump::LayoutDump;
use pedigree_rs_renderer::render::render_svg;
use pedigree_rs_renderer::source::{GraphSource, PedigreeSession, StaticSource, WindowState};
use pedigree_rs_renderer::theme::Theme;

fn load_fixture(name: &str) -> GraphPayload {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let contents = std::fs::read_to_string(&path).expect("fixture read failed");
    serde_json::from_str(&contents).expect("fixture parse failed")
}

fn tree_config(ancestors: i32, descendants: i32) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    config.ancestor_generations = ancestors;
    config.descendant_generations = descendants;
    config
}

fn tree_layout(fixture: &str, root: i64, ancestors: i32, descendants: i32) -> Layout {
    let payload = load_fixture(fixture);
    let pedigree = Pedigree::from_payload(root, &payload, ancestors as u32, descendants as u32)
        .expect("pedigree build failed");
    let config = tree_config(ancestors, descendants);
    compute_layout(&pedigree, ChartKind::Tree, &Theme::classic(), &config).expect("layout failed")
}

fn fan_layout(fixture: &str, root: i64, generations: i32) -> Layout {
    let payload = load_fixture(fixture);
    let pedigree = Pedigree::from_payload(
        root,
        &payload,
        generations.max(0) as u32,
        (-generations).max(0) as u32,
    )
    .expect("pedigree build failed");
    let mut config = LayoutConfig::default();
    config.fan.generations = generations;
    compute_layout(&pedigree, ChartKind::Fan, &Theme::classic(), &config).expect("layout failed")
}

fn center_y(b: &BoxLayout) -> f32 {
    b.y + b.height / 2.0
}

fn assert_close(a: f32, b: f32, context: &str) {
    assert!((a - b).abs() < 1e-3, "{context}: {a} != {b}");
}

#[test]
fn full_two_generation_ancestor_tree() {
    let layout = tree_layout("three_generations.json", 1, 2, 0);
    assert_eq!(layout.boxes.len(), 7, "1 root + 2 parents + 4 grandparents");
    assert_eq!(layout.links.len(), 6);
    assert_eq!(layout.marriage_labels.len(), 3);

    let config = tree_config(2, 0);
    let expected = sizing::box_size(2, &config.tree);
    let gen2: Vec<_> = layout.boxes.iter().filter(|b| b.generation == 2).collect();
    assert_eq!(gen2.len(), 4);
    for b in &gen2 {
        assert_close(b.width, expected.width, "gen-2 width");
        assert_close(b.height, expected.height, "gen-2 height");
    }
}

#[test]
fn zero_generations_renders_root_only() {
    let layout = tree_layout("three_generations.json", 1, 0, 0);
    assert_eq!(layout.boxes.len(), 1);
    assert!(layout.links.is_empty());
    assert_eq!(layout.boxes[0].person, 1);
}

#[test]
fn sosa_numbers_double_per_parent() {
    let layout = tree_layout("three_generations.json", 1, 2, 0);
    let root = layout.boxes.iter().find(|b| b.person == 1).unwrap();
    assert_eq!(root.sosa, 1);
    for b in &layout.boxes {
        if b.generation < 0 || b.duplicate {
            continue;
        }
        if let Some(father) = b.parent_slots[FATHER] {
            assert_eq!(layout.boxes[father].sosa, 2 * b.sosa);
        }
        if let Some(mother) = b.parent_slots[MOTHER] {
            assert_eq!(layout.boxes[mother].sosa, 2 * b.sosa + 1);
        }
    }
}

#[test]
fn ancestors_center_on_parent_midpoint() {
    let layout = tree_layout("three_generations.json", 1, 2, 0);
    for b in &layout.boxes {
        if let (Some(father), Some(mother)) = (b.parent_slots[FATHER], b.parent_slots[MOTHER]) {
            let midpoint =
                (center_y(&layout.boxes[father]) + center_y(&layout.boxes[mother])) / 2.0;
            assert_close(center_y(b), midpoint, "balanced midpoint");
        }
    }
}

#[test]
fn ancestor_columns_accumulate_preceding_widths() {
    let layout = tree_layout("three_generations.json", 1, 2, 0);
    let config = tree_config(2, 0);
    let root_x = layout.boxes.iter().find(|b| b.person == 1).unwrap().x;
    let gen1_x = layout.boxes.iter().find(|b| b.generation == 1).unwrap().x;
    let gen2_x = layout.boxes.iter().find(|b| b.generation == 2).unwrap().x;
    let g0 = sizing::box_size(0, &config.tree);
    let g1 = sizing::box_size(1, &config.tree);
    assert_close(
        gen1_x - root_x,
        g0.width + config.tree.horiz_padding,
        "column 1 offset",
    );
    assert_close(
        gen2_x - gen1_x,
        g1.width + config.tree.horiz_padding,
        "column 2 offset",
    );
}

#[test]
fn descendants_space_evenly_and_mirror_left() {
    let layout = tree_layout("three_generations.json", 1, 0, 1);
    assert_eq!(layout.boxes.len(), 4, "root + 3 children");
    assert_eq!(layout.links.len(), 3);

    let root = layout.boxes.iter().find(|b| b.person == 1).unwrap().clone();
    let mut children: Vec<_> = layout.boxes.iter().filter(|b| b.generation == -1).collect();
    assert_eq!(children.len(), 3);
    children.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
    for b in &children {
        assert!(b.x < root.x, "descendants sit left of the root");
    }
    let step1 = center_y(children[1]) - center_y(children[0]);
    let step2 = center_y(children[2]) - center_y(children[1]);
    assert_close(step1, step2, "even vertical spacing");
    let band_center = (center_y(children[0]) + center_y(children[2])) / 2.0;
    assert_close(band_center, center_y(&root), "band centers on root");
}

#[test]
fn descendant_numbering_is_sequential_dfs() {
    let payload = load_fixture("three_generations.json");
    let pedigree = Pedigree::from_payload(1, &payload, 0, 2).unwrap();
    assert_eq!(pedigree.person(10).unwrap().sosa, -1);
    assert_eq!(pedigree.person(20).unwrap().sosa, -2);
    assert_eq!(pedigree.person(11).unwrap().sosa, -3);
    assert_eq!(pedigree.person(12).unwrap().sosa, -4);
}

#[test]
fn implex_places_two_occurrences_without_recursion() {
    let layout = tree_layout("implex.json", 1, 2, 0);
    assert_eq!(layout.boxes.len(), 7);
    assert_eq!(layout.links.len(), 6);

    let occurrences: Vec<_> = layout.boxes.iter().filter(|b| b.person == 4).collect();
    assert_eq!(occurrences.len(), 2, "implex person appears twice");
    assert!(
        (occurrences[0].y - occurrences[1].y).abs() > 1e-3,
        "occurrences hold distinct coordinates"
    );
    let duplicates: Vec<_> = occurrences.iter().filter(|b| b.duplicate).collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].parent_slots, [None, None], "not re-expanded");
}

#[test]
fn self_ancestor_cycle_terminates() {
    let layout = tree_layout("cycle.json", 1, 3, 0);
    assert_eq!(layout.boxes.len(), 5);
    let occurrences: Vec<_> = layout.boxes.iter().filter(|b| b.person == 1).collect();
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences.iter().filter(|b| b.duplicate).count(), 1);
}

#[test]
fn missing_parents_become_dashed_placeholders() {
    let layout = tree_layout("sparse.json", 1, 2, 0);
    assert_eq!(layout.boxes.len(), 5);
    assert_eq!(layout.boxes.iter().filter(|b| b.placeholder).count(), 3);
    // The unknown mother occupies her column slot but is not expanded, so
    // only the real father contributes generation-2 boxes.
    assert_eq!(layout.boxes.iter().filter(|b| b.generation == 2).count(), 2);
    let root = layout.boxes.iter().find(|b| b.person == 1).unwrap();
    let father = root.parent_slots[FATHER].unwrap();
    let mother = root.parent_slots[MOTHER].unwrap();
    assert!(layout.boxes[mother].placeholder);
    let midpoint = (center_y(&layout.boxes[father]) + center_y(&layout.boxes[mother])) / 2.0;
    assert_close(center_y(root), midpoint, "placeholder keeps slot balance");
}

#[test]
fn uniform_size_flag_keeps_all_generations_equal() {
    let payload = load_fixture("three_generations.json");
    let pedigree = Pedigree::from_payload(1, &payload, 2, 0).unwrap();
    let mut config = tree_config(2, 0);
    config.tree.uniform_box_size = true;
    let layout = compute_layout(&pedigree, ChartKind::Tree, &Theme::classic(), &config).unwrap();
    for b in &layout.boxes {
        assert_close(b.width, config.tree.box_width, "uniform width");
        assert_close(b.height, config.tree.box_height, "uniform height");
    }
}

#[test]
fn marriage_labels_sit_between_parents() {
    let layout = tree_layout("three_generations.json", 1, 2, 0);
    let texts: Vec<&str> = layout
        .marriage_labels
        .iter()
        .map(|l| l.text.as_str())
        .collect();
    assert!(texts.contains(&"m. 1948"));
    assert!(texts.contains(&"m. 1919"));
    assert!(texts.contains(&"m. 1921"));

    let root = layout.boxes.iter().find(|b| b.person == 1).unwrap();
    let father = &layout.boxes[root.parent_slots[FATHER].unwrap()];
    let mother = &layout.boxes[root.parent_slots[MOTHER].unwrap()];
    let label = layout
        .marriage_labels
        .iter()
        .find(|l| l.text == "m. 1948")
        .unwrap();
    assert_close(
        label.y,
        (center_y(father) + center_y(mother)) / 2.0,
        "marriage label at parents' midpoint",
    );
    assert!(label.x > root.x + root.width && label.x < father.x);
}

#[test]
fn layout_is_deterministic() {
    for kind in [ChartKind::Tree, ChartKind::Fan] {
        let payload = load_fixture("three_generations.json");
        let pedigree = Pedigree::from_payload(1, &payload, 2, 1).unwrap();
        let mut config = tree_config(2, 1);
        config.fan.generations = 2;
        let theme = Theme::classic();
        let first = compute_layout(&pedigree, kind, &theme, &config).unwrap();
        let second = compute_layout(&pedigree, kind, &theme, &config).unwrap();
        let a = serde_json::to_string(&LayoutDump::from_layout(&first)).unwrap();
        let b = serde_json::to_string(&LayoutDump::from_layout(&second)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn fan_divides_the_full_turn_among_leaves() {
    let layout = fan_layout("three_generations.json", 1, 2);
    let fan = layout.fan.as_ref().unwrap();
    assert_eq!(fan.nodes.len(), 7);

    let leaf_angles: Vec<f32> = fan
        .nodes
        .iter()
        .filter(|n| n.generation == 2)
        .map(|n| n.angle)
        .collect();
    // Leaves advance by 1 unit within a sibling pair and 2 across branches;
    // 0 + 1 + 2 + 1 plus the closing gap of 2 spans the circle: scale 60.
    let expected = [0.0, 60.0, 180.0, 240.0];
    assert_eq!(leaf_angles.len(), 4);
    for (angle, want) in leaf_angles.iter().zip(expected) {
        assert_close(*angle, want, "leaf angle");
    }

    let father = fan.nodes.iter().find(|n| n.person == 2).unwrap();
    let mother = fan.nodes.iter().find(|n| n.person == 3).unwrap();
    assert_close(father.angle, 30.0, "father midpoint");
    assert_close(mother.angle, 210.0, "mother midpoint");
    // Top-level branch allocations close the circle.
    let spans = [180.0 - 0.0, 360.0 - 180.0];
    assert_close(spans.iter().sum::<f32>(), 360.0, "branch spans sum");

    for n in &fan.nodes {
        assert!((0.0..360.0).contains(&n.angle), "angle within full turn");
        assert_eq!(n.flipped, n.angle >= 180.0, "lower-half labels flip");
    }
}

#[test]
fn fan_descendant_side_uses_children_accessor() {
    let layout = fan_layout("three_generations.json", 1, -1);
    let fan = layout.fan.as_ref().unwrap();
    assert_eq!(fan.nodes.len(), 4, "root + 3 children");
    let child_angles: Vec<f32> = fan
        .nodes
        .iter()
        .filter(|n| n.generation == -1)
        .map(|n| n.angle)
        .collect();
    let expected = [0.0, 120.0, 240.0];
    for (angle, want) in child_angles.iter().zip(expected) {
        assert_close(*angle, want, "descendant angle");
    }
}

#[test]
fn fan_skips_placeholder_wedges() {
    // The tree view draws dashed boxes for the same graph; the fan simply
    // leaves unknown ancestors out of the angular allocation.
    let layout = fan_layout("sparse.json", 1, 2);
    let fan = layout.fan.as_ref().unwrap();
    assert!(fan.nodes.iter().all(|n| n.person > 0));
    assert_eq!(fan.nodes.len(), 2, "root and the one known father");
}

#[test]
fn fan_degenerate_inputs_yield_root_only() {
    let layout = fan_layout("three_generations.json", 1, 0);
    let fan = layout.fan.as_ref().unwrap();
    assert_eq!(fan.nodes.len(), 1);
    assert_close(fan.nodes[0].radius, 0.0, "root at center");

    let payload = load_fixture("three_generations.json");
    let pedigree = Pedigree::from_payload(1, &payload, 2, 0).unwrap();
    let mut config = LayoutConfig::default();
    config.fan.generations = 2;
    config.fan.diameter = 0.0;
    let layout = compute_layout(&pedigree, ChartKind::Fan, &Theme::classic(), &config).unwrap();
    let fan = layout.fan.as_ref().unwrap();
    for n in &fan.nodes {
        assert!(n.x.is_finite() && n.y.is_finite(), "no division by zero");
    }
}

#[test]
fn invalid_inputs_fail_fast() {
    let payload = load_fixture("three_generations.json");
    let err = Pedigree::from_payload(99, &payload, 2, 0).unwrap_err();
    assert_eq!(err, LayoutError::InvalidRoot(99));

    let pedigree = Pedigree::from_payload(1, &payload, 2, 0).unwrap();
    let config = tree_config(-1, 0);
    let err = compute_layout(&pedigree, ChartKind::Tree, &Theme::classic(), &config).unwrap_err();
    assert_eq!(err, LayoutError::InvalidGenerations(-1));
}

#[test]
fn superseded_fetch_is_discarded() {
    let source = StaticSource::new(load_fixture("three_generations.json"));
    let mut session = PedigreeSession::new(1);
    let WindowState::Pending(request) = session.ensure_window(2, 0) else {
        panic!("empty session must request data");
    };
    let payload = source
        .fetch(request.root, request.ancestors, request.descendants)
        .unwrap();

    // Root changes while the fetch is in flight: the result must be dropped.
    session.set_root(2);
    assert!(!session.apply_fetch(request, &payload).unwrap());
    assert!(session.pedigree().persons.is_empty());

    // A fresh request for the new root merges normally.
    let WindowState::Pending(request) = session.ensure_window(1, 0) else {
        panic!("new root must request data");
    };
    assert!(session.apply_fetch(request, &payload).unwrap());
    assert_eq!(session.ensure_window(1, 0), WindowState::Ready);
}

#[test]
fn growing_the_window_reuses_the_graph() {
    let source = StaticSource::new(load_fixture("three_generations.json"));
    let mut session = PedigreeSession::new(1);
    let WindowState::Pending(request) = session.ensure_window(1, 0) else {
        panic!("empty session must request data");
    };
    let payload = source
        .fetch(request.root, request.ancestors, request.descendants)
        .unwrap();
    assert!(session.apply_fetch(request, &payload).unwrap());
    assert_eq!(session.ensure_window(1, 0), WindowState::Ready);

    // Deepening the window extends annotations instead of rebuilding.
    let WindowState::Pending(request) = session.ensure_window(2, 1) else {
        panic!("deeper window must request data");
    };
    assert!(session.apply_fetch(request, &payload).unwrap());
    assert_eq!(session.ensure_window(2, 1), WindowState::Ready);
    assert_eq!(session.pedigree().person(4).unwrap().sosa, 4);

    // Re-selecting the current root keeps the loaded graph.
    session.set_root(1);
    assert_eq!(session.ensure_window(2, 1), WindowState::Ready);
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "three_generations.json",
        "implex.json",
        "sparse.json",
        "cycle.json",
    ];
    let theme = Theme::classic();
    for fixture in candidates {
        let payload = load_fixture(fixture);
        let pedigree = Pedigree::from_payload(1, &payload, 2, 1).expect("pedigree build failed");
        let mut config = tree_config(2, 1);
        config.fan.generations = 2;
        for kind in [ChartKind::Tree, ChartKind::Fan] {
            let layout = compute_layout(&pedigree, kind, &theme, &config).expect("layout failed");
            let svg = render_svg(&layout, &theme, &config);
            assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
            assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
        }
    }
}
