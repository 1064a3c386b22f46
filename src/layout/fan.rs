use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::geometry::{FULL_TURN, fan_point, normalize_angle};
use crate::ir::{Pedigree, PersonId};
use crate::theme::Theme;

use super::text::{fit_line, measure_line};
use super::{ChartKind, FanData, FanNodeLayout, Layout, LinkLayout, PathKind, TextBlock};

/// Radial fan chart: radius encodes generation distance from the root, angle
/// encodes sibling branching. The sign of `fan.generations` selects whether
/// the rings hold ancestors (positive) or descendants (negative).
pub(super) fn compute_fan_layout(
    pedigree: &Pedigree,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let fan_cfg = &config.fan;
    let depth_limit = fan_cfg.generations.unsigned_abs();
    let ancestor_fan = fan_cfg.generations >= 0;
    let diameter = fan_cfg.diameter.max(1.0);
    let center = (diameter / 2.0, diameter / 2.0);
    let max_radius = (diameter / 2.0 - fan_cfg.margin).max(1.0);
    let ring_step = max_radius / depth_limit.max(1) as f32;

    let mut arena = Vec::new();
    let mut visited = HashSet::new();
    let root_idx = build_subtree(
        pedigree,
        pedigree.root,
        None,
        0,
        depth_limit,
        ancestor_fan,
        &mut arena,
        &mut visited,
    );

    assign_angles(&mut arena, root_idx);

    let mut nodes = Vec::with_capacity(arena.len());
    let mut links = Vec::new();
    emit(
        &arena,
        root_idx,
        pedigree,
        theme,
        config,
        center,
        ring_step,
        ancestor_fan,
        &mut nodes,
        &mut links,
    );

    Layout {
        kind: ChartKind::Fan,
        boxes: Vec::new(),
        links,
        marriage_labels: Vec::new(),
        fan: Some(FanData {
            center,
            outer_radius: max_radius,
            nodes,
        }),
        width: diameter,
        height: diameter,
    }
}

struct FanTreeNode {
    person: PersonId,
    /// Person id of the hierarchy parent; the separation rule compares these.
    parent: Option<PersonId>,
    depth: u32,
    children: Vec<usize>,
    angle: f32,
}

/// Build the traversal tree through the accessor selected by the fan side:
/// genealogical parents for an ancestor fan, children for a descendant fan.
/// Placeholder persons get no wedge; a revisited person is not re-expanded.
#[allow(clippy::too_many_arguments)]
fn build_subtree(
    pedigree: &Pedigree,
    id: PersonId,
    parent: Option<PersonId>,
    depth: u32,
    limit: u32,
    ancestor_fan: bool,
    arena: &mut Vec<FanTreeNode>,
    visited: &mut HashSet<PersonId>,
) -> usize {
    let first_visit = visited.insert(id);
    let mut children = Vec::new();
    if depth < limit && first_visit {
        let next: Vec<PersonId> = pedigree
            .person(id)
            .map(|p| {
                if ancestor_fan {
                    p.parents.iter().flatten().copied().collect()
                } else {
                    p.children.clone()
                }
            })
            .unwrap_or_default();
        for next_id in next {
            let real = pedigree
                .person(next_id)
                .map(|p| !p.is_placeholder())
                .unwrap_or(false);
            if real {
                children.push(build_subtree(
                    pedigree,
                    next_id,
                    Some(id),
                    depth + 1,
                    limit,
                    ancestor_fan,
                    arena,
                    visited,
                ));
            }
        }
    }
    arena.push(FanTreeNode {
        person: id,
        parent,
        depth,
        children,
        angle: 0.0,
    });
    arena.len() - 1
}

/// Divide the full turn among the leaves: successive leaves advance by 1 unit
/// when they share a hierarchy parent and 2 otherwise, and the gap closing
/// the circle between the last and first leaf follows the same rule. Internal
/// nodes sit on the midpoint of their first and last child.
fn assign_angles(arena: &mut [FanTreeNode], root_idx: usize) {
    let mut leaves = Vec::new();
    collect_leaves(arena, root_idx, &mut leaves);
    if leaves.len() <= 1 {
        return;
    }

    let mut positions = vec![0.0f32; leaves.len()];
    let mut x = 0.0f32;
    for i in 1..leaves.len() {
        x += separation(arena, leaves[i - 1], leaves[i]);
        positions[i] = x;
    }
    let total = x + separation(arena, leaves[leaves.len() - 1], leaves[0]);
    let scale = FULL_TURN / total.max(1.0);
    for (i, &leaf) in leaves.iter().enumerate() {
        arena[leaf].angle = positions[i] * scale;
    }

    propagate_angle(arena, root_idx);
}

fn separation(arena: &[FanTreeNode], a: usize, b: usize) -> f32 {
    let same_parent = arena[a].parent.is_some() && arena[a].parent == arena[b].parent;
    if same_parent { 1.0 } else { 2.0 }
}

fn collect_leaves(arena: &[FanTreeNode], idx: usize, out: &mut Vec<usize>) {
    if arena[idx].children.is_empty() {
        out.push(idx);
        return;
    }
    for &child in &arena[idx].children {
        collect_leaves(arena, child, out);
    }
}

fn propagate_angle(arena: &mut [FanTreeNode], idx: usize) -> f32 {
    if arena[idx].children.is_empty() {
        return arena[idx].angle;
    }
    let children = arena[idx].children.clone();
    let mut first = 0.0;
    let mut last = 0.0;
    for (i, &child) in children.iter().enumerate() {
        let angle = propagate_angle(arena, child);
        if i == 0 {
            first = angle;
        }
        last = angle;
    }
    arena[idx].angle = (first + last) / 2.0;
    arena[idx].angle
}

#[allow(clippy::too_many_arguments)]
fn emit(
    arena: &[FanTreeNode],
    idx: usize,
    pedigree: &Pedigree,
    theme: &Theme,
    config: &LayoutConfig,
    center: (f32, f32),
    ring_step: f32,
    ancestor_fan: bool,
    nodes: &mut Vec<FanNodeLayout>,
    links: &mut Vec<LinkLayout>,
) {
    let node = &arena[idx];
    let radius = node.depth as f32 * ring_step;
    let angle = node.angle;
    let (x, y) = fan_point(center, angle, radius);
    let generation = if ancestor_fan {
        node.depth as i32
    } else {
        -(node.depth as i32)
    };
    let label = if config.fan.show_text {
        pedigree.person(node.person).map(|person| {
            let max_width = if node.depth == 0 {
                ring_step.max(theme.font_size * 4.0)
            } else {
                ring_step * 0.9
            };
            let line = fit_line(
                &person.display_name(),
                max_width,
                theme.font_size,
                theme.font_family.as_str(),
            );
            let width = measure_line(&line, theme.font_size, theme.font_family.as_str());
            TextBlock {
                lines: vec![line],
                width,
                height: theme.font_size * config.label_line_height,
            }
        })
    } else {
        None
    };
    nodes.push(FanNodeLayout {
        person: node.person,
        angle,
        radius,
        x,
        y,
        generation,
        label,
        flipped: normalize_angle(angle) >= 180.0,
    });

    for &child_idx in &node.children {
        let child = &arena[child_idx];
        links.push(LinkLayout {
            from: node.person,
            to: child.person,
            kind: PathKind::RadialDiagonal,
            points: Vec::new(),
            polar: Some([
                (angle, radius),
                (child.angle, child.depth as f32 * ring_step),
            ]),
        });
        emit(
            arena,
            child_idx,
            pedigree,
            theme,
            config,
            center,
            ring_step,
            ancestor_fan,
            nodes,
            links,
        );
    }
}
