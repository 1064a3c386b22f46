use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::ir::{FATHER, MOTHER, Pedigree, PersonId, Sex};
use crate::theme::Theme;

use super::sizing::{box_size, font_size};
use super::text::{marriage_text, person_label};
use super::{
    AnchorSide, BoxLayout, ChartKind, Layout, LinkLayout, MarriageLabel, PathKind, TextBlock,
};

const EDGE_MARGIN: f32 = 8.0;

/// Which half of the chart a recursion walks. The traversal itself is shared;
/// the side only selects the "next layer" accessor (genealogical parents or
/// children), the column direction, and the link orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Ancestors,
    Descendants,
}

/// Cartesian tree view: one column per generation, ancestors growing toward
/// +x and descendants mirrored toward -x, with the classic balanced binary
/// placement on the ancestor side.
pub(super) fn compute_tree_layout(
    pedigree: &Pedigree,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let ancestors = config.ancestor_generations.max(0) as u32;
    let descendants = config.descendant_generations.max(0) as u32;
    let mut builder = TreeBuilder::new(pedigree, theme, config, ancestors, descendants);

    let root_idx = builder.place_subtree(pedigree.root, 0, Side::Ancestors);

    // Descendant band: laid out with its own cursor, then translated so the
    // children block centers on the root box.
    let box_mark = builder.boxes.len();
    let link_mark = builder.links.len();
    builder.cursor = 0.0;
    let mut child_indices = Vec::new();
    if descendants > 0 {
        for child in builder.next_layer(pedigree.root, Side::Descendants) {
            child_indices.push(builder.place_subtree(child, 1, Side::Descendants));
        }
    }
    if !child_indices.is_empty() {
        let first = builder.center_y(child_indices[0]);
        let last = builder.center_y(*child_indices.last().unwrap());
        let offset = builder.center_y(root_idx) - (first + last) / 2.0;
        for b in &mut builder.boxes[box_mark..] {
            b.y += offset;
        }
        for link in &mut builder.links[link_mark..] {
            for point in &mut link.points {
                point.1 += offset;
            }
        }
        builder.connect_layer(root_idx, &child_indices, Side::Descendants);
    }

    builder.into_layout()
}

struct TreeBuilder<'a> {
    pedigree: &'a Pedigree,
    theme: &'a Theme,
    config: &'a LayoutConfig,
    ancestors: u32,
    descendants: u32,
    boxes: Vec<BoxLayout>,
    links: Vec<LinkLayout>,
    marriages: Vec<MarriageLabel>,
    /// Person ids already expanded this pass; repeats become leaf occurrences.
    visited: HashSet<PersonId>,
    cursor: f32,
    anc_columns: Vec<f32>,
    desc_columns: Vec<f32>,
}

impl<'a> TreeBuilder<'a> {
    fn new(
        pedigree: &'a Pedigree,
        theme: &'a Theme,
        config: &'a LayoutConfig,
        ancestors: u32,
        descendants: u32,
    ) -> Self {
        // Column offsets accumulate the actual widths of the preceding
        // generations; with the shrink policy columns are not equidistant.
        let tree = &config.tree;
        let mut anc_columns = vec![0.0f32];
        for g in 0..ancestors {
            let prev = anc_columns[g as usize];
            anc_columns.push(prev + box_size(g as i32, tree).width + tree.horiz_padding);
        }
        let mut desc_columns = vec![0.0f32];
        for d in 1..=descendants {
            let prev = desc_columns[(d - 1) as usize];
            desc_columns.push(prev - box_size(-(d as i32), tree).width - tree.horiz_padding);
        }
        Self {
            pedigree,
            theme,
            config,
            ancestors,
            descendants,
            boxes: Vec::new(),
            links: Vec::new(),
            marriages: Vec::new(),
            visited: HashSet::new(),
            cursor: 0.0,
            anc_columns,
            desc_columns,
        }
    }

    fn center_y(&self, idx: usize) -> f32 {
        self.boxes[idx].y + self.boxes[idx].height / 2.0
    }

    /// The ids this occurrence connects to in the next column, in placement
    /// order. Only loaded persons count; the ancestor side is already
    /// placeholder-filled by the graph builder.
    fn next_layer(&self, id: PersonId, side: Side) -> Vec<PersonId> {
        let ids: Vec<PersonId> = match self.pedigree.person(id) {
            Some(person) => match side {
                Side::Ancestors => person.parents.iter().flatten().copied().collect(),
                Side::Descendants => person.children.clone(),
            },
            None => Vec::new(),
        };
        ids.into_iter()
            .filter(|next| self.pedigree.person(*next).is_some())
            .collect()
    }

    /// Place one occurrence and its subtree; shared by both sides. The next
    /// layer is placed first; a node with a placed layer sits on the vertical
    /// midpoint of its first and last entry, leaves stack on the cursor.
    fn place_subtree(&mut self, id: PersonId, depth: u32, side: Side) -> usize {
        let placeholder = id < 0;
        let first_visit = placeholder || self.visited.insert(id);
        let window = match side {
            Side::Ancestors => self.ancestors,
            Side::Descendants => self.descendants,
        };
        let expand = first_visit && !placeholder && depth < window;

        let mut next_indices = Vec::new();
        if expand {
            for next in self.next_layer(id, side) {
                next_indices.push(self.place_subtree(next, depth + 1, side));
            }
        }

        let generation = match side {
            Side::Ancestors => depth as i32,
            Side::Descendants => -(depth as i32),
        };
        let size = box_size(generation, &self.config.tree);
        let y_center = if next_indices.is_empty() {
            let center = self.cursor + size.height / 2.0;
            self.cursor += size.height + self.config.tree.vert_padding;
            center
        } else {
            let first = self.center_y(next_indices[0]);
            let last = self.center_y(*next_indices.last().unwrap());
            (first + last) / 2.0
        };

        let x = match side {
            Side::Ancestors => self.anc_columns[depth as usize],
            Side::Descendants => self.desc_columns[depth as usize],
        };
        let idx = self.push_box(id, generation, x, y_center, !first_visit);
        self.connect_layer(idx, &next_indices, side);
        idx
    }

    fn push_box(
        &mut self,
        id: PersonId,
        generation: i32,
        x: f32,
        y_center: f32,
        duplicate: bool,
    ) -> usize {
        let tree = &self.config.tree;
        let size = box_size(generation, tree);
        let person = self.pedigree.person(id);
        let fs = font_size(generation, self.theme.font_size, tree);
        let label = person
            .map(|p| {
                person_label(
                    p,
                    size.width - 2.0 * tree.label_padding,
                    fs,
                    self.theme,
                    self.config,
                )
            })
            .unwrap_or_else(TextBlock::empty);
        let idx = self.boxes.len();
        self.boxes.push(BoxLayout {
            person: id,
            x,
            y: y_center - size.height / 2.0,
            width: size.width,
            height: size.height,
            corner_radius: size.corner_radius,
            generation,
            sosa: person.map(|p| p.sosa).unwrap_or(0),
            sex: person.map(|p| p.sex).unwrap_or(Sex::Unknown),
            label,
            placeholder: id < 0,
            duplicate,
            parent_slots: [None, None],
            children: Vec::new(),
        });
        idx
    }

    /// Wire an occurrence to its placed next layer: back-references, link
    /// geometry, and (on the ancestor side) the marriage label between the
    /// two parents.
    fn connect_layer(&mut self, idx: usize, next_indices: &[usize], side: Side) {
        match side {
            Side::Ancestors => {
                let parents = self
                    .pedigree
                    .person(self.boxes[idx].person)
                    .map(|p| p.parents)
                    .unwrap_or([None, None]);
                for &next_idx in next_indices {
                    let next_person = self.boxes[next_idx].person;
                    for slot in [FATHER, MOTHER] {
                        if parents[slot] == Some(next_person) {
                            self.boxes[idx].parent_slots[slot] = Some(next_idx);
                        }
                    }
                    self.boxes[next_idx].children.push(idx);
                    let link = self.ancestor_link(idx, next_idx);
                    self.links.push(link);
                }
                let slots = self.boxes[idx].parent_slots;
                let child_person = self.boxes[idx].person;
                if let (Some(father_idx), Some(mother_idx)) = (slots[FATHER], slots[MOTHER]) {
                    self.push_marriage(child_person, idx, father_idx, mother_idx);
                }
            }
            Side::Descendants => {
                let slot = if self.boxes[idx].sex == Sex::Female {
                    MOTHER
                } else {
                    FATHER
                };
                for &next_idx in next_indices {
                    self.boxes[next_idx].parent_slots[slot] = Some(idx);
                    self.boxes[idx].children.push(next_idx);
                    let link = self.descendant_link(idx, next_idx);
                    self.links.push(link);
                }
            }
        }
    }

    /// Orthogonal H-V-H path from a child's right edge to a parent's left
    /// edge, routed through the horizontal mid-gap between the two columns.
    fn ancestor_link(&self, child_idx: usize, parent_idx: usize) -> LinkLayout {
        let child = &self.boxes[child_idx];
        let parent = &self.boxes[parent_idx];
        let from = (child.x + child.width, child.y + child.height / 2.0);
        let to = (parent.x, parent.y + parent.height / 2.0);
        let mid_x = (from.0 + to.0) / 2.0;
        LinkLayout {
            from: child.person,
            to: parent.person,
            kind: PathKind::Orthogonal,
            points: vec![from, (mid_x, from.1), (mid_x, to.1), to],
            polar: None,
        }
    }

    /// Mirror of `ancestor_link`: parent's left edge to child's right edge.
    fn descendant_link(&self, parent_idx: usize, child_idx: usize) -> LinkLayout {
        let parent = &self.boxes[parent_idx];
        let child = &self.boxes[child_idx];
        let from = (parent.x, parent.y + parent.height / 2.0);
        let to = (child.x + child.width, child.y + child.height / 2.0);
        let mid_x = (from.0 + to.0) / 2.0;
        LinkLayout {
            from: parent.person,
            to: child.person,
            kind: PathKind::Orthogonal,
            points: vec![from, (mid_x, from.1), (mid_x, to.1), to],
            polar: None,
        }
    }

    fn push_marriage(
        &mut self,
        child: PersonId,
        child_idx: usize,
        father_idx: usize,
        mother_idx: usize,
    ) {
        if !self.config.tree.show_marriages {
            return;
        }
        let Some(text) = self
            .pedigree
            .person(child)
            .and_then(|p| p.marriage.as_ref())
            .and_then(marriage_text)
        else {
            return;
        };
        let parent_gen = self.boxes[father_idx].generation;
        let mid_x =
            (self.boxes[child_idx].x + self.boxes[child_idx].width + self.boxes[father_idx].x)
                / 2.0;
        let y = (self.center_y(father_idx) + self.center_y(mother_idx)) / 2.0;
        let fs = font_size(parent_gen, self.theme.font_size, &self.config.tree);
        self.marriages.push(MarriageLabel {
            x: mid_x,
            y,
            text,
            anchor: AnchorSide::Start,
            font_size: fs,
        });
    }

    /// Shift everything into positive coordinates and compute the extent.
    fn into_layout(mut self) -> Layout {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for b in &self.boxes {
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.x + b.width);
            max_y = max_y.max(b.y + b.height);
        }
        if min_x == f32::MAX {
            min_x = 0.0;
            min_y = 0.0;
            max_x = 0.0;
            max_y = 0.0;
        }
        let dx = EDGE_MARGIN - min_x;
        let dy = EDGE_MARGIN - min_y;
        for b in &mut self.boxes {
            b.x += dx;
            b.y += dy;
        }
        for link in &mut self.links {
            for point in &mut link.points {
                point.0 += dx;
                point.1 += dy;
            }
        }
        for label in &mut self.marriages {
            label.x += dx;
            label.y += dy;
        }
        Layout {
            kind: ChartKind::Tree,
            boxes: self.boxes,
            links: self.links,
            marriage_labels: self.marriages,
            fan: None,
            width: max_x - min_x + 2.0 * EDGE_MARGIN,
            height: max_y - min_y + 2.0 * EDGE_MARGIN,
        }
    }
}
