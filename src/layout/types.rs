use crate::ir::{PersonId, Sex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Tree,
    Fan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Orthogonal,
    RadialDiagonal,
}

/// Which end of the text sits on the anchor coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

impl TextBlock {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }
}

/// One rendered occurrence of a person in the tree view. The same person id
/// can appear more than once (implex); coordinates are per occurrence.
#[derive(Debug, Clone)]
pub struct BoxLayout {
    pub person: PersonId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub generation: i32,
    pub sosa: i64,
    pub sex: Sex,
    pub label: TextBlock,
    /// Dashed "unknown" box filling a missing parent slot.
    pub placeholder: bool,
    /// Repeat occurrence of an already-placed person; not expanded further.
    pub duplicate: bool,
    /// Indices into `Layout::boxes` for the parent occurrences placed above
    /// this one (`[father, mother]`) and the child occurrences this box
    /// connects down to. Window-local, not the full genealogical families.
    pub parent_slots: [Option<usize>; 2],
    pub children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct LinkLayout {
    pub from: PersonId,
    pub to: PersonId,
    pub kind: PathKind,
    /// Corner points of the orthogonal path (tree view); empty for radial
    /// links, which carry polar endpoints instead.
    pub points: Vec<(f32, f32)>,
    /// `[(angle, radius); 2]` endpoints for `PathKind::RadialDiagonal`.
    pub polar: Option<[(f32, f32); 2]>,
}

#[derive(Debug, Clone)]
pub struct MarriageLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub anchor: AnchorSide,
    pub font_size: f32,
}

#[derive(Debug, Clone)]
pub struct FanNodeLayout {
    pub person: PersonId,
    /// Degrees; 0 points up, growing clockwise.
    pub angle: f32,
    pub radius: f32,
    pub x: f32,
    pub y: f32,
    pub generation: i32,
    pub label: Option<TextBlock>,
    /// Lower-half labels are rotated 180 degrees so they stay readable.
    pub flipped: bool,
}

#[derive(Debug, Clone)]
pub struct FanData {
    pub center: (f32, f32),
    pub outer_radius: f32,
    pub nodes: Vec<FanNodeLayout>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: ChartKind,
    pub boxes: Vec<BoxLayout>,
    pub links: Vec<LinkLayout>,
    pub marriage_labels: Vec<MarriageLabel>,
    pub fan: Option<FanData>,
    pub width: f32,
    pub height: f32,
}
