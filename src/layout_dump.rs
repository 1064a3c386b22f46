use crate::layout::{AnchorSide, Layout, PathKind};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON view of a finished layout: the ordered draw-descriptor lists handed
/// to rendering consumers.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub boxes: Vec<BoxDump>,
    pub links: Vec<LinkDump>,
    pub marriage_labels: Vec<MarriageDump>,
    pub fan_nodes: Vec<FanNodeDump>,
}

#[derive(Debug, Serialize)]
pub struct BoxDump {
    pub person: i64,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub generation: i32,
    pub sosa: i64,
    pub placeholder: bool,
    pub duplicate: bool,
    pub label_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub from: i64,
    pub to: i64,
    pub path_kind: String,
    pub points: Vec<[f32; 2]>,
    pub polar: Option<[[f32; 2]; 2]>,
}

#[derive(Debug, Serialize)]
pub struct MarriageDump {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub anchor_side: String,
    pub font_size: f32,
}

#[derive(Debug, Serialize)]
pub struct FanNodeDump {
    pub person: i64,
    pub angle: f32,
    pub radius: f32,
    pub x: f32,
    pub y: f32,
    pub generation: i32,
    pub flipped: bool,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let boxes = layout
            .boxes
            .iter()
            .map(|b| BoxDump {
                person: b.person,
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
                corner_radius: b.corner_radius,
                generation: b.generation,
                sosa: b.sosa,
                placeholder: b.placeholder,
                duplicate: b.duplicate,
                label_lines: b.label.lines.clone(),
            })
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                from: link.from,
                to: link.to,
                path_kind: match link.kind {
                    PathKind::Orthogonal => "orthogonal".to_string(),
                    PathKind::RadialDiagonal => "radialDiagonal".to_string(),
                },
                points: link.points.iter().map(|(x, y)| [*x, *y]).collect(),
                polar: link
                    .polar
                    .map(|[(a0, r0), (a1, r1)]| [[a0, r0], [a1, r1]]),
            })
            .collect();

        let marriage_labels = layout
            .marriage_labels
            .iter()
            .map(|label| MarriageDump {
                x: label.x,
                y: label.y,
                text: label.text.clone(),
                anchor_side: match label.anchor {
                    AnchorSide::Start => "start".to_string(),
                    AnchorSide::End => "end".to_string(),
                },
                font_size: label.font_size,
            })
            .collect();

        let fan_nodes = layout
            .fan
            .as_ref()
            .map(|fan| {
                fan.nodes
                    .iter()
                    .map(|node| FanNodeDump {
                        person: node.person,
                        angle: node.angle,
                        radius: node.radius,
                        x: node.x,
                        y: node.y,
                        generation: node.generation,
                        flipped: node.flipped,
                    })
                    .collect()
            })
            .unwrap_or_default();

        LayoutDump {
            kind: format!("{:?}", layout.kind),
            width: layout.width,
            height: layout.height,
            boxes,
            links,
            marriage_labels,
            fan_nodes,
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
