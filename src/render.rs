use crate::config::{LayoutConfig, RenderConfig};
use crate::geometry::radial_diagonal;
use crate::ir::Sex;
use crate::layout::{AnchorSide, BoxLayout, FanData, Layout, PathKind, TextBlock};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for link in &layout.links {
        let points = match link.kind {
            PathKind::Orthogonal => link.points.clone(),
            PathKind::RadialDiagonal => {
                let center = layout.fan.as_ref().map(|f| f.center).unwrap_or((0.0, 0.0));
                match link.polar {
                    Some([from, to]) => {
                        radial_diagonal(center, from, to, config.fan.curve_segments)
                    }
                    None => Vec::new(),
                }
            }
        };
        if points.len() < 2 {
            continue;
        }
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.2\"/>",
            points_to_path(&points),
            theme.line_color
        ));
    }

    for b in &layout.boxes {
        svg.push_str(&box_svg(b, theme, config));
    }

    for label in &layout.marriage_labels {
        let anchor = match label.anchor {
            AnchorSide::Start => "start",
            AnchorSide::End => "end",
        };
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
            label.x,
            label.y,
            theme.font_family,
            label.font_size,
            theme.marriage_color,
            escape_xml(&label.text)
        ));
    }

    if let Some(fan) = &layout.fan {
        svg.push_str(&fan_svg(fan, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn box_svg(b: &BoxLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let fill = if b.placeholder {
        theme.unknown_fill.as_str()
    } else {
        match b.sex {
            Sex::Male => theme.male_fill.as_str(),
            Sex::Female => theme.female_fill.as_str(),
            Sex::Unknown => theme.unknown_fill.as_str(),
        }
    };
    let (stroke, dash) = if b.placeholder {
        (theme.placeholder_border.as_str(), " stroke-dasharray=\"4 3\"")
    } else {
        (theme.box_border.as_str(), "")
    };
    let mut out = format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.2\"{dash}/>",
        b.x, b.y, b.width, b.height, b.corner_radius, b.corner_radius
    );
    let font_size = crate::layout::sizing::font_size(b.generation, theme.font_size, &config.tree);
    out.push_str(&text_block_svg(
        b.x + b.width / 2.0,
        b.y + b.height / 2.0,
        &b.label,
        font_size,
        theme,
        config,
    ));
    out
}

fn fan_svg(fan: &FanData, theme: &Theme) -> String {
    let mut out = String::new();
    for node in &fan.nodes {
        out.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2.5\" fill=\"{}\"/>",
            node.x, node.y, theme.line_color
        ));
        let Some(label) = &node.label else {
            continue;
        };
        let Some(line) = label.lines.first() else {
            continue;
        };
        // Labels run along the radius; lower-half ones flip to stay upright.
        let (extra, anchor, dx) = if node.flipped {
            (" rotate(180)", "end", -6.0)
        } else {
            ("", "start", 6.0)
        };
        let transform = format!(
            "translate({:.2} {:.2}) rotate({:.2}) translate({:.2} 0){extra}",
            fan.center.0,
            fan.center.1,
            node.angle - 90.0,
            node.radius
        );
        out.push_str(&format!(
            "<text transform=\"{transform}\" dx=\"{dx}\" dy=\"0.32em\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(line)
        ));
    }
    out
}

fn text_block_svg(
    x: f32,
    y: f32,
    label: &TextBlock,
    font_size: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    if label.lines.is_empty() {
        return String::new();
    }
    let line_height = font_size * config.label_line_height;
    let total_height = label.lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + font_size * 0.85;
    let mut text = format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{font_size:.1}\" fill=\"{}\">",
        theme.font_family, theme.text_color
    );
    for (idx, line) in label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = format!("M {:.2} {:.2}", points[0].0, points[0].1);
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{GraphPayload, Pedigree, PersonRecord};
    use crate::layout::{ChartKind, compute_layout};

    #[test]
    fn render_svg_basic() {
        let payload = GraphPayload {
            persons: vec![
                PersonRecord {
                    id: 1,
                    given_name: "Jean".to_string(),
                    surname: "Moreau".to_string(),
                    father: Some(2),
                    ..blank(1)
                },
                PersonRecord {
                    id: 2,
                    given_name: "Luc".to_string(),
                    surname: "Moreau".to_string(),
                    ..blank(2)
                },
            ],
        };
        let pedigree = Pedigree::from_payload(1, &payload, 1, 0).unwrap();
        let mut config = LayoutConfig::default();
        config.ancestor_generations = 1;
        config.descendant_generations = 0;
        let theme = Theme::classic();
        let layout = compute_layout(&pedigree, ChartKind::Tree, &theme, &config).unwrap();
        let svg = render_svg(&layout, &theme, &config);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Jean Moreau"));
    }

    fn blank(id: i64) -> PersonRecord {
        PersonRecord {
            id,
            given_name: String::new(),
            surname: String::new(),
            sex: Default::default(),
            birth: None,
            death: None,
            marriage: None,
            father: None,
            mother: None,
            children: Vec::new(),
        }
    }
}
