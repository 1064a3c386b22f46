use crate::config::LayoutConfig;
use crate::ir::{EventSummary, Person};
use crate::text_metrics;
use crate::theme::Theme;

use super::TextBlock;

pub(super) fn measure_line(text: &str, font_size: f32, font_family: &str) -> f32 {
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| text.chars().count() as f32 * font_size * 0.56)
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
pub(super) fn fit_line(text: &str, max_width: f32, font_size: f32, font_family: &str) -> String {
    if max_width <= 0.0 || measure_line(text, font_size, font_family) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (1..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push('\u{2026}');
        if measure_line(&candidate, font_size, font_family) <= max_width {
            return candidate;
        }
    }
    "\u{2026}".to_string()
}

fn event_line(prefix: &str, event: &EventSummary) -> Option<String> {
    let date = event.date.as_deref()?;
    let mut line = format!("{prefix} {date}");
    if let Some(place) = event.place.as_deref() {
        line.push_str(", ");
        line.push_str(place);
    }
    // Sourced events carry a citation marker.
    if event.sourced {
        line.push_str(" *");
    }
    Some(line)
}

/// Name plus vital-event lines for a person box, fitted to the interior.
pub(super) fn person_label(
    person: &Person,
    max_width: f32,
    font_size: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> TextBlock {
    let mut lines = vec![person.display_name()];
    if !person.is_placeholder() {
        if let Some(line) = person.birth.as_ref().and_then(|e| event_line("b.", e)) {
            lines.push(line);
        }
        if let Some(line) = person.death.as_ref().and_then(|e| event_line("d.", e)) {
            lines.push(line);
        }
    }

    let family = theme.font_family.as_str();
    let mut width = 0.0f32;
    let fitted: Vec<String> = lines
        .into_iter()
        .map(|line| {
            let fitted = fit_line(&line, max_width, font_size, family);
            width = width.max(measure_line(&fitted, font_size, family));
            fitted
        })
        .collect();
    let height = fitted.len() as f32 * font_size * config.label_line_height;
    TextBlock {
        lines: fitted,
        width,
        height,
    }
}

/// Text for the label on the link joining a person's two parents.
pub(super) fn marriage_text(event: &EventSummary) -> Option<String> {
    event.date.as_deref().map(|date| format!("m. {date}"))
}
