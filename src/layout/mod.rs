mod fan;
pub mod sizing;
mod text;
mod tree;
pub(crate) mod types;
pub use types::*;
use fan::*;
use tree::*;

use crate::config::LayoutConfig;
use crate::ir::{LayoutError, Pedigree};
use crate::theme::Theme;

/// Lay out the pedigree as the requested chart kind.
///
/// Pure and synchronous: the same graph and config always produce identical
/// coordinates, and no state survives the call. Sparse data (a window larger
/// than what is loaded) lays out whatever is present; only a missing root or
/// a negative generation count is an error.
pub fn compute_layout(
    pedigree: &Pedigree,
    kind: ChartKind,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    if config.ancestor_generations < 0 {
        return Err(LayoutError::InvalidGenerations(config.ancestor_generations));
    }
    if config.descendant_generations < 0 {
        return Err(LayoutError::InvalidGenerations(config.descendant_generations));
    }
    if !pedigree.persons.contains_key(&pedigree.root) {
        return Err(LayoutError::InvalidRoot(pedigree.root));
    }

    Ok(match kind {
        ChartKind::Tree => compute_tree_layout(pedigree, theme, config),
        ChartKind::Fan => compute_fan_layout(pedigree, theme, config),
    })
}
