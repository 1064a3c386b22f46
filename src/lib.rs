#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod source;
pub mod text_metrics;
pub mod theme;

pub use config::{Config, LayoutConfig, load_config};
pub use ir::{GraphPayload, LayoutError, Pedigree, PersonId};
pub use layout::{ChartKind, Layout, compute_layout};
pub use render::render_svg;
pub use source::{GraphSource, PedigreeSession, WindowState};
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;
