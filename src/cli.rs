use crate::config::load_config;
use crate::ir::GraphPayload;
use crate::layout::{ChartKind, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::source::{GraphSource, PedigreeSession, StaticSource, WindowState};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdgr", version, about = "Pedigree and fan chart renderer in Rust")]
pub struct Args {
    /// Person graph JSON file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Root person id (the decujus)
    #[arg(short = 'r', long = "root")]
    pub root: i64,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Chart kind
    #[arg(long = "chart", value_enum, default_value = "tree")]
    pub chart: Chart,

    /// Config JSON file (theme and layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Ancestor generations (tree view)
    #[arg(short = 'a', long = "ancestors")]
    pub ancestors: Option<i32>,

    /// Descendant generations (tree view)
    #[arg(short = 'd', long = "descendants")]
    pub descendants: Option<i32>,

    /// Fan ring count; negative draws a descendant fan
    #[arg(long = "fanGenerations")]
    pub fan_generations: Option<i32>,

    /// Fan diameter in pixels
    #[arg(long = "diameter")]
    pub diameter: Option<f32>,

    /// Also write the layout descriptors as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Chart {
    Tree,
    Fan,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(v) = args.ancestors {
        config.layout.ancestor_generations = v;
    }
    if let Some(v) = args.descendants {
        config.layout.descendant_generations = v;
    }
    if let Some(v) = args.fan_generations {
        config.layout.fan.generations = v;
    }
    if let Some(v) = args.diameter {
        config.layout.fan.diameter = v;
    }

    let payload = read_payload(args.input.as_deref())?;
    let kind = match args.chart {
        Chart::Tree => ChartKind::Tree,
        Chart::Fan => ChartKind::Fan,
    };
    let (ancestors, descendants) = match kind {
        ChartKind::Tree => (
            config.layout.ancestor_generations.max(0) as u32,
            config.layout.descendant_generations.max(0) as u32,
        ),
        ChartKind::Fan => (
            config.layout.fan.generations.max(0) as u32,
            (-config.layout.fan.generations).max(0) as u32,
        ),
    };

    let source = StaticSource::new(payload);
    let mut session = PedigreeSession::new(args.root);
    if let WindowState::Pending(request) = session.ensure_window(ancestors, descendants) {
        let fetched = source.fetch(request.root, request.ancestors, request.descendants)?;
        session.apply_fetch(request, &fetched)?;
    }

    let layout = compute_layout(session.pedigree(), kind, &config.theme, &config.layout)?;
    if let Some(dump_path) = args.dump_layout.as_deref() {
        write_layout_dump(dump_path, &layout)?;
    }

    let svg = render_svg(&layout, &config.theme, &config.layout);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = args
                .output
                .clone()
                .ok_or_else(|| anyhow::anyhow!("PNG output requires --output"))?;
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn read_payload(path: Option<&Path>) -> Result<GraphPayload> {
    let contents = match path {
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let payload: GraphPayload = serde_json::from_str(&contents)?;
    Ok(payload)
}
