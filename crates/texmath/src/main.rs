//! texmath - Typeset TeX-style math markup from the command line
//!
//! `texmath parse` prints the finalized atom list, `texmath render` prints
//! the laid-out box tree or the draw commands a renderer would issue.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Settings;
use layout_engine::LineBreaker;
use math::{
    parse_with_mode, to_markup, typeset_markup, LineStyle, MathBox, Point, RecordingSurface,
    Renderer,
};
use math_font::{MathFont, OpenTypeFont, SyntheticFont};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "texmath", version, about = "Typeset TeX-style math markup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse markup and print the atom list with its canonical form
    Parse {
        markup: String,
    },
    /// Typeset markup and print the box tree or draw commands
    Render {
        markup: String,
        #[command(flatten)]
        options: RenderOptions,
    },
}

#[derive(Args, Debug)]
struct RenderOptions {
    /// OpenType font with a MATH table; the built-in metrics are used otherwise
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Font size in points
    #[arg(long, default_value_t = 12.0)]
    size: f32,

    /// Break into lines no wider than this many points
    #[arg(long)]
    width: Option<f32>,

    /// Style for markup without `$` or `$$` delimiters
    #[arg(long, value_enum, default_value_t = Style::Display)]
    style: Style,

    /// JSON file with `typesetter` and `line_breaking` sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print draw commands instead of the box tree
    #[arg(long)]
    draw: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Display,
    Text,
    Script,
    ScriptScript,
}

impl From<Style> for LineStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Display => LineStyle::Display,
            Style::Text => LineStyle::Text,
            Style::Script => LineStyle::Script,
            Style::ScriptScript => LineStyle::ScriptScript,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Parse { markup } => parse_command(&markup),
        Command::Render { markup, options } => render_command(&markup, &options),
    }
}

fn parse_command(markup: &str) -> Result<()> {
    let (list, mode) = parse_with_mode(markup).context("Failed to parse markup")?;
    debug!(atoms = list.len(), ?mode, "parsed markup");
    println!("{}", serde_json::to_string_pretty(&list)?);
    println!("{}", to_markup(&list));
    Ok(())
}

fn render_command(markup: &str, options: &RenderOptions) -> Result<()> {
    let settings = match &options.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let data = match &options.font {
        Some(path) => Some(
            fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?,
        ),
        None => None,
    };

    let synthetic;
    let opentype;
    let font: &dyn MathFont = match &data {
        Some(bytes) => {
            let face = OpenTypeFont::from_slice(bytes, 0).context("Failed to load font")?;
            if face.has_math_table() {
                opentype = face;
                &opentype
            } else {
                warn!("Font has no MATH table, using built-in metrics");
                synthetic = SyntheticFont::default();
                &synthetic
            }
        }
        None => {
            synthetic = SyntheticFont::default();
            &synthetic
        }
    };

    let node = typeset_markup(
        markup,
        font,
        options.size,
        options.style.into(),
        settings.typesetter,
    )
    .context("Failed to typeset markup")?;
    info!(
        width = node.width(),
        ascent = node.ascent(),
        descent = node.descent(),
        "typeset markup"
    );

    let node = match options.width {
        Some(width) => LineBreaker::with_config(options.size, settings.line_breaking)
            .break_lines(&node, width)
            .context("Failed to break lines")?,
        None => node,
    };

    println!("{}", output(&node, options.draw)?);
    Ok(())
}

/// JSON for the box tree, or for the draw commands with the first
/// baseline at the origin
fn output(node: &MathBox, draw: bool) -> Result<String> {
    if !draw {
        return Ok(serde_json::to_string_pretty(node)?);
    }
    let mut surface = RecordingSurface::new();
    Renderer::new().render(&node.positioned(Point::origin()), &mut surface);
    Ok(surface.to_json()?)
}
