//! Math Rendering - Hand positioned boxes to a drawing surface
//!
//! The renderer walks a [`PositionedBox`] tree and issues one call per
//! piece of ink. Coordinates are in points, y up, with the root baseline
//! at the origin the tree was positioned at; surfaces that draw y down
//! flip on their side.

use crate::display::{Color, Ink, PlacedGlyph, Point, PositionedBox, TextRun};
use serde::{Deserialize, Serialize};
use tracing::trace;

// =============================================================================
// Surface
// =============================================================================

/// Axis-aligned rectangle; `(x, y)` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds of a positioned box
    pub fn of(node: &PositionedBox) -> Self {
        Self::new(node.origin.x, node.bottom(), node.width, node.ascent + node.descent)
    }
}

/// Something math can be drawn on
pub trait DrawingSurface {
    /// Draw a shaped run whose baseline starts at `origin`
    fn draw_shaped_run(&mut self, run: &TextRun, origin: Point, color: Color);

    /// Draw glyphs at absolute positions
    fn draw_glyphs(&mut self, font_size: f32, glyphs: &[PlacedGlyph], color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, thickness: f32, color: Color);
}

/// A recorded surface call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ShapedRun {
        text: String,
        font_size: f32,
        origin: Point,
        glyphs: Vec<PlacedGlyph>,
        color: Color,
    },
    Glyphs {
        font_size: f32,
        glyphs: Vec<PlacedGlyph>,
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeLine {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
}

/// Surface that keeps every call, for tests and JSON export
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.commands)
    }
}

impl DrawingSurface for RecordingSurface {
    fn draw_shaped_run(&mut self, run: &TextRun, origin: Point, color: Color) {
        // Glyph positions are recorded absolute so exports need no run context
        let glyphs = run
            .glyphs
            .iter()
            .map(|g| PlacedGlyph {
                glyph: g.glyph,
                position: origin.offset(g.x, g.y),
            })
            .collect();
        self.commands.push(DrawCommand::ShapedRun {
            text: run.text.clone(),
            font_size: run.font_size,
            origin,
            glyphs,
            color,
        });
    }

    fn draw_glyphs(&mut self, font_size: f32, glyphs: &[PlacedGlyph], color: Color) {
        self.commands.push(DrawCommand::Glyphs {
            font_size,
            glyphs: glyphs.to_vec(),
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            thickness,
            color,
        });
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Configuration for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Filled behind the root box when set
    pub background: Option<Color>,
    /// Color of boxes without a color group
    pub color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: None,
            color: Color::BLACK,
        }
    }
}

/// Issues surface calls for a positioned box tree
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw `root` and its descendants
    pub fn render<S: DrawingSurface + ?Sized>(&self, root: &PositionedBox, surface: &mut S) {
        if let Some(background) = self.config.background {
            surface.fill_rect(Rect::of(root), background);
        }
        self.render_box(root, surface);
    }

    fn render_box<S: DrawingSurface + ?Sized>(&self, node: &PositionedBox, surface: &mut S) {
        let color = node.color.unwrap_or(self.config.color);
        match &node.ink {
            Ink::None => {}
            Ink::Run(run) => {
                trace!(text = %run.text, x = node.origin.x, y = node.origin.y, "draw run");
                surface.draw_shaped_run(run, node.origin, color);
            }
            Ink::Glyphs { font_size, glyphs } => surface.draw_glyphs(*font_size, glyphs, color),
        }
        for rule in &node.rules {
            surface.stroke_line(rule.from, rule.to, rule.thickness, color);
        }
        for child in &node.children {
            self.render_box(child, surface);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
