//! Typesetter - atom lists to box trees
//!
//! The [`Typesetter`] walks a finalized [`MathList`] under a current
//! [`LayoutStyle`] and produces a [`MathBox`] tree. Each list is laid out
//! left to right by a `ListLayout`, which groups textual atoms into runs,
//! inserts inter-atom spacing and attaches scripts. Structural atoms are
//! handled in the sibling modules:
//!
//! - `scripts`: superscript and subscript placement
//! - `fraction`: fractions, stacks and `\binom`-style delimiters
//! - `radical`: radical signs with an optional degree
//! - `accent`: fixed and stretched accents
//! - `lines`: overlines and underlines
//! - `large_op`: large operators and their limits
//! - `delimiters`: stretchy glyphs and `\left ... \right` groups
//! - `table`: matrices and aligned environments
//!
//! Layout never fails. Degenerate input produces zero-size boxes.

mod accent;
mod config;
mod delimiters;
mod fraction;
mod large_op;
mod lines;
mod radical;
mod scripts;
mod spacing;
mod table;
mod text;

pub use config::TypesetterConfig;

use crate::display::{Child, Color, MathBox};
use crate::model::{Atom, AtomKind, LineStyle, MathList};
use crate::style::LayoutStyle;
use math_font::FontMathMetrics;
use spacing::{inter_atom_space, SpacingClass};
use text::RunBuilder;
use tracing::{debug, trace, warn};

/// Lays out atom lists with one font at one base size
#[derive(Debug, Clone, Copy)]
pub struct Typesetter<'f> {
    metrics: FontMathMetrics<'f>,
    config: TypesetterConfig,
}

impl<'f> Typesetter<'f> {
    pub fn new(metrics: FontMathMetrics<'f>) -> Self {
        Self::with_config(metrics, TypesetterConfig::default())
    }

    pub fn with_config(metrics: FontMathMetrics<'f>, config: TypesetterConfig) -> Self {
        Self { metrics, config }
    }

    pub fn metrics(&self) -> &FontMathMetrics<'f> {
        &self.metrics
    }

    pub fn config(&self) -> &TypesetterConfig {
        &self.config
    }

    /// Lay out `list` starting in `style`, uncramped.
    ///
    /// The result is a container whose top-level children carry their
    /// atom type and script role.
    pub fn typeset(&self, list: &MathList, style: LineStyle) -> MathBox {
        let node = self.layout_list(list, LayoutStyle::new(style, false), false);
        debug!(
            atoms = list.len(),
            width = node.width(),
            ascent = node.ascent(),
            descent = node.descent(),
            "typeset math list"
        );
        node
    }

    /// Metrics scaled to the font size of `style`
    pub(crate) fn metrics_for(&self, style: LayoutStyle) -> FontMathMetrics<'f> {
        self.metrics
            .with_size(style.font_size(&self.metrics, self.metrics.font_size()))
    }

    pub(crate) fn layout_list(&self, list: &MathList, style: LayoutStyle, spaced: bool) -> MathBox {
        ListLayout::new(self, style, spaced, None).layout(list)
    }
}

/// Left-to-right layout state for one list
pub(crate) struct ListLayout<'t, 'f> {
    ts: &'t Typesetter<'f>,
    style: LayoutStyle,
    metrics: FontMathMetrics<'f>,
    /// Set for the content of `\left ... \right`
    spaced: bool,
    /// Height `\middle` delimiters are stretched to
    middle_height: Option<f32>,
    children: Vec<Child>,
    x: f32,
    run: Option<RunBuilder>,
    prev: Option<SpacingClass>,
}

impl<'t, 'f> ListLayout<'t, 'f> {
    pub(crate) fn new(
        ts: &'t Typesetter<'f>,
        style: LayoutStyle,
        spaced: bool,
        middle_height: Option<f32>,
    ) -> Self {
        Self {
            ts,
            style,
            metrics: ts.metrics_for(style),
            spaced,
            middle_height,
            children: Vec::new(),
            x: 0.0,
            run: None,
            prev: None,
        }
    }

    pub(crate) fn layout(mut self, list: &MathList) -> MathBox {
        for atom in list {
            self.add_atom(atom);
        }
        self.flush_run();
        if self.spaced {
            if let Some(prev) = self.prev {
                self.x += self.space_between(prev, SpacingClass::Close);
            }
        }
        MathBox::container(self.children, self.x)
    }

    fn set_style(&mut self, style: LayoutStyle) {
        self.style = style;
        self.metrics = self.ts.metrics_for(style);
    }

    fn space_between(&self, left: SpacingClass, right: SpacingClass) -> f32 {
        inter_atom_space(left, right, self.style) * self.metrics.mu()
    }

    /// Space owed before an atom of `class`
    fn space_before(&self, class: SpacingClass) -> f32 {
        match self.prev {
            Some(prev) => self.space_between(prev, class),
            None if self.spaced => self.space_between(SpacingClass::Open, class),
            None => 0.0,
        }
    }

    fn push(&mut self, node: MathBox) {
        let width = node.width();
        self.children.push(Child::at(self.x, 0.0, node));
        self.x += width;
    }

    fn flush_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.x = run.origin();
            self.push(run.finish());
        }
    }

    fn add_atom(&mut self, atom: &Atom) {
        trace!(kind = ?atom.atom_type(), nucleus = %atom.nucleus, "layout atom");
        match &atom.kind {
            AtomKind::Space(mu) => {
                self.flush_run();
                self.x += mu * self.metrics.mu();
                return;
            }
            AtomKind::Style(style) => {
                self.flush_run();
                self.set_style(self.style.with_style(*style));
                return;
            }
            _ => {}
        }
        let Some(class) = SpacingClass::of(atom.atom_type()) else {
            return;
        };
        let space = self.space_before(class);
        self.prev = Some(class);

        if atom.atom_type().is_textual() {
            self.add_textual(atom, space);
            return;
        }

        self.flush_run();
        self.x += space;
        let mut delta = 0.0;
        let mut scripts_done = false;
        let node = match &atom.kind {
            AtomKind::Fraction(fraction) => self.make_fraction(fraction),
            AtomKind::Radical(radical) => self.make_radical(radical),
            AtomKind::Accent(accent) => {
                let (node, moved) = self.make_accent(atom, accent);
                scripts_done = moved;
                node
            }
            AtomKind::Inner(inner) => self.make_inner(inner),
            AtomKind::Overline(list) => self.make_overline(list),
            AtomKind::Underline(list) => self.make_underline(list),
            AtomKind::LargeOperator { limits } => {
                let op = self.make_large_op(atom, *limits);
                delta = op.delta;
                scripts_done = op.limits;
                op.node
            }
            AtomKind::Table(table) => self.make_table(table),
            AtomKind::Color(group) => {
                let node = self.ts.layout_list(&group.list, self.style, false);
                match Color::parse(&group.color) {
                    Some(color) => node.with_color(color),
                    None => {
                        warn!(color = %group.color, "unknown color, drawing with the default");
                        node
                    }
                }
            }
            AtomKind::Boundary => self.make_middle(&atom.nucleus),
            _ => MathBox::empty(),
        };
        let node = node
            .with_atom_type(atom.atom_type())
            .with_source_range(atom.source_range);
        self.push(node);
        if atom.has_scripts() && !scripts_done {
            self.make_scripts(atom, delta, false);
        }
    }

    fn add_textual(&mut self, atom: &Atom, space: f32) {
        if self
            .run
            .as_ref()
            .is_some_and(|run| run.font_style() != atom.font_style)
        {
            self.flush_run();
        }
        let metrics = self.metrics;
        match self.run.as_mut() {
            Some(run) => run.push(&metrics, atom, space),
            None => {
                self.x += space;
                let mut run = RunBuilder::new(self.x, metrics.font_size(), atom.font_style);
                run.push(&metrics, atom, 0.0);
                self.run = Some(run);
            }
        }

        if atom.has_scripts() {
            if let Some(run) = self.run.take() {
                let delta = run
                    .last_glyph()
                    .map_or(0.0, |g| metrics.italic_correction(g));
                let end = run.origin() + run.advance();
                self.x = run.origin();
                self.push(run.finish());
                self.x = end;
                self.make_scripts(atom, delta, true);
            }
        }
    }
}
