//! Box tree - the typesetter's output
//!
//! A [`MathBox`] is sized by its ascent, descent and width around a
//! baseline origin. Children are placed at offsets from their parent's
//! origin (y up), and the geometry of every box is computed once when it is
//! built. [`MathBox::positioned`] turns the tree into absolute
//! [`PositionedBox`] nodes for drawing.

use crate::model::{AtomType, SourceRange};
use math_font::{AssembledPart, GlyphId, Orientation, PositionedGlyph};
use serde::{Deserialize, Serialize};
use std::ops::Range;

// =============================================================================
// Geometry Primitives
// =============================================================================

/// A position in 2D space, y pointing up
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    /// Parse `#rrggbb`, `#rgb` or one of a few color names
    pub fn parse(value: &str) -> Option<Color> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            return match hex.len() {
                6 if hex.is_ascii() => Some(Color::rgb(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                3 => {
                    let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                    Some(Color::rgb(digits.next()??, digits.next()??, digits.next()??))
                }
                _ => None,
            };
        }
        let color = match value.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "cyan" => Color::rgb(0, 255, 255),
            "magenta" => Color::rgb(255, 0, 255),
            "yellow" => Color::rgb(255, 255, 0),
            "orange" => Color::rgb(255, 128, 0),
            "purple" => Color::rgb(128, 0, 128),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "brown" => Color::rgb(150, 75, 0),
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A horizontal rule; `from` is the left end of its center line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub from: Point,
    pub length: f32,
    pub thickness: f32,
}

impl Rule {
    pub fn new(from: Point, length: f32, thickness: f32) -> Self {
        Self {
            from,
            length,
            thickness,
        }
    }
}

/// Which script a box was laid out as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptRole {
    Superscript,
    Subscript,
}

// =============================================================================
// Leaf Payloads
// =============================================================================

/// One atom's share of a text run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSegment {
    pub atom_type: AtomType,
    pub source_range: SourceRange,
    /// Byte range into the run text
    pub text_range: Range<usize>,
    pub glyph_range: Range<usize>,
    /// Pen position of the segment, kern before it included
    pub x: f32,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Set for upright text whose words must not be split
    pub is_text: bool,
}

/// Consecutive textual atoms shaped together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub glyphs: Vec<PositionedGlyph>,
    pub font_size: f32,
    pub segments: Vec<RunSegment>,
}

impl TextRun {
    pub fn new(font_size: f32) -> Self {
        Self {
            text: String::new(),
            glyphs: Vec::new(),
            font_size,
            segments: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.x + s.width)
            .fold(0.0, f32::max)
    }

    pub fn ascent(&self) -> f32 {
        self.segments.iter().map(|s| s.ascent).fold(0.0, f32::max)
    }

    pub fn descent(&self) -> f32 {
        self.segments.iter().map(|s| s.descent).fold(0.0, f32::max)
    }

    pub fn source_range(&self) -> SourceRange {
        let mut segments = self.segments.iter().map(|s| s.source_range);
        let first = segments.next().unwrap_or_default();
        segments.fold(first, |acc, r| acc.union(&r))
    }

    /// Copy of the segments in `range`, rebased to start at x = 0
    pub fn slice(&self, range: Range<usize>) -> TextRun {
        let Some(chosen) = self.segments.get(range) else {
            return TextRun::new(self.font_size);
        };
        let (Some(first), Some(last)) = (chosen.first(), chosen.last()) else {
            return TextRun::new(self.font_size);
        };
        let dx = first.x;
        let text_start = first.text_range.start;
        let glyph_start = first.glyph_range.start;
        let glyphs = self
            .glyphs
            .get(glyph_start..last.glyph_range.end)
            .unwrap_or_default()
            .iter()
            .map(|g| PositionedGlyph {
                x: g.x - dx,
                cluster: g.cluster.saturating_sub(text_start),
                ..*g
            })
            .collect();
        let segments = chosen
            .iter()
            .map(|s| RunSegment {
                text_range: s.text_range.start - text_start..s.text_range.end - text_start,
                glyph_range: s.glyph_range.start - glyph_start..s.glyph_range.end - glyph_start,
                x: s.x - dx,
                ..s.clone()
            })
            .collect();
        TextRun {
            text: self
                .text
                .get(text_start..last.text_range.end)
                .unwrap_or_default()
                .to_string(),
            glyphs,
            font_size: self.font_size,
            segments,
        }
    }
}

/// A single glyph moved down by `shift_down`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphBox {
    pub glyph: GlyphId,
    pub font_size: f32,
    pub shift_down: f32,
}

/// A glyph built from tiled parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyBox {
    pub orientation: Orientation,
    /// Offsets run from the bottom (vertical) or left (horizontal) edge
    pub parts: Vec<AssembledPart>,
    pub font_size: f32,
    pub shift_down: f32,
}

impl AssemblyBox {
    /// Baseline origin of each part relative to the box origin
    pub fn part_origins(&self) -> impl Iterator<Item = (GlyphId, Point)> + '_ {
        self.parts.iter().map(move |p| {
            let origin = match self.orientation {
                Orientation::Vertical => Point::new(0.0, p.offset - self.shift_down),
                Orientation::Horizontal => Point::new(p.offset, -self.shift_down),
            };
            (p.glyph, origin)
        })
    }
}

// =============================================================================
// Composite Payloads
// =============================================================================

/// A box placed at an offset from its parent's origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub origin: Point,
    pub node: MathBox,
}

impl Child {
    pub fn new(origin: Point, node: MathBox) -> Self {
        Self { origin, node }
    }

    pub fn at(x: f32, y: f32, node: MathBox) -> Self {
        Self::new(Point::new(x, y), node)
    }

    /// Highest point above the parent baseline
    pub fn top(&self) -> f32 {
        self.origin.y + self.node.ascent
    }

    /// Lowest point, in the parent's y-up coordinates
    pub fn bottom(&self) -> f32 {
        self.origin.y - self.node.descent
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.node.width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionBox {
    pub numerator: Box<Child>,
    pub denominator: Box<Child>,
    /// `None` for rule-less stacks
    pub rule: Option<Rule>,
}

impl FractionBox {
    pub fn numerator_shift_up(&self) -> f32 {
        self.numerator.origin.y
    }

    pub fn denominator_shift_down(&self) -> f32 {
        -self.denominator.origin.y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadicalBox {
    pub sign: Box<Child>,
    pub radicand: Box<Child>,
    pub degree: Option<Box<Child>>,
    pub rule: Rule,
    /// Horizontal shift of the sign and radicand caused by the degree
    pub radical_shift: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccentBox {
    pub accentee: Box<Child>,
    pub accent: Box<Child>,
}

/// An inner box with a rule above or below it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBox {
    pub inner: Box<Child>,
    pub rule: Rule,
    pub over: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsBox {
    pub nucleus: Box<Child>,
    pub upper: Option<Box<Child>>,
    pub lower: Option<Box<Child>>,
}

/// Kind-specific payload of a box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoxKind {
    Run(TextRun),
    Glyph(GlyphBox),
    Assembly(AssemblyBox),
    Container(Vec<Child>),
    Fraction(FractionBox),
    Radical(RadicalBox),
    Accent(AccentBox),
    Line(LineBox),
    Limits(LimitsBox),
    Empty,
}

impl BoxKind {
    /// Child boxes in drawing order
    pub fn children(&self) -> Vec<&Child> {
        match self {
            BoxKind::Container(children) => children.iter().collect(),
            BoxKind::Fraction(f) => vec![&*f.numerator, &*f.denominator],
            BoxKind::Radical(r) => {
                let mut out = vec![&*r.sign, &*r.radicand];
                out.extend(r.degree.as_deref());
                out
            }
            BoxKind::Accent(a) => vec![&*a.accentee, &*a.accent],
            BoxKind::Line(l) => vec![&*l.inner],
            BoxKind::Limits(l) => {
                let mut out = vec![&*l.nucleus];
                out.extend(l.upper.as_deref());
                out.extend(l.lower.as_deref());
                out
            }
            BoxKind::Run(_) | BoxKind::Glyph(_) | BoxKind::Assembly(_) | BoxKind::Empty => {
                Vec::new()
            }
        }
    }

    pub fn rules(&self) -> Vec<Rule> {
        match self {
            BoxKind::Fraction(f) => f.rule.into_iter().collect(),
            BoxKind::Radical(r) => vec![r.rule],
            BoxKind::Line(l) => vec![l.rule],
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Math Box
// =============================================================================

/// A sized node of the box tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathBox {
    ascent: f32,
    descent: f32,
    width: f32,
    source_range: SourceRange,
    has_trailing_script: bool,
    color: Option<Color>,
    atom_type: Option<AtomType>,
    script_role: Option<ScriptRole>,
    kind: BoxKind,
}

impl MathBox {
    /// A box whose size was computed by its builder
    pub fn new(kind: BoxKind, ascent: f32, descent: f32, width: f32) -> Self {
        Self {
            ascent,
            descent,
            width,
            source_range: SourceRange::default(),
            has_trailing_script: false,
            color: None,
            atom_type: None,
            script_role: None,
            kind,
        }
    }

    /// Zero-size placeholder
    pub fn empty() -> Self {
        Self::new(BoxKind::Empty, 0.0, 0.0, 0.0)
    }

    pub fn run(run: TextRun) -> Self {
        let (ascent, descent, width) = (run.ascent(), run.descent(), run.width());
        let source_range = run.source_range();
        Self::new(BoxKind::Run(run), ascent, descent, width).with_source_range(source_range)
    }

    pub fn glyph(glyph: GlyphBox, ascent: f32, descent: f32, width: f32) -> Self {
        Self::new(
            BoxKind::Glyph(glyph),
            ascent - glyph.shift_down,
            descent + glyph.shift_down,
            width,
        )
    }

    pub fn assembly(assembly: AssemblyBox, ascent: f32, descent: f32, width: f32) -> Self {
        let shift = assembly.shift_down;
        Self::new(BoxKind::Assembly(assembly), ascent - shift, descent + shift, width)
    }

    /// Union of the children's bounds, at least `advance` wide
    pub fn container(children: Vec<Child>, advance: f32) -> Self {
        let ascent = children.iter().map(Child::top).fold(0.0, f32::max);
        let descent = children.iter().map(|c| -c.bottom()).fold(0.0, f32::max);
        let width = children.iter().map(Child::right).fold(advance, f32::max);
        let source_range = children
            .iter()
            .map(|c| c.node.source_range)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        Self::new(BoxKind::Container(children), ascent, descent, width)
            .with_source_range(source_range)
    }

    pub fn with_source_range(mut self, source_range: SourceRange) -> Self {
        self.source_range = source_range;
        self
    }

    pub fn with_atom_type(mut self, atom_type: AtomType) -> Self {
        self.atom_type = Some(atom_type);
        self
    }

    pub fn with_script_role(mut self, role: ScriptRole) -> Self {
        self.script_role = Some(role);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_trailing_script(mut self) -> Self {
        self.has_trailing_script = true;
        self
    }

    pub(crate) fn mark_trailing_script(&mut self) {
        self.has_trailing_script = true;
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn source_range(&self) -> SourceRange {
        self.source_range
    }

    pub fn has_trailing_script(&self) -> bool {
        self.has_trailing_script
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn atom_type(&self) -> Option<AtomType> {
        self.atom_type
    }

    pub fn script_role(&self) -> Option<ScriptRole> {
        self.script_role
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn into_kind(self) -> BoxKind {
        self.kind
    }

    pub fn children(&self) -> Vec<&Child> {
        self.kind.children()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, BoxKind::Empty)
            || matches!(&self.kind, BoxKind::Container(c) if c.is_empty())
    }

    /// Place the tree with its baseline origin at `origin`
    pub fn positioned(&self, origin: Point) -> PositionedBox {
        self.place(origin, None)
    }

    fn place(&self, origin: Point, inherited: Option<Color>) -> PositionedBox {
        let color = self.color.or(inherited);
        let ink = match &self.kind {
            BoxKind::Run(run) => Ink::Run(run.clone()),
            BoxKind::Glyph(g) => Ink::Glyphs {
                font_size: g.font_size,
                glyphs: vec![PlacedGlyph {
                    glyph: g.glyph,
                    position: origin.offset(0.0, -g.shift_down),
                }],
            },
            BoxKind::Assembly(a) => Ink::Glyphs {
                font_size: a.font_size,
                glyphs: a
                    .part_origins()
                    .map(|(glyph, p)| PlacedGlyph {
                        glyph,
                        position: origin.offset(p.x, p.y),
                    })
                    .collect(),
            },
            _ => Ink::None,
        };
        let rules = self
            .kind
            .rules()
            .into_iter()
            .map(|r| {
                let from = origin.offset(r.from.x, r.from.y);
                PositionedRule {
                    from,
                    to: from.offset(r.length, 0.0),
                    thickness: r.thickness,
                }
            })
            .collect();
        let children = self
            .children()
            .into_iter()
            .map(|c| c.node.place(origin.offset(c.origin.x, c.origin.y), color))
            .collect();
        PositionedBox {
            origin,
            ascent: self.ascent,
            descent: self.descent,
            width: self.width,
            color,
            source_range: self.source_range,
            atom_type: self.atom_type,
            ink,
            rules,
            children,
        }
    }
}

// =============================================================================
// Positioned Tree
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedGlyph {
    pub glyph: GlyphId,
    pub position: Point,
}

/// What a positioned box draws itself, apart from rules and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ink {
    None,
    /// A shaped run drawn at the box origin
    Run(TextRun),
    Glyphs {
        font_size: f32,
        glyphs: Vec<PlacedGlyph>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionedRule {
    pub from: Point,
    pub to: Point,
    pub thickness: f32,
}

/// A box at an absolute baseline origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedBox {
    pub origin: Point,
    pub ascent: f32,
    pub descent: f32,
    pub width: f32,
    /// Resolved color, `None` for the surface default
    pub color: Option<Color>,
    pub source_range: SourceRange,
    pub atom_type: Option<AtomType>,
    pub ink: Ink,
    pub rules: Vec<PositionedRule>,
    pub children: Vec<PositionedBox>,
}

impl PositionedBox {
    /// Top edge, y up
    pub fn top(&self) -> f32 {
        self.origin.y + self.ascent
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y - self.descent
    }

    /// Visit this box and its descendants depth first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a PositionedBox)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(ascent: f32, descent: f32, width: f32) -> MathBox {
        MathBox::new(BoxKind::Empty, ascent, descent, width)
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::parse("#f00"), Some(Color::RED));
        assert_eq!(Color::parse(" Blue "), Some(Color::BLUE));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("octarine"), None);
    }

    #[test]
    fn test_container_is_union_of_children() {
        let container = MathBox::container(
            vec![
                Child::at(0.0, 0.0, leaf(5.0, 1.0, 4.0)),
                Child::at(6.0, 3.0, leaf(4.0, 1.0, 2.0)),
                Child::at(9.0, -4.0, leaf(2.0, 1.0, 1.0)),
            ],
            0.0,
        );
        assert_eq!(container.ascent(), 7.0);
        assert_eq!(container.descent(), 5.0);
        assert_eq!(container.width(), 10.0);
    }

    #[test]
    fn test_child_edges_are_coordinates() {
        let raised = Child::at(0.0, 3.0, leaf(2.0, 1.0, 1.0));
        assert_eq!(raised.top(), 5.0);
        assert_eq!(raised.bottom(), 2.0);
        let lowered = Child::at(0.0, -4.0, leaf(2.0, 1.0, 1.0));
        assert_eq!(lowered.bottom(), -5.0);
        assert!(raised.bottom() > lowered.top());
    }

    #[test]
    fn test_container_keeps_trailing_advance() {
        let container = MathBox::container(vec![Child::at(0.0, 0.0, leaf(1.0, 0.0, 2.0))], 5.0);
        assert_eq!(container.width(), 5.0);
        assert!(MathBox::container(Vec::new(), 0.0).is_empty());
    }

    #[test]
    fn test_glyph_shift_moves_extent() {
        let glyph = GlyphBox {
            glyph: GlyphId(3),
            font_size: 10.0,
            shift_down: 2.0,
        };
        let b = MathBox::glyph(glyph, 6.0, 1.0, 4.0);
        assert_eq!(b.ascent(), 4.0);
        assert_eq!(b.descent(), 3.0);
    }

    #[test]
    fn test_positioned_offsets_and_inherits_color() {
        let inner = leaf(1.0, 0.0, 1.0);
        let outer = MathBox::container(vec![Child::at(2.0, 3.0, inner)], 0.0).with_color(Color::RED);
        let placed = outer.positioned(Point::new(10.0, 20.0));
        assert_eq!(placed.children[0].origin, Point::new(12.0, 23.0));
        assert_eq!(placed.children[0].color, Some(Color::RED));
    }

    #[test]
    fn test_fraction_rule_is_positioned() {
        let fraction = FractionBox {
            numerator: Box::new(Child::at(0.0, 4.0, leaf(1.0, 0.0, 3.0))),
            denominator: Box::new(Child::at(0.0, -3.0, leaf(1.0, 0.0, 3.0))),
            rule: Some(Rule::new(Point::new(0.0, 2.5), 3.0, 0.4)),
        };
        let b = MathBox::new(BoxKind::Fraction(fraction), 5.0, 3.0, 3.0);
        let placed = b.positioned(Point::new(1.0, 1.0));
        assert_eq!(placed.rules[0].from, Point::new(1.0, 3.5));
        assert_eq!(placed.rules[0].to, Point::new(4.0, 3.5));
        assert_eq!(placed.children.len(), 2);
    }

    #[test]
    fn test_run_slice_rebases() {
        let mut run = TextRun::new(10.0);
        run.text = "ab".to_string();
        for (i, x) in [0.0f32, 6.0].into_iter().enumerate() {
            run.glyphs.push(PositionedGlyph {
                glyph: GlyphId(i as u16 + 1),
                x,
                y: 0.0,
                advance: 5.0,
                cluster: i,
            });
            run.segments.push(RunSegment {
                atom_type: AtomType::Variable,
                source_range: SourceRange::new(i, 1),
                text_range: i..i + 1,
                glyph_range: i..i + 1,
                x,
                width: 5.0,
                ascent: 4.0,
                descent: 0.0,
                is_text: false,
            });
        }
        assert_eq!(run.width(), 11.0);

        let tail = run.slice(1..2);
        assert_eq!(tail.text, "b");
        assert_eq!(tail.glyphs[0].x, 0.0);
        assert_eq!(tail.glyphs[0].cluster, 0);
        assert_eq!(tail.segments[0].text_range, 0..1);
        assert_eq!(tail.width(), 5.0);
        assert_eq!(tail.source_range(), SourceRange::new(1, 1));
    }
}
