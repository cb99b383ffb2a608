//! Text runs and math alphanumeric styling
//!
//! Variables and numbers are drawn from the Unicode Mathematical
//! Alphanumeric Symbols block according to their font style. Consecutive
//! textual atoms are shaped into one [`TextRun`], with inter-atom spacing
//! kept as kerns inside the run.

use crate::display::{MathBox, RunSegment, TextRun};
use crate::model::{Atom, AtomType, FontStyle};
use math_font::{FontMathMetrics, GlyphId, PositionedGlyph};

/// Offset a character by its distance from `base` onto `target`
fn shift(ch: char, base: char, target: u32) -> Option<char> {
    char::from_u32(target + (ch as u32 - base as u32))
}

fn italic(ch: char) -> Option<char> {
    match ch {
        'h' => Some('\u{210E}'),
        'a'..='z' => shift(ch, 'a', 0x1D44E),
        'A'..='Z' => shift(ch, 'A', 0x1D434),
        '\u{03B1}'..='\u{03C9}' => shift(ch, '\u{03B1}', 0x1D6FC),
        '\u{0131}' => Some('\u{1D6A4}'),
        '\u{0237}' => Some('\u{1D6A5}'),
        _ => None,
    }
}

fn bold(ch: char) -> Option<char> {
    match ch {
        'a'..='z' => shift(ch, 'a', 0x1D41A),
        'A'..='Z' => shift(ch, 'A', 0x1D400),
        '0'..='9' => shift(ch, '0', 0x1D7CE),
        '\u{03B1}'..='\u{03C9}' => shift(ch, '\u{03B1}', 0x1D6C2),
        '\u{0391}'..='\u{03A9}' => shift(ch, '\u{0391}', 0x1D6A8),
        _ => None,
    }
}

fn bold_italic(ch: char) -> Option<char> {
    match ch {
        'a'..='z' => shift(ch, 'a', 0x1D482),
        'A'..='Z' => shift(ch, 'A', 0x1D468),
        '0'..='9' => shift(ch, '0', 0x1D7CE),
        '\u{03B1}'..='\u{03C9}' => shift(ch, '\u{03B1}', 0x1D736),
        '\u{0391}'..='\u{03A9}' => shift(ch, '\u{0391}', 0x1D71C),
        _ => None,
    }
}

fn caligraphic(ch: char) -> Option<char> {
    match ch {
        'B' => Some('\u{212C}'),
        'E' => Some('\u{2130}'),
        'F' => Some('\u{2131}'),
        'H' => Some('\u{210B}'),
        'I' => Some('\u{2110}'),
        'L' => Some('\u{2112}'),
        'M' => Some('\u{2133}'),
        'R' => Some('\u{211B}'),
        'e' => Some('\u{212F}'),
        'g' => Some('\u{210A}'),
        'o' => Some('\u{2134}'),
        'a'..='z' => shift(ch, 'a', 0x1D4B6),
        'A'..='Z' => shift(ch, 'A', 0x1D49C),
        _ => None,
    }
}

fn fraktur(ch: char) -> Option<char> {
    match ch {
        'C' => Some('\u{212D}'),
        'H' => Some('\u{210C}'),
        'I' => Some('\u{2111}'),
        'R' => Some('\u{211C}'),
        'Z' => Some('\u{2128}'),
        'a'..='z' => shift(ch, 'a', 0x1D51E),
        'A'..='Z' => shift(ch, 'A', 0x1D504),
        _ => None,
    }
}

fn blackboard(ch: char) -> Option<char> {
    match ch {
        'C' => Some('\u{2102}'),
        'H' => Some('\u{210D}'),
        'N' => Some('\u{2115}'),
        'P' => Some('\u{2119}'),
        'Q' => Some('\u{211A}'),
        'R' => Some('\u{211D}'),
        'Z' => Some('\u{2124}'),
        'a'..='z' => shift(ch, 'a', 0x1D552),
        'A'..='Z' => shift(ch, 'A', 0x1D538),
        '0'..='9' => shift(ch, '0', 0x1D7D8),
        _ => None,
    }
}

fn sans_serif(ch: char) -> Option<char> {
    match ch {
        'a'..='z' => shift(ch, 'a', 0x1D5BA),
        'A'..='Z' => shift(ch, 'A', 0x1D5A0),
        '0'..='9' => shift(ch, '0', 0x1D7E2),
        _ => None,
    }
}

fn typewriter(ch: char) -> Option<char> {
    match ch {
        'a'..='z' => shift(ch, 'a', 0x1D68A),
        'A'..='Z' => shift(ch, 'A', 0x1D670),
        '0'..='9' => shift(ch, '0', 0x1D7F6),
        _ => None,
    }
}

/// The character drawn for `ch` under `style`
pub(crate) fn styled_char(ch: char, style: FontStyle) -> char {
    let styled = match style {
        FontStyle::Default | FontStyle::Italic => italic(ch),
        FontStyle::Roman => None,
        FontStyle::Bold => bold(ch),
        FontStyle::BoldItalic => bold_italic(ch),
        FontStyle::Caligraphic => caligraphic(ch),
        FontStyle::Fraktur => fraktur(ch),
        FontStyle::Blackboard => blackboard(ch),
        FontStyle::SansSerif => sans_serif(ch),
        FontStyle::Typewriter => typewriter(ch),
    };
    styled.unwrap_or(ch)
}

/// Text of an atom's nucleus as it is drawn
pub(crate) fn styled_text(atom: &Atom) -> String {
    match atom.atom_type() {
        AtomType::Variable | AtomType::Number => atom
            .nucleus
            .chars()
            .map(|c| styled_char(c, atom.font_style))
            .collect(),
        _ => atom.nucleus.clone(),
    }
}

/// Upright text from `\text` or `\mathrm`, which breaks only between words
fn is_text(atom: &Atom) -> bool {
    atom.font_style == FontStyle::Roman && atom.atom_type().is_textual()
}

/// A text run being filled left to right
pub(crate) struct RunBuilder {
    run: TextRun,
    font_style: FontStyle,
    /// Left edge of the run in the enclosing list
    origin: f32,
    pen: f32,
}

impl RunBuilder {
    pub(crate) fn new(origin: f32, font_size: f32, font_style: FontStyle) -> Self {
        Self {
            run: TextRun::new(font_size),
            font_style,
            origin,
            pen: 0.0,
        }
    }

    pub(crate) fn font_style(&self) -> FontStyle {
        self.font_style
    }

    pub(crate) fn origin(&self) -> f32 {
        self.origin
    }

    /// Pen position after the last segment, ignoring ink overhang
    pub(crate) fn advance(&self) -> f32 {
        self.pen
    }

    /// Append `atom` after a kern of `kern` points
    pub(crate) fn push(&mut self, metrics: &FontMathMetrics<'_>, atom: &Atom, kern: f32) {
        self.push_text(metrics, atom, &styled_text(atom), kern);
    }

    /// Append `text` drawn on behalf of `atom`
    pub(crate) fn push_text(&mut self, metrics: &FontMathMetrics<'_>, atom: &Atom, text: &str, kern: f32) {
        let shaped = metrics.shape(text);
        let x = self.pen + kern;
        let text_start = self.run.text.len();
        let glyph_start = self.run.glyphs.len();
        self.run
            .glyphs
            .extend(shaped.glyphs.iter().map(|g| PositionedGlyph {
                x: g.x + x,
                cluster: g.cluster + text_start,
                ..*g
            }));
        self.run.text.push_str(text);
        self.run.segments.push(RunSegment {
            atom_type: atom.atom_type(),
            source_range: atom.source_range,
            text_range: text_start..self.run.text.len(),
            glyph_range: glyph_start..self.run.glyphs.len(),
            x,
            width: shaped.width(),
            ascent: shaped.ascent,
            descent: shaped.descent,
            is_text: is_text(atom),
        });
        self.pen = x + shaped.advance;
    }

    pub(crate) fn last_glyph(&self) -> Option<GlyphId> {
        self.run.glyphs.last().map(|g| g.glyph)
    }

    pub(crate) fn finish(self) -> MathBox {
        MathBox::run(self.run)
    }
}
