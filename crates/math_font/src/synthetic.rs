//! In-memory metric bundle
//!
//! [`SyntheticFont`] implements [`MathFont`] from plain data: a glyph table,
//! a character map, MATH constants and glyph constructions. It can be built
//! in code, deserialized with serde, or taken from the Latin-Modern-like
//! preset returned by [`SyntheticFont::default`]. Characters it cannot map
//! shape to `.notdef` with an estimated advance.

use crate::{
    estimate_char_width, FontGlyph, GlyphAssembly, GlyphBounds, GlyphConstruction, GlyphId,
    GlyphPart, GlyphVariant, MathConstants, MathFont, Orientation,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metrics of one glyph, in design units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticGlyph {
    pub advance: u16,
    /// `None` for blank glyphs
    pub bounds: Option<GlyphBounds>,
    #[serde(default)]
    pub italic_correction: i16,
    #[serde(default)]
    pub top_accent: Option<i16>,
}

impl SyntheticGlyph {
    pub fn new(advance: u16, bounds: GlyphBounds) -> Self {
        Self {
            advance,
            bounds: Some(bounds),
            italic_correction: 0,
            top_accent: None,
        }
    }

    pub fn blank(advance: u16) -> Self {
        Self {
            advance,
            bounds: None,
            italic_correction: 0,
            top_accent: None,
        }
    }

    pub fn with_italic_correction(mut self, italic_correction: i16) -> Self {
        self.italic_correction = italic_correction;
        self
    }

    pub fn with_top_accent(mut self, top_accent: i16) -> Self {
        self.top_accent = Some(top_accent);
        self
    }
}

/// A construction attached to one base glyph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionEntry {
    pub base: GlyphId,
    pub orientation: Orientation,
    pub construction: GlyphConstruction,
}

/// A font described entirely by data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticFont {
    pub units_per_em: u16,
    /// `None` models a font without a MATH table
    pub constants: Option<MathConstants>,
    #[serde(default)]
    pub min_connector_overlap: u16,
    /// Indexed by glyph id; entry 0 is `.notdef`
    pub glyphs: Vec<SyntheticGlyph>,
    pub cmap: BTreeMap<char, GlyphId>,
    #[serde(default)]
    pub constructions: Vec<ConstructionEntry>,
}

impl SyntheticFont {
    /// An empty font holding only `.notdef`
    pub fn new(units_per_em: u16) -> Self {
        let em = units_per_em as i32;
        let notdef = SyntheticGlyph::new(
            (em / 2) as u16,
            GlyphBounds::new(0, 0, (em / 2) as i16, (em * 7 / 10) as i16),
        );
        Self {
            units_per_em,
            constants: Some(MathConstants::default()),
            min_connector_overlap: (em / 50) as u16,
            glyphs: vec![notdef],
            cmap: BTreeMap::new(),
            constructions: Vec::new(),
        }
    }

    pub fn with_constants(mut self, constants: MathConstants) -> Self {
        self.constants = Some(constants);
        self
    }

    /// Drop the MATH table
    pub fn without_math_table(mut self) -> Self {
        self.constants = None;
        self
    }

    /// Add an unmapped glyph, such as a size variant
    pub fn add_glyph(&mut self, glyph: SyntheticGlyph) -> GlyphId {
        self.glyphs.push(glyph);
        GlyphId((self.glyphs.len() - 1) as u16)
    }

    /// Add a glyph and map `ch` to it
    pub fn add_char(&mut self, ch: char, glyph: SyntheticGlyph) -> GlyphId {
        let id = self.add_glyph(glyph);
        self.cmap.insert(ch, id);
        id
    }

    pub fn add_construction(
        &mut self,
        base: GlyphId,
        orientation: Orientation,
        construction: GlyphConstruction,
    ) {
        self.constructions.retain(|e| !(e.base == base && e.orientation == orientation));
        self.constructions.push(ConstructionEntry {
            base,
            orientation,
            construction,
        });
    }

    fn entry(&self, glyph: GlyphId) -> Option<&SyntheticGlyph> {
        self.glyphs.get(glyph.0 as usize)
    }
}

impl MathFont for SyntheticFont {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        self.cmap.get(&ch).copied()
    }

    fn glyph_advance(&self, glyph: GlyphId) -> Option<u16> {
        self.entry(glyph).map(|g| g.advance)
    }

    fn glyph_bounds(&self, glyph: GlyphId) -> Option<GlyphBounds> {
        self.entry(glyph).and_then(|g| g.bounds)
    }

    fn math_constants(&self) -> Option<MathConstants> {
        self.constants
    }

    fn italic_correction(&self, glyph: GlyphId) -> Option<i16> {
        self.entry(glyph)
            .map(|g| g.italic_correction)
            .filter(|&v| v != 0)
    }

    fn top_accent_attachment(&self, glyph: GlyphId) -> Option<i16> {
        self.entry(glyph).and_then(|g| g.top_accent)
    }

    fn min_connector_overlap(&self) -> u16 {
        self.min_connector_overlap
    }

    fn construction(&self, glyph: GlyphId, orientation: Orientation) -> Option<GlyphConstruction> {
        self.constructions
            .iter()
            .find(|e| e.base == glyph && e.orientation == orientation)
            .map(|e| e.construction.clone())
    }

    fn shape(&self, text: &str) -> Vec<FontGlyph> {
        text.char_indices()
            .map(|(offset, ch)| match self.glyph_index(ch) {
                Some(glyph) => {
                    let entry = self.entry(glyph);
                    FontGlyph {
                        glyph,
                        x_advance: entry.map(|g| g.advance as i32).unwrap_or(0),
                        x_offset: 0,
                        y_offset: 0,
                        cluster: offset as u32,
                        bounds: entry.and_then(|g| g.bounds),
                    }
                }
                None => {
                    let advance = estimate_char_width(ch, self.units_per_em);
                    let height = self.units_per_em as i32 * 7 / 10;
                    let bounds = (!ch.is_whitespace() && advance > 0)
                        .then(|| GlyphBounds::new(0, 0, advance as i16, height as i16));
                    FontGlyph {
                        glyph: GlyphId::NOTDEF,
                        x_advance: advance,
                        x_offset: 0,
                        y_offset: 0,
                        cluster: offset as u32,
                        bounds,
                    }
                }
            })
            .collect()
    }
}

// =============================================================================
// Latin-Modern-like preset
// =============================================================================

const ASCENDERS: &str = "bdfhklt";
const DESCENDERS: &str = "gjpqy";

fn letter_metrics(ch: char) -> SyntheticGlyph {
    let advance: u16 = match ch {
        'm' | 'w' => 833,
        'i' | 'j' | 'l' => 278,
        'f' | 't' | 'r' => 389,
        'A'..='Z' => 750,
        _ => 500,
    };
    let y_max = if ch.is_ascii_uppercase() {
        683
    } else if ASCENDERS.contains(ch) {
        694
    } else if ch == 'i' || ch == 'j' {
        668
    } else {
        431
    };
    let y_min = if DESCENDERS.contains(ch) { -205 } else { 0 };
    SyntheticGlyph::new(advance, GlyphBounds::new(28, y_min, advance as i16 - 28, y_max))
}

/// Italic shape: ink leans right and may overhang the advance
fn italic_metrics(ch: char) -> SyntheticGlyph {
    let upright = letter_metrics(ch);
    let bounds = upright.bounds.unwrap_or_default();
    let overhang: i16 = match ch {
        'f' => 110,
        'j' | 'y' | 'V' | 'W' | 'Y' | 'T' | 'P' | 'F' => 60,
        _ => 20,
    };
    SyntheticGlyph::new(
        upright.advance,
        GlyphBounds::new(bounds.x_min + 20, bounds.y_min, bounds.x_max + overhang, bounds.y_max),
    )
    .with_italic_correction(overhang)
    .with_top_accent(upright.advance as i16 / 2 + 60)
}

fn math_italic(ch: char) -> Option<char> {
    match ch {
        'h' => Some('\u{210E}'),
        'a'..='z' => char::from_u32(0x1D44E + (ch as u32 - 'a' as u32)),
        'A'..='Z' => char::from_u32(0x1D434 + (ch as u32 - 'A' as u32)),
        _ => None,
    }
}

fn math_bold(ch: char) -> Option<char> {
    match ch {
        'a'..='z' => char::from_u32(0x1D41A + (ch as u32 - 'a' as u32)),
        'A'..='Z' => char::from_u32(0x1D400 + (ch as u32 - 'A' as u32)),
        '0'..='9' => char::from_u32(0x1D7CE + (ch as u32 - '0' as u32)),
        _ => None,
    }
}

/// Symbols sized like a binary operator or relation
const OPERATOR_CHARS: &str = "+=<>*\u{2212}\u{00D7}\u{00F7}\u{00B1}\u{2213}\u{22C5}\u{2217}\u{2218}\u{2219}\
\u{2264}\u{2265}\u{2260}\u{2261}\u{2248}\u{223C}\u{2243}\u{2245}\u{221D}\u{2208}\u{2209}\u{220B}\
\u{2282}\u{2283}\u{2286}\u{2287}\u{222A}\u{2229}\u{2227}\u{2228}\u{2192}\u{2190}\u{21D2}\u{21D0}\
\u{2194}\u{21D4}\u{21A6}\u{27F9}\u{27F8}\u{27FA}\u{2295}\u{2296}\u{2297}\u{2298}\u{2299}\u{2223}\
\u{2225}\u{22A5}\u{226A}\u{226B}\u{227A}\u{227B}\u{22A2}\u{22A3}\u{22A8}\u{2216}\u{22C6}\u{2236}\
\u{2250}\u{224D}\u{2191}\u{2193}";

/// Ordinary symbols with letter-like metrics
const ORDINARY_CHARS: &str = "\u{221E}\u{2202}\u{2207}\u{2200}\u{2203}\u{00AC}\u{2205}\u{210F}\
\u{2113}\u{211C}\u{2111}\u{2135}\u{2032}\u{2220}\u{25B3}\u{2026}\u{22EF}\u{22EE}\u{22F1}\u{2118}\
\u{0131}\u{0237}\u{1D6A4}\u{1D6A5}\u{00B0}\u{2020}\u{2021}\u{22C4}\u{25A1}\u{2662}\u{2661}\u{2663}\u{2660}";

/// Delimiters that receive a size ladder and, where marked, an assembly
const DELIMITERS: &[(char, bool)] = &[
    ('(', true),
    (')', true),
    ('[', true),
    (']', true),
    ('{', true),
    ('}', true),
    ('|', true),
    ('\u{2016}', true),
    ('\u{2308}', true),
    ('\u{2309}', true),
    ('\u{230A}', true),
    ('\u{230B}', true),
    ('\u{27E8}', false),
    ('\u{27E9}', false),
    ('/', false),
    ('\\', false),
    ('\u{27EE}', true),
    ('\u{27EF}', true),
];

/// Heights of the delimiter size ladder, base glyph first
const DELIMITER_HEIGHTS: [i16; 6] = [1000, 1200, 1500, 1950, 2550, 3300];

/// Accents: combining mark, wide ladder, assembly
const ACCENTS: &[(char, bool, bool)] = &[
    ('\u{0300}', false, false),
    ('\u{0301}', false, false),
    ('\u{0302}', true, false),
    ('\u{0303}', true, false),
    ('\u{0304}', true, true),
    ('\u{0306}', false, false),
    ('\u{0307}', false, false),
    ('\u{0308}', false, false),
    ('\u{030A}', false, false),
    ('\u{030C}', true, false),
    ('\u{20D6}', true, true),
    ('\u{20D7}', true, true),
    ('\u{20E1}', true, true),
];

/// Widths of the wide accent ladder, base glyph first
const ACCENT_WIDTHS: [i16; 6] = [500, 700, 1000, 1400, 1950, 2700];

/// Large operators: character, text advance, display height, italic correction
const LARGE_OPERATORS: &[(char, u16, i16, i16)] = &[
    ('\u{2211}', 1056, 1400, 0),
    ('\u{220F}', 944, 1400, 0),
    ('\u{2210}', 944, 1400, 0),
    ('\u{222B}', 556, 2200, 200),
    ('\u{222C}', 900, 2200, 200),
    ('\u{222D}', 1250, 2200, 200),
    ('\u{222E}', 556, 2200, 200),
    ('\u{22C3}', 833, 1400, 0),
    ('\u{22C2}', 833, 1400, 0),
    ('\u{22C1}', 833, 1400, 0),
    ('\u{22C0}', 833, 1400, 0),
    ('\u{2A01}', 1111, 1400, 0),
    ('\u{2A02}', 1111, 1400, 0),
    ('\u{2A00}', 1111, 1400, 0),
    ('\u{2A04}', 833, 1400, 0),
    ('\u{2A06}', 833, 1400, 0),
];

impl SyntheticFont {
    fn add_centered(&mut self, advance: u16, height: i16, axis: i16) -> GlyphId {
        self.add_glyph(SyntheticGlyph::new(
            advance,
            GlyphBounds::new(40, axis - height / 2, advance as i16 - 40, axis + height / 2),
        ))
    }

    fn add_delimiter(&mut self, ch: char, with_assembly: bool, axis: i16) {
        let base_advance: u16 = 389;
        let base = self.add_char(
            ch,
            SyntheticGlyph::new(
                base_advance,
                GlyphBounds::new(40, axis - 500, base_advance as i16 - 40, axis + 500),
            ),
        );
        let mut variants = vec![GlyphVariant {
            glyph: base,
            advance: DELIMITER_HEIGHTS[0] as u16,
        }];
        for (i, &height) in DELIMITER_HEIGHTS.iter().enumerate().skip(1) {
            let glyph = self.add_centered(base_advance + 70 * i as u16, height, axis);
            variants.push(GlyphVariant {
                glyph,
                advance: height as u16,
            });
        }
        let assembly = with_assembly.then(|| {
            let bottom = self.add_glyph(SyntheticGlyph::new(
                875,
                GlyphBounds::new(40, 0, 835, 900),
            ));
            let bottom = GlyphPart {
                glyph: bottom,
                start_connector: 0,
                end_connector: 300,
                full_advance: 900,
                extender: false,
            };
            let extender = self.add_glyph(SyntheticGlyph::new(875, GlyphBounds::new(40, 0, 835, 600)));
            let extender = GlyphPart {
                glyph: extender,
                start_connector: 300,
                end_connector: 300,
                full_advance: 600,
                extender: true,
            };
            let top = self.add_glyph(SyntheticGlyph::new(875, GlyphBounds::new(40, 0, 835, 900)));
            let top = GlyphPart {
                glyph: top,
                start_connector: 300,
                end_connector: 0,
                full_advance: 900,
                extender: false,
            };
            let mut parts = vec![bottom, extender];
            if ch == '{' || ch == '}' {
                let middle =
                    self.add_glyph(SyntheticGlyph::new(875, GlyphBounds::new(40, 0, 835, 900)));
                parts.push(GlyphPart {
                    glyph: middle,
                    start_connector: 300,
                    end_connector: 300,
                    full_advance: 900,
                    extender: false,
                });
                parts.push(extender);
            }
            parts.push(top);
            GlyphAssembly {
                italics_correction: 0,
                parts,
            }
        });
        self.add_construction(
            base,
            Orientation::Vertical,
            GlyphConstruction { variants, assembly },
        );
    }

    fn add_radical(&mut self) {
        let base = self.add_char(
            '\u{221A}',
            SyntheticGlyph::new(833, GlyphBounds::new(60, -560, 833, 460)),
        );
        let mut variants = vec![GlyphVariant {
            glyph: base,
            advance: 1020,
        }];
        for (i, &height) in [1200i16, 1500, 1950, 2550, 3300].iter().enumerate() {
            let advance = 833 + 90 * (i as u16 + 1);
            let glyph = self.add_glyph(SyntheticGlyph::new(
                advance,
                GlyphBounds::new(60, 40 - height, advance as i16, 40),
            ));
            variants.push(GlyphVariant {
                glyph,
                advance: height as u16,
            });
        }
        let hook = self.add_glyph(SyntheticGlyph::new(1056, GlyphBounds::new(60, 0, 1056, 1000)));
        let extender = self.add_glyph(SyntheticGlyph::new(1056, GlyphBounds::new(736, 0, 776, 600)));
        let top = self.add_glyph(SyntheticGlyph::new(1056, GlyphBounds::new(736, 0, 1056, 640)));
        let assembly = GlyphAssembly {
            italics_correction: 0,
            parts: vec![
                GlyphPart {
                    glyph: hook,
                    start_connector: 0,
                    end_connector: 300,
                    full_advance: 1000,
                    extender: false,
                },
                GlyphPart {
                    glyph: extender,
                    start_connector: 300,
                    end_connector: 300,
                    full_advance: 600,
                    extender: true,
                },
                GlyphPart {
                    glyph: top,
                    start_connector: 300,
                    end_connector: 0,
                    full_advance: 640,
                    extender: false,
                },
            ],
        };
        self.add_construction(
            base,
            Orientation::Vertical,
            GlyphConstruction {
                variants,
                assembly: Some(assembly),
            },
        );
    }

    fn add_large_operator(&mut self, ch: char, advance: u16, display_height: i16, italic: i16, axis: i16) {
        let base = self.add_char(
            ch,
            SyntheticGlyph::new(advance, GlyphBounds::new(56, axis - 500, advance as i16 - 56, axis + 500))
                .with_italic_correction(italic / 2),
        );
        let display_advance = advance + advance / 3;
        let display = self.add_glyph(
            SyntheticGlyph::new(
                display_advance,
                GlyphBounds::new(
                    56,
                    axis - display_height / 2,
                    display_advance as i16 - 56,
                    axis + display_height / 2,
                ),
            )
            .with_italic_correction(italic),
        );
        self.add_construction(
            base,
            Orientation::Vertical,
            GlyphConstruction {
                variants: vec![
                    GlyphVariant {
                        glyph: base,
                        advance: 1000,
                    },
                    GlyphVariant {
                        glyph: display,
                        advance: display_height as u16,
                    },
                ],
                assembly: None,
            },
        );
    }

    fn add_accent(&mut self, ch: char, wide: bool, with_assembly: bool) {
        let base = self.add_char(
            ch,
            SyntheticGlyph::new(500, GlyphBounds::new(100, 480, 400, 700)).with_top_accent(250),
        );
        if !wide {
            return;
        }
        let mut variants = vec![GlyphVariant {
            glyph: base,
            advance: ACCENT_WIDTHS[0] as u16,
        }];
        for &width in ACCENT_WIDTHS.iter().skip(1) {
            let glyph = self.add_glyph(
                SyntheticGlyph::new(width as u16, GlyphBounds::new(20, 480, width - 20, 720))
                    .with_top_accent(width / 2),
            );
            variants.push(GlyphVariant {
                glyph,
                advance: width as u16,
            });
        }
        let assembly = with_assembly.then(|| {
            let left = self.add_glyph(SyntheticGlyph::new(600, GlyphBounds::new(0, 480, 600, 720)));
            let middle = self.add_glyph(SyntheticGlyph::new(400, GlyphBounds::new(0, 560, 400, 640)));
            let right = self.add_glyph(SyntheticGlyph::new(600, GlyphBounds::new(0, 480, 600, 720)));
            GlyphAssembly {
                italics_correction: 0,
                parts: vec![
                    GlyphPart {
                        glyph: left,
                        start_connector: 0,
                        end_connector: 200,
                        full_advance: 600,
                        extender: false,
                    },
                    GlyphPart {
                        glyph: middle,
                        start_connector: 200,
                        end_connector: 200,
                        full_advance: 400,
                        extender: true,
                    },
                    GlyphPart {
                        glyph: right,
                        start_connector: 200,
                        end_connector: 0,
                        full_advance: 600,
                        extender: false,
                    },
                ],
            }
        });
        self.add_construction(
            base,
            Orientation::Horizontal,
            GlyphConstruction { variants, assembly },
        );
    }
}

impl Default for SyntheticFont {
    /// A Latin-Modern-like math font covering ASCII, math italic and bold
    /// letters, Greek, common operators, stretchy delimiters, the radical
    /// sign, large operators and accents.
    fn default() -> Self {
        let mut font = SyntheticFont::new(1000);
        let axis = MathConstants::default().axis_height;

        font.add_char(' ', SyntheticGlyph::blank(333));
        font.add_char('\u{00A0}', SyntheticGlyph::blank(333));

        for ch in ('a'..='z').chain('A'..='Z') {
            font.add_char(ch, letter_metrics(ch));
            if let Some(italic) = math_italic(ch) {
                font.add_char(italic, italic_metrics(ch));
            }
            if let Some(bold) = math_bold(ch) {
                let upright = letter_metrics(ch);
                let bounds = upright.bounds.unwrap_or_default();
                font.add_char(
                    bold,
                    SyntheticGlyph::new(
                        upright.advance + 40,
                        GlyphBounds::new(bounds.x_min, bounds.y_min, bounds.x_max + 40, bounds.y_max),
                    ),
                );
            }
        }

        for ch in '0'..='9' {
            let digit = SyntheticGlyph::new(500, GlyphBounds::new(42, -22, 458, 666));
            font.add_char(ch, digit);
            if let Some(bold) = math_bold(ch) {
                font.add_char(bold, SyntheticGlyph::new(575, GlyphBounds::new(42, -22, 533, 666)));
            }
        }

        // Greek, upright and math italic
        for (offset, upright) in ('\u{03B1}'..='\u{03C9}').enumerate() {
            let bounds = GlyphBounds::new(30, -205, 540, 694);
            font.add_char(upright, SyntheticGlyph::new(570, bounds));
            if let Some(italic) = char::from_u32(0x1D6FC + offset as u32) {
                font.add_char(
                    italic,
                    SyntheticGlyph::new(570, GlyphBounds::new(40, -205, 600, 694))
                        .with_italic_correction(30)
                        .with_top_accent(345),
                );
            }
        }
        for (offset, upright) in ('\u{0391}'..='\u{03A9}').enumerate() {
            let bounds = GlyphBounds::new(36, 0, 714, 683);
            font.add_char(upright, SyntheticGlyph::new(750, bounds));
            if let Some(italic) = char::from_u32(0x1D6E2 + offset as u32) {
                font.add_char(
                    italic,
                    SyntheticGlyph::new(750, GlyphBounds::new(40, 0, 760, 683))
                        .with_italic_correction(40),
                );
            }
        }

        for ch in OPERATOR_CHARS.chars() {
            font.add_char(ch, SyntheticGlyph::new(778, GlyphBounds::new(56, -83, 722, 583)));
        }
        for ch in ORDINARY_CHARS.chars() {
            font.add_char(ch, SyntheticGlyph::new(667, GlyphBounds::new(56, -11, 611, 705)));
        }

        font.add_char('.', SyntheticGlyph::new(278, GlyphBounds::new(78, -11, 200, 106)));
        font.add_char(',', SyntheticGlyph::new(278, GlyphBounds::new(78, -194, 200, 106)));
        font.add_char(';', SyntheticGlyph::new(278, GlyphBounds::new(78, -194, 200, 431)));
        font.add_char(':', SyntheticGlyph::new(278, GlyphBounds::new(78, -11, 200, 431)));
        font.add_char('!', SyntheticGlyph::new(278, GlyphBounds::new(78, -11, 200, 716)));
        font.add_char('?', SyntheticGlyph::new(472, GlyphBounds::new(56, -11, 416, 705)));
        font.add_char('\'', SyntheticGlyph::new(278, GlyphBounds::new(78, 400, 200, 694)));
        font.add_char('\u{2019}', SyntheticGlyph::new(278, GlyphBounds::new(78, 400, 200, 694)));
        font.add_char('-', SyntheticGlyph::new(333, GlyphBounds::new(11, 187, 276, 245)));
        font.add_char('@', SyntheticGlyph::new(778, GlyphBounds::new(56, -11, 722, 705)));
        font.add_char('"', SyntheticGlyph::new(500, GlyphBounds::new(28, 400, 472, 694)));
        font.add_char('`', SyntheticGlyph::new(278, GlyphBounds::new(78, 400, 200, 694)));

        for &(ch, with_assembly) in DELIMITERS {
            font.add_delimiter(ch, with_assembly, axis);
        }
        font.add_radical();
        for &(ch, advance, display_height, italic) in LARGE_OPERATORS {
            font.add_large_operator(ch, advance, display_height, italic, axis);
        }
        for &(ch, wide, with_assembly) in ACCENTS {
            font.add_accent(ch, wide, with_assembly);
        }

        font
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_maps_math_italic() {
        let font = SyntheticFont::default();
        assert!(font.glyph_index('\u{1D465}').is_some()); // italic x
        assert!(font.glyph_index('\u{210E}').is_some()); // italic h
        assert!(font.glyph_index('\u{1D6FC}').is_some()); // italic alpha
    }

    #[test]
    fn test_delimiter_ladder_is_increasing() {
        let font = SyntheticFont::default();
        let paren = font.glyph_index('(').unwrap();
        let construction = font.construction(paren, Orientation::Vertical).unwrap();
        assert_eq!(construction.variants[0].glyph, paren);
        for pair in construction.variants.windows(2) {
            assert!(pair[1].advance > pair[0].advance);
        }
        assert!(construction.assembly.is_some());
    }

    #[test]
    fn test_unmapped_char_shapes_to_notdef() {
        let font = SyntheticFont::default();
        let glyphs = font.shape("\u{4E2D}");
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].glyph, GlyphId::NOTDEF);
        assert_eq!(glyphs[0].x_advance, 1000);
    }

    #[test]
    fn test_clusters_are_byte_offsets() {
        let font = SyntheticFont::default();
        let glyphs = font.shape("a\u{1D465}b");
        assert_eq!(glyphs[0].cluster, 0);
        assert_eq!(glyphs[1].cluster, 1);
        assert_eq!(glyphs[2].cluster, 5);
    }

    #[test]
    fn test_json_round_trip_keeps_lookups() {
        let mut font = SyntheticFont::new(1000);
        let x = font.add_char('x', SyntheticGlyph::new(500, GlyphBounds::new(0, 0, 500, 431)));
        let json = serde_json::to_string(&font).unwrap();
        let back: SyntheticFont = serde_json::from_str(&json).unwrap();
        assert_eq!(back.glyph_index('x'), Some(x));
        assert_eq!(back.glyph_advance(x), Some(500));
    }

    #[test]
    fn test_without_math_table() {
        let font = SyntheticFont::default().without_math_table();
        assert!(font.math_constants().is_none());
    }
}
