//! Accents (TeXbook appendix G, rule 12)

use super::delimiters::{stretch_horizontal, Stretched};
use super::text::styled_text;
use super::ListLayout;
use crate::display::{AccentBox, BoxKind, Child, MathBox};
use crate::model::{Accent, Atom, MathList};
use tracing::warn;

/// The accentee is one plain character without scripts
fn is_single_char(accent: &Accent) -> bool {
    match accent.accentee.atoms.as_slice() {
        [atom] => atom.atom_type().is_textual() && atom.nucleus.chars().count() == 1 && !atom.has_scripts(),
        _ => false,
    }
}

/// Swap i and j for their dotless forms so the accent replaces the dot
fn dotless(list: &MathList) -> MathList {
    let mut list = list.clone();
    for atom in &mut list.atoms {
        match atom.nucleus.as_str() {
            "i" => atom.nucleus = "\u{0131}".to_string(),
            "j" => atom.nucleus = "\u{0237}".to_string(),
            _ => {}
        }
    }
    list
}

impl ListLayout<'_, '_> {
    /// Lay out an accent atom.
    ///
    /// Returns the box and whether the atom's scripts were moved onto a
    /// single-character accentee.
    pub(super) fn make_accent(&self, atom: &Atom, accent: &Accent) -> (MathBox, bool) {
        let m = self.metrics;
        let single = is_single_char(accent);
        let mut accentee_list = if single {
            dotless(&accent.accentee)
        } else {
            accent.accentee.clone()
        };
        let accentee = self.ts.layout_list(&accentee_list, self.style.cramped(), false);
        if accent.accentee.is_empty() {
            return (accentee, false);
        }
        let Some(accent_glyph) = atom.nucleus.chars().next().and_then(|c| m.glyph_for_char(c)) else {
            warn!(accent = %atom.nucleus, "accent has no glyph in the font");
            return (accentee, false);
        };

        let (glyph, x) = if single && !accent.is_wide {
            let sized = m.glyph(accent_glyph);
            let skew = accentee_list
                .atoms
                .first()
                .and_then(|a| styled_text(a).chars().last())
                .and_then(|c| m.glyph_for_char(c))
                .map(|g| m.top_accent_attachment(g) - m.top_accent_attachment(accent_glyph))
                .unwrap_or((accentee.width() - sized.width) / 2.0);
            (Stretched::Glyph(sized), skew)
        } else {
            let stretched = stretch_horizontal(
                &m,
                accent_glyph,
                accentee.width(),
                self.ts.config().max_accent_coverage,
            );
            let x = (accentee.width() - stretched.width()) / 2.0;
            (stretched, x)
        };

        let delta = accentee.ascent().min(m.accent_base_height());
        // Keep the accent's ink above the accentee
        let y = (accentee.ascent() - delta).max(accentee.ascent() + glyph.descent());
        let glyph_ascent = glyph.ascent();

        let mut moved = false;
        let accentee = if single && atom.has_scripts() {
            if let Some(inner) = accentee_list.atoms.first_mut() {
                inner.superscript = atom.superscript.clone();
                inner.subscript = atom.subscript.clone();
                moved = true;
            }
            self.ts.layout_list(&accentee_list, self.style, false)
        } else {
            accentee
        };

        let ascent = accentee.ascent().max(y + glyph_ascent);
        let descent = accentee.descent();
        let width = accentee.width();
        let accent_box = glyph.into_box(m.font_size(), 0.0);
        let node = MathBox::new(
            BoxKind::Accent(AccentBox {
                accentee: Box::new(Child::at(0.0, 0.0, accentee)),
                accent: Box::new(Child::at(x, y, accent_box)),
            }),
            ascent,
            descent,
            width,
        );
        (node, moved)
    }
}
