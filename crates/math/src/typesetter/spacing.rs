//! Inter-atom spacing
//!
//! TeX's spacing table (TeXbook chapter 18) indexed by the classes of two
//! neighbouring atoms. Medium and thick spaces vanish in script styles.

use crate::model::AtomType;
use crate::style::LayoutStyle;
use tracing::warn;

/// Spacing class of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpacingClass {
    Ordinary,
    Operator,
    Binary,
    Relation,
    Open,
    Close,
    Punctuation,
    Inner,
    Radical,
}

impl SpacingClass {
    /// Class of an atom appearing on the left of a pair
    pub(crate) fn of(atom_type: AtomType) -> Option<Self> {
        let class = match atom_type {
            AtomType::Ordinary
            | AtomType::Number
            | AtomType::Variable
            | AtomType::UnaryOperator
            | AtomType::Accent
            | AtomType::Overline
            | AtomType::Underline
            | AtomType::Color
            | AtomType::Boundary => SpacingClass::Ordinary,
            AtomType::LargeOperator => SpacingClass::Operator,
            AtomType::BinaryOperator => SpacingClass::Binary,
            AtomType::Relation => SpacingClass::Relation,
            AtomType::Open => SpacingClass::Open,
            AtomType::Close => SpacingClass::Close,
            AtomType::Punctuation => SpacingClass::Punctuation,
            AtomType::Fraction | AtomType::Inner | AtomType::Table => SpacingClass::Inner,
            AtomType::Radical => SpacingClass::Radical,
            AtomType::Space | AtomType::Style => return None,
        };
        Some(class)
    }

    fn row(self) -> usize {
        match self {
            SpacingClass::Ordinary => 0,
            SpacingClass::Operator => 1,
            SpacingClass::Binary => 2,
            SpacingClass::Relation => 3,
            SpacingClass::Open => 4,
            SpacingClass::Close => 5,
            SpacingClass::Punctuation => 6,
            SpacingClass::Inner => 7,
            SpacingClass::Radical => 8,
        }
    }

    /// Column index; a radical on the right spaces like an ordinary atom
    fn column(self) -> usize {
        match self {
            SpacingClass::Radical => 0,
            other => other.row(),
        }
    }
}

const NONE: i8 = 0;
const THIN: i8 = 1;
const MEDIUM: i8 = 2;
const THICK: i8 = 3;
const INVALID: i8 = -1;

#[rustfmt::skip]
const SPACING: [[i8; 8]; 9] = [
    // ord     op       bin      rel      open   close    punct  inner
    [NONE,    THIN,    MEDIUM,  THICK,   NONE,  NONE,    NONE,  THIN],   // ord
    [THIN,    THIN,    INVALID, THICK,   NONE,  NONE,    NONE,  THIN],   // op
    [MEDIUM,  MEDIUM,  INVALID, INVALID, MEDIUM, INVALID, INVALID, MEDIUM], // bin
    [THICK,   THICK,   INVALID, NONE,    THICK, NONE,    NONE,  THICK],  // rel
    [NONE,    NONE,    INVALID, NONE,    NONE,  NONE,    NONE,  NONE],   // open
    [NONE,    THIN,    MEDIUM,  THICK,   NONE,  NONE,    NONE,  THIN],   // close
    [THIN,    THIN,    INVALID, THIN,    THIN,  THIN,    THIN,  THIN],   // punct
    [THIN,    THIN,    MEDIUM,  THICK,   THIN,  NONE,    THIN,  THIN],   // inner
    [NONE,    THIN,    MEDIUM,  THICK,   NONE,  NONE,    NONE,  THIN],   // radical
];

/// Space between two neighbouring atoms, in mu
pub(crate) fn inter_atom_space(left: SpacingClass, right: SpacingClass, style: LayoutStyle) -> f32 {
    match SPACING[left.row()][right.column()] {
        THIN => 3.0,
        MEDIUM if !style.is_script() => 4.0,
        THICK if !style.is_script() => 5.0,
        INVALID => {
            warn!(?left, ?right, "invalid atom pair for spacing");
            0.0
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineStyle;

    fn space(left: AtomType, right: AtomType, style: LineStyle) -> f32 {
        let left = SpacingClass::of(left).unwrap();
        let right = SpacingClass::of(right).unwrap();
        inter_atom_space(left, right, LayoutStyle::new(style, false))
    }

    #[test]
    fn test_relation_is_thick() {
        assert_eq!(space(AtomType::Variable, AtomType::Relation, LineStyle::Text), 5.0);
        assert_eq!(space(AtomType::Relation, AtomType::Number, LineStyle::Display), 5.0);
    }

    #[test]
    fn test_binary_is_medium() {
        assert_eq!(space(AtomType::Variable, AtomType::BinaryOperator, LineStyle::Text), 4.0);
        assert_eq!(space(AtomType::BinaryOperator, AtomType::Open, LineStyle::Text), 4.0);
    }

    #[test]
    fn test_script_styles_drop_medium_and_thick() {
        assert_eq!(space(AtomType::Variable, AtomType::BinaryOperator, LineStyle::Script), 0.0);
        assert_eq!(space(AtomType::Variable, AtomType::Relation, LineStyle::ScriptScript), 0.0);
        assert_eq!(space(AtomType::Variable, AtomType::LargeOperator, LineStyle::Script), 3.0);
    }

    #[test]
    fn test_radical_spaces_as_ordinary_on_the_right() {
        assert_eq!(space(AtomType::LargeOperator, AtomType::Radical, LineStyle::Text), 3.0);
        assert_eq!(space(AtomType::Radical, AtomType::LargeOperator, LineStyle::Text), 3.0);
    }

    #[test]
    fn test_invalid_pair_is_zero() {
        assert_eq!(space(AtomType::BinaryOperator, AtomType::BinaryOperator, LineStyle::Text), 0.0);
    }

    #[test]
    fn test_space_and_style_have_no_class() {
        assert!(SpacingClass::of(AtomType::Space).is_none());
        assert!(SpacingClass::of(AtomType::Style).is_none());
    }
}
