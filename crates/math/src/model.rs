//! Atom model - the parsed expression tree
//!
//! A [`MathList`] is an ordered list of [`Atom`]s. Structural atoms
//! (fractions, radicals, accents, delimited groups, tables, ...) own their
//! child lists exclusively, so the tree is acyclic and `Clone` is a deep copy.

use serde::{Deserialize, Serialize};

// =============================================================================
// Atom Types
// =============================================================================

/// Classification of an atom, used for spacing and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomType {
    Ordinary,
    Number,
    Variable,
    UnaryOperator,
    BinaryOperator,
    Relation,
    Open,
    Close,
    Punctuation,
    LargeOperator,
    Fraction,
    Radical,
    Accent,
    Inner,
    Overline,
    Underline,
    Space,
    Style,
    Color,
    Table,
    Boundary,
}

impl AtomType {
    /// Whether atoms of this type may carry sub/superscripts
    pub fn allows_scripts(self) -> bool {
        !matches!(
            self,
            AtomType::Boundary | AtomType::Space | AtomType::Style | AtomType::Color
        )
    }

    /// Types that are laid out as plain glyph runs
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            AtomType::Ordinary
                | AtomType::Number
                | AtomType::Variable
                | AtomType::UnaryOperator
                | AtomType::BinaryOperator
                | AtomType::Relation
                | AtomType::Open
                | AtomType::Close
                | AtomType::Punctuation
        )
    }
}

/// Font style applied to an atom's nucleus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    /// Italic letters, upright digits and symbols
    #[default]
    Default,
    Roman,
    Bold,
    Caligraphic,
    Typewriter,
    Italic,
    SansSerif,
    Fraktur,
    Blackboard,
    BoldItalic,
}

/// TeX math style, without the cramped flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineStyle {
    Display,
    Text,
    Script,
    ScriptScript,
}

/// Column alignment inside a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Half-open range of markup units covered by an atom.
///
/// Ranges are relative to the list that holds the atom; one unit is one
/// markup symbol, so an atom fused from several symbols spans several
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRange {
    pub location: usize,
    pub length: usize,
}

impl SourceRange {
    pub const fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub fn end(&self) -> usize {
        self.location + self.length
    }

    /// Smallest range covering both
    pub fn union(&self, other: &SourceRange) -> SourceRange {
        let start = self.location.min(other.location);
        let end = self.end().max(other.end());
        SourceRange::new(start, end - start)
    }
}

// =============================================================================
// Specialized Payloads
// =============================================================================

/// Numerator over denominator, optionally delimited
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: MathList,
    pub denominator: MathList,
    pub has_rule: bool,
    pub left_delimiter: Option<String>,
    pub right_delimiter: Option<String>,
    /// Style forced by `\dfrac` / `\tfrac`
    pub forced_style: Option<LineStyle>,
    /// Set by `\cfrac`
    pub continued: bool,
}

impl Fraction {
    pub fn new(numerator: MathList, denominator: MathList) -> Self {
        Self {
            numerator,
            denominator,
            has_rule: true,
            ..Default::default()
        }
    }

    /// A rule-less fraction between delimiters, as built by `\binom`
    pub fn stack(
        numerator: MathList,
        denominator: MathList,
        left: Option<&str>,
        right: Option<&str>,
    ) -> Self {
        Self {
            numerator,
            denominator,
            has_rule: false,
            left_delimiter: left.map(str::to_string),
            right_delimiter: right.map(str::to_string),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Radical {
    pub radicand: MathList,
    pub degree: Option<MathList>,
}

/// Accent over an inner list; the accent character is the atom's nucleus
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Accent {
    pub accentee: MathList,
    /// Stretched to the accentee width instead of a fixed glyph
    pub is_wide: bool,
}

/// A `\left ... \right` group. Boundaries are atoms of type
/// [`AtomType::Boundary`] whose nucleus is the delimiter, empty for `.`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inner {
    pub list: MathList,
    pub left: Option<Box<Atom>>,
    pub right: Option<Box<Atom>>,
}

/// A group drawn in one color
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorGroup {
    pub color: String,
    pub list: MathList,
    /// Spelled `\textcolor` rather than `\color`
    pub text_color: bool,
}

/// Rows of cells plus alignment and spacing presets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MathTable {
    /// Row-major; rows may be shorter than the column count
    pub cells: Vec<Vec<MathList>>,
    pub alignments: Vec<ColumnAlignment>,
    /// Extra inter-row space in jots
    pub row_spacing: f32,
    /// Inter-column space in mu
    pub column_spacing: f32,
    pub environment: Option<String>,
}

impl MathTable {
    pub fn new(environment: Option<&str>) -> Self {
        Self {
            environment: environment.map(str::to_string),
            ..Default::default()
        }
    }

    /// Store `list` at (`row`, `column`), growing the grid as needed
    pub fn set_cell(&mut self, row: usize, column: usize, list: MathList) {
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.cells[row];
        if cells.len() <= column {
            cells.resize_with(column + 1, MathList::new);
        }
        cells[column] = list;
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&MathList> {
        self.cells.get(row).and_then(|r| r.get(column))
    }

    pub fn set_alignment(&mut self, column: usize, alignment: ColumnAlignment) {
        if self.alignments.len() <= column {
            self.alignments.resize(column + 1, ColumnAlignment::Center);
        }
        self.alignments[column] = alignment;
    }

    /// Alignment of a column, centered unless set
    pub fn alignment(&self, column: usize) -> ColumnAlignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    pub fn num_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn num_columns(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }
}

// =============================================================================
// Atom
// =============================================================================

/// Kind of an atom with its kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AtomKind {
    Ordinary,
    Number,
    Variable,
    UnaryOperator,
    BinaryOperator,
    Relation,
    Open,
    Close,
    Punctuation,
    /// The nucleus is a symbol or an operator name such as `sin`
    LargeOperator { limits: bool },
    Fraction(Fraction),
    Radical(Radical),
    Accent(Accent),
    Inner(Inner),
    Overline(MathList),
    Underline(MathList),
    /// Fixed space in mu
    Space(f32),
    Style(LineStyle),
    Color(ColorGroup),
    Table(MathTable),
    Boundary,
}

/// One node of the expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub kind: AtomKind,
    /// Literal content; empty for structural atoms
    pub nucleus: String,
    pub superscript: Option<MathList>,
    pub subscript: Option<MathList>,
    pub source_range: SourceRange,
    pub font_style: FontStyle,
}

impl Atom {
    pub fn new(kind: AtomKind, nucleus: impl Into<String>) -> Self {
        Self {
            kind,
            nucleus: nucleus.into(),
            superscript: None,
            subscript: None,
            source_range: SourceRange::new(0, 1),
            font_style: FontStyle::Default,
        }
    }

    pub fn ordinary(nucleus: impl Into<String>) -> Self {
        Self::new(AtomKind::Ordinary, nucleus)
    }

    pub fn variable(nucleus: impl Into<String>) -> Self {
        Self::new(AtomKind::Variable, nucleus)
    }

    pub fn number(nucleus: impl Into<String>) -> Self {
        Self::new(AtomKind::Number, nucleus)
    }

    pub fn binary(nucleus: impl Into<String>) -> Self {
        Self::new(AtomKind::BinaryOperator, nucleus)
    }

    pub fn relation(nucleus: impl Into<String>) -> Self {
        Self::new(AtomKind::Relation, nucleus)
    }

    pub fn fraction(fraction: Fraction) -> Self {
        Self::new(AtomKind::Fraction(fraction), "")
    }

    pub fn radical(radicand: MathList, degree: Option<MathList>) -> Self {
        Self::new(AtomKind::Radical(Radical { radicand, degree }), "")
    }

    pub fn boundary(delimiter: impl Into<String>) -> Self {
        Self::new(AtomKind::Boundary, delimiter)
    }

    pub fn space(mu: f32) -> Self {
        Self::new(AtomKind::Space(mu), "")
    }

    pub fn style(style: LineStyle) -> Self {
        Self::new(AtomKind::Style(style), "")
    }

    pub fn table(table: MathTable) -> Self {
        Self::new(AtomKind::Table(table), "")
    }

    pub fn with_font_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }

    pub fn atom_type(&self) -> AtomType {
        match &self.kind {
            AtomKind::Ordinary => AtomType::Ordinary,
            AtomKind::Number => AtomType::Number,
            AtomKind::Variable => AtomType::Variable,
            AtomKind::UnaryOperator => AtomType::UnaryOperator,
            AtomKind::BinaryOperator => AtomType::BinaryOperator,
            AtomKind::Relation => AtomType::Relation,
            AtomKind::Open => AtomType::Open,
            AtomKind::Close => AtomType::Close,
            AtomKind::Punctuation => AtomType::Punctuation,
            AtomKind::LargeOperator { .. } => AtomType::LargeOperator,
            AtomKind::Fraction(_) => AtomType::Fraction,
            AtomKind::Radical(_) => AtomType::Radical,
            AtomKind::Accent(_) => AtomType::Accent,
            AtomKind::Inner(_) => AtomType::Inner,
            AtomKind::Overline(_) => AtomType::Overline,
            AtomKind::Underline(_) => AtomType::Underline,
            AtomKind::Space(_) => AtomType::Space,
            AtomKind::Style(_) => AtomType::Style,
            AtomKind::Color(_) => AtomType::Color,
            AtomKind::Table(_) => AtomType::Table,
            AtomKind::Boundary => AtomType::Boundary,
        }
    }

    pub fn allows_scripts(&self) -> bool {
        self.atom_type().allows_scripts()
    }

    pub fn has_scripts(&self) -> bool {
        self.superscript.is_some() || self.subscript.is_some()
    }

    /// Child lists owned by this atom, scripts included
    pub fn child_lists(&self) -> Vec<&MathList> {
        let mut lists = Vec::new();
        match &self.kind {
            AtomKind::Fraction(f) => {
                lists.push(&f.numerator);
                lists.push(&f.denominator);
            }
            AtomKind::Radical(r) => {
                lists.push(&r.radicand);
                if let Some(degree) = &r.degree {
                    lists.push(degree);
                }
            }
            AtomKind::Accent(a) => lists.push(&a.accentee),
            AtomKind::Inner(i) => lists.push(&i.list),
            AtomKind::Overline(l) | AtomKind::Underline(l) => lists.push(l),
            AtomKind::Color(c) => lists.push(&c.list),
            AtomKind::Table(t) => lists.extend(t.cells.iter().flatten()),
            _ => {}
        }
        if let Some(sup) = &self.superscript {
            lists.push(sup);
        }
        if let Some(sub) = &self.subscript {
            lists.push(sub);
        }
        lists
    }

    /// Mutable access to the child lists, scripts included
    pub fn child_lists_mut(&mut self) -> Vec<&mut MathList> {
        let mut lists = Vec::new();
        match &mut self.kind {
            AtomKind::Fraction(f) => {
                lists.push(&mut f.numerator);
                lists.push(&mut f.denominator);
            }
            AtomKind::Radical(r) => {
                lists.push(&mut r.radicand);
                if let Some(degree) = &mut r.degree {
                    lists.push(degree);
                }
            }
            AtomKind::Accent(a) => lists.push(&mut a.accentee),
            AtomKind::Inner(i) => lists.push(&mut i.list),
            AtomKind::Overline(l) | AtomKind::Underline(l) => lists.push(l),
            AtomKind::Color(c) => lists.push(&mut c.list),
            AtomKind::Table(t) => lists.extend(t.cells.iter_mut().flatten()),
            _ => {}
        }
        if let Some(sup) = &mut self.superscript {
            lists.push(sup);
        }
        if let Some(sub) = &mut self.subscript {
            lists.push(sub);
        }
        lists
    }
}

// =============================================================================
// Math List
// =============================================================================

/// An ordered list of atoms
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MathList {
    pub atoms: Vec<Atom>,
}

impl MathList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    /// Insert at `index`, clamped to the list length
    pub fn insert_atom(&mut self, index: usize, atom: Atom) {
        let index = index.min(self.atoms.len());
        self.atoms.insert(index, atom);
    }

    pub fn append(&mut self, other: MathList) {
        self.atoms.extend(other.atoms);
    }

    pub fn remove_atom(&mut self, index: usize) -> Option<Atom> {
        (index < self.atoms.len()).then(|| self.atoms.remove(index))
    }

    /// Remove the atoms in `start..end`, clamped to the list
    pub fn remove_atoms_in_range(&mut self, range: std::ops::Range<usize>) {
        let end = range.end.min(self.atoms.len());
        let start = range.start.min(end);
        self.atoms.drain(start..end);
    }

    pub fn remove_last_atom(&mut self) -> Option<Atom> {
        self.atoms.pop()
    }

    pub fn last(&self) -> Option<&Atom> {
        self.atoms.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Atom> {
        self.atoms.last_mut()
    }
}

impl From<Vec<Atom>> for MathList {
    fn from(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }
}

impl<'a> IntoIterator for &'a MathList {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_editing() {
        let mut list = MathList::new();
        list.add_atom(Atom::variable("x"));
        list.add_atom(Atom::binary("+"));
        list.insert_atom(0, Atom::number("2"));
        assert_eq!(list.len(), 3);
        assert_eq!(list.atoms[0].nucleus, "2");

        list.remove_atoms_in_range(1..2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.atoms[1].nucleus, "+");

        assert_eq!(list.remove_last_atom().map(|a| a.nucleus), Some("+".to_string()));
        assert!(list.remove_atom(5).is_none());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut numerator = MathList::new();
        numerator.add_atom(Atom::number("1"));
        let original = MathList::from(vec![Atom::fraction(Fraction::new(
            numerator,
            MathList::new(),
        ))]);
        let mut copy = original.clone();
        if let AtomKind::Fraction(f) = &mut copy.atoms[0].kind {
            f.numerator.add_atom(Atom::number("2"));
        }
        assert_ne!(original, copy);
    }

    #[test]
    fn test_boundary_forbids_scripts() {
        assert!(!Atom::boundary("(").allows_scripts());
        assert!(Atom::variable("x").allows_scripts());
    }

    #[test]
    fn test_table_grid_grows() {
        let mut table = MathTable::new(Some("matrix"));
        table.set_cell(1, 2, MathList::from(vec![Atom::number("5")]));
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 3);
        assert!(table.cell(0, 0).is_none());
        assert_eq!(table.alignment(4), ColumnAlignment::Center);
    }

    #[test]
    fn test_source_range_union() {
        let a = SourceRange::new(2, 1);
        let b = SourceRange::new(5, 2);
        assert_eq!(a.union(&b), SourceRange::new(2, 5));
    }
}
