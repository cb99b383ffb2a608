//! Finalization - normalize a parsed list before layout
//!
//! Reclassifies binary operators that cannot be binary in context, fuses
//! adjacent number atoms, and recomputes list-relative source ranges. The
//! pass recurses into every child list and is idempotent.

use crate::error::{ParseError, ParseResult};
use crate::model::*;

/// Left neighbours after which a binary operator is read as unary
fn forces_unary(prev: Option<AtomType>) -> bool {
    matches!(
        prev,
        None | Some(
            AtomType::BinaryOperator
                | AtomType::Relation
                | AtomType::Open
                | AtomType::Punctuation
                | AtomType::LargeOperator
                | AtomType::Boundary
        )
    )
}

/// Whether `next` can be fused onto `prev`
fn fuses(prev: &Atom, next: &Atom) -> bool {
    prev.atom_type() == AtomType::Number
        && next.atom_type() == AtomType::Number
        && !prev.has_scripts()
        && prev.font_style == next.font_style
        && prev.nucleus.matches('.').count() + next.nucleus.matches('.').count() <= 1
}

impl MathList {
    /// Check that no delimiter carries scripts.
    ///
    /// The parser already rejects such scripts at their byte offset, so
    /// this only fails for hand-built lists, whose reported offset is the
    /// delimiter's `source_range` location.
    pub fn validate(&self) -> ParseResult<()> {
        for atom in &self.atoms {
            let boundaries = match &atom.kind {
                AtomKind::Inner(inner) => [inner.left.as_deref(), inner.right.as_deref()],
                _ => [None, None],
            };
            let with_scripts = std::iter::once(atom)
                .filter(|a| a.atom_type() == AtomType::Boundary)
                .chain(boundaries.into_iter().flatten())
                .find(|a| a.has_scripts());
            if let Some(boundary) = with_scripts {
                return Err(ParseError::UnexpectedScript {
                    offset: boundary.source_range.location,
                    message: format!("delimiter '{}' cannot carry scripts", boundary.nucleus),
                });
            }
            for child in atom.child_lists() {
                child.validate()?;
            }
        }
        Ok(())
    }

    /// Finalized copy of this list
    pub fn finalized(&self) -> MathList {
        let mut out = MathList::new();
        // Index in `out` of the last atom that is not a space or style
        let mut prev: Option<usize> = None;

        for atom in &self.atoms {
            let mut atom = atom.clone();
            for child in atom.child_lists_mut() {
                *child = child.finalized();
            }
            let prev_type = prev.map(|i| out.atoms[i].atom_type());

            match atom.atom_type() {
                AtomType::BinaryOperator if forces_unary(prev_type) => {
                    atom.kind = AtomKind::UnaryOperator;
                }
                AtomType::Relation | AtomType::Punctuation | AtomType::Close => {
                    if let Some(i) = prev.filter(|_| prev_type == Some(AtomType::BinaryOperator)) {
                        out.atoms[i].kind = AtomKind::UnaryOperator;
                    }
                }
                AtomType::Number => {
                    let adjacent = prev.is_some() && prev == out.len().checked_sub(1);
                    if let Some(last) = out.atoms.last_mut().filter(|_| adjacent) {
                        if fuses(last, &atom) {
                            last.nucleus.push_str(&atom.nucleus);
                            last.superscript = atom.superscript;
                            last.subscript = atom.subscript;
                            last.source_range.length += atom.source_range.length.max(1);
                            continue;
                        }
                    }
                }
                _ => {}
            }

            let location = out.last().map_or(0, |a| a.source_range.end());
            atom.source_range = SourceRange::new(location, atom.source_range.length.max(1));
            let skipped = matches!(atom.atom_type(), AtomType::Space | AtomType::Style);
            out.add_atom(atom);
            if !skipped {
                prev = Some(out.len() - 1);
            }
        }

        if let Some(i) = prev {
            if out.atoms[i].atom_type() == AtomType::BinaryOperator {
                out.atoms[i].kind = AtomKind::UnaryOperator;
            }
        }
        out
    }

    /// Finalize in place
    pub fn finalize(&mut self) {
        *self = self.finalized();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(atoms: Vec<Atom>) -> MathList {
        MathList::from(atoms)
    }

    #[test]
    fn test_leading_binary_becomes_unary() {
        let out = list(vec![Atom::binary("\u{2212}"), Atom::number("1")]).finalized();
        assert_eq!(out.atoms[0].atom_type(), AtomType::UnaryOperator);
    }

    #[test]
    fn test_binary_before_relation_becomes_unary() {
        let out = list(vec![
            Atom::variable("x"),
            Atom::binary("+"),
            Atom::relation("="),
            Atom::variable("y"),
        ])
        .finalized();
        assert_eq!(out.atoms[1].atom_type(), AtomType::UnaryOperator);
        assert_eq!(out.atoms[2].atom_type(), AtomType::Relation);
    }

    #[test]
    fn test_trailing_binary_becomes_unary() {
        let out = list(vec![Atom::variable("x"), Atom::binary("+"), Atom::space(3.0)]).finalized();
        assert_eq!(out.atoms[1].atom_type(), AtomType::UnaryOperator);
    }

    #[test]
    fn test_binary_between_operands_stays() {
        let out = list(vec![Atom::variable("x"), Atom::binary("+"), Atom::variable("y")]).finalized();
        assert_eq!(out.atoms[1].atom_type(), AtomType::BinaryOperator);
    }

    #[test]
    fn test_numbers_fuse() {
        let out = list(vec![Atom::number("1"), Atom::number("2"), Atom::number("."), Atom::number("3")])
            .finalized();
        assert_eq!(out.len(), 1);
        assert_eq!(out.atoms[0].nucleus, "12.3");
        assert_eq!(out.atoms[0].source_range, SourceRange::new(0, 4));
    }

    #[test]
    fn test_numbers_do_not_fuse_across_scripts_or_dots() {
        let mut first = Atom::number("1");
        first.superscript = Some(list(vec![Atom::number("2")]));
        let out = list(vec![first, Atom::number("3")]).finalized();
        assert_eq!(out.len(), 2);

        let out = list(vec![Atom::number("1."), Atom::number(".")]).finalized();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_fused_number_takes_trailing_scripts() {
        let mut last = Atom::number("2");
        last.subscript = Some(list(vec![Atom::variable("n")]));
        let out = list(vec![Atom::number("1"), last]).finalized();
        assert_eq!(out.len(), 1);
        assert_eq!(out.atoms[0].nucleus, "12");
        assert!(out.atoms[0].subscript.is_some());
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let out = list(vec![
            Atom::variable("x"),
            Atom::space(3.0),
            Atom::binary("+"),
            Atom::number("1"),
            Atom::number("0"),
        ])
        .finalized();
        let ranges: Vec<_> = out.iter().map(|a| a.source_range).collect();
        assert_eq!(
            ranges,
            vec![
                SourceRange::new(0, 1),
                SourceRange::new(1, 1),
                SourceRange::new(2, 1),
                SourceRange::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_child_lists_are_finalized() {
        let numerator = list(vec![Atom::binary("+"), Atom::number("1"), Atom::number("2")]);
        let out = list(vec![Atom::fraction(Fraction::new(numerator, MathList::new()))]).finalized();
        let AtomKind::Fraction(f) = &out.atoms[0].kind else {
            panic!("expected fraction");
        };
        assert_eq!(f.numerator.len(), 2);
        assert_eq!(f.numerator.atoms[0].atom_type(), AtomType::UnaryOperator);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let once = list(vec![
            Atom::binary("\u{2212}"),
            Atom::binary("+"),
            Atom::relation("="),
            Atom::number("1"),
            Atom::number("."),
            Atom::number("5"),
            Atom::binary("*"),
        ])
        .finalized();
        assert_eq!(once.finalized(), once);
    }

    #[test]
    fn test_boundary_with_scripts_is_rejected() {
        let mut middle = Atom::boundary("|");
        middle.superscript = Some(list(vec![Atom::number("2")]));
        let inner = Atom::new(
            AtomKind::Inner(Inner {
                list: list(vec![middle]),
                left: Some(Box::new(Atom::boundary("("))),
                right: Some(Box::new(Atom::boundary(")"))),
            }),
            "",
        );
        assert!(matches!(
            list(vec![inner]).validate(),
            Err(ParseError::UnexpectedScript { .. })
        ));
    }
}
