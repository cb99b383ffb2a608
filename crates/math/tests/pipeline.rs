//! Integration tests for the markup to box pipeline
//! Parsing scenarios, fraction and radical geometry, and drawing

use math::display::{BoxKind, MathBox, ScriptRole};
use math::{
    parse, AtomKind, AtomType, LineStyle, Point, RecordingSurface, Renderer, SourceRange,
    Typesetter,
};
use math_font::{FontMathMetrics, SyntheticFont};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn typeset(markup: &str, style: LineStyle) -> MathBox {
    let font = SyntheticFont::default();
    let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
    Typesetter::new(metrics).typeset(&parse(markup).unwrap(), style)
}

#[test]
fn test_scripts_keep_their_own_ranges() {
    let list = parse("x^{13+y}_{15-}").unwrap();
    assert_eq!(list.len(), 1);
    let x = &list.atoms[0];
    assert_eq!(x.atom_type(), AtomType::Variable);
    assert_eq!(x.nucleus, "x");
    assert_eq!(x.source_range.location, 0);

    let sup = x.superscript.as_ref().unwrap();
    let ranges: Vec<_> = sup.iter().map(|a| a.source_range).collect();
    assert_eq!(
        ranges,
        vec![
            SourceRange::new(0, 2),
            SourceRange::new(2, 1),
            SourceRange::new(3, 1)
        ]
    );
    assert_eq!(sup.atoms[0].nucleus, "13");

    let sub = x.subscript.as_ref().unwrap();
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.atoms[0].nucleus, "15");
    assert_eq!(sub.atoms[0].source_range, SourceRange::new(0, 2));
    assert_eq!(sub.atoms[1].atom_type(), AtomType::UnaryOperator);
}

#[test]
fn test_decimal_is_one_number() {
    let list = parse("12.3").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.atoms[0].kind, AtomKind::Number);
    assert_eq!(list.atoms[0].nucleus, "12.3");
    assert_eq!(list.atoms[0].source_range, SourceRange::new(0, 4));
}

#[test]
fn test_unary_and_binary_minus() {
    let list = parse("-52x+(-12.3*)").unwrap();
    let types: Vec<_> = list.iter().map(|a| a.atom_type()).collect();
    assert_eq!(types[0], AtomType::UnaryOperator);
    assert_eq!(list.atoms[1].nucleus, "52");
    assert_eq!(types[3], AtomType::BinaryOperator);
    assert_eq!(types[4], AtomType::Open);
    assert_eq!(types[5], AtomType::UnaryOperator);
    assert_eq!(list.atoms[6].nucleus, "12.3");
}

#[test]
fn test_fraction_geometry() {
    let font = SyntheticFont::default();
    let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
    let node = Typesetter::new(metrics).typeset(&parse("\\frac{1}{2}").unwrap(), LineStyle::Text);
    let fraction = &node.children()[0].node;
    let BoxKind::Fraction(f) = fraction.kind() else {
        panic!("expected fraction");
    };
    let widest = f.numerator.node.width().max(f.denominator.node.width());
    assert!(approx(fraction.width(), widest));
    assert!(approx(f.numerator_shift_up(), metrics.numerator_shift_up(false, true)));
    assert!(f.denominator_shift_down() >= metrics.denominator_shift_down(false, true) - 1e-4);
}

#[test]
fn test_radical_degree_shift() {
    let font = SyntheticFont::default();
    let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
    let node = Typesetter::new(metrics).typeset(&parse("\\sqrt[3]{x}").unwrap(), LineStyle::Text);
    let BoxKind::Radical(r) = node.children()[0].node.kind() else {
        panic!("expected radical");
    };
    let degree = r.degree.as_ref().unwrap();
    let before = metrics.radical_kern_before_degree();
    let sum = before + degree.node.width() + metrics.radical_kern_after_degree();
    if sum < 0.0 {
        assert_eq!(r.radical_shift, 0.0);
        assert!(approx(degree.origin.x, before - sum));
    } else {
        assert!(approx(r.radical_shift, sum));
        assert!(approx(degree.origin.x, before));
    }
    assert!(approx(r.radicand.origin.x, r.radical_shift + r.sign.node.width()));
}

#[test]
fn test_top_level_children_carry_roles() {
    let node = typeset("a^2+b_1", LineStyle::Text);
    let roles: Vec<_> = node
        .children()
        .iter()
        .filter_map(|c| c.node.script_role())
        .collect();
    assert_eq!(roles, vec![ScriptRole::Superscript, ScriptRole::Subscript]);
}

#[test]
fn test_quadratic_formula_draws() {
    let node = typeset("x = \\frac{-b \\pm \\sqrt{b^2-4ac}}{2a}", LineStyle::Display);
    let positioned = node.positioned(Point::new(5.0, 20.0));
    assert!(approx(positioned.origin.x, 5.0));
    let mut surface = RecordingSurface::new();
    Renderer::new().render(&positioned, &mut surface);
    // fraction bar and radical overbar
    let lines = surface
        .commands()
        .iter()
        .filter(|c| matches!(c, math::DrawCommand::StrokeLine { .. }))
        .count();
    assert_eq!(lines, 2);
}

#[test]
fn test_left_right_matrix_lays_out() {
    let node = typeset(
        "\\left(\\begin{matrix} a & b \\\\ c & d \\end{matrix}\\right)",
        LineStyle::Display,
    );
    assert!(node.height() > 12.0);
    assert_eq!(node.children().len(), 1);
}
