//! Serializer - write an atom list back to markup
//!
//! The output reparses to an equal finalized list. Commands take the
//! first-declared spelling for their nucleus.

use crate::model::*;
use crate::parser::atom_for_character;
use crate::symbols;

/// Accumulates markup, separating alphabetic commands from following letters
struct Writer {
    out: String,
    /// Last write was a command ending in a letter
    pending_command: bool,
    /// Inside `\text{...}`, where a plain space would become an atom
    text_mode: bool,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::new(),
            pending_command: false,
            text_mode: false,
        }
    }

    fn push(&mut self, s: &str) {
        if self.pending_command && s.starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.out.push_str(if self.text_mode { "{}" } else { " " });
        }
        self.pending_command = false;
        self.out.push_str(s);
    }

    fn command(&mut self, name: &str) {
        self.push("\\");
        self.out.push_str(name);
        self.pending_command = name.ends_with(|c: char| c.is_ascii_alphabetic());
    }

    fn group(&mut self, list: &MathList) {
        self.push("{");
        self.list(list);
        self.push("}");
    }

    fn list(&mut self, list: &MathList) {
        self.atoms(&list.atoms);
    }

    fn atoms(&mut self, atoms: &[Atom]) {
        let mut open_style = FontStyle::Default;

        for (i, atom) in atoms.iter().enumerate() {
            if atom.font_style != open_style {
                if open_style != FontStyle::Default {
                    self.close_style_group();
                }
                if atom.font_style != FontStyle::Default {
                    self.open_style_group(atom.font_style, &atoms[i..]);
                }
                open_style = atom.font_style;
            }
            self.nucleus(atom);
            // Scripts go outside the style group
            if atom.has_scripts() && open_style != FontStyle::Default {
                self.close_style_group();
                open_style = FontStyle::Default;
            }
            self.scripts(atom);
        }
        if open_style != FontStyle::Default {
            self.close_style_group();
        }
    }

    fn open_style_group(&mut self, style: FontStyle, rest: &[Atom]) {
        let mut has_space = false;
        for atom in rest.iter().take_while(|a| a.font_style == style) {
            if atom.atom_type() == AtomType::Ordinary && atom.nucleus == " " {
                has_space = true;
            }
            if atom.has_scripts() {
                break;
            }
        }
        if style == FontStyle::Roman && has_space {
            self.command("text");
            self.text_mode = true;
        } else {
            self.command(symbols::font_style_name(style));
        }
        self.push("{");
    }

    fn close_style_group(&mut self) {
        self.push("}");
        self.text_mode = false;
    }

    fn scripts(&mut self, atom: &Atom) {
        if let Some(sup) = &atom.superscript {
            self.push("^");
            self.group(sup);
        }
        if let Some(sub) = &atom.subscript {
            self.push("_");
            self.group(sub);
        }
    }

    fn nucleus(&mut self, atom: &Atom) {
        match &atom.kind {
            AtomKind::Fraction(fraction) => self.fraction(fraction),
            AtomKind::Radical(radical) => {
                self.command("sqrt");
                if let Some(degree) = &radical.degree {
                    self.push("[");
                    self.list(degree);
                    self.push("]");
                }
                self.group(&radical.radicand);
            }
            AtomKind::Inner(inner) => self.inner(inner),
            AtomKind::Overline(list) => {
                self.command("overline");
                self.group(list);
            }
            AtomKind::Underline(list) => {
                self.command("underline");
                self.group(list);
            }
            AtomKind::Accent(accent) => {
                if let Some(name) = symbols::accent_name(&atom.nucleus, accent.is_wide) {
                    self.command(name);
                }
                self.group(&accent.accentee);
            }
            AtomKind::LargeOperator { limits } => {
                match symbols::symbol_name(atom) {
                    Some(name) => self.command(name),
                    None => {
                        self.command("operatorname");
                        self.push("{");
                        self.out.push_str(&atom.nucleus);
                        self.push("}");
                    }
                }
                let default = symbols::default_limits(&atom.nucleus).unwrap_or(false);
                if *limits != default {
                    self.command(if *limits { "limits" } else { "nolimits" });
                }
            }
            AtomKind::Space(mu) => self.space(*mu),
            AtomKind::Style(style) => self.command(match style {
                LineStyle::Display => "displaystyle",
                LineStyle::Text => "textstyle",
                LineStyle::Script => "scriptstyle",
                LineStyle::ScriptScript => "scriptscriptstyle",
            }),
            AtomKind::Color(group) => {
                self.command(if group.text_color { "textcolor" } else { "color" });
                self.push("{");
                self.out.push_str(&group.color);
                self.push("}");
                self.group(&group.list);
            }
            AtomKind::Table(table) => self.table(table),
            AtomKind::Boundary => {
                self.command("middle");
                self.delimiter(&atom.nucleus);
            }
            _ => self.symbol(atom),
        }
    }

    fn fraction(&mut self, fraction: &Fraction) {
        if fraction.has_rule {
            let name = match (fraction.forced_style, fraction.continued) {
                (_, true) => "cfrac",
                (Some(LineStyle::Display), _) => "dfrac",
                (Some(LineStyle::Text), _) => "tfrac",
                _ => "frac",
            };
            self.command(name);
            self.group(&fraction.numerator);
            self.group(&fraction.denominator);
            return;
        }

        let delimiters = (
            fraction.left_delimiter.as_deref(),
            fraction.right_delimiter.as_deref(),
        );
        if delimiters == (Some("("), Some(")")) {
            self.command("binom");
            self.group(&fraction.numerator);
            self.group(&fraction.denominator);
            return;
        }
        let infix = match delimiters {
            (Some("["), Some("]")) => "brack",
            (Some("{"), Some("}")) => "brace",
            _ => "atop",
        };
        self.push("{");
        self.list(&fraction.numerator);
        self.command(infix);
        self.list(&fraction.denominator);
        self.push("}");
    }

    fn delimiter(&mut self, nucleus: &str) {
        match symbols::delimiter_markup(nucleus) {
            Some(markup) => match markup.strip_prefix('\\') {
                Some(name) => self.command(name),
                None => self.push(&markup),
            },
            None => self.push("."),
        }
    }

    fn inner(&mut self, inner: &Inner) {
        if let Some((name, table)) = environment_table(inner) {
            self.environment(name, table);
            return;
        }
        self.command("left");
        self.delimiter(inner.left.as_ref().map_or("", |a| a.nucleus.as_str()));
        self.list(&inner.list);
        self.command("right");
        self.delimiter(inner.right.as_ref().map_or("", |a| a.nucleus.as_str()));
    }

    fn space(&mut self, mu: f32) {
        let name = if mu == 3.0 {
            ","
        } else if mu == 4.0 {
            ">"
        } else if mu == 5.0 {
            ";"
        } else if mu == -3.0 {
            "!"
        } else if mu == 6.0 {
            " "
        } else if mu == 18.0 {
            "quad"
        } else if mu == 36.0 {
            "qquad"
        } else {
            self.command(&format!("mkern{mu}mu"));
            return;
        };
        self.command(name);
    }

    fn table(&mut self, table: &MathTable) {
        match table.environment.as_deref() {
            Some(name) => self.environment(name, table),
            None => {
                // Braced so atoms after the table stay outside its last cell
                self.push("{");
                self.rows(table);
                self.push("}");
            }
        }
    }

    fn environment(&mut self, name: &str, table: &MathTable) {
        self.command("begin");
        self.push("{");
        self.out.push_str(name);
        self.push("}");
        self.rows(table);
        self.command("end");
        self.push("{");
        self.out.push_str(name);
        self.push("}");
    }

    fn rows(&mut self, table: &MathTable) {
        let environment = table.environment.as_deref().unwrap_or_default();
        for (r, row) in table.cells.iter().enumerate() {
            if r > 0 {
                self.command("\\");
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    self.push("&");
                }
                let skip = usize::from(is_inserted_prefix(environment, c, cell));
                self.atoms(&cell.atoms[skip..]);
            }
        }
    }

    fn symbol(&mut self, atom: &Atom) {
        let nucleus = atom.nucleus.as_str();
        if nucleus.is_empty() {
            self.push("{}");
            return;
        }
        let atom_type = atom.atom_type();
        let is_operator = matches!(atom_type, AtomType::BinaryOperator | AtomType::UnaryOperator);
        if nucleus == "\u{2212}" && is_operator {
            self.push("-");
            return;
        }

        let mut chars = nucleus.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let reparsed = atom_for_character(c).map(|a| a.atom_type());
            let same_type = reparsed == Some(atom_type)
                || (is_operator && reparsed == Some(AtomType::BinaryOperator));
            if c.is_ascii() && same_type {
                self.push(nucleus);
                return;
            }
        }
        match symbols::symbol_name(atom) {
            Some(name) => self.command(name),
            None => self.push(nucleus),
        }
    }
}

/// Whether the first atom of a cell was inserted by the environment preset
fn is_inserted_prefix(environment: &str, column: usize, cell: &MathList) -> bool {
    let Some(first) = cell.atoms.first() else {
        return false;
    };
    match environment {
        "matrix" | "smallmatrix" | "pmatrix" | "bmatrix" | "Bmatrix" | "vmatrix" | "Vmatrix"
        | "cases" => matches!(first.kind, AtomKind::Style(_)),
        "eqalign" | "split" | "aligned" => {
            column == 1
                && first.atom_type() == AtomType::Ordinary
                && first.nucleus.is_empty()
                && !first.has_scripts()
        }
        _ => false,
    }
}

/// The environment table wrapped by a delimited matrix or `cases` group
fn environment_table(inner: &Inner) -> Option<(&str, &MathTable)> {
    let table = inner.list.atoms.iter().find_map(|atom| match &atom.kind {
        AtomKind::Table(table) if !atom.has_scripts() => Some(table),
        _ => None,
    })?;
    let name = table.environment.as_deref()?;
    let expected_len = if name == "cases" { 2 } else { 1 };
    if inner.list.len() != expected_len {
        return None;
    }
    matches!(
        name,
        "pmatrix" | "bmatrix" | "Bmatrix" | "vmatrix" | "Vmatrix" | "cases"
    )
    .then_some((name, table))
}

/// Markup for a list
pub fn to_markup(list: &MathList) -> String {
    let mut writer = Writer::new();
    writer.list(list);
    writer.out
}

impl MathList {
    /// Markup that parses back to this list
    pub fn to_markup(&self) -> String {
        to_markup(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    fn round_trip(markup: &str) -> String {
        let list = parse(markup).unwrap();
        let written = list.to_markup();
        assert_eq!(parse(&written).unwrap(), list, "reparse of {written:?}");
        written
    }

    #[test]
    fn test_plain_expression() {
        assert_eq!(round_trip("x + y = 2"), "x+y=2");
    }

    #[test]
    fn test_minus_and_unary() {
        assert_eq!(round_trip("-a - b"), "-a-b");
    }

    #[test]
    fn test_scripts() {
        assert_eq!(round_trip("x^{13+y}_{15-}"), "x^{13+y}_{15-}");
        assert_eq!(round_trip("^2"), "{}^{2}");
    }

    #[test]
    fn test_commands_are_separated_from_letters() {
        assert_eq!(round_trip("\\alpha x"), "\\alpha x");
        assert_eq!(round_trip("\\alpha+\\beta"), "\\alpha+\\beta");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(round_trip("\\frac{1}{2}"), "\\frac{1}{2}");
        assert_eq!(round_trip("\\dfrac12"), "\\dfrac{1}{2}");
        assert_eq!(round_trip("\\binom{n}{k}"), "\\binom{n}{k}");
        assert_eq!(round_trip("a \\atop b"), "{a\\atop b}");
        assert_eq!(round_trip("a \\brack b"), "{a\\brack b}");
    }

    #[test]
    fn test_radical() {
        assert_eq!(round_trip("\\sqrt[3]{x}"), "\\sqrt[3]{x}");
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(round_trip("\\left( x \\right)"), "\\left(x\\right)");
        assert_eq!(round_trip("\\left\\{ x \\right."), "\\left\\{x\\right.");
        assert_eq!(round_trip("\\left\\langle x \\middle| y \\right\\rangle"), "\\left<x\\middle|y\\right>");
    }

    #[test]
    fn test_font_groups() {
        assert_eq!(round_trip("\\mathbf{xy}z"), "\\mathbf{xy}z");
        assert_eq!(round_trip("\\mathrm{x^2}"), "\\mathrm{x}^{\\mathrm{2}}");
        assert_eq!(round_trip("\\text{if } x"), "\\text{if }x");
    }

    #[test]
    fn test_large_operators() {
        assert_eq!(round_trip("\\sum_{i=1}^n"), "\\sum^{n}_{i=1}");
        assert_eq!(round_trip("\\int\\limits_0^1"), "\\int\\limits^{1}_{0}");
        assert_eq!(round_trip("\\operatorname{rank}A"), "\\operatorname{rank}A");
    }

    #[test]
    fn test_spaces_and_styles() {
        assert_eq!(round_trip("a\\,b\\quad c"), "a\\,b\\quad c");
        assert_eq!(round_trip("a\\mkern7mu b"), "a\\mkern7mu b");
        assert_eq!(round_trip("\\displaystyle x"), "\\displaystyle x");
    }

    #[test]
    fn test_environments() {
        assert_eq!(
            round_trip("\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}"),
            "\\begin{pmatrix}a&b\\\\c&d\\end{pmatrix}"
        );
        assert_eq!(
            round_trip("\\begin{aligned} x &= 1 \\end{aligned}"),
            "\\begin{aligned}x&=1\\end{aligned}"
        );
        assert_eq!(
            round_trip("\\begin{cases} 1 & x > 0 \\\\ 0 & x \\le 0 \\end{cases}"),
            "\\begin{cases}1&x>0\\\\0&x\\leq0\\end{cases}"
        );
        assert_eq!(round_trip("a & b"), "{a&b}");
    }

    #[test]
    fn test_accents_and_lines() {
        assert_eq!(round_trip("\\hat x"), "\\hat{x}");
        assert_eq!(round_trip("\\overline{ab}"), "\\overline{ab}");
    }

    #[test]
    fn test_color() {
        assert_eq!(round_trip("\\color{red}{x}"), "\\color{red}{x}");
    }

    #[test]
    fn test_escaped_characters() {
        assert_eq!(round_trip("\\{ \\} \\# \\|"), "\\{\\}\\#\\|");
    }
}
