//! Command tables
//!
//! Named symbols, accents, delimiters and font-style commands. Lookups by
//! name go forward; the serializer goes backward and always takes the
//! first-declared spelling for a nucleus, so declaration order matters.

use crate::model::{Accent, Atom, AtomKind, AtomType, FontStyle, LineStyle};

/// What a named symbol command produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolKind {
    Variable,
    Ordinary,
    Binary,
    Relation,
    Open,
    Close,
    Punctuation,
    LargeOperator { limits: bool },
    /// Fixed space in mu
    Space(f32),
    Style(LineStyle),
}

#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    pub name: &'static str,
    pub kind: SymbolKind,
    pub nucleus: &'static str,
}

const fn var(name: &'static str, nucleus: &'static str) -> Symbol {
    Symbol { name, kind: SymbolKind::Variable, nucleus }
}

const fn ord(name: &'static str, nucleus: &'static str) -> Symbol {
    Symbol { name, kind: SymbolKind::Ordinary, nucleus }
}

const fn bin(name: &'static str, nucleus: &'static str) -> Symbol {
    Symbol { name, kind: SymbolKind::Binary, nucleus }
}

const fn rel(name: &'static str, nucleus: &'static str) -> Symbol {
    Symbol { name, kind: SymbolKind::Relation, nucleus }
}

const fn open(name: &'static str, nucleus: &'static str) -> Symbol {
    Symbol { name, kind: SymbolKind::Open, nucleus }
}

const fn close(name: &'static str, nucleus: &'static str) -> Symbol {
    Symbol { name, kind: SymbolKind::Close, nucleus }
}

const fn op(name: &'static str, nucleus: &'static str, limits: bool) -> Symbol {
    Symbol { name, kind: SymbolKind::LargeOperator { limits }, nucleus }
}

const fn space(name: &'static str, mu: f32) -> Symbol {
    Symbol { name, kind: SymbolKind::Space(mu), nucleus: "" }
}

const fn style(name: &'static str, style: LineStyle) -> Symbol {
    Symbol { name, kind: SymbolKind::Style(style), nucleus: "" }
}

pub static SYMBOLS: &[Symbol] = &[
    // Escaped characters
    ord("$", "$"),
    ord("#", "#"),
    ord("%", "%"),
    ord("_", "_"),
    ord("&", "&"),
    open("{", "{"),
    close("}", "}"),
    ord("|", "\u{2016}"),
    // Greek, lowercase
    var("alpha", "\u{03B1}"),
    var("beta", "\u{03B2}"),
    var("gamma", "\u{03B3}"),
    var("delta", "\u{03B4}"),
    var("varepsilon", "\u{03B5}"),
    var("zeta", "\u{03B6}"),
    var("eta", "\u{03B7}"),
    var("theta", "\u{03B8}"),
    var("iota", "\u{03B9}"),
    var("kappa", "\u{03BA}"),
    var("lambda", "\u{03BB}"),
    var("mu", "\u{03BC}"),
    var("nu", "\u{03BD}"),
    var("xi", "\u{03BE}"),
    var("omicron", "\u{03BF}"),
    var("pi", "\u{03C0}"),
    var("rho", "\u{03C1}"),
    var("varsigma", "\u{03C2}"),
    var("sigma", "\u{03C3}"),
    var("tau", "\u{03C4}"),
    var("upsilon", "\u{03C5}"),
    var("varphi", "\u{03C6}"),
    var("chi", "\u{03C7}"),
    var("psi", "\u{03C8}"),
    var("omega", "\u{03C9}"),
    var("vartheta", "\u{03D1}"),
    var("phi", "\u{03D5}"),
    var("varpi", "\u{03D6}"),
    var("varkappa", "\u{03F0}"),
    var("varrho", "\u{03F1}"),
    var("epsilon", "\u{03F5}"),
    // Greek, uppercase
    var("Gamma", "\u{0393}"),
    var("Delta", "\u{0394}"),
    var("Theta", "\u{0398}"),
    var("Lambda", "\u{039B}"),
    var("Xi", "\u{039E}"),
    var("Pi", "\u{03A0}"),
    var("Sigma", "\u{03A3}"),
    var("Upsilon", "\u{03A5}"),
    var("Phi", "\u{03A6}"),
    var("Psi", "\u{03A8}"),
    var("Omega", "\u{03A9}"),
    var("imath", "\u{0131}"),
    var("jmath", "\u{0237}"),
    // Binary operators
    bin("times", "\u{00D7}"),
    bin("div", "\u{00F7}"),
    bin("pm", "\u{00B1}"),
    bin("mp", "\u{2213}"),
    bin("cdot", "\u{22C5}"),
    bin("ast", "\u{2217}"),
    bin("circ", "\u{2218}"),
    bin("bullet", "\u{2219}"),
    bin("setminus", "\u{2216}"),
    bin("cap", "\u{2229}"),
    bin("cup", "\u{222A}"),
    bin("wedge", "\u{2227}"),
    bin("land", "\u{2227}"),
    bin("vee", "\u{2228}"),
    bin("lor", "\u{2228}"),
    bin("oplus", "\u{2295}"),
    bin("ominus", "\u{2296}"),
    bin("otimes", "\u{2297}"),
    bin("oslash", "\u{2298}"),
    bin("odot", "\u{2299}"),
    bin("star", "\u{22C6}"),
    bin("diamond", "\u{22C4}"),
    // Relations
    rel("leq", "\u{2264}"),
    rel("le", "\u{2264}"),
    rel("geq", "\u{2265}"),
    rel("ge", "\u{2265}"),
    rel("neq", "\u{2260}"),
    rel("ne", "\u{2260}"),
    rel("equiv", "\u{2261}"),
    rel("approx", "\u{2248}"),
    rel("sim", "\u{223C}"),
    rel("simeq", "\u{2243}"),
    rel("cong", "\u{2245}"),
    rel("propto", "\u{221D}"),
    rel("asymp", "\u{224D}"),
    rel("doteq", "\u{2250}"),
    rel("in", "\u{2208}"),
    rel("notin", "\u{2209}"),
    rel("ni", "\u{220B}"),
    rel("subset", "\u{2282}"),
    rel("supset", "\u{2283}"),
    rel("subseteq", "\u{2286}"),
    rel("supseteq", "\u{2287}"),
    rel("ll", "\u{226A}"),
    rel("gg", "\u{226B}"),
    rel("prec", "\u{227A}"),
    rel("succ", "\u{227B}"),
    rel("perp", "\u{22A5}"),
    rel("mid", "\u{2223}"),
    rel("parallel", "\u{2225}"),
    rel("vdash", "\u{22A2}"),
    rel("dashv", "\u{22A3}"),
    rel("models", "\u{22A8}"),
    rel("to", "\u{2192}"),
    rel("rightarrow", "\u{2192}"),
    rel("leftarrow", "\u{2190}"),
    rel("gets", "\u{2190}"),
    rel("uparrow", "\u{2191}"),
    rel("downarrow", "\u{2193}"),
    rel("leftrightarrow", "\u{2194}"),
    rel("Rightarrow", "\u{21D2}"),
    rel("Leftarrow", "\u{21D0}"),
    rel("Leftrightarrow", "\u{21D4}"),
    rel("mapsto", "\u{21A6}"),
    rel("implies", "\u{27F9}"),
    rel("impliedby", "\u{27F8}"),
    rel("iff", "\u{27FA}"),
    // Punctuation
    Symbol {
        name: "colon",
        kind: SymbolKind::Punctuation,
        nucleus: ":",
    },
    // Delimiters used as plain symbols
    open("langle", "\u{27E8}"),
    close("rangle", "\u{27E9}"),
    open("lceil", "\u{2308}"),
    close("rceil", "\u{2309}"),
    open("lfloor", "\u{230A}"),
    close("rfloor", "\u{230B}"),
    open("lgroup", "\u{27EE}"),
    close("rgroup", "\u{27EF}"),
    open("lbrace", "{"),
    close("rbrace", "}"),
    // Ordinary symbols
    ord("infty", "\u{221E}"),
    ord("partial", "\u{2202}"),
    ord("nabla", "\u{2207}"),
    ord("forall", "\u{2200}"),
    ord("exists", "\u{2203}"),
    ord("neg", "\u{00AC}"),
    ord("lnot", "\u{00AC}"),
    ord("emptyset", "\u{2205}"),
    ord("hbar", "\u{210F}"),
    ord("ell", "\u{2113}"),
    ord("Re", "\u{211C}"),
    ord("Im", "\u{2111}"),
    ord("aleph", "\u{2135}"),
    ord("wp", "\u{2118}"),
    ord("prime", "\u{2032}"),
    ord("angle", "\u{2220}"),
    ord("triangle", "\u{25B3}"),
    ord("square", "\u{25A1}"),
    ord("ldots", "\u{2026}"),
    ord("cdots", "\u{22EF}"),
    ord("vdots", "\u{22EE}"),
    ord("ddots", "\u{22F1}"),
    ord("degree", "\u{00B0}"),
    ord("dagger", "\u{2020}"),
    ord("ddagger", "\u{2021}"),
    ord("top", "\u{22A4}"),
    ord("bot", "\u{22A5}"),
    ord("surd", "\u{221A}"),
    ord("vert", "|"),
    ord("Vert", "\u{2016}"),
    ord("backslash", "\\"),
    ord("spadesuit", "\u{2660}"),
    ord("heartsuit", "\u{2661}"),
    ord("diamondsuit", "\u{2662}"),
    ord("clubsuit", "\u{2663}"),
    // Large operators
    op("sum", "\u{2211}", true),
    op("prod", "\u{220F}", true),
    op("coprod", "\u{2210}", true),
    op("int", "\u{222B}", false),
    op("iint", "\u{222C}", false),
    op("iiint", "\u{222D}", false),
    op("oint", "\u{222E}", false),
    op("bigcap", "\u{22C2}", true),
    op("bigcup", "\u{22C3}", true),
    op("bigvee", "\u{22C1}", true),
    op("bigwedge", "\u{22C0}", true),
    op("bigodot", "\u{2A00}", true),
    op("bigoplus", "\u{2A01}", true),
    op("bigotimes", "\u{2A02}", true),
    op("biguplus", "\u{2A04}", true),
    op("bigsqcup", "\u{2A06}", true),
    // Named operators
    op("arcsin", "arcsin", false),
    op("arccos", "arccos", false),
    op("arctan", "arctan", false),
    op("arg", "arg", false),
    op("cos", "cos", false),
    op("cosh", "cosh", false),
    op("cot", "cot", false),
    op("coth", "coth", false),
    op("csc", "csc", false),
    op("deg", "deg", false),
    op("dim", "dim", false),
    op("exp", "exp", false),
    op("hom", "hom", false),
    op("ker", "ker", false),
    op("lg", "lg", false),
    op("ln", "ln", false),
    op("log", "log", false),
    op("sec", "sec", false),
    op("sin", "sin", false),
    op("sinh", "sinh", false),
    op("tan", "tan", false),
    op("tanh", "tanh", false),
    op("det", "det", true),
    op("gcd", "gcd", true),
    op("inf", "inf", true),
    op("lim", "lim", true),
    op("liminf", "lim inf", true),
    op("limsup", "lim sup", true),
    op("max", "max", true),
    op("min", "min", true),
    op("Pr", "Pr", true),
    op("sup", "sup", true),
    // Spacing
    space(",", 3.0),
    space(">", 4.0),
    space(";", 5.0),
    space("!", -3.0),
    space(" ", 6.0),
    space("quad", 18.0),
    space("qquad", 36.0),
    // Styles
    style("displaystyle", LineStyle::Display),
    style("textstyle", LineStyle::Text),
    style("scriptstyle", LineStyle::Script),
    style("scriptscriptstyle", LineStyle::ScriptScript),
];

/// Build the atom for a named symbol command
pub fn symbol(name: &str) -> Option<Atom> {
    let entry = SYMBOLS.iter().find(|s| s.name == name)?;
    let atom = match entry.kind {
        SymbolKind::Variable => Atom::new(AtomKind::Variable, entry.nucleus),
        SymbolKind::Ordinary => Atom::new(AtomKind::Ordinary, entry.nucleus),
        SymbolKind::Binary => Atom::new(AtomKind::BinaryOperator, entry.nucleus),
        SymbolKind::Relation => Atom::new(AtomKind::Relation, entry.nucleus),
        SymbolKind::Open => Atom::new(AtomKind::Open, entry.nucleus),
        SymbolKind::Close => Atom::new(AtomKind::Close, entry.nucleus),
        SymbolKind::Punctuation => Atom::new(AtomKind::Punctuation, entry.nucleus),
        SymbolKind::LargeOperator { limits } => {
            Atom::new(AtomKind::LargeOperator { limits }, entry.nucleus)
        }
        SymbolKind::Space(mu) => Atom::space(mu),
        SymbolKind::Style(style) => Atom::style(style),
    };
    Some(atom)
}

fn kind_matches(kind: SymbolKind, atom_type: AtomType) -> bool {
    matches!(
        (kind, atom_type),
        (SymbolKind::Variable, AtomType::Variable)
            | (SymbolKind::Ordinary, AtomType::Ordinary)
            | (SymbolKind::Binary, AtomType::BinaryOperator)
            | (SymbolKind::Binary, AtomType::UnaryOperator)
            | (SymbolKind::Relation, AtomType::Relation)
            | (SymbolKind::Open, AtomType::Open)
            | (SymbolKind::Close, AtomType::Close)
            | (SymbolKind::Punctuation, AtomType::Punctuation)
            | (SymbolKind::LargeOperator { .. }, AtomType::LargeOperator)
    )
}

/// First-declared command name producing `atom`'s type and nucleus
pub fn symbol_name(atom: &Atom) -> Option<&'static str> {
    let atom_type = atom.atom_type();
    SYMBOLS
        .iter()
        .find(|s| kind_matches(s.kind, atom_type) && s.nucleus == atom.nucleus)
        .map(|s| s.name)
}

/// Default limits placement of a large operator nucleus
pub fn default_limits(nucleus: &str) -> Option<bool> {
    SYMBOLS.iter().find_map(|s| match s.kind {
        SymbolKind::LargeOperator { limits } if s.nucleus == nucleus => Some(limits),
        _ => None,
    })
}

// =============================================================================
// Accents
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct AccentEntry {
    pub name: &'static str,
    pub nucleus: &'static str,
    pub is_wide: bool,
}

const fn accent_entry(name: &'static str, nucleus: &'static str, is_wide: bool) -> AccentEntry {
    AccentEntry { name, nucleus, is_wide }
}

pub static ACCENTS: &[AccentEntry] = &[
    accent_entry("grave", "\u{0300}", false),
    accent_entry("acute", "\u{0301}", false),
    accent_entry("hat", "\u{0302}", false),
    accent_entry("tilde", "\u{0303}", false),
    accent_entry("bar", "\u{0304}", false),
    accent_entry("breve", "\u{0306}", false),
    accent_entry("dot", "\u{0307}", false),
    accent_entry("ddot", "\u{0308}", false),
    accent_entry("mathring", "\u{030A}", false),
    accent_entry("check", "\u{030C}", false),
    accent_entry("vec", "\u{20D7}", false),
    accent_entry("widehat", "\u{0302}", true),
    accent_entry("widetilde", "\u{0303}", true),
    accent_entry("widecheck", "\u{030C}", true),
    accent_entry("overleftarrow", "\u{20D6}", true),
    accent_entry("overrightarrow", "\u{20D7}", true),
    accent_entry("overleftrightarrow", "\u{20E1}", true),
];

/// An accent atom with an empty accentee
pub fn accent(name: &str) -> Option<Atom> {
    let entry = ACCENTS.iter().find(|a| a.name == name)?;
    Some(Atom::new(
        AtomKind::Accent(Accent {
            is_wide: entry.is_wide,
            ..Default::default()
        }),
        entry.nucleus,
    ))
}

pub fn accent_name(nucleus: &str, is_wide: bool) -> Option<&'static str> {
    ACCENTS
        .iter()
        .find(|a| a.nucleus == nucleus && a.is_wide == is_wide)
        .map(|a| a.name)
}

// =============================================================================
// Delimiters
// =============================================================================

/// Names accepted after `\left`, `\middle` and `\right`, with their glyphs.
/// Single-character names are read raw; the rest follow a backslash.
pub static DELIMITERS: &[(&str, &str)] = &[
    (".", ""),
    ("(", "("),
    (")", ")"),
    ("[", "["),
    ("]", "]"),
    ("<", "\u{27E8}"),
    (">", "\u{27E9}"),
    ("/", "/"),
    ("|", "|"),
    ("||", "\u{2016}"),
    ("{", "{"),
    ("}", "}"),
    ("backslash", "\\"),
    ("langle", "\u{27E8}"),
    ("rangle", "\u{27E9}"),
    ("lgroup", "\u{27EE}"),
    ("rgroup", "\u{27EF}"),
    ("vert", "|"),
    ("Vert", "\u{2016}"),
    ("lbrace", "{"),
    ("rbrace", "}"),
    ("lceil", "\u{2308}"),
    ("rceil", "\u{2309}"),
    ("lfloor", "\u{230A}"),
    ("rfloor", "\u{230B}"),
    ("uparrow", "\u{2191}"),
    ("downarrow", "\u{2193}"),
    ("updownarrow", "\u{2195}"),
    ("Uparrow", "\u{21D1}"),
    ("Downarrow", "\u{21D3}"),
    ("Updownarrow", "\u{21D5}"),
];

pub fn delimiter(name: &str) -> Option<&'static str> {
    DELIMITERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, nucleus)| *nucleus)
}

/// Markup spelling of a delimiter glyph, as written after `\left`
pub fn delimiter_markup(nucleus: &str) -> Option<String> {
    let (name, _) = DELIMITERS.iter().find(|(_, n)| *n == nucleus)?;
    let markup = match *name {
        "||" => "\\|".to_string(),
        "{" | "}" => format!("\\{name}"),
        n if n.chars().all(|c| c.is_ascii_alphabetic()) => format!("\\{n}"),
        n => n.to_string(),
    };
    Some(markup)
}

// =============================================================================
// Font Styles
// =============================================================================

/// Font style selected by a command, and whether spaces are kept inside it
pub fn font_style(name: &str) -> Option<(FontStyle, bool)> {
    let style = match name {
        "mathnormal" => FontStyle::Default,
        "mathrm" | "rm" => FontStyle::Roman,
        "text" => return Some((FontStyle::Roman, true)),
        "mathbf" | "bf" => FontStyle::Bold,
        "mathcal" | "cal" => FontStyle::Caligraphic,
        "mathtt" => FontStyle::Typewriter,
        "mathit" | "mit" => FontStyle::Italic,
        "mathsf" | "sf" => FontStyle::SansSerif,
        "mathfrak" | "frak" => FontStyle::Fraktur,
        "mathbb" => FontStyle::Blackboard,
        "mathbfit" | "bm" => FontStyle::BoldItalic,
        _ => return None,
    };
    Some((style, false))
}

pub fn font_style_name(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Default => "mathnormal",
        FontStyle::Roman => "mathrm",
        FontStyle::Bold => "mathbf",
        FontStyle::Caligraphic => "mathcal",
        FontStyle::Typewriter => "mathtt",
        FontStyle::Italic => "mathit",
        FontStyle::SansSerif => "mathsf",
        FontStyle::Fraktur => "mathfrak",
        FontStyle::Blackboard => "mathbb",
        FontStyle::BoldItalic => "mathbfit",
    }
}
