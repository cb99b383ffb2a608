//! Markup parser - build atom lists from LaTeX-style math markup
//!
//! A [`Tokenizer`] splits the markup into characters and backslash
//! commands; [`MathListBuilder`] parses the tokens by recursive descent into
//! a [`MathList`]. [`parse`] additionally strips outer math delimiters,
//! validates, and finalizes the result.

use crate::error::{ParseError, ParseResult};
use crate::model::*;
use crate::symbols;
use std::mem;

// =============================================================================
// Tokenizer
// =============================================================================

/// Commands made of a single non-letter character
const SINGLE_CHAR_COMMANDS: &[char] = &[
    '{', '}', '$', '#', '%', '_', '&', '|', ' ', ',', '>', ';', '!', '\\',
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Char(char),
    Command(String),
}

/// Splits markup into tokens, tracking byte offsets
struct Tokenizer<'a> {
    input: &'a str,
    /// Offset of `input` inside the caller's markup
    base: usize,
    position: usize,
    /// Position before the last token, for one step of look-back
    previous: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, base: usize) -> Self {
        Self {
            input,
            base,
            position: 0,
            previous: 0,
        }
    }

    fn has_more(&self) -> bool {
        self.position < self.input.len()
    }

    /// Offset of the next unread byte in the caller's markup
    fn offset(&self) -> usize {
        self.base + self.position
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.previous = self.position;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Step back over the last token
    fn unlook(&mut self) {
        self.position = self.previous;
    }

    fn skip_spaces(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.position += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Option<Token>> {
        let start = self.position;
        let Some(c) = self.next_char() else {
            return Ok(None);
        };
        if c != '\\' {
            return Ok(Some(Token::Char(c)));
        }
        let command = self.read_command(start)?;
        self.previous = start;
        Ok(Some(Token::Command(command)))
    }

    fn read_command(&mut self, start: usize) -> ParseResult<String> {
        let Some(c) = self.next_char() else {
            return Err(ParseError::InvalidCommand {
                offset: self.base + start,
                name: String::new(),
            });
        };
        if SINGLE_CHAR_COMMANDS.contains(&c) {
            return Ok(c.to_string());
        }
        if !c.is_ascii_alphabetic() {
            return Err(ParseError::InvalidCommand {
                offset: self.base + start,
                name: c.to_string(),
            });
        }
        let mut name = c.to_string();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() {
                name.push(c);
                self.position += 1;
            } else {
                break;
            }
        }
        Ok(name)
    }

    /// Read `{...}` verbatim, returning the text between the braces
    fn read_braced_text(&mut self) -> Option<String> {
        self.skip_spaces();
        if self.next_char()? != '{' {
            return None;
        }
        let mut text = String::new();
        loop {
            match self.next_char()? {
                '}' => return Some(text),
                c => text.push(c),
            }
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// An open table environment
#[derive(Debug)]
struct Environment {
    /// `None` for a table started by a bare `&` or `\\`
    name: Option<String>,
    ended: bool,
    rows: usize,
}

/// An open `\left ... \right` group
#[derive(Debug, Default)]
struct InnerState {
    right: Option<Atom>,
}

/// Recursive-descent builder over a [`Tokenizer`].
///
/// The builder owns all parse state; on error the partially built lists
/// are dropped and only the error is returned.
pub struct MathListBuilder<'a> {
    tokens: Tokenizer<'a>,
    spaces_allowed: bool,
    font_style: FontStyle,
    environment: Option<Environment>,
    inner: Option<InnerState>,
}

impl<'a> MathListBuilder<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self::with_offset(markup, 0)
    }

    /// Builder over a slice that starts `base` bytes into the caller's markup
    pub fn with_offset(markup: &'a str, base: usize) -> Self {
        Self {
            tokens: Tokenizer::new(markup, base),
            spaces_allowed: false,
            font_style: FontStyle::Default,
            environment: None,
            inner: None,
        }
    }

    /// Parse the whole input into an unfinalized list
    pub fn build(mut self) -> ParseResult<MathList> {
        let list = self.build_internal(false, None)?;
        if self.tokens.has_more() {
            return Err(ParseError::MismatchedBraces {
                offset: self.tokens.offset(),
            });
        }
        Ok(list)
    }

    fn build_internal(&mut self, one_char_only: bool, stop: Option<char>) -> ParseResult<MathList> {
        let mut list = MathList::new();
        // Whether the last atom of `list` is the script target
        let mut has_prev = false;

        while let Some(token) = self.tokens.next_token()? {
            let offset = self.tokens.base + self.tokens.previous;

            if one_char_only && matches!(token, Token::Char('^' | '}' | '_' | '&')) {
                self.tokens.unlook();
                return Ok(list);
            }
            if let (Some(stop), Token::Char(c)) = (stop, &token) {
                if *c == stop {
                    return Ok(list);
                }
            }

            let atom = match token {
                Token::Char(c @ ('^' | '_')) => {
                    let superscript = c == '^';
                    let needs_base = match list.last() {
                        Some(prev) if has_prev && prev.allows_scripts() => {
                            let taken = if superscript {
                                prev.superscript.is_some()
                            } else {
                                prev.subscript.is_some()
                            };
                            if taken {
                                return Err(ParseError::UnexpectedScript {
                                    offset,
                                    message: format!("double {}", if superscript { "superscript" } else { "subscript" }),
                                });
                            }
                            false
                        }
                        Some(prev) if has_prev && prev.atom_type() == AtomType::Boundary => {
                            return Err(ParseError::UnexpectedScript {
                                offset,
                                message: format!("delimiter '{}' cannot carry scripts", prev.nucleus),
                            });
                        }
                        _ => true,
                    };
                    if needs_base {
                        list.add_atom(Atom::ordinary("").with_font_style(self.font_style));
                        has_prev = true;
                    }
                    let script = self.build_internal(true, None)?;
                    if let Some(prev) = list.last_mut() {
                        if superscript {
                            prev.superscript = Some(script);
                        } else {
                            prev.subscript = Some(script);
                        }
                    }
                    continue;
                }
                Token::Char('{') => {
                    let sublist = self.build_internal(false, Some('}'))?;
                    has_prev = !sublist.is_empty();
                    list.append(sublist);
                    if one_char_only {
                        return Ok(list);
                    }
                    continue;
                }
                Token::Char('}') => {
                    if let Some(env) = self.environment.as_mut() {
                        if env.name.is_none() {
                            // Closes the group around an environment-less table
                            self.tokens.unlook();
                            env.ended = true;
                            return Ok(list);
                        }
                    }
                    return Err(ParseError::MismatchedBraces { offset });
                }
                Token::Char('&') => {
                    if self.environment.is_some() {
                        return Ok(list);
                    }
                    let table = self.build_table(None, Some(mem::take(&mut list)), false, offset)?;
                    self.finish_stop(stop)?;
                    return Ok(MathList::from(vec![table]));
                }
                Token::Char(' ') if self.spaces_allowed => Atom::ordinary(" "),
                Token::Char(c) => match atom_for_character(c) {
                    Some(atom) => atom,
                    None => continue,
                },
                Token::Command(command) => {
                    if let Some(done) = self.stop_command(&command, &mut list, stop, offset)? {
                        return Ok(done);
                    }
                    let prev = if has_prev { list.last_mut() } else { None };
                    if apply_modifier(&command, prev, offset)? {
                        continue;
                    }
                    if let Some((style, spaces)) = symbols::font_style(&command) {
                        let old_spaces = mem::replace(&mut self.spaces_allowed, spaces);
                        let old_style = mem::replace(&mut self.font_style, style);
                        let sublist = self.build_internal(true, None);
                        self.spaces_allowed = old_spaces;
                        self.font_style = old_style;
                        let sublist = sublist?;
                        has_prev = !sublist.is_empty();
                        list.append(sublist);
                        if one_char_only {
                            return Ok(list);
                        }
                        continue;
                    }
                    self.atom_for_command(&command, offset)?
                }
            };

            list.add_atom(atom.with_font_style(self.font_style));
            has_prev = true;
            if one_char_only {
                return Ok(list);
            }
        }

        if stop.is_some() {
            return Err(ParseError::MismatchedBraces {
                offset: self.tokens.offset(),
            });
        }
        Ok(list)
    }

    /// Consume the stop character owed by a level that ended early
    fn finish_stop(&mut self, stop: Option<char>) -> ParseResult<()> {
        let Some(stop) = stop else {
            return Ok(());
        };
        match self.tokens.next_char() {
            Some(c) if c == stop => Ok(()),
            _ => Err(ParseError::MismatchedBraces {
                offset: self.tokens.offset(),
            }),
        }
    }

    /// Commands that end the current list. Returns the list to hand back
    /// to the caller, or `None` if `command` is not a stop command.
    fn stop_command(
        &mut self,
        command: &str,
        list: &mut MathList,
        stop: Option<char>,
        offset: usize,
    ) -> ParseResult<Option<MathList>> {
        match command {
            "right" => {
                if self.inner.is_none() {
                    return Err(ParseError::InvalidCommand {
                        offset,
                        name: command.to_string(),
                    });
                }
                let boundary = self.read_boundary(offset)?;
                if let Some(inner) = self.inner.as_mut() {
                    inner.right = Some(boundary);
                }
                if let Some(env) = self.environment.as_mut() {
                    if env.name.is_none() {
                        env.ended = true;
                    }
                }
                Ok(Some(mem::take(list)))
            }
            "over" | "atop" | "choose" | "brack" | "brace" => {
                let numerator = mem::take(list);
                let denominator = self.build_internal(false, stop)?;
                let fraction = match command {
                    "over" => Fraction::new(numerator, denominator),
                    "atop" => Fraction::stack(numerator, denominator, None, None),
                    "choose" => Fraction::stack(numerator, denominator, Some("("), Some(")")),
                    "brack" => Fraction::stack(numerator, denominator, Some("["), Some("]")),
                    _ => Fraction::stack(numerator, denominator, Some("{"), Some("}")),
                };
                let atom = Atom::fraction(fraction).with_font_style(self.font_style);
                Ok(Some(MathList::from(vec![atom])))
            }
            "\\" | "cr" => {
                if let Some(env) = self.environment.as_mut() {
                    env.rows += 1;
                    return Ok(Some(mem::take(list)));
                }
                let table = self.build_table(None, Some(mem::take(list)), true, offset)?;
                self.finish_stop(stop)?;
                Ok(Some(MathList::from(vec![table])))
            }
            "end" => {
                if self.environment.as_ref().map_or(true, |e| e.name.is_none()) {
                    return Err(ParseError::InvalidEnvironment {
                        offset,
                        message: "\\end without \\begin".to_string(),
                    });
                }
                let name = self.read_environment(offset)?;
                if let Some(env) = self.environment.as_mut() {
                    if env.name.as_deref() != Some(name.as_str()) {
                        return Err(ParseError::InvalidEnvironment {
                            offset,
                            message: format!(
                                "\\begin{{{}}} does not match \\end{{{}}}",
                                env.name.as_deref().unwrap_or_default(),
                                name
                            ),
                        });
                    }
                    env.ended = true;
                }
                Ok(Some(mem::take(list)))
            }
            _ => Ok(None),
        }
    }

    fn atom_for_command(&mut self, command: &str, offset: usize) -> ParseResult<Atom> {
        if let Some(atom) = symbols::symbol(command) {
            return Ok(atom);
        }
        if let Some(mut atom) = symbols::accent(command) {
            if let AtomKind::Accent(accent) = &mut atom.kind {
                accent.accentee = self.build_internal(true, None)?;
            }
            return Ok(atom);
        }

        let atom = match command {
            "frac" | "dfrac" | "tfrac" | "cfrac" => {
                let numerator = self.build_internal(true, None)?;
                let denominator = self.build_internal(true, None)?;
                let mut fraction = Fraction::new(numerator, denominator);
                match command {
                    "dfrac" => fraction.forced_style = Some(LineStyle::Display),
                    "tfrac" => fraction.forced_style = Some(LineStyle::Text),
                    "cfrac" => fraction.continued = true,
                    _ => {}
                }
                Atom::fraction(fraction)
            }
            "binom" => {
                let numerator = self.build_internal(true, None)?;
                let denominator = self.build_internal(true, None)?;
                Atom::fraction(Fraction::stack(numerator, denominator, Some("("), Some(")")))
            }
            "sqrt" => {
                let degree = if self.tokens.peek_char() == Some('[') {
                    self.tokens.next_char();
                    Some(self.build_internal(false, Some(']'))?)
                } else {
                    None
                };
                let radicand = self.build_internal(true, None)?;
                Atom::radical(radicand, degree)
            }
            "left" => {
                let left = self.read_boundary(offset)?;
                let outer = self.inner.replace(InnerState::default());
                let list = self.build_internal(false, None);
                let state = mem::replace(&mut self.inner, outer);
                let list = list?;
                let Some(right) = state.and_then(|s| s.right) else {
                    return Err(ParseError::MismatchedBraces {
                        offset: self.tokens.offset(),
                    });
                };
                Atom::new(
                    AtomKind::Inner(Inner {
                        list,
                        left: Some(Box::new(left)),
                        right: Some(Box::new(right)),
                    }),
                    "",
                )
            }
            "middle" => {
                if self.inner.is_none() {
                    return Err(ParseError::InvalidCommand {
                        offset,
                        name: command.to_string(),
                    });
                }
                self.read_boundary(offset)?
            }
            "overline" => Atom::new(AtomKind::Overline(self.build_internal(true, None)?), ""),
            "underline" => Atom::new(AtomKind::Underline(self.build_internal(true, None)?), ""),
            "begin" => {
                let name = self.read_environment(offset)?;
                self.build_table(Some(name), None, false, offset)?
            }
            "color" | "textcolor" => {
                let color = self
                    .tokens
                    .read_braced_text()
                    .ok_or(ParseError::MismatchedBraces {
                        offset: self.tokens.offset(),
                    })?;
                let list = self.build_internal(true, None)?;
                Atom::new(
                    AtomKind::Color(ColorGroup {
                        color: color.trim().to_string(),
                        list,
                        text_color: command == "textcolor",
                    }),
                    "",
                )
            }
            "operatorname" => {
                let name = self
                    .tokens
                    .read_braced_text()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| ParseError::InvalidCommand {
                        offset,
                        name: command.to_string(),
                    })?;
                Atom::new(AtomKind::LargeOperator { limits: false }, name)
            }
            "mkern" => Atom::space(self.read_mu(offset)?),
            _ => {
                return Err(ParseError::InvalidCommand {
                    offset,
                    name: command.to_string(),
                })
            }
        };
        Ok(atom)
    }

    /// Read the delimiter after `\left`, `\middle` or `\right`
    fn read_boundary(&mut self, offset: usize) -> ParseResult<Atom> {
        self.tokens.skip_spaces();
        let name = match self.tokens.next_token()? {
            Some(Token::Char(c)) => c.to_string(),
            Some(Token::Command(c)) if c == "|" => "||".to_string(),
            Some(Token::Command(c)) => c,
            None => String::new(),
        };
        let nucleus = symbols::delimiter(&name).ok_or(ParseError::InvalidDelimiter {
            offset,
            delimiter: name,
        })?;
        Ok(Atom::boundary(nucleus))
    }

    fn read_environment(&mut self, offset: usize) -> ParseResult<String> {
        self.tokens
            .read_braced_text()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ParseError::InvalidEnvironment {
                offset,
                message: "missing environment name".to_string(),
            })
    }

    /// Read `<number>mu` after `\mkern`
    fn read_mu(&mut self, offset: usize) -> ParseResult<f32> {
        self.tokens.skip_spaces();
        let mut number = String::new();
        while let Some(c) = self.tokens.peek_char() {
            if c.is_ascii_digit() || c == '.' || (c == '-' && number.is_empty()) {
                number.push(c);
                self.tokens.next_char();
            } else {
                break;
            }
        }
        let unit_ok = self.tokens.next_char() == Some('m') && self.tokens.next_char() == Some('u');
        match number.parse::<f32>() {
            Ok(mu) if unit_ok && mu.is_finite() => Ok(mu),
            _ => Err(ParseError::InvalidCommand {
                offset,
                name: "mkern".to_string(),
            }),
        }
    }

    /// Parse table rows until the environment ends
    fn build_table(
        &mut self,
        name: Option<String>,
        first: Option<MathList>,
        first_ends_row: bool,
        offset: usize,
    ) -> ParseResult<Atom> {
        let outer = self.environment.replace(Environment {
            name: name.clone(),
            ended: false,
            rows: 0,
        });
        let rows = self.build_table_rows(first, first_ends_row);
        let env = mem::replace(&mut self.environment, outer);
        let rows = rows?;

        if name.is_some() && !env.as_ref().is_some_and(|e| e.ended) {
            return Err(ParseError::InvalidEnvironment {
                offset,
                message: format!("missing \\end{{{}}}", name.as_deref().unwrap_or_default()),
            });
        }
        table_with_environment(name, rows, offset)
    }

    fn build_table_rows(
        &mut self,
        first: Option<MathList>,
        first_ends_row: bool,
    ) -> ParseResult<Vec<Vec<MathList>>> {
        let mut rows: Vec<Vec<MathList>> = vec![Vec::new()];
        let mut row = 0;
        if let Some(first) = first {
            rows[0].push(first);
            if first_ends_row {
                if let Some(env) = self.environment.as_mut() {
                    env.rows += 1;
                }
                row = 1;
                rows.push(Vec::new());
            }
        }

        while self.tokens.has_more() && !self.environment.as_ref().is_some_and(|e| e.ended) {
            let cell = self.build_internal(false, None)?;
            rows[row].push(cell);
            let env_rows = self.environment.as_ref().map_or(row, |e| e.rows);
            if env_rows > row {
                row = env_rows;
                rows.resize_with(row + 1, Vec::new);
            }
        }
        Ok(rows)
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub(crate) fn atom_for_character(c: char) -> Option<Atom> {
    let atom = match c {
        '(' | '[' => Atom::new(AtomKind::Open, c.to_string()),
        ')' | ']' | '!' | '?' => Atom::new(AtomKind::Close, c.to_string()),
        ',' | ';' => Atom::new(AtomKind::Punctuation, c.to_string()),
        '=' | '<' | '>' | ':' => Atom::relation(c.to_string()),
        '-' => Atom::binary("\u{2212}"),
        '+' | '*' => Atom::binary(c.to_string()),
        '.' | '0'..='9' => Atom::number(c.to_string()),
        'a'..='z' | 'A'..='Z' => Atom::variable(c.to_string()),
        '"' | '/' | '@' | '`' | '|' => Atom::ordinary(c.to_string()),
        // Spaces, controls and characters with no meaning in math mode
        c if c.is_ascii() => return None,
        c if c.is_whitespace() => return None,
        c if c.is_alphabetic() => Atom::variable(c.to_string()),
        c => Atom::ordinary(c.to_string()),
    };
    Some(atom)
}

/// Handle `\limits` / `\nolimits`; returns whether `command` was a modifier
fn apply_modifier(command: &str, prev: Option<&mut Atom>, offset: usize) -> ParseResult<bool> {
    let limits = match command {
        "limits" => true,
        "nolimits" => false,
        _ => return Ok(false),
    };
    match prev.map(|atom| &mut atom.kind) {
        Some(AtomKind::LargeOperator { limits: l }) => {
            *l = limits;
            Ok(true)
        }
        _ => Err(ParseError::UnexpectedScript {
            offset,
            message: format!("\\{command} must follow a large operator"),
        }),
    }
}

fn require_columns(
    table: &MathTable,
    name: &str,
    columns: usize,
    offset: usize,
) -> ParseResult<()> {
    if table.num_columns() != columns {
        return Err(ParseError::InvalidEnvironment {
            offset,
            message: format!(
                "{name} environment can only have {columns} column{}",
                if columns == 1 { "" } else { "s" }
            ),
        });
    }
    Ok(())
}

fn prepend_to_cells(table: &mut MathTable, atom: &Atom) {
    for cell in table.cells.iter_mut().flatten() {
        cell.insert_atom(0, atom.clone());
    }
}

fn wrap_in_inner(table: Atom, left: &str, right: &str, leading: Option<Atom>) -> Atom {
    let mut list = MathList::new();
    if let Some(atom) = leading {
        list.add_atom(atom);
    }
    list.add_atom(table);
    Atom::new(
        AtomKind::Inner(Inner {
            list,
            left: Some(Box::new(Atom::boundary(left))),
            right: Some(Box::new(Atom::boundary(right))),
        }),
        "",
    )
}

/// Delimiters wrapped around the matrix environments
fn matrix_delimiters(name: &str) -> Option<Option<(&'static str, &'static str)>> {
    let delimiters = match name {
        "matrix" | "smallmatrix" => None,
        "pmatrix" => Some(("(", ")")),
        "bmatrix" => Some(("[", "]")),
        "Bmatrix" => Some(("{", "}")),
        "vmatrix" => Some(("|", "|")),
        "Vmatrix" => Some(("\u{2016}", "\u{2016}")),
        _ => return None,
    };
    Some(delimiters)
}

/// Apply an environment's alignment, spacing and delimiter presets
fn table_with_environment(
    name: Option<String>,
    rows: Vec<Vec<MathList>>,
    offset: usize,
) -> ParseResult<Atom> {
    let mut table = MathTable::new(name.as_deref());
    for (r, row) in rows.into_iter().enumerate() {
        for (c, cell) in row.into_iter().enumerate() {
            table.set_cell(r, c, cell);
        }
    }

    let Some(name) = name else {
        table.row_spacing = 1.0;
        table.column_spacing = 0.0;
        for column in 0..table.num_columns() {
            table.set_alignment(column, ColumnAlignment::Left);
        }
        return Ok(Atom::table(table));
    };

    if let Some(delimiters) = matrix_delimiters(&name) {
        let small = name == "smallmatrix";
        table.row_spacing = 0.0;
        table.column_spacing = if small { 5.0 } else { 18.0 };
        let style = if small { LineStyle::Script } else { LineStyle::Text };
        prepend_to_cells(&mut table, &Atom::style(style));
        let atom = Atom::table(table);
        return Ok(match delimiters {
            Some((left, right)) => wrap_in_inner(atom, left, right, None),
            None => atom,
        });
    }

    match name.as_str() {
        "eqalign" | "split" | "aligned" => {
            require_columns(&table, &name, 2, offset)?;
            // Empty spacer so a leading relation in column 1 gets its spacing
            for row in table.cells.iter_mut() {
                if let Some(cell) = row.get_mut(1) {
                    cell.insert_atom(0, Atom::ordinary(""));
                }
            }
            table.row_spacing = 1.0;
            table.column_spacing = 0.0;
            table.set_alignment(0, ColumnAlignment::Right);
            table.set_alignment(1, ColumnAlignment::Left);
            Ok(Atom::table(table))
        }
        "gather" | "displaylines" => {
            require_columns(&table, &name, 1, offset)?;
            table.row_spacing = 1.0;
            table.column_spacing = 0.0;
            table.set_alignment(0, ColumnAlignment::Center);
            Ok(Atom::table(table))
        }
        "eqnarray" => {
            require_columns(&table, &name, 3, offset)?;
            table.row_spacing = 1.0;
            table.column_spacing = 18.0;
            table.set_alignment(0, ColumnAlignment::Right);
            table.set_alignment(1, ColumnAlignment::Center);
            table.set_alignment(2, ColumnAlignment::Left);
            Ok(Atom::table(table))
        }
        "cases" => {
            require_columns(&table, &name, 2, offset)?;
            table.row_spacing = 0.0;
            table.column_spacing = 18.0;
            table.set_alignment(0, ColumnAlignment::Left);
            table.set_alignment(1, ColumnAlignment::Left);
            prepend_to_cells(&mut table, &Atom::style(LineStyle::Text));
            Ok(wrap_in_inner(Atom::table(table), "{", "", Some(Atom::space(3.0))))
        }
        _ => Err(ParseError::InvalidEnvironment {
            offset,
            message: format!("unknown environment {name}"),
        }),
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Outer delimiter style of a markup string
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MathMode {
    /// `$$...$$` or `\[...\]`
    Display,
    /// `$...$` or `\(...\)`
    Inline,
}

/// Strip outer math delimiters, returning the body, its byte offset and mode
fn strip_math_delimiters(markup: &str) -> (&str, usize, Option<MathMode>) {
    let trimmed = markup.trim();
    let base = markup.len() - markup.trim_start().len();
    let pairs: [(&str, &str, MathMode); 4] = [
        ("$$", "$$", MathMode::Display),
        ("\\[", "\\]", MathMode::Display),
        ("$", "$", MathMode::Inline),
        ("\\(", "\\)", MathMode::Inline),
    ];
    for (open, close, mode) in pairs {
        if trimmed.len() >= open.len() + close.len()
            && trimmed.starts_with(open)
            && trimmed.ends_with(close)
        {
            let body = &trimmed[open.len()..trimmed.len() - close.len()];
            return (body, base + open.len(), Some(mode));
        }
    }
    (trimmed, base, None)
}

/// Parse markup into a finalized list, also reporting the outer mode.
///
/// Inline markup gets a leading text-style atom.
pub fn parse_with_mode(markup: &str) -> ParseResult<(MathList, Option<MathMode>)> {
    let (body, base, mode) = strip_math_delimiters(markup);
    let mut list = MathListBuilder::with_offset(body, base).build()?;
    if mode == Some(MathMode::Inline) {
        list.insert_atom(0, Atom::style(LineStyle::Text));
    }
    list.validate()?;
    let list = list.finalized();
    tracing::debug!(atoms = list.len(), ?mode, "parsed math markup");
    Ok((list, mode))
}

/// Parse markup into a finalized list
pub fn parse(markup: &str) -> ParseResult<MathList> {
    parse_with_mode(markup).map(|(list, _)| list)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &MathList) -> Vec<AtomType> {
        list.iter().map(Atom::atom_type).collect()
    }

    #[test]
    fn test_simple_expression() {
        let list = parse("x + y").unwrap();
        assert_eq!(
            types(&list),
            vec![AtomType::Variable, AtomType::BinaryOperator, AtomType::Variable]
        );
    }

    #[test]
    fn test_minus_becomes_unicode_minus() {
        let list = parse("a-b").unwrap();
        assert_eq!(list.atoms[1].nucleus, "\u{2212}");
    }

    #[test]
    fn test_scripts_attach_to_previous() {
        let list = parse("x^2_i").unwrap();
        assert_eq!(list.len(), 1);
        let x = &list.atoms[0];
        assert_eq!(x.superscript.as_ref().unwrap().atoms[0].nucleus, "2");
        assert_eq!(x.subscript.as_ref().unwrap().atoms[0].nucleus, "i");
    }

    #[test]
    fn test_script_without_base() {
        let list = parse("^2").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.atoms[0].atom_type(), AtomType::Ordinary);
        assert_eq!(list.atoms[0].nucleus, "");
        assert!(list.atoms[0].superscript.is_some());
    }

    #[test]
    fn test_empty_group_resets_script_target() {
        let list = parse("x{}^2").unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.atoms[0].superscript.is_none());
        assert_eq!(list.atoms[1].nucleus, "");
    }

    #[test]
    fn test_script_on_middle_delimiter_is_rejected() {
        let err = parse("\\left( x \\middle|^2 y \\right)").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedScript { offset: 17, .. }));
    }

    #[test]
    fn test_double_superscript_is_rejected() {
        let err = parse("x^2^3").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedScript { offset: 3, .. }));
    }

    #[test]
    fn test_fraction() {
        let list = parse("\\frac{1}{2}").unwrap();
        match &list.atoms[0].kind {
            AtomKind::Fraction(f) => {
                assert!(f.has_rule);
                assert_eq!(f.numerator.atoms[0].nucleus, "1");
                assert_eq!(f.denominator.atoms[0].nucleus, "2");
            }
            other => panic!("expected fraction, got {other:?}"),
        }
    }

    #[test]
    fn test_infix_fractions() {
        let list = parse("a \\choose b").unwrap();
        match &list.atoms[0].kind {
            AtomKind::Fraction(f) => {
                assert!(!f.has_rule);
                assert_eq!(f.left_delimiter.as_deref(), Some("("));
            }
            other => panic!("expected fraction, got {other:?}"),
        }
        let list = parse("x + {a \\over b}").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.atoms[2].atom_type(), AtomType::Fraction);
    }

    #[test]
    fn test_sqrt_with_degree() {
        let list = parse("\\sqrt[3]{x}").unwrap();
        match &list.atoms[0].kind {
            AtomKind::Radical(r) => {
                assert_eq!(r.degree.as_ref().unwrap().atoms[0].nucleus, "3");
                assert_eq!(r.radicand.atoms[0].nucleus, "x");
            }
            other => panic!("expected radical, got {other:?}"),
        }
    }

    #[test]
    fn test_left_right() {
        let list = parse("\\left( x \\middle| y \\right.").unwrap();
        match &list.atoms[0].kind {
            AtomKind::Inner(inner) => {
                assert_eq!(inner.left.as_ref().unwrap().nucleus, "(");
                assert_eq!(inner.right.as_ref().unwrap().nucleus, "");
                assert_eq!(inner.list.atoms[1].atom_type(), AtomType::Boundary);
            }
            other => panic!("expected inner, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_right() {
        let err = parse("\\left( x").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedBraces { .. }));
    }

    #[test]
    fn test_right_without_left() {
        let err = parse("x \\right)").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidCommand {
                offset: 2,
                name: "right".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = parse("\\left\\alpha x \\right)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDelimiter { offset: 0, .. }));
    }

    #[test]
    fn test_mismatched_braces() {
        assert!(matches!(
            parse("{x").unwrap_err(),
            ParseError::MismatchedBraces { .. }
        ));
        assert_eq!(
            parse("x}").unwrap_err(),
            ParseError::MismatchedBraces { offset: 1 }
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("a + \\foo").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidCommand {
                offset: 4,
                name: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_font_style_commands() {
        let list = parse("\\mathbf{x}y").unwrap();
        assert_eq!(list.atoms[0].font_style, FontStyle::Bold);
        assert_eq!(list.atoms[1].font_style, FontStyle::Default);

        let list = parse("\\text{a b}").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.atoms[1].nucleus, " ");
        assert!(list.iter().all(|a| a.font_style == FontStyle::Roman));
    }

    #[test]
    fn test_limits_modifier() {
        let list = parse("\\int\\limits_0^1").unwrap();
        assert_eq!(list.atoms[0].kind, AtomKind::LargeOperator { limits: true });
        assert!(parse("x\\limits").is_err());
    }

    #[test]
    fn test_operatorname() {
        let list = parse("\\operatorname{rank} A").unwrap();
        assert_eq!(list.atoms[0].nucleus, "rank");
        assert_eq!(list.atoms[0].kind, AtomKind::LargeOperator { limits: false });
    }

    #[test]
    fn test_mkern() {
        let list = parse("a\\mkern7.5mu b").unwrap();
        assert_eq!(list.atoms[1].kind, AtomKind::Space(7.5));
        assert!(parse("\\mkern7pt").is_err());
    }

    #[test]
    fn test_color() {
        let list = parse("\\color{#ff0000}{x+1}").unwrap();
        match &list.atoms[0].kind {
            AtomKind::Color(group) => {
                assert_eq!(group.color, "#ff0000");
                assert_eq!(group.list.len(), 3);
            }
            other => panic!("expected color, got {other:?}"),
        }
    }

    #[test]
    fn test_matrix_environment() {
        let list = parse("\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}").unwrap();
        let AtomKind::Inner(inner) = &list.atoms[0].kind else {
            panic!("expected inner");
        };
        assert_eq!(inner.left.as_ref().unwrap().nucleus, "(");
        let AtomKind::Table(table) = &inner.list.atoms[0].kind else {
            panic!("expected table");
        };
        assert_eq!(table.environment.as_deref(), Some("pmatrix"));
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 2);
        // Each cell starts with a text style atom
        let cell = table.cell(1, 0).unwrap();
        assert_eq!(cell.atoms[0].kind, AtomKind::Style(LineStyle::Text));
        assert_eq!(cell.atoms[1].nucleus, "c");
    }

    #[test]
    fn test_aligned_inserts_spacer() {
        let list = parse("\\begin{aligned} x &= 1 \\\\ y &= 2 \\end{aligned}").unwrap();
        let AtomKind::Table(table) = &list.atoms[0].kind else {
            panic!("expected table");
        };
        let cell = table.cell(0, 1).unwrap();
        assert_eq!(cell.atoms[0].nucleus, "");
        assert_eq!(cell.atoms[1].atom_type(), AtomType::Relation);
        assert_eq!(table.alignment(0), ColumnAlignment::Right);
    }

    #[test]
    fn test_environment_errors() {
        assert!(matches!(
            parse("\\begin{foo} x \\end{foo}").unwrap_err(),
            ParseError::InvalidEnvironment { .. }
        ));
        assert!(matches!(
            parse("\\begin{matrix} x \\end{pmatrix}").unwrap_err(),
            ParseError::InvalidEnvironment { .. }
        ));
        assert!(matches!(
            parse("\\begin{matrix} x").unwrap_err(),
            ParseError::InvalidEnvironment { .. }
        ));
        assert!(matches!(
            parse("x \\end{matrix}").unwrap_err(),
            ParseError::InvalidEnvironment { .. }
        ));
        assert!(matches!(
            parse("\\begin{cases} a & b & c \\end{cases}").unwrap_err(),
            ParseError::InvalidEnvironment { .. }
        ));
    }

    #[test]
    fn test_table_without_environment() {
        let list = parse("a & b \\\\ c").unwrap();
        assert_eq!(list.len(), 1);
        let AtomKind::Table(table) = &list.atoms[0].kind else {
            panic!("expected table");
        };
        assert!(table.environment.is_none());
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.alignment(1), ColumnAlignment::Left);
    }

    #[test]
    fn test_table_without_environment_in_group() {
        let list = parse("\\frac{a \\\\ b}{c}").unwrap();
        let AtomKind::Fraction(f) = &list.atoms[0].kind else {
            panic!("expected fraction");
        };
        assert_eq!(f.numerator.atoms[0].atom_type(), AtomType::Table);
        assert_eq!(f.denominator.atoms[0].nucleus, "c");
    }

    #[test]
    fn test_outer_delimiters() {
        let (list, mode) = parse_with_mode("$x$").unwrap();
        assert_eq!(mode, Some(MathMode::Inline));
        assert_eq!(list.atoms[0].kind, AtomKind::Style(LineStyle::Text));

        let (list, mode) = parse_with_mode("\\[x\\]").unwrap();
        assert_eq!(mode, Some(MathMode::Display));
        assert_eq!(list.len(), 1);

        let (_, mode) = parse_with_mode("x").unwrap();
        assert_eq!(mode, None);
    }

    #[test]
    fn test_error_offset_inside_delimiters() {
        let err = parse("$$ \\foo $$").unwrap_err();
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn test_non_ascii_characters() {
        let list = parse("\u{03B1} \u{2211}").unwrap();
        assert_eq!(list.atoms[0].atom_type(), AtomType::Variable);
        assert_eq!(list.atoms[1].atom_type(), AtomType::Ordinary);
    }

    #[test]
    fn test_accent() {
        let list = parse("\\hat{x} \\widehat{xy}").unwrap();
        match (&list.atoms[0].kind, &list.atoms[1].kind) {
            (AtomKind::Accent(narrow), AtomKind::Accent(wide)) => {
                assert!(!narrow.is_wide);
                assert!(wide.is_wide);
                assert_eq!(wide.accentee.len(), 2);
            }
            other => panic!("expected accents, got {other:?}"),
        }
    }
}
