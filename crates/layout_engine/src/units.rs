//! Break opportunities inside upright text
//!
//! UAX #14 proposes the candidates. A candidate is dropped when it would
//! split a protected unit: a grapheme cluster, a word (which keeps
//! decimal numbers and contractions whole), a hyphenated compound, or
//! the boundary before CJK small kana or closing punctuation.

use std::collections::HashSet;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

const HYPHENS: &[char] = &['-', '\u{2010}', '\u{2011}'];

/// Small kana and the prolonged sound mark, which never start a line
fn is_small_kana(ch: char) -> bool {
    matches!(
        ch,
        'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'っ' | 'ゃ' | 'ゅ' | 'ょ' | 'ゎ' | 'ゕ' | 'ゖ'
            | 'ァ' | 'ィ' | 'ゥ' | 'ェ' | 'ォ' | 'ッ' | 'ャ' | 'ュ' | 'ョ' | 'ヮ' | 'ヵ' | 'ヶ'
            | 'ー'
            | '\u{31F0}'..='\u{31FF}'
    )
}

fn is_closing_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '、' | '。' | '，' | '．' | '）' | '」' | '』' | '】' | '〕' | '〉' | '》' | '〗' | '〙'
            | '〛' | '！' | '？' | '：' | '；' | '・' | ')' | ']' | '}' | ',' | '.' | '!' | '?'
            | ';' | ':'
    )
}

/// Boundaries the segmentation rules do not cover
fn splits_unit(text: &str, offset: usize) -> bool {
    let (Some(before), Some(after)) = (text.get(..offset), text.get(offset..)) else {
        return true;
    };
    let mut back = before.chars().rev();
    let prev = back.next();
    let prev2 = back.next();
    let next = after.chars().next();

    if let Some(next) = next {
        if is_small_kana(next) || is_closing_punctuation(next) {
            return true;
        }
    }
    // A hyphen between alphanumerics joins a compound
    match (prev2, prev, next) {
        (Some(a), Some(h), Some(b)) if HYPHENS.contains(&h) => a.is_alphanumeric() && b.is_alphanumeric(),
        _ => false,
    }
}

/// Whether a break at byte `offset` would split a protected unit
pub fn is_protected(text: &str, offset: usize) -> bool {
    if offset == 0 || offset >= text.len() {
        return false;
    }
    if !text.is_char_boundary(offset) {
        return true;
    }
    let inside_grapheme = !text.grapheme_indices(true).any(|(i, _)| i == offset);
    let inside_word = !text.split_word_bound_indices().any(|(i, _)| i == offset);
    inside_grapheme || inside_word || splits_unit(text, offset)
}

/// Byte offsets where a line may start inside `text`, ascending.
///
/// Offsets 0 and `text.len()` are never reported.
pub fn text_breaks(text: &str) -> Vec<usize> {
    let graphemes: HashSet<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
    let words: HashSet<usize> = text.split_word_bound_indices().map(|(i, _)| i).collect();
    linebreaks(text)
        .filter(|&(offset, kind)| kind == BreakOpportunity::Allowed && offset > 0 && offset < text.len())
        .map(|(offset, _)| offset)
        .filter(|o| graphemes.contains(o) && words.contains(o) && !splits_unit(text, *o))
        .collect()
}
