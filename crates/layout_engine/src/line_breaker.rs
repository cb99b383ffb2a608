//! Line Breaking for typeset math
//!
//! The top-level boxes of a typeset list are flattened into items: one
//! per text run segment and one per other box. Lines are filled greedily.
//! When an item overflows, the breaker scans back over a fixed window of
//! boundaries for the cheapest break, scored by the penalty table plus the
//! width the line would leave unused. If nothing in the window may be
//! broken, the line is forced to break at the overflow, or at the nearest
//! boundary that keeps scripts with their base and protected units whole.

use crate::units::{is_protected, text_breaks};
use crate::{LayoutError, LineBreakConfig, Result};
use math::display::{BoxKind, Child, MathBox};
use math::AtomType;
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, trace};

/// Where an item was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Segment { child: usize, segment: usize },
    Box { child: usize },
}

impl Source {
    fn child(self) -> usize {
        match self {
            Source::Segment { child, .. } | Source::Box { child } => child,
        }
    }
}

/// One unbreakable piece of the list
#[derive(Debug, Clone)]
struct Item {
    source: Source,
    /// Left edge in the unbroken list
    x: f32,
    width: f32,
    atom_type: Option<AtomType>,
    /// A script hung on the previous item
    attached: bool,
    is_text: bool,
    is_space: bool,
}

impl Item {
    fn right(&self) -> f32 {
        self.x + self.width
    }
}

fn flatten(children: &[Child]) -> Vec<Item> {
    let mut items = Vec::new();
    for (index, child) in children.iter().enumerate() {
        match child.node.kind() {
            BoxKind::Run(run) => {
                for (segment_index, segment) in run.segments.iter().enumerate() {
                    let text = run.text.get(segment.text_range.clone()).unwrap_or_default();
                    items.push(Item {
                        source: Source::Segment {
                            child: index,
                            segment: segment_index,
                        },
                        x: child.origin.x + segment.x,
                        width: segment.width,
                        atom_type: Some(segment.atom_type),
                        attached: false,
                        is_text: segment.is_text,
                        is_space: segment.is_text && !text.is_empty() && text.trim().is_empty(),
                    });
                }
            }
            _ => items.push(Item {
                source: Source::Box { child: index },
                x: child.origin.x,
                width: child.node.width(),
                atom_type: child.node.atom_type(),
                attached: child.node.script_role().is_some(),
                is_text: false,
                is_space: false,
            }),
        }
    }
    items
}

fn segment_text<'a>(children: &'a [Child], item: &Item) -> &'a str {
    let Source::Segment { child, segment } = item.source else {
        return "";
    };
    match children.get(child).map(|c| c.node.kind()) {
        Some(BoxKind::Run(run)) => run
            .segments
            .get(segment)
            .and_then(|s| run.text.get(s.text_range.clone()))
            .unwrap_or_default(),
        _ => "",
    }
}

/// Item indices inside text stretches where a line may start
fn text_boundaries(children: &[Child], items: &[Item]) -> HashSet<usize> {
    let mut allowed = HashSet::new();
    let mut start = 0;
    while start < items.len() {
        if !items[start].is_text {
            start += 1;
            continue;
        }
        let mut end = start;
        let mut text = String::new();
        let mut offsets = Vec::new();
        while end < items.len() && items[end].is_text {
            offsets.push((text.len(), end));
            text.push_str(segment_text(children, &items[end]));
            end += 1;
        }
        let breaks: HashSet<usize> = text_breaks(&text).into_iter().collect();
        allowed.extend(
            offsets
                .into_iter()
                .filter(|(offset, _)| breaks.contains(offset))
                .map(|(_, index)| index),
        );
        start = end;
    }
    allowed
}

/// Whether an item can be part of a grouped number such as `1,000.5`
fn is_numeric(item: &Item) -> bool {
    !item.is_text
        && matches!(item.source, Source::Segment { .. })
        && matches!(
            item.atom_type,
            Some(AtomType::Number | AtomType::Punctuation)
        )
}

/// Item indices that fall inside a grouped number in math mode.
///
/// Up to two numeric items on each side of a boundary are joined and the
/// boundary is tested as a text offset, so `1,000` stays whole while the
/// comma in `1, x` may still end a line.
fn number_joins(children: &[Child], items: &[Item]) -> HashSet<usize> {
    let mut joined = HashSet::new();
    for index in 1..items.len() {
        if !is_numeric(&items[index - 1]) || !is_numeric(&items[index]) {
            continue;
        }
        let first = (index.saturating_sub(2)..index)
            .rev()
            .take_while(|&i| is_numeric(&items[i]))
            .last()
            .unwrap_or(index - 1);
        let last = (index..items.len().min(index + 2))
            .take_while(|&i| is_numeric(&items[i]))
            .last()
            .unwrap_or(index);
        let mut text = String::new();
        let mut offset = 0;
        for i in first..=last {
            if i == index {
                offset = text.len();
            }
            text.push_str(segment_text(children, &items[i]));
        }
        if is_protected(&text, offset) {
            joined.insert(index);
        }
    }
    joined
}

/// Boundaries whose breakability depends on neighbouring text
struct Boundaries {
    /// Word starts inside upright text
    text_starts: HashSet<usize>,
    /// Boundaries inside a grouped number
    inside_numbers: HashSet<usize>,
}

/// Breaks typeset math into lines no wider than a given width
#[derive(Debug, Clone)]
pub struct LineBreaker {
    font_size: f32,
    config: LineBreakConfig,
}

impl LineBreaker {
    /// Create a line breaker for math set at `font_size` points
    pub fn new(font_size: f32) -> Self {
        Self::with_config(font_size, LineBreakConfig::default())
    }

    pub fn with_config(font_size: f32, config: LineBreakConfig) -> Self {
        Self { font_size, config }
    }

    pub fn config(&self) -> &LineBreakConfig {
        &self.config
    }

    /// Break the top-level boxes of `node` into lines.
    ///
    /// A box that already fits is returned unchanged. Otherwise the
    /// result is a container of line containers stacked downward from
    /// the first line's baseline.
    pub fn break_lines(&self, node: &MathBox, max_width: f32) -> Result<MathBox> {
        if !max_width.is_finite() || max_width <= 0.0 {
            return Err(LayoutError::InvalidWidth(max_width));
        }
        let BoxKind::Container(children) = node.kind() else {
            return Ok(node.clone());
        };
        if node.width() <= max_width {
            return Ok(node.clone());
        }

        let items = flatten(children);
        let bounds = Boundaries {
            text_starts: text_boundaries(children, &items),
            inside_numbers: number_joins(children, &items),
        };
        let ranges = self.choose_lines(&items, &bounds, max_width);
        debug!(
            items = items.len(),
            lines = ranges.len(),
            max_width,
            "broke math into lines"
        );
        let lines = ranges
            .into_iter()
            .map(|range| build_line(children, &items, range))
            .collect();
        Ok(self.stack(lines))
    }

    /// Cost of starting a line at item `index`, `None` when forbidden
    fn penalty(&self, items: &[Item], bounds: &Boundaries, index: usize) -> Option<f32> {
        let p = &self.config.penalties;
        let (prev, next) = (&items[index - 1], &items[index]);
        if next.attached || bounds.inside_numbers.contains(&index) {
            return None;
        }
        if prev.is_text && next.is_text {
            return bounds.text_starts.contains(&index).then_some(p.text);
        }
        match prev.atom_type {
            Some(AtomType::UnaryOperator) => return None,
            Some(AtomType::BinaryOperator) => return Some(p.binary),
            Some(AtomType::Relation) => return Some(p.relation),
            Some(AtomType::Punctuation) => return Some(p.punctuation),
            Some(AtomType::Close) => return Some(p.bracket),
            _ => {}
        }
        if next.atom_type == Some(AtomType::Open) {
            return Some(p.bracket);
        }
        Some(p.default)
    }

    /// Cheapest break in the window ending at the overflowing item
    fn best_break(
        &self,
        items: &[Item],
        bounds: &Boundaries,
        start: usize,
        overflow: usize,
        max_width: f32,
    ) -> Option<usize> {
        let first = (start + 1).max((overflow + 1).saturating_sub(self.config.window));
        let line_x = items[start].x;
        let mut best: Option<(usize, f32)> = None;
        for index in first..=overflow {
            let Some(penalty) = self.penalty(items, bounds, index) else {
                continue;
            };
            let width = items[start..index]
                .iter()
                .map(Item::right)
                .fold(line_x, f32::max)
                - line_x;
            let slack = (max_width - width).max(0.0) / max_width;
            let score = penalty + self.config.slack_weight * 100.0 * slack;
            trace!(index, penalty, score, "break candidate");
            if best.map_or(true, |(_, s)| score <= s) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    fn choose_lines(&self, items: &[Item], bounds: &Boundaries, max_width: f32) -> Vec<Range<usize>> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut index = 0;
        let mut right = f32::MIN;
        while index < items.len() {
            right = right.max(items[index].right());
            if index > start && right - items[start].x > max_width {
                let chosen = self
                    .best_break(items, bounds, start, index, max_width)
                    .or_else(|| forced_break(items, bounds, start, index));
                let Some(end) = chosen else {
                    break;
                };
                debug!(start, end, "line break");
                lines.push(start..end);
                start = end;
                // Continuation lines do not start with a space
                while start < items.len() && items[start].is_space {
                    start += 1;
                }
                index = start;
                right = f32::MIN;
                continue;
            }
            index += 1;
        }
        if start < items.len() {
            lines.push(start..items.len());
        }
        lines
    }

    fn stack(&self, lines: Vec<MathBox>) -> MathBox {
        let floor = self.config.min_line_height * self.font_size;
        let gap = self.config.min_line_gap * self.font_size;
        let width = lines.iter().map(MathBox::width).fold(0.0, f32::max);
        let mut y = 0.0;
        let mut previous_descent: Option<f32> = None;
        let mut children = Vec::with_capacity(lines.len());
        for line in lines {
            let descent = line.descent();
            let ascent = line.ascent().max(floor - descent);
            if let Some(previous) = previous_descent {
                y -= previous + gap + ascent;
            }
            children.push(Child::at(0.0, y, line));
            previous_descent = Some(descent);
        }
        MathBox::container(children, width)
    }
}

/// Whether a line may be forced to start at `index`: never on a script,
/// inside a grouped number, or inside a word of upright text
fn can_force(items: &[Item], bounds: &Boundaries, index: usize) -> bool {
    let (prev, next) = (&items[index - 1], &items[index]);
    let inside_word = prev.is_text && next.is_text && !bounds.text_starts.contains(&index);
    !next.attached && !inside_word && !bounds.inside_numbers.contains(&index)
}

/// Break at the overflow, or at the nearest boundary that keeps scripts
/// with their base and protected units whole
fn forced_break(items: &[Item], bounds: &Boundaries, start: usize, overflow: usize) -> Option<usize> {
    if can_force(items, bounds, overflow) {
        return Some(overflow);
    }
    (start + 1..overflow)
        .rev()
        .find(|&i| can_force(items, bounds, i))
        .or_else(|| (overflow + 1..items.len()).find(|&i| can_force(items, bounds, i)))
}

/// Children for the items in `range`, shifted so the line starts at x = 0
fn build_line(children: &[Child], items: &[Item], range: Range<usize>) -> MathBox {
    let Some(first) = items.get(range.start) else {
        return MathBox::empty();
    };
    let line_x = first.x;
    let line_items = &items[range];
    let advance = line_items.iter().map(Item::right).fold(line_x, f32::max) - line_x;

    let mut out = Vec::new();
    let mut i = 0;
    while i < line_items.len() {
        let child_index = line_items[i].source.child();
        let child = &children[child_index];
        match (line_items[i].source, child.node.kind()) {
            (Source::Segment { segment: first_segment, .. }, BoxKind::Run(run)) => {
                let mut last_segment = first_segment;
                while let Some(Source::Segment { child, segment }) = line_items.get(i + 1).map(|it| it.source) {
                    if child != child_index {
                        break;
                    }
                    last_segment = segment;
                    i += 1;
                }
                let slice = run.slice(first_segment..last_segment + 1);
                let x = child.origin.x + run.segments[first_segment].x - line_x;
                let mut node = MathBox::run(slice);
                if last_segment + 1 == run.segments.len() && child.node.has_trailing_script() {
                    node = node.with_trailing_script();
                }
                out.push(Child::at(x, child.origin.y, node));
            }
            _ => out.push(Child::at(
                child.origin.x - line_x,
                child.origin.y,
                child.node.clone(),
            )),
        }
        i += 1;
    }
    MathBox::container(out, advance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::{parse, LineStyle, Typesetter};
    use math_font::{FontMathMetrics, SyntheticFont};

    fn typeset(markup: &str) -> MathBox {
        let font = SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        Typesetter::new(metrics).typeset(&parse(markup).unwrap(), LineStyle::Text)
    }

    fn lines(node: &MathBox) -> Vec<&MathBox> {
        node.children().into_iter().map(|c| &c.node).collect()
    }

    fn line_text(line: &MathBox) -> String {
        line.children()
            .iter()
            .filter_map(|c| match c.node.kind() {
                BoxKind::Run(run) => Some(run.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_invalid_width_is_rejected() {
        let node = typeset("x");
        let breaker = LineBreaker::new(10.0);
        assert_eq!(
            breaker.break_lines(&node, 0.0).unwrap_err(),
            LayoutError::InvalidWidth(0.0)
        );
        assert!(breaker.break_lines(&node, f32::NAN).is_err());
    }

    #[test]
    fn test_fitting_box_is_unchanged() {
        let node = typeset("a+b");
        let broken = LineBreaker::new(10.0).break_lines(&node, 1000.0).unwrap();
        assert_eq!(broken, node);
    }

    #[test]
    fn test_breaks_after_binary_operators() {
        let node = typeset("a+b+c+d+e+f+g+h+i+j");
        let max_width = node.width() / 2.5;
        let broken = LineBreaker::new(10.0).break_lines(&node, max_width).unwrap();
        let lines = lines(&broken);
        assert!(lines.len() >= 3);
        for line in &lines[..lines.len() - 1] {
            assert!(line.width() <= max_width + 1e-3);
            assert!(line_text(line).ends_with('+'), "{:?}", line_text(line));
        }
    }

    #[test]
    fn test_lines_stack_downward() {
        let node = typeset("a+b+c+d+e+f+g+h");
        let broken = LineBreaker::new(10.0)
            .break_lines(&node, node.width() / 2.0)
            .unwrap();
        let children = broken.children();
        assert!(children.len() >= 2);
        assert_eq!(children[0].origin.y, 0.0);
        let gap = 0.2 * 10.0;
        for pair in children.windows(2) {
            assert!(pair[1].top() <= pair[0].bottom() - gap + 1e-3);
        }
    }

    #[test]
    fn test_scripts_stay_with_base() {
        let node = typeset("a+b+c+x^{2}+y^{3}+z^{4}");
        let breaker = LineBreaker::new(10.0);
        for divisor in [2.0, 3.0, 4.0] {
            let broken = breaker.break_lines(&node, node.width() / divisor).unwrap();
            for line in lines(&broken) {
                let first = &line.children()[0];
                assert!(first.node.script_role().is_none());
            }
        }
    }

    #[test]
    fn test_wide_atom_overflows_alone() {
        let node = typeset("\\frac{abcdefgh}{2}+x");
        let broken = LineBreaker::new(10.0).break_lines(&node, 10.0).unwrap();
        let lines = lines(&broken);
        assert!(lines.len() >= 2);
        assert!(lines[0].width() > 10.0);
        let first = lines[0].children();
        assert_eq!(first.len(), 1);
        assert!(matches!(first[0].node.kind(), BoxKind::Fraction(_)));
    }

    #[test]
    fn test_grouped_number_stays_whole() {
        let node = typeset("x=1,000,000,000");
        let breaker = LineBreaker::new(10.0);
        for divisor in [2.0, 3.0] {
            let broken = breaker.break_lines(&node, node.width() / divisor).unwrap();
            let texts: Vec<String> = lines(&broken).into_iter().map(line_text).collect();
            assert!(texts.len() >= 2);
            assert!(texts.iter().any(|t| t == "1,000,000,000"), "{texts:?}");
        }
    }

    #[test]
    fn test_comma_before_variable_still_breaks() {
        let node = typeset("1,a,2,b,3,c,4,d,5,e");
        let broken = LineBreaker::new(10.0)
            .break_lines(&node, node.width() / 2.0)
            .unwrap();
        let lines = lines(&broken);
        assert!(lines.len() >= 2);
        assert!(line_text(lines[0]).ends_with(','));
    }

    #[test]
    fn test_text_breaks_between_words() {
        let node = typeset("\\text{pay 1,000.50 now or later}");
        let broken = LineBreaker::new(10.0)
            .break_lines(&node, node.width() / 2.0)
            .unwrap();
        let texts: Vec<String> = lines(&broken).into_iter().map(line_text).collect();
        assert!(texts.len() >= 2);
        assert!(texts.iter().any(|t| t.contains("1,000.50")));
        for text in &texts[1..] {
            assert!(!text.starts_with(' '));
        }
    }
}
