//! Property tests for line breaking over generated formulas

use layout_engine::{LineBreakConfig, LineBreaker};
use math::display::{BoxKind, MathBox};
use math::{parse, LineStyle, Typesetter};
use math_font::{FontMathMetrics, SyntheticFont};
use proptest::prelude::*;

const TOKENS: &[&str] = &[
    "a", "b", "x", "12", "+", "-", "=", "<", "(", ")", "x^{2}", "y_{1}", "\\frac{1}{2}",
    "\\sqrt{x}", "\\alpha",
];

const WORDS: &[&str] = &["3.14", "1,000", "word", "math", "x2", "line"];

fn typeset(markup: &str) -> Option<MathBox> {
    let font = SyntheticFont::default();
    let metrics = FontMathMetrics::new(&font, 10.0).ok()?;
    let list = parse(markup).ok()?;
    Some(Typesetter::new(metrics).typeset(&list, LineStyle::Text))
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

proptest! {
    #[test]
    fn prop_lines_fit_or_hold_one_base(
        tokens in prop::collection::vec(prop::sample::select(TOKENS), 1..24),
        max_width in 15.0f32..80.0,
    ) {
        let markup = tokens.concat();
        let Some(node) = typeset(&markup) else {
            return Ok(());
        };
        let broken = LineBreaker::new(10.0).break_lines(&node, max_width).unwrap();
        if broken == node {
            prop_assert!(node.width() <= max_width);
            return Ok(());
        }
        for line in broken.children() {
            let children = line.node.children();
            let only_scripts_follow = children
                .iter()
                .skip(1)
                .all(|c| c.node.script_role().is_some());
            prop_assert!(
                line.node.width() <= max_width + 1e-3 || only_scripts_follow,
                "{markup}: line of width {} over {max_width}",
                line.node.width()
            );
        }
    }

    #[test]
    fn prop_text_breaks_keep_words_whole(
        words in prop::collection::vec(prop::sample::select(WORDS), 2..30),
        max_width in 150.0f32..300.0,
    ) {
        let markup = format!("\\text{{{}}}", words.join(" "));
        let Some(node) = typeset(&markup) else {
            return Ok(());
        };
        let broken = LineBreaker::new(10.0).break_lines(&node, max_width).unwrap();
        let lines: Vec<String> = if broken == node {
            vec![line_text(&node)]
        } else {
            broken.children().iter().map(|c| line_text(&c.node)).collect()
        };
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        prop_assert_eq!(rejoined, words.clone());
        for line in &lines[1..] {
            prop_assert!(!line.starts_with(' '));
        }
    }

    #[test]
    fn prop_grouped_numbers_stay_whole(
        groups in prop::collection::vec(0u32..1000, 2..6),
        divisor in 1.5f32..4.0,
    ) {
        let number = groups
            .iter()
            .enumerate()
            .map(|(i, g)| if i == 0 { (g + 1).to_string() } else { format!("{g:03}") })
            .collect::<Vec<_>>()
            .join(",");
        let markup = format!("y+x={number}+z");
        let node = typeset(&markup).unwrap();
        let broken = LineBreaker::new(10.0)
            .break_lines(&node, node.width() / divisor)
            .unwrap();
        prop_assert!(broken != node);
        let texts: Vec<String> = broken.children().iter().map(|c| line_text(&c.node)).collect();
        prop_assert!(
            texts.iter().any(|t| t.contains(&number)),
            "{number} split across {texts:?}"
        );
    }

    #[test]
    fn prop_lines_stack_with_gap(
        count in 4usize..16,
        divisor in 2.0f32..4.0,
    ) {
        let markup = vec!["a"; count].join("+");
        let node = typeset(&markup).unwrap();
        let config = LineBreakConfig::default();
        let broken = LineBreaker::with_config(10.0, config)
            .break_lines(&node, node.width() / divisor)
            .unwrap();
        let gap = config.min_line_gap * 10.0;
        for pair in broken.children().windows(2) {
            prop_assert!(pair[1].top() <= pair[0].bottom() - gap + 1e-3);
        }
    }
}
