//! Summary markup cleanup.

use scraper::{Html, Node};

/// Upper bound on extra passes over text that still looks like markup.
const MAX_EXTRA_PASSES: usize = 4;

/// Elements that are dropped together with everything inside them.
const REMOVED_ELEMENTS: [&str; 4] = ["a", "img", "figure", "figcaption"];

/// Reduce a summary fragment to plain text.
///
/// Links, images and figures are removed with their text. Other tags are
/// unwrapped, so the text of a wrapping `<div>` survives. Entities are
/// decoded once by the parser and every whitespace run, including
/// non-breaking spaces, collapses to a single space.
///
/// Feeds often escape their markup, so decoding can reveal new tags or
/// entities. Those are stripped again until the text stops changing,
/// which keeps the function idempotent.
pub fn clean_summary(raw: &str) -> String {
    let mut text = strip_markup(raw);
    for _ in 0..MAX_EXTRA_PASSES {
        if !text.contains(['<', '&']) {
            break;
        }
        let next = strip_markup(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text
}

fn strip_markup(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw);
    let mut runs: Vec<&str> = Vec::new();

    for node in fragment.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let inside_removed = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if REMOVED_ELEMENTS.contains(&el.name()))
        });
        if inside_removed {
            continue;
        }
        let run = text.trim();
        if !run.is_empty() {
            runs.push(run);
        }
    }

    runs.join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
