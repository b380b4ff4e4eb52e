use winnow::prelude::*;
use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::{alt, opt};
use winnow::token::{literal, one_of, rest, take_while};

use crate::ast::*;
use crate::error::ParseError;

/// Columns per nesting level.
pub const INDENT_UNIT: usize = 2;

/// Label of the root synthesized over several top-level lines in two-sided mode.
pub const SYNTHETIC_ROOT_LABEL: &str = "◉";

const TWO_SIDED_KEYWORDS: &[&str] = &["دو طرف", "two-sided"];
const RECTANGLE_KEYWORDS: &[&str] = &["مستطیل", "rectangle", "box"];
const ELLIPSE_KEYWORDS: &[&str] = &["بیضی", "ellipse", "oval"];

const CONFIG_MARKER: &str = "تنظیمات";

#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub config: OutlineConfig,
    pub root: Node,
}

pub fn parse_outline(input: &str) -> Result<Outline, ParseError> {
    let mut lines = input.lines().filter(|l| !l.trim().is_empty()).peekable();

    let config = match lines.peek().and_then(|first| parse_config(first)) {
        Some(config) => {
            lines.next();
            config
        }
        None => OutlineConfig::default(),
    };

    let mut items: Vec<(usize, &str)> = Vec::new();
    for line in lines {
        match outline_line.parse(line.trim_end()) {
            Ok(item) => items.push(item),
            Err(e) => tracing::trace!(line, error = %e, "skipping unparseable outline line"),
        }
    }

    if items.is_empty() {
        return Err(ParseError::EmptyOutline);
    }

    let root = build_tree(&items, config.layout);
    tracing::debug!(
        lines = items.len(),
        nodes = root.node_count(),
        layout = ?config.layout,
        border = ?config.border,
        "parsed outline"
    );

    Ok(Outline { config, root })
}

/// Decodes a config line. Returns `None` when the line carries no config marker.
///
/// The English markers `config` and `settings` also start ordinary labels, so
/// they only mark a config line when a known keyword follows them.
pub fn parse_config(line: &str) -> Option<OutlineConfig> {
    let (marker, keywords) = config_line.parse(line.trim_end()).ok()?;
    let lower = keywords.to_lowercase();
    if marker != CONFIG_MARKER && !has_keyword(&lower) {
        return None;
    }
    Some(decode_keywords(&lower))
}

fn contains_any(lower: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|k| lower.contains(k))
}

fn has_keyword(lower: &str) -> bool {
    [TWO_SIDED_KEYWORDS, RECTANGLE_KEYWORDS, ELLIPSE_KEYWORDS]
        .iter()
        .any(|set| contains_any(lower, set))
}

fn decode_keywords(lower: &str) -> OutlineConfig {
    let mut config = OutlineConfig::default();
    if contains_any(lower, TWO_SIDED_KEYWORDS) {
        config.layout = LayoutMode::TwoSided;
    }
    // Ellipse wins when both border keywords are present.
    if contains_any(lower, RECTANGLE_KEYWORDS) {
        config.border = BorderStyle::Rectangle;
    }
    if contains_any(lower, ELLIPSE_KEYWORDS) {
        config.border = BorderStyle::Ellipse;
    }
    config
}

fn config_line<'s>(input: &mut &'s str) -> winnow::Result<(&'s str, &'s str)> {
    space0.parse_next(input)?;
    let marker = alt((
        literal(CONFIG_MARKER),
        literal(Caseless("settings")),
        literal(Caseless("config")),
    ))
    .parse_next(input)?;
    space0.parse_next(input)?;
    ":".parse_next(input)?;
    let keywords = rest.parse_next(input)?;
    Ok((marker, keywords))
}

fn outline_line<'s>(input: &mut &'s str) -> winnow::Result<(usize, &'s str)> {
    let indent = take_while(0.., (' ', '\t')).parse_next(input)?;
    opt((one_of(['-', '*', '+']), space1)).parse_next(input)?;
    let label = rest.parse_next(input)?;
    Ok((indent_width(indent), label.trim()))
}

fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { INDENT_UNIT } else { 1 })
        .sum()
}

struct Entry<'s> {
    text: &'s str,
    depth: usize,
    children: Vec<usize>,
}

fn build_tree(items: &[(usize, &str)], mode: LayoutMode) -> Node {
    let base_indent = items[0].0;
    let mut entries: Vec<Entry<'_>> = Vec::with_capacity(items.len());
    let mut top_level: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for &(indent, text) in items {
        let depth = indent.saturating_sub(base_indent) / INDENT_UNIT;

        while let Some(&open) = stack.last() {
            if entries[open].depth >= depth {
                stack.pop();
            } else {
                break;
            }
        }

        let index = entries.len();
        entries.push(Entry {
            text,
            depth,
            children: Vec::new(),
        });
        match stack.last() {
            Some(&parent) => entries[parent].children.push(index),
            None => top_level.push(index),
        }
        stack.push(index);
    }

    let mut tops = top_level.iter().map(|&i| to_node(&entries, i));
    let Some(mut first) = tops.next() else {
        return Node::new(SYNTHETIC_ROOT_LABEL);
    };
    if top_level.len() == 1 {
        return first;
    }

    match mode {
        LayoutMode::TwoSided => {
            let mut children = vec![first];
            children.extend(tops);
            Node::with_children(SYNTHETIC_ROOT_LABEL, children)
        }
        LayoutMode::SingleDirectional => {
            // The first top-level line becomes the root; later top-level lines
            // are appended after its own children.
            first.children.extend(tops);
            first
        }
    }
}

fn to_node(entries: &[Entry<'_>], index: usize) -> Node {
    let entry = &entries[index];
    let children = entry
        .children
        .iter()
        .map(|&child| to_node(entries, child))
        .collect();
    Node::with_children(entry.text, children)
}
