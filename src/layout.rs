use crate::ast::*;
use crate::display_width::Measure;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Horizontal distance between the centers of two consecutive depths.
    /// Grows for the pass when the widest visible shape would not fit.
    pub level_width: f64,
    /// Space left between two vertically adjacent slots.
    pub vertical_gap: f64,
    /// Added around the measured label on every side.
    pub padding: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            level_width: 160.0,
            vertical_gap: 16.0,
            padding: 6.0,
        }
    }
}

/// Which way a subtree grows from its root along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Toward negative x, the reading direction of the outline.
    Leading,
    Trailing,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Side::Leading => -1.0,
            Side::Trailing => 1.0,
        }
    }
}

/// Side a direct child of the root is placed on in two-sided mode.
///
/// Children alternate starting on the leading side, so source order decides
/// the split and re-layouts keep every branch on the same side.
pub fn two_sided_side(child_index: usize) -> Side {
    if child_index % 2 == 0 {
        Side::Leading
    } else {
        Side::Trailing
    }
}

/// Measures and positions every visible node in place. The root ends up
/// centered on the origin.
pub fn compute<M: Measure + ?Sized>(
    root: &mut Node,
    config: &OutlineConfig,
    measure: &mut M,
    options: &LayoutOptions,
) {
    let visible = measure_visible(root, measure, options.padding);

    let extent = config.border.extent();
    // Columns spread apart when a label would reach into the next depth.
    let widest = root
        .visible_nodes()
        .iter()
        .map(|(_, n)| n.width * extent)
        .fold(0.0, f64::max);
    let slots = Slots {
        options,
        extent,
        level_width: options.level_width.max(widest + options.vertical_gap),
    };
    match config.layout {
        LayoutMode::SingleDirectional => layout_single(root, &slots),
        LayoutMode::TwoSided => layout_two_sided(root, &slots),
    }

    tracing::debug!(visible, mode = ?config.layout, "layout pass complete");
}

fn measure_visible<M: Measure + ?Sized>(node: &mut Node, measure: &mut M, padding: f64) -> usize {
    let size = measure.measure(&node.text);
    node.width = size.width + padding * 2.0;
    node.height = size.height + padding * 2.0;

    if !node.shows_children() {
        return 1;
    }
    1 + node
        .children
        .iter_mut()
        .map(|child| measure_visible(child, measure, padding))
        .sum::<usize>()
}

/// Space handed out per node. Slots are as tall as the drawn shape, not just
/// the label, and columns are at least one shape width apart.
struct Slots<'a> {
    options: &'a LayoutOptions,
    extent: f64,
    level_width: f64,
}

impl Slots<'_> {
    fn height(&self, node: &Node) -> f64 {
        node.height * self.extent
    }
}

fn layout_single(root: &mut Node, slots: &Slots<'_>) {
    let mut cursor = 0.0;
    place(root, 0, Side::Leading, &mut cursor, slots);
    let dy = -root.y;
    shift_y(root, dy);
}

fn layout_two_sided(root: &mut Node, slots: &Slots<'_>) {
    root.x = 0.0;
    root.y = 0.0;
    if !root.shows_children() {
        return;
    }

    for side in [Side::Leading, Side::Trailing] {
        let mut cursor = 0.0;
        let mut first_y = None;
        let mut last_y = 0.0;
        for (i, child) in root.children.iter_mut().enumerate() {
            if two_sided_side(i) != side {
                continue;
            }
            place(child, 1, side, &mut cursor, slots);
            first_y.get_or_insert(child.y);
            last_y = child.y;
        }

        let Some(first_y) = first_y else {
            continue;
        };
        let dy = -(first_y + last_y) / 2.0;
        for (i, child) in root.children.iter_mut().enumerate() {
            if two_sided_side(i) == side {
                shift_y(child, dy);
            }
        }
    }
}

/// Assigns `x` from depth and `y` bottom-up from the running `cursor`, which
/// marks the top of the next free vertical slot.
fn place(node: &mut Node, depth: usize, side: Side, cursor: &mut f64, slots: &Slots<'_>) {
    let options = slots.options;
    let height = slots.height(node);
    node.x = match depth {
        0 => 0.0,
        _ => side.sign() * depth as f64 * slots.level_width,
    };

    if !node.shows_children() {
        node.y = *cursor + height / 2.0;
        *cursor += height + options.vertical_gap;
        return;
    }

    let start = *cursor;
    for child in &mut node.children {
        place(child, depth + 1, side, cursor, slots);
    }

    let first = node.children.first().map_or(0.0, |c| c.y);
    let last = node.children.last().map_or(0.0, |c| c.y);
    node.y = (first + last) / 2.0;

    // The parent always reserves at least its own height.
    let used = *cursor - start - options.vertical_gap;
    if used < height {
        let pad = (height - used) / 2.0;
        for child in &mut node.children {
            shift_y(child, pad);
        }
        node.y += pad;
        *cursor = start + height + options.vertical_gap;
    }
}

fn shift_y(node: &mut Node, dy: f64) {
    node.y += dy;
    if node.shows_children() {
        for child in &mut node.children {
            shift_y(child, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_outline;
    use kurbo::Size;
    use pretty_assertions::assert_eq;

    fn fixed(_: &str) -> Size {
        Size::new(40.0, 20.0)
    }

    fn laid_out(input: &str) -> Node {
        let outline = parse_outline(input).unwrap();
        let mut root = outline.root;
        compute(&mut root, &outline.config, &mut fixed, &LayoutOptions::default());
        root
    }

    #[test]
    fn sizes_include_padding() {
        let root = laid_out("- Root");
        assert_eq!((root.width, root.height), (52.0, 32.0));
        assert_eq!((root.x, root.y), (0.0, 0.0));
    }

    #[test]
    fn two_children_get_slots_around_parent() {
        let root = laid_out("- Root\n  - A\n  - B");
        let (a, b) = (&root.children[0], &root.children[1]);
        assert_eq!((a.x, a.y), (-160.0, -24.0));
        assert_eq!((b.x, b.y), (-160.0, 24.0));
        assert_eq!(root.y, (a.y + b.y) / 2.0);
    }

    #[test]
    fn internal_node_sits_between_first_and_last_child() {
        let root = laid_out("- R\n  - A\n    - A1\n    - A2\n    - A3\n  - B");
        let a = &root.children[0];
        assert_eq!(a.y, (a.children[0].y + a.children[2].y) / 2.0);
        assert_eq!(a.children[1].y, a.y);
        assert_eq!(a.children[0].x, -320.0);
    }

    #[test]
    fn collapsed_node_takes_one_slot_and_skips_measurement() {
        let outline = parse_outline("- R\n  - A\n    - A1\n    - A2\n  - B").unwrap();
        let mut root = outline.root;
        root.children[0].is_collapsed = true;

        let mut measured: Vec<String> = Vec::new();
        let mut measure = |text: &str| {
            measured.push(text.to_string());
            Size::new(40.0, 20.0)
        };
        compute(&mut root, &outline.config, &mut measure, &LayoutOptions::default());

        assert_eq!(measured, vec!["R", "A", "B"]);
        let (a, b) = (&root.children[0], &root.children[1]);
        assert_eq!(b.y - a.y, 32.0 + 16.0);
    }

    #[test]
    fn tall_parent_reserves_its_own_height() {
        let outline = parse_outline("- R\n  - Tall\n    - t\n  - Next").unwrap();
        let mut root = outline.root;
        let mut measure = |text: &str| match text {
            "Tall" => Size::new(40.0, 100.0),
            _ => Size::new(40.0, 20.0),
        };
        let options = LayoutOptions::default();
        compute(&mut root, &outline.config, &mut measure, &options);

        let tall = &root.children[0];
        let next = &root.children[1];
        assert_eq!(tall.y, tall.children[0].y);
        let tall_bottom = tall.y + tall.height / 2.0;
        let next_top = next.y - next.height / 2.0;
        assert_eq!(next_top - tall_bottom, options.vertical_gap);
    }

    #[test]
    fn ellipse_slots_fit_the_drawn_shape() {
        let outline = parse_outline("config: ellipse\n- R\n  - A\n  - B").unwrap();
        let mut root = outline.root;
        let mut four_lines = |_: &str| Size::new(40.0, 72.0);
        let options = LayoutOptions::default();
        compute(&mut root, &outline.config, &mut four_lines, &options);

        let (a, b) = (&root.children[0], &root.children[1]);
        let half = a.height * std::f64::consts::SQRT_2 / 2.0;
        let gap = (b.y - half) - (a.y + half);
        assert!((gap - options.vertical_gap).abs() < 1e-9, "gap was {gap}");
    }

    #[test]
    fn wide_labels_push_levels_apart() {
        let outline = parse_outline("- A rather long root label\n  - child").unwrap();
        let mut root = outline.root;
        let mut measure = |text: &str| Size::new(text.chars().count() as f64 * 8.0, 18.0);
        let options = LayoutOptions::default();
        compute(&mut root, &outline.config, &mut measure, &options);

        let child = &root.children[0];
        assert_eq!(root.width, 24.0 * 8.0 + 12.0);
        assert_eq!(child.x, -(root.width + options.vertical_gap));
        let root_left = root.x - root.width / 2.0;
        let child_right = child.x + child.width / 2.0;
        assert!(child_right < root_left);
    }

    #[test]
    fn two_sided_alternates_children() {
        let root = laid_out("config: two-sided\n- Root\n  - L1\n  - R1\n  - L2");
        let xs: Vec<f64> = root.children.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![-160.0, 160.0, -160.0]);
        // Each side is centered on the root independently.
        assert_eq!(root.children[1].y, 0.0);
        assert_eq!(root.children[0].y, -root.children[2].y);
    }

    #[test]
    fn two_sided_grandchildren_grow_away_from_root() {
        let root = laid_out("config: two-sided\n- Root\n  - L\n    - LL\n  - R\n    - RR");
        assert_eq!(root.children[0].children[0].x, -320.0);
        assert_eq!(root.children[1].children[0].x, 320.0);
    }

    #[test]
    fn collapsed_root_in_two_sided_mode_stays_at_origin() {
        let outline = parse_outline("config: two-sided\n- Root\n  - L\n  - R").unwrap();
        let mut root = outline.root;
        root.is_collapsed = true;
        compute(&mut root, &outline.config, &mut fixed, &LayoutOptions::default());
        assert_eq!((root.x, root.y), (0.0, 0.0));
    }

    #[test]
    fn layout_is_repeatable() {
        let outline = parse_outline("- R\n  - A\n    - A1\n  - B").unwrap();
        let mut first = outline.root.clone();
        let mut second = outline.root;
        let options = LayoutOptions::default();
        compute(&mut first, &outline.config, &mut fixed, &options);
        compute(&mut second, &outline.config, &mut fixed, &options);
        compute(&mut second, &outline.config, &mut fixed, &options);
        assert_eq!(first, second);
    }
}
