use kurbo::{Affine, CubicBez, Ellipse, Point, Rect, Shape as _, Size};

use crate::ast::*;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Label only, no border.
    Plain,
    Rectangle,
    Ellipse,
}

impl From<BorderStyle> for ShapeKind {
    fn from(border: BorderStyle) -> Self {
        match border {
            BorderStyle::None => ShapeKind::Plain,
            BorderStyle::Rectangle => ShapeKind::Rectangle,
            BorderStyle::Ellipse => ShapeKind::Ellipse,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub path: NodePath,
    pub label: String,
    pub kind: ShapeKind,
    /// Padded label box in diagram coordinates.
    pub label_box: Rect,
    /// Outer extent of the drawn shape. Equals `label_box` except for
    /// ellipses, which circumscribe it.
    pub bounds: Rect,
    pub collapsed: bool,
    pub has_children: bool,
}

impl NodeShape {
    pub fn contains(&self, point: Point) -> bool {
        match self.kind {
            ShapeKind::Ellipse => Ellipse::from_rect(self.bounds).contains(point),
            ShapeKind::Plain | ShapeKind::Rectangle => self.bounds.contains(point),
        }
    }

    /// Nodes with children can be collapsed and expanded by clicking them.
    pub fn is_toggle(&self) -> bool {
        self.has_children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent: NodePath,
    pub child: NodePath,
    pub curve: CubicBez,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Connector(Connector),
    Node(NodeShape),
    /// Stand-in drawn when the outline could not be turned into a tree.
    Placeholder { text: String, anchor: Point },
}

impl Primitive {
    fn bounds(&self) -> Rect {
        match self {
            Primitive::Connector(c) => Rect::from_points(c.curve.p0, c.curve.p3)
                .union_pt(c.curve.p1)
                .union_pt(c.curve.p2),
            Primitive::Node(n) => n.bounds,
            Primitive::Placeholder { anchor, .. } => Rect::from_center_size(*anchor, Size::ZERO),
        }
    }
}

/// Ordered draw list for one render call. Primitives are in diagram
/// coordinates; `transform` maps them onto the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub transform: Transform,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn placeholder(text: &str, transform: Transform) -> Self {
        Self {
            transform,
            primitives: vec![Primitive::Placeholder {
                text: text.to_string(),
                anchor: Point::ZERO,
            }],
        }
    }

    pub fn affine(&self) -> Affine {
        self.transform.to_affine()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.primitives.as_slice(), [Primitive::Placeholder { .. }])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeShape> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Node(n) => Some(n),
            _ => None,
        })
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Connector(c) => Some(c),
            _ => None,
        })
    }

    pub fn node(&self, path: &NodePath) -> Option<&NodeShape> {
        self.nodes().find(|n| &n.path == path)
    }

    /// Topmost node under a surface point.
    pub fn hit_test(&self, surface_point: Point) -> Option<&NodeShape> {
        let point = self.transform.to_diagram(surface_point);
        self.primitives.iter().rev().find_map(|p| match p {
            Primitive::Node(n) if n.contains(point) => Some(n),
            _ => None,
        })
    }

    /// Union of every primitive's extent in diagram coordinates.
    pub fn bounds(&self) -> Option<Rect> {
        self.primitives
            .iter()
            .map(Primitive::bounds)
            .reduce(|acc, r| acc.union(r))
    }
}

pub fn render(root: &Node, transform: &Transform, config: &OutlineConfig) -> Scene {
    let kind = ShapeKind::from(config.border);
    let visible = root.visible_nodes();

    let mut connectors = Vec::new();
    let mut nodes = Vec::with_capacity(visible.len());

    for (path, node) in &visible {
        if node.shows_children() {
            for (i, child) in node.children.iter().enumerate() {
                connectors.push(Primitive::Connector(Connector {
                    parent: path.clone(),
                    child: path.child(i),
                    curve: connector_curve(node, child, kind),
                }));
            }
        }
        nodes.push(Primitive::Node(node_shape(path, node, kind)));
    }

    // Connectors go first so node shapes cover their ends.
    let mut primitives = connectors;
    primitives.extend(nodes);

    Scene {
        transform: *transform,
        primitives,
    }
}

fn label_box(node: &Node) -> Rect {
    Rect::from_center_size(Point::new(node.x, node.y), Size::new(node.width, node.height))
}

fn shape_bounds(node: &Node, kind: ShapeKind) -> Rect {
    match kind {
        ShapeKind::Ellipse => {
            let extent = BorderStyle::Ellipse.extent();
            Rect::from_center_size(
                Point::new(node.x, node.y),
                Size::new(node.width * extent, node.height * extent),
            )
        }
        ShapeKind::Plain | ShapeKind::Rectangle => label_box(node),
    }
}

fn node_shape(path: &NodePath, node: &Node, kind: ShapeKind) -> NodeShape {
    NodeShape {
        path: path.clone(),
        label: node.text.clone(),
        kind,
        label_box: label_box(node),
        bounds: shape_bounds(node, kind),
        collapsed: node.is_collapsed,
        has_children: !node.is_leaf(),
    }
}

/// S-curve from the middle of the parent's side facing the child to the
/// middle of the child's side facing the parent.
fn connector_curve(parent: &Node, child: &Node, kind: ShapeKind) -> CubicBez {
    let from = shape_bounds(parent, kind);
    let to = shape_bounds(child, kind);

    let (start_x, end_x) = if child.x < parent.x {
        (from.x0, to.x1)
    } else {
        (from.x1, to.x0)
    };
    let start = Point::new(start_x, parent.y);
    let end = Point::new(end_x, child.y);
    let mid_x = (start.x + end.x) / 2.0;

    CubicBez::new(
        start,
        Point::new(mid_x, start.y),
        Point::new(mid_x, end.y),
        end,
    )
}
