#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    SingleDirectional,
    TwoSided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Rectangle,
    Ellipse,
}

impl BorderStyle {
    /// Ratio of the drawn shape to the padded label box it encloses. An
    /// ellipse through the corners of a box is √2 times its size.
    pub fn extent(self) -> f64 {
        match self {
            BorderStyle::Ellipse => std::f64::consts::SQRT_2,
            BorderStyle::None | BorderStyle::Rectangle => 1.0,
        }
    }
}

/// Diagram-wide settings decoded from the optional config line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutlineConfig {
    pub layout: LayoutMode,
    pub border: BorderStyle,
}

/// Child indices leading from the root to a node. The root is the empty path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

impl std::str::FromStr for NodePath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "root" {
            return Ok(Self::root());
        }
        s.split('.')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub text: String,
    pub children: Vec<Node>,
    pub is_collapsed: bool,
    // Geometry below is owned by the layout pass; x/y is the box center.
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
            is_collapsed: false,
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn with_children(text: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(text)
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when this node's children take part in layout and rendering.
    pub fn shows_children(&self) -> bool {
        !self.is_collapsed && !self.children.is_empty()
    }

    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        path.0
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        path.0
            .iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Whether no ancestor on `path` is collapsed. Missing paths are not visible.
    pub fn is_visible(&self, path: &NodePath) -> bool {
        let mut node = self;
        for &index in &path.0 {
            if node.is_collapsed {
                return false;
            }
            match node.children.get(index) {
                Some(child) => node = child,
                None => return false,
            }
        }
        true
    }

    /// Pre-order walk of every node not hidden behind a collapsed ancestor.
    pub fn visible_nodes(&self) -> Vec<(NodePath, &Node)> {
        let mut out = Vec::new();
        collect_visible(self, NodePath::root(), &mut out);
        out
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

fn collect_visible<'a>(node: &'a Node, path: NodePath, out: &mut Vec<(NodePath, &'a Node)>) {
    let show_children = node.shows_children();
    out.push((path.clone(), node));
    if show_children {
        for (i, child) in node.children.iter().enumerate() {
            collect_visible(child, path.child(i), out);
        }
    }
}
