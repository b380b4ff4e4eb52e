//! SVG backend: serializes presented primitives into a standalone document.

use std::fmt::Write as _;

use kurbo::Size;

use crate::display_width::split_br;
use crate::renderer::{NodeShape, Primitive, ShapeKind};
use crate::surface::Surface;
use crate::transform::Transform;

const FONT_SIZE: f64 = 14.0;
const LINE_EM: f64 = 1.2;

#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: Size,
    transform: Transform,
    body: String,
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: Transform::IDENTITY,
            body: String::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn to_svg(&self) -> String {
        let [a, b, c, d, e, f] = self.transform.to_affine().as_coeffs();
        let mut svg = String::new();
        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<style>
  .label {{ font-family: sans-serif; font-size: {FONT_SIZE}px; dominant-baseline: middle; text-anchor: middle; }}
  .connector {{ fill: none; stroke: #888; stroke-width: 1.5; }}
  .border {{ fill: #fff; stroke: #333; stroke-width: 1; }}
  .collapsed .border {{ stroke-dasharray: 4 2; }}
</style>
<g transform="matrix({a} {b} {c} {d} {e} {f})">
"##,
            w = self.size.width,
            h = self.size.height,
        );
        svg.push_str(&self.body);
        svg.push_str("</g>\n</svg>\n");
        svg
    }

    fn draw_node(&mut self, node: &NodeShape) {
        let class = if node.collapsed { "node collapsed" } else { "node" };
        let _ = writeln!(self.body, r#"<g class="{class}" data-path="{}">"#, node.path);

        let r = node.bounds;
        match node.kind {
            ShapeKind::Plain => {}
            ShapeKind::Rectangle => {
                let _ = writeln!(
                    self.body,
                    r#"<rect class="border" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="4"/>"#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height()
                );
            }
            ShapeKind::Ellipse => {
                let center = r.center();
                let _ = writeln!(
                    self.body,
                    r#"<ellipse class="border" cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}"/>"#,
                    center.x,
                    center.y,
                    r.width() / 2.0,
                    r.height() / 2.0
                );
            }
        }

        let lines = split_br(&node.label);
        let center = node.label_box.center();
        let _ = write!(
            self.body,
            r#"<text class="label" x="{:.2}" y="{:.2}">"#,
            center.x, center.y
        );
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 {
                (1.0 - lines.len() as f64) * LINE_EM / 2.0
            } else {
                LINE_EM
            };
            let _ = write!(
                self.body,
                r#"<tspan x="{:.2}" dy="{dy}em">{}</tspan>"#,
                center.x,
                escape(line.trim())
            );
        }
        self.body.push_str("</text>\n</g>\n");
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.body.clear();
    }

    fn draw(&mut self, primitive: &Primitive, transform: &Transform) {
        self.transform = *transform;
        match primitive {
            Primitive::Connector(c) => {
                let k = &c.curve;
                let _ = writeln!(
                    self.body,
                    r#"<path class="connector" d="M{:.2},{:.2} C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}"/>"#,
                    k.p0.x, k.p0.y, k.p1.x, k.p1.y, k.p2.x, k.p2.y, k.p3.x, k.p3.y
                );
            }
            Primitive::Node(node) => self.draw_node(node),
            Primitive::Placeholder { text, anchor } => {
                let _ = writeln!(
                    self.body,
                    r#"<text class="label placeholder" x="{:.2}" y="{:.2}">{}</text>"#,
                    anchor.x,
                    anchor.y,
                    escape(text)
                );
            }
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Scene;
    use crate::surface::present;
    use pretty_assertions::assert_eq;

    #[test]
    fn escape_markup() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn placeholder_document() {
        let mut surface = SvgSurface::new(Size::new(200.0, 100.0));
        let transform = Transform {
            translate_x: 100.0,
            translate_y: 50.0,
            scale: 1.0,
        };
        present(&mut surface, &Scene::placeholder("invalid structure", transform));
        let svg = surface.to_svg();
        assert!(svg.contains(r#"width="200" height="100""#));
        assert!(svg.contains("matrix(1 0 0 1 100 50)"));
        assert!(svg.contains(">invalid structure</text>"));
    }

    #[test]
    fn clear_drops_previous_frame() {
        let mut surface = SvgSurface::new(Size::new(10.0, 10.0));
        present(&mut surface, &Scene::placeholder("first", Transform::IDENTITY));
        present(&mut surface, &Scene::placeholder("second", Transform::IDENTITY));
        let svg = surface.to_svg();
        assert!(!svg.contains("first"));
        assert!(svg.contains("second"));
    }
}
