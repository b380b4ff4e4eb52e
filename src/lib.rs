pub mod ast;
pub mod controller;
pub mod display_width;
pub mod engine;
pub mod error;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod surface;
pub mod svg;
pub mod transform;

use kurbo::{Point, Rect, Size, Vec2};

use crate::ast::NodePath;
use crate::display_width::MonospaceMeasure;
use crate::engine::{Engine, EngineOptions};
use crate::svg::SvgSurface;

/// Headless rendering parameters for [`render_svg`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub measure: MonospaceMeasure,
    /// Space kept around the diagram before any pan or zoom.
    pub margin: f64,
    /// Wheel steps applied around the center of the surface.
    pub zoom_steps: f64,
    pub pan: Vec2,
    /// Nodes collapsed before the first frame.
    pub collapse: Vec<NodePath>,
    pub engine: EngineOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            measure: MonospaceMeasure::default(),
            margin: 40.0,
            zoom_steps: 0.0,
            pan: Vec2::ZERO,
            collapse: Vec::new(),
            engine: EngineOptions::default(),
        }
    }
}

/// Runs the whole pipeline on a throwaway engine and returns the SVG of the
/// final frame. Outlines without content render as the placeholder.
pub fn render_svg(input: &str, options: &RenderOptions) -> String {
    let mut engine = Engine::new(options.measure, options.engine.clone());
    engine.mount(SvgSurface::new(Size::ZERO));
    engine.set_content(input);

    for path in &options.collapse {
        if !engine.set_collapsed(path, true) {
            tracing::warn!(%path, "no node to collapse");
        }
    }

    let bounds = engine.scene().bounds().unwrap_or(Rect::ZERO);
    let size = Size::new(
        bounds.width() + options.margin * 2.0,
        bounds.height() + options.margin * 2.0,
    );
    if let Some(surface) = engine.surface_mut() {
        surface.resize(size);
    }
    engine.pan(Vec2::new(options.margin - bounds.x0, options.margin - bounds.y0));
    if options.zoom_steps != 0.0 {
        engine.zoom(Point::new(size.width / 2.0, size.height / 2.0), options.zoom_steps);
    }
    if options.pan != Vec2::ZERO {
        engine.pan(options.pan);
    }

    engine
        .destroy()
        .map(|surface| surface.to_svg())
        .unwrap_or_default()
}
