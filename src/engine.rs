//! One live diagram: owns the tree, its config, the view transform and the
//! last scene, and re-enters the pipeline on every state change.

use kurbo::{Point, Size, Vec2};

use crate::ast::{Node, NodePath, OutlineConfig};
use crate::controller::{Controller, InputEvent, InteractionState, Pass};
use crate::display_width::Measure;
use crate::error::EngineError;
use crate::layout::{self, LayoutOptions};
use crate::parser::parse_outline;
use crate::renderer::{self, Scene};
use crate::surface::{Surface, present};
use crate::transform::{Transform, ZoomLimits};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub layout: LayoutOptions,
    pub zoom: ZoomLimits,
    /// Scale factor applied per wheel step.
    pub zoom_step: f64,
    pub placeholder_text: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            zoom: ZoomLimits::default(),
            zoom_step: 1.1,
            placeholder_text: "invalid structure".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Engine<M, S> {
    options: EngineOptions,
    measure: M,
    surface: Option<S>,
    viewport: Option<Size>,
    config: OutlineConfig,
    root: Option<Node>,
    // Set when the last content could not be parsed.
    invalid: bool,
    transform: Transform,
    controller: Controller,
    scene: Scene,
}

impl<M: Measure, S: Surface> Engine<M, S> {
    pub fn new(measure: M, mut options: EngineOptions) -> Self {
        options.zoom = options.zoom.normalized();
        let controller = Controller::new(options.zoom_step, options.zoom);
        Self {
            options,
            measure,
            surface: None,
            viewport: None,
            config: OutlineConfig::default(),
            root: None,
            invalid: false,
            transform: Transform::IDENTITY,
            controller,
            scene: empty_scene(),
        }
    }

    /// Binds the engine to a surface and draws the current content on it.
    /// Mounting starts from an identity transform; mounting again replaces
    /// the previous surface.
    pub fn mount(&mut self, surface: S) {
        tracing::debug!(replacing = self.surface.is_some(), "mounting diagram");
        self.surface = Some(surface);
        self.transform = Transform::IDENTITY;
        self.controller.reset();
        self.full_pass();
    }

    /// Parses `text` and runs a full pass. An outline with no content lines
    /// is shown as the placeholder instead of failing.
    pub fn set_content(&mut self, text: &str) -> &Scene {
        match parse_outline(text) {
            Ok(outline) => {
                self.config = outline.config;
                self.root = Some(outline.root);
                self.invalid = false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "showing placeholder for unusable outline");
                self.config = OutlineConfig::default();
                self.root = None;
                self.invalid = true;
            }
        }
        self.full_pass();
        &self.scene
    }

    /// Unbinds the surface and forgets all diagram state.
    pub fn destroy(&mut self) -> Option<S> {
        tracing::debug!("destroying diagram");
        self.root = None;
        self.invalid = false;
        self.config = OutlineConfig::default();
        self.transform = Transform::IDENTITY;
        self.viewport = None;
        self.controller.reset();
        self.scene = empty_scene();
        self.surface.take()
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> Pass {
        if let InputEvent::Resize(size) = *event {
            self.viewport = Some(size);
        }
        let pass = self.controller.handle(
            event,
            &self.scene,
            &mut self.transform,
            self.root.as_mut(),
        );
        self.run(pass);
        pass
    }

    /// Flips the collapse flag of the node at `path`. Returns false when the
    /// path does not name a node.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        let collapsed = self.node(path).map(|n| !n.is_collapsed);
        match collapsed {
            Some(collapsed) => self.set_collapsed(path, collapsed),
            None => false,
        }
    }

    pub fn set_collapsed(&mut self, path: &NodePath, collapsed: bool) -> bool {
        let Some(node) = self.root.as_mut().and_then(|root| root.get_mut(path)) else {
            return false;
        };
        if node.is_collapsed != collapsed {
            node.is_collapsed = collapsed;
            tracing::debug!(%path, collapsed, "collapse state changed");
            self.full_pass();
        }
        true
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.transform.pan(delta);
        self.run(Pass::RenderOnly);
    }

    /// Zooms by `steps` wheel steps around a surface point.
    pub fn zoom(&mut self, focus: Point, steps: f64) -> bool {
        let factor = self.options.zoom_step.powf(steps);
        let changed = self.transform.zoom_at(focus, factor, &self.options.zoom);
        if changed {
            self.run(Pass::RenderOnly);
        }
        changed
    }

    /// Presents the current scene again without recomputing anything.
    pub fn redraw(&mut self) -> Result<(), EngineError> {
        let surface = self.surface.as_mut().ok_or(EngineError::NotMounted)?;
        present(surface, &self.scene);
        Ok(())
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        self.root.as_ref().and_then(|root| root.get(path))
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    fn run(&mut self, pass: Pass) {
        match pass {
            Pass::Full => self.full_pass(),
            Pass::RenderOnly => self.render_pass(),
            Pass::None => {}
        }
    }

    fn full_pass(&mut self) {
        if let Some(root) = self.root.as_mut() {
            layout::compute(root, &self.config, &mut self.measure, &self.options.layout);
        }
        self.render_pass();
    }

    fn render_pass(&mut self) {
        self.scene = match &self.root {
            Some(root) => renderer::render(root, &self.transform, &self.config),
            None if self.invalid => {
                Scene::placeholder(&self.options.placeholder_text, self.transform)
            }
            None => Scene {
                transform: self.transform,
                primitives: Vec::new(),
            },
        };
        if let Some(surface) = self.surface.as_mut() {
            present(surface, &self.scene);
        }
    }
}

fn empty_scene() -> Scene {
    Scene {
        transform: Transform::IDENTITY,
        primitives: Vec::new(),
    }
}
