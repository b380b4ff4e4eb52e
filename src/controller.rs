use kurbo::{Point, Size};

use crate::ast::Node;
use crate::renderer::Scene;
use crate::transform::{Transform, ZoomLimits};

/// Held pointer state of one diagram. Zooming is applied instantly and never
/// held.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
}

/// Discrete input delivered by the host. Positions are surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    PointerLeave,
    /// Positive steps zoom in, negative steps zoom out.
    Wheel { position: Point, steps: f64 },
    Click(Point),
    Resize(Size),
}

/// Pipeline re-entry an input requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    None,
    RenderOnly,
    Full,
}

#[derive(Debug, Clone)]
pub struct Controller {
    state: InteractionState,
    zoom_step: f64,
    limits: ZoomLimits,
    // Set once a pan actually moved the view, so the click that ends the drag
    // does not toggle a node.
    dragged: bool,
}

impl Controller {
    pub fn new(zoom_step: f64, limits: ZoomLimits) -> Self {
        Self {
            state: InteractionState::Idle,
            zoom_step,
            limits: limits.normalized(),
            dragged: false,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.dragged = false;
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        scene: &Scene,
        transform: &mut Transform,
        root: Option<&mut Node>,
    ) -> Pass {
        match *event {
            InputEvent::PointerDown(at) => {
                self.dragged = false;
                if self.state == InteractionState::Idle && scene.hit_test(at).is_none() {
                    tracing::trace!(x = at.x, y = at.y, "idle -> panning");
                    self.state = InteractionState::Panning { last: at };
                }
                Pass::None
            }
            InputEvent::PointerMove(at) => match self.state {
                InteractionState::Panning { last } => {
                    let delta = at - last;
                    self.state = InteractionState::Panning { last: at };
                    if delta.x == 0.0 && delta.y == 0.0 {
                        return Pass::None;
                    }
                    transform.pan(delta);
                    self.dragged = true;
                    Pass::RenderOnly
                }
                InteractionState::Idle => Pass::None,
            },
            InputEvent::PointerUp(_) | InputEvent::PointerLeave => {
                if self.state != InteractionState::Idle {
                    tracing::trace!("panning -> idle");
                }
                self.state = InteractionState::Idle;
                Pass::None
            }
            InputEvent::Wheel { position, steps } => {
                let factor = self.zoom_step.powf(steps);
                if transform.zoom_at(position, factor, &self.limits) {
                    tracing::trace!(scale = transform.scale, "zoomed");
                    Pass::RenderOnly
                } else {
                    Pass::None
                }
            }
            InputEvent::Click(at) => {
                if std::mem::take(&mut self.dragged) {
                    return Pass::None;
                }
                let Some(path) = scene.hit_test(at).filter(|n| n.is_toggle()).map(|n| n.path.clone())
                else {
                    return Pass::None;
                };
                match root.and_then(|root| root.get_mut(&path)) {
                    Some(node) => {
                        node.is_collapsed = !node.is_collapsed;
                        tracing::debug!(%path, collapsed = node.is_collapsed, "toggled node");
                        Pass::Full
                    }
                    None => Pass::None,
                }
            }
            InputEvent::Resize(_) => Pass::Full,
        }
    }
}
