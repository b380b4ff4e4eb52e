use crate::renderer::{Primitive, Scene};
use crate::transform::Transform;

/// Drawing target a diagram is mounted on.
pub trait Surface {
    /// Drops everything drawn so far.
    fn clear(&mut self);

    /// Draws one primitive given in diagram coordinates.
    fn draw(&mut self, primitive: &Primitive, transform: &Transform);
}

/// Clears the surface and draws the scene in order.
pub fn present<S: Surface + ?Sized>(surface: &mut S, scene: &Scene) {
    surface.clear();
    for primitive in &scene.primitives {
        surface.draw(primitive, &scene.transform);
    }
}

/// Keeps the last presented frame as a primitive list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub primitives: Vec<Primitive>,
    pub transform: Transform,
    pub clears: usize,
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.primitives.clear();
        self.clears += 1;
    }

    fn draw(&mut self, primitive: &Primitive, transform: &Transform) {
        self.transform = *transform;
        self.primitives.push(primitive.clone());
    }
}
