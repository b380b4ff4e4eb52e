use kurbo::{Affine, Point, Vec2};

/// Inclusive bounds for [`Transform::scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.2, max: 5.0 }
    }
}

impl ZoomLimits {
    /// Usable limits from host-supplied ones: swapped bounds are put back in
    /// order, and a bound that is not a positive finite number falls back to
    /// its default.
    pub fn normalized(self) -> Self {
        let fallback = Self::default();
        let usable = |v: f64, default: f64| if v.is_finite() && v > 0.0 { v } else { default };
        let (a, b) = (usable(self.min, fallback.min), usable(self.max, fallback.max));
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }
}

/// Pan offset and uniform zoom mapping diagram space onto the surface:
/// `surface = diagram * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.translate_x, self.translate_y)) * Affine::scale(self.scale)
    }

    pub fn to_surface(&self, diagram: Point) -> Point {
        Point::new(
            diagram.x * self.scale + self.translate_x,
            diagram.y * self.scale + self.translate_y,
        )
    }

    pub fn to_diagram(&self, surface: Point) -> Point {
        Point::new(
            (surface.x - self.translate_x) / self.scale,
            (surface.y - self.translate_y) / self.scale,
        )
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.translate_x += delta.x;
        self.translate_y += delta.y;
    }

    /// Multiplies the scale by `factor`, keeping the diagram point under
    /// `focus` (a surface point) fixed. Returns whether the scale changed.
    pub fn zoom_at(&mut self, focus: Point, factor: f64, limits: &ZoomLimits) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !focus.is_finite() {
            return false;
        }
        let scale = limits.clamp(self.scale * factor);
        if scale == self.scale {
            return false;
        }
        let anchor = self.to_diagram(focus);
        self.scale = scale;
        self.translate_x = focus.x - anchor.x * scale;
        self.translate_y = focus.y - anchor.y * scale;
        true
    }
}
