use glam::Vec2;

use crate::api::config::AnimatorConfig;
use crate::core::rng::Rng;

/// Drawing-surface dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// One floating glyph in the particle pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Center in viewport coordinates (y grows downward).
    pub pos: Vec2,
    /// Font size in pixels.
    pub size: f32,
    /// Displacement per frame.
    pub vel: Vec2,
    pub opacity: f32,
    /// Degrees, only ever increases.
    pub rotation: f32,
}

impl Sprite {
    /// Spawn a sprite anywhere inside the viewport with randomized motion.
    pub fn spawn(rng: &mut Rng, config: &AnimatorConfig, viewport: Viewport) -> Self {
        Self {
            pos: Vec2::new(
                rng.range(0.0, viewport.width),
                rng.range(0.0, viewport.height),
            ),
            size: rng.range(config.size_range[0], config.size_range[1]),
            vel: Vec2::new(
                rng.range(config.vx_range[0], config.vx_range[1]),
                rng.range(config.vy_range[0], config.vy_range[1]),
            ),
            opacity: rng.range(config.opacity_range[0], config.opacity_range[1]),
            rotation: rng.range(0.0, 360.0),
        }
    }

    /// Rotation in radians for the draw transform.
    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }
}
