//! Floating-heart particle animator.
//!
//! A fixed pool of sprites drifts upward and spins. Sprites are never removed:
//! leaving the viewport by more than the margin respawns them in place.

use crate::api::config::AnimatorConfig;
use crate::components::sprite::{Sprite, Viewport};
use crate::core::rng::Rng;
use crate::renderer::traits::{GlyphDraw, Surface};

pub struct ParticleAnimator {
    config: AnimatorConfig,
    viewport: Viewport,
    pool: Vec<Sprite>,
    rng: Rng,
}

impl ParticleAnimator {
    /// Create an animator with `config.pool_size` sprites spread over `viewport`.
    pub fn new(config: AnimatorConfig, viewport: Viewport, seed: u64) -> Self {
        let mut animator = Self {
            pool: Vec::with_capacity(config.pool_size),
            config,
            viewport,
            rng: Rng::new(seed),
        };
        animator.initialize(animator.config.pool_size);
        animator
    }

    /// Repopulate the pool with `pool_size` fresh sprites.
    pub fn initialize(&mut self, pool_size: usize) {
        self.pool.clear();
        for _ in 0..pool_size {
            self.pool.push(Sprite::spawn(&mut self.rng, &self.config, self.viewport));
        }
        log::debug!("animator: spawned {} sprites in {:?}", pool_size, self.viewport);
    }

    /// Advance every sprite by one frame and respawn the ones that drifted out.
    pub fn update(&mut self) {
        let margin = self.config.margin;
        let spin = self.config.spin_per_frame;
        let Viewport { width, height } = self.viewport;

        for sprite in &mut self.pool {
            sprite.pos += sprite.vel;
            sprite.rotation += spin;

            if sprite.pos.y < -margin {
                sprite.pos.y = height + margin;
                sprite.pos.x = self.rng.range(0.0, width);
            }
            if sprite.pos.x < -margin || sprite.pos.x > width + margin {
                sprite.pos.x = self.rng.range(0.0, width);
            }
        }
    }

    /// Clear the surface and draw the pool in its current state.
    pub fn render(&self, surface: &mut impl Surface) {
        surface.clear();
        for sprite in &self.pool {
            surface.draw_glyph(&GlyphDraw {
                translate: sprite.pos,
                rotation_rad: sprite.rotation_radians(),
                alpha: sprite.opacity,
                size: sprite.size,
                glyph: &self.config.glyph,
                gradient: &self.config.gradient,
            });
        }
    }

    /// One display frame: update, then render.
    pub fn tick(&mut self, surface: &mut impl Surface) {
        self.update();
        self.render(surface);
    }

    /// Follow a viewport resize. Sprite state is kept as is.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
