//! Presentation contracts.
//!
//! The engine never touches the DOM. The web bridge implements these traits on
//! top of a Canvas 2D context and the puzzle's grid container; tests implement
//! them with recording fakes.

use glam::Vec2;

use crate::api::config::GradientStop;
use crate::api::types::GridPos;
use crate::components::tile::{Board, TileFace};

/// Everything needed to draw one sprite.
/// Mirrors the canvas sequence: save, translate, rotate, alpha, fill text, restore.
#[derive(Debug, Clone, Copy)]
pub struct GlyphDraw<'a> {
    pub translate: Vec2,
    pub rotation_rad: f32,
    pub alpha: f32,
    /// Font size in pixels. The gradient spans `[-size/2, size/2]` on both axes.
    pub size: f32,
    pub glyph: &'a str,
    pub gradient: &'a [GradientStop],
}

impl GlyphDraw<'_> {
    /// Gradient start and end points in the sprite's local frame.
    pub fn gradient_line(&self) -> (Vec2, Vec2) {
        let half = self.size / 2.0;
        (Vec2::splat(-half), Vec2::splat(half))
    }
}

/// Full-viewport drawing surface for the particle animator.
pub trait Surface {
    /// Resynchronise the surface to new viewport dimensions.
    fn resize(&mut self, width: u32, height: u32);

    /// Wipe the whole surface.
    fn clear(&mut self);

    fn draw_glyph(&mut self, draw: &GlyphDraw<'_>);
}

/// Display elements for the puzzle: tile grid, counters, win banner.
pub trait BoardView {
    fn set_tile(&mut self, pos: GridPos, face: TileFace);

    fn set_moves(&mut self, moves: u32);

    fn set_clock(&mut self, label: &str);

    fn set_won(&mut self, won: bool);
}

/// Project every cell of `board` onto `view`.
pub fn project_board(board: &Board, view: &mut impl BoardView) {
    for pos in board.positions() {
        view.set_tile(pos, board.face(pos));
    }
}
