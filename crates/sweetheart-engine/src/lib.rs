pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{AnimatorConfig, ConfigError, GradientStop, PageConfig, PuzzleConfig};
pub use api::types::{GameEvent, GridPos};
pub use components::sprite::{Sprite, Viewport};
pub use components::tile::{Board, Tile, TileFace};
pub use crate::core::rng::Rng;
pub use crate::core::time::{format_clock, Stopwatch};
pub use input::event::InputEvent;
pub use renderer::traits::{project_board, BoardView, GlyphDraw, Surface};
pub use systems::animator::ParticleAnimator;
pub use systems::puzzle::{MoveOutcome, PuzzleGame, PuzzlePhase};
