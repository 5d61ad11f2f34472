use crate::api::types::GridPos;

/// Discrete UI stimuli the puzzle understands.
/// No DOM types: the web bridge translates listeners into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A grid cell was clicked.
    TileClicked { row: usize, col: usize },
    /// The reshuffle control was pressed.
    ShuffleRequested,
    /// Periodic clock refresh while a cycle is running.
    ClockTick,
}

impl InputEvent {
    pub fn tile(pos: GridPos) -> Self {
        InputEvent::TileClicked { row: pos.row, col: pos.col }
    }
}
