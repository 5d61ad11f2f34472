/// Grid coordinate of a puzzle cell (row-major, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell.
    pub fn distance(self, other: GridPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// A puzzle event for the presentation layer.
/// The engine pushes these while handling input; the web bridge drains and projects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The board was reshuffled; the win indicator must be hidden.
    Shuffled,
    /// Move counter changed.
    MovesChanged { moves: u32 },
    /// Clock display changed (whole seconds).
    ClockChanged { secs: u64 },
    /// The board reached the solved layout.
    Won { moves: u32, secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_manhattan() {
        let a = GridPos::new(0, 0);
        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(GridPos::new(0, 1)), 1);
        assert_eq!(a.distance(GridPos::new(1, 1)), 2);
        assert_eq!(GridPos::new(2, 2).distance(GridPos::new(0, 1)), 3);
    }
}
