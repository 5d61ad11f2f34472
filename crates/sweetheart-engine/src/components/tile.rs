use crate::api::types::GridPos;

/// What a cell shows: nothing, or the image crop belonging at `correct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Crop { correct: GridPos },
}

/// Display projection of a tile: background offsets in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileFace {
    Empty,
    Crop { x_pct: f32, y_pct: f32 },
}

impl TileFace {
    /// CSS `background-position` value, `None` for the empty face.
    pub fn background_position(&self) -> Option<String> {
        match self {
            TileFace::Empty => None,
            TileFace::Crop { x_pct, y_pct } => Some(format!("{}% {}%", x_pct, y_pct)),
        }
    }
}

/// Square grid of tiles, row-major.
/// Cells are fixed slots; only their content moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    size: usize,
    cells: Vec<Tile>,
    empty: GridPos,
}

impl Board {
    /// Solved layout: every cell shows its own crop, bottom-right is empty.
    pub fn new(size: usize) -> Self {
        let size = size.max(2);
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(Tile::Crop { correct: GridPos::new(row, col) });
            }
        }
        let empty = GridPos::new(size - 1, size - 1);
        cells[size * size - 1] = Tile::Empty;
        Self { size, cells, empty }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn empty_pos(&self) -> GridPos {
        self.empty
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    fn idx(&self, pos: GridPos) -> usize {
        pos.row * self.size + pos.col
    }

    pub fn get(&self, pos: GridPos) -> Option<Tile> {
        if self.contains(pos) {
            Some(self.cells[self.idx(pos)])
        } else {
            None
        }
    }

    /// Crop percentages for the image region that belongs at `pos`.
    pub fn crop_offset(&self, pos: GridPos) -> (f32, f32) {
        let span = (self.size - 1) as f32;
        (pos.col as f32 / span * 100.0, pos.row as f32 / span * 100.0)
    }

    pub fn face(&self, pos: GridPos) -> TileFace {
        match self.get(pos) {
            Some(Tile::Crop { correct }) => {
                let (x_pct, y_pct) = self.crop_offset(correct);
                TileFace::Crop { x_pct, y_pct }
            }
            _ => TileFace::Empty,
        }
    }

    /// Exchange the content of two cells, keeping the empty marker in sync.
    /// Out-of-range positions are ignored.
    pub fn swap(&mut self, a: GridPos, b: GridPos) {
        if !self.contains(a) || !self.contains(b) {
            return;
        }
        let (ia, ib) = (self.idx(a), self.idx(b));
        self.cells.swap(ia, ib);
        if self.empty == a {
            self.empty = b;
        } else if self.empty == b {
            self.empty = a;
        }
    }

    /// Orthogonal neighbors in up, down, left, right order.
    pub fn neighbors(&self, pos: GridPos) -> Vec<GridPos> {
        let mut out = Vec::with_capacity(4);
        if pos.row > 0 {
            out.push(GridPos::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.size {
            out.push(GridPos::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            out.push(GridPos::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.size {
            out.push(GridPos::new(pos.row, pos.col + 1));
        }
        out
    }

    /// True when every crop sits in its own cell and the empty cell is bottom-right.
    pub fn is_solved(&self) -> bool {
        let corner = GridPos::new(self.size - 1, self.size - 1);
        self.positions().all(|pos| match self.cells[self.idx(pos)] {
            Tile::Empty => pos == corner,
            Tile::Crop { correct } => correct == pos,
        })
    }

    /// All cell positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let size = self.size;
        (0..size * size).map(move |i| GridPos::new(i / size, i % size))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.cells
    }
}
