//! Sliding image puzzle.
//!
//! State machine: `Idle` (fresh shuffle, clock unset) -> `Active` (first legal
//! move starts the clock) -> `Won` (terminal until the next shuffle) -> `Idle`.

use crate::api::config::PuzzleConfig;
use crate::api::types::{GameEvent, GridPos};
use crate::components::tile::Board;
use crate::core::rng::Rng;
use crate::core::time::{format_clock, Stopwatch};
use crate::input::event::InputEvent;

/// Puzzle lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzlePhase {
    Idle,
    Active,
    Won,
}

/// Result of a click on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not adjacent to the empty cell, or the game is already won.
    Ignored,
    Moved,
    /// The move completed the picture.
    Solved,
}

pub struct PuzzleGame {
    board: Board,
    phase: PuzzlePhase,
    moves: u32,
    clock: Stopwatch,
    shuffle_steps: usize,
    rng: Rng,
    /// Empty-cell positions visited by the last shuffle, starting position first.
    trail: Vec<GridPos>,
    events: Vec<GameEvent>,
}

impl PuzzleGame {
    /// Build a solved board. Call [`PuzzleGame::shuffle`] to start a cycle.
    pub fn new(config: &PuzzleConfig, seed: u64) -> Self {
        Self {
            board: Board::new(config.size),
            phase: PuzzlePhase::Idle,
            moves: 0,
            clock: Stopwatch::new(),
            shuffle_steps: config.shuffle_steps,
            rng: Rng::new(seed),
            trail: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Dispatch a UI stimulus. Returns true when any state changed.
    pub fn handle(&mut self, event: InputEvent, now_ms: f64) -> bool {
        match event {
            InputEvent::TileClicked { row, col } => {
                self.attempt_move(GridPos::new(row, col), now_ms) != MoveOutcome::Ignored
            }
            InputEvent::ShuffleRequested => {
                self.shuffle();
                true
            }
            InputEvent::ClockTick => self.tick_clock(now_ms),
        }
    }

    /// Slide the tile at `pos` into the empty cell if they are orthogonal neighbors.
    pub fn attempt_move(&mut self, pos: GridPos, now_ms: f64) -> MoveOutcome {
        if self.phase == PuzzlePhase::Won || !self.board.contains(pos) {
            return MoveOutcome::Ignored;
        }
        let empty = self.board.empty_pos();
        if pos.distance(empty) != 1 {
            return MoveOutcome::Ignored;
        }

        self.board.swap(pos, empty);
        self.moves += 1;
        self.events.push(GameEvent::MovesChanged { moves: self.moves });

        if self.phase == PuzzlePhase::Idle {
            self.clock.start(now_ms);
            self.phase = PuzzlePhase::Active;
        }

        if self.check_win(now_ms) {
            MoveOutcome::Solved
        } else {
            MoveOutcome::Moved
        }
    }

    /// Reset counters and scramble with a random walk of the empty cell.
    /// Every step is a legal move, so the result is always solvable.
    pub fn shuffle(&mut self) {
        self.phase = PuzzlePhase::Idle;
        self.moves = 0;
        self.clock.reset();
        self.events.push(GameEvent::Shuffled);
        self.events.push(GameEvent::MovesChanged { moves: 0 });
        self.events.push(GameEvent::ClockChanged { secs: 0 });

        self.trail.clear();
        self.trail.push(self.board.empty_pos());
        for _ in 0..self.shuffle_steps {
            let empty = self.board.empty_pos();
            let neighbors = self.board.neighbors(empty);
            if let Some(&next) = self.rng.pick(&neighbors) {
                self.board.swap(next, empty);
                self.trail.push(next);
            }
        }
        log::debug!(
            "puzzle: shuffled {} steps, empty at {:?}",
            self.shuffle_steps,
            self.board.empty_pos()
        );
    }

    /// Win holds when the layout is solved and at least one move was made.
    fn check_win(&mut self, now_ms: f64) -> bool {
        if self.moves == 0 || !self.board.is_solved() {
            return false;
        }
        self.clock.stop(now_ms);
        self.phase = PuzzlePhase::Won;
        let secs = self.clock.elapsed_secs(now_ms);
        self.events.push(GameEvent::ClockChanged { secs });
        self.events.push(GameEvent::Won { moves: self.moves, secs });
        log::info!("puzzle solved in {} moves, {}", self.moves, format_clock(secs));
        true
    }

    /// Periodic clock refresh. Emits `ClockChanged` only while active.
    pub fn tick_clock(&mut self, now_ms: f64) -> bool {
        if self.phase != PuzzlePhase::Active {
            return false;
        }
        let secs = self.clock.elapsed_secs(now_ms);
        self.events.push(GameEvent::ClockChanged { secs });
        true
    }

    /// Whether the periodic clock should be running.
    pub fn clock_running(&self) -> bool {
        self.phase == PuzzlePhase::Active && self.clock.is_running()
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == PuzzlePhase::Won
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn empty_pos(&self) -> GridPos {
        self.board.empty_pos()
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        self.clock.elapsed_secs(now_ms)
    }

    pub fn clock_label(&self, now_ms: f64) -> String {
        format_clock(self.elapsed_secs(now_ms))
    }

    /// Empty-cell walk of the most recent shuffle.
    pub fn shuffle_trail(&self) -> &[GridPos] {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tile::Tile;

    fn game(seed: u64) -> PuzzleGame {
        PuzzleGame::new(&PuzzleConfig::default(), seed)
    }

    fn sorted_crops(board: &Board) -> Vec<Option<GridPos>> {
        let mut crops: Vec<_> = board
            .tiles()
            .iter()
            .map(|t| match t {
                Tile::Empty => None,
                Tile::Crop { correct } => Some(*correct),
            })
            .collect();
        crops.sort();
        crops
    }

    /// Undo the last shuffle by walking its trail backwards.
    fn replay_trail_backwards(g: &mut PuzzleGame, now_ms: f64) -> Vec<MoveOutcome> {
        let trail = g.shuffle_trail().to_vec();
        trail[..trail.len() - 1]
            .iter()
            .rev()
            .map(|&pos| g.attempt_move(pos, now_ms))
            .collect()
    }

    #[test]
    fn fresh_board_is_not_won_without_moves() {
        let g = game(1);
        assert!(g.board().is_solved());
        assert!(!g.is_won());
        assert_eq!(g.phase(), PuzzlePhase::Idle);
        assert_eq!(g.moves(), 0);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        for seed in 1..50 {
            let mut g = game(seed);
            let solved = sorted_crops(g.board());
            g.shuffle();
            assert_eq!(sorted_crops(g.board()), solved);
            let empties = g.board().tiles().iter().filter(|t| **t == Tile::Empty).count();
            assert_eq!(empties, 1);
        }
    }

    #[test]
    fn shuffle_resets_state_and_records_walk() {
        let mut g = game(2);
        g.shuffle();
        assert_eq!(g.shuffle_trail().len(), 101);
        for pair in g.shuffle_trail().windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1);
        }
        assert_eq!(*g.shuffle_trail().last().unwrap(), g.empty_pos());
        assert_eq!(g.moves(), 0);
        assert!(!g.is_won());
        assert_eq!(
            g.drain_events(),
            vec![
                GameEvent::Shuffled,
                GameEvent::MovesChanged { moves: 0 },
                GameEvent::ClockChanged { secs: 0 },
            ]
        );
    }

    #[test]
    fn clicking_empty_cell_is_noop() {
        let mut g = game(3);
        g.shuffle();
        let empty = g.empty_pos();
        assert_eq!(g.attempt_move(empty, 0.0), MoveOutcome::Ignored);
        assert_eq!(g.moves(), 0);
        assert_eq!(g.phase(), PuzzlePhase::Idle);
    }

    #[test]
    fn non_adjacent_clicks_never_change_state() {
        let mut g = game(4);
        g.shuffle();
        g.drain_events();
        let snapshot = g.board().clone();
        let empty = g.empty_pos();
        let far: Vec<_> = g.board().positions().filter(|p| p.distance(empty) > 1).collect();
        for _ in 0..5 {
            for &pos in &far {
                assert_eq!(g.attempt_move(pos, 0.0), MoveOutcome::Ignored);
            }
        }
        assert_eq!(g.board(), &snapshot);
        assert_eq!(g.empty_pos(), empty);
        assert_eq!(g.moves(), 0);
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn out_of_grid_click_ignored() {
        let mut g = game(5);
        assert_eq!(g.attempt_move(GridPos::new(3, 2), 0.0), MoveOutcome::Ignored);
        assert_eq!(g.attempt_move(GridPos::new(99, 99), 0.0), MoveOutcome::Ignored);
    }

    #[test]
    fn move_counter_counts_only_legal_moves() {
        let mut g = game(6);
        g.shuffle();
        let mut rng = Rng::new(77);
        let mut legal = 0;
        for _ in 0..500 {
            let pos = GridPos::new(rng.next_int(3) as usize, rng.next_int(3) as usize);
            let adjacent = pos.distance(g.empty_pos()) == 1;
            let outcome = g.attempt_move(pos, 0.0);
            if g.is_won() {
                break;
            }
            if adjacent {
                legal += 1;
                assert_eq!(outcome, MoveOutcome::Moved);
            } else {
                assert_eq!(outcome, MoveOutcome::Ignored);
            }
            assert_eq!(g.moves(), legal);
        }
    }

    #[test]
    fn move_away_and_back_wins() {
        let mut g = game(7);
        assert_eq!(g.attempt_move(GridPos::new(2, 1), 1_000.0), MoveOutcome::Moved);
        assert_eq!(g.phase(), PuzzlePhase::Active);
        assert!(!g.is_won());
        assert_eq!(g.attempt_move(GridPos::new(2, 2), 4_500.0), MoveOutcome::Solved);
        assert!(g.is_won());
        assert_eq!(g.moves(), 2);
        assert_eq!(g.elapsed_secs(60_000.0), 3);
        let events = g.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::Won { moves: 2, secs: 3 }));
    }

    #[test]
    fn won_board_ignores_moves_until_shuffle() {
        let mut g = game(8);
        g.attempt_move(GridPos::new(1, 2), 0.0);
        g.attempt_move(GridPos::new(2, 2), 0.0);
        assert!(g.is_won());
        assert_eq!(g.attempt_move(GridPos::new(2, 1), 0.0), MoveOutcome::Ignored);
        assert_eq!(g.moves(), 2);

        g.shuffle();
        assert!(!g.is_won());
        assert_eq!(g.phase(), PuzzlePhase::Idle);
        assert_eq!(g.elapsed_secs(10_000.0), 0);
    }

    /// Whether the shuffle walk passed through the solved layout before its end.
    fn walk_revisits_solved(size: usize, trail: &[GridPos]) -> bool {
        let mut board = Board::new(size);
        let last = trail.len() - 1;
        for (i, pair) in trail.windows(2).enumerate() {
            board.swap(pair[1], pair[0]);
            if i + 1 < last && board.is_solved() {
                return true;
            }
        }
        false
    }

    #[test]
    fn reversing_shuffle_trail_solves_on_last_move() {
        let mut clean_walks = 0;
        for seed in 1..40 {
            let mut g = game(seed);
            g.shuffle();
            let revisits = walk_revisits_solved(3, g.shuffle_trail());
            let outcomes = replay_trail_backwards(&mut g, 0.0);

            assert!(g.board().is_solved());
            assert!(g.is_won(), "seed {} should end solved", seed);
            assert_eq!(
                outcomes.iter().filter(|o| **o == MoveOutcome::Solved).count(),
                1,
                "win must trigger exactly once"
            );
            if !revisits {
                clean_walks += 1;
                assert_eq!(*outcomes.last().unwrap(), MoveOutcome::Solved);
            }
        }
        assert!(clean_walks > 0);
    }

    #[test]
    fn shuffle_never_declares_victory() {
        for seed in 1..200 {
            let mut g = game(seed);
            g.shuffle();
            assert!(!g.is_won());
            assert!(!g.drain_events().iter().any(|e| matches!(e, GameEvent::Won { .. })));
        }
    }

    #[test]
    fn clock_ticks_only_while_active() {
        let mut g = game(9);
        assert!(!g.tick_clock(5_000.0));
        assert!(!g.clock_running());

        assert_eq!(g.attempt_move(GridPos::new(2, 1), 10_000.0), MoveOutcome::Moved);
        assert!(g.clock_running());
        g.drain_events();
        assert!(g.handle(InputEvent::ClockTick, 75_400.0));
        assert_eq!(g.drain_events(), vec![GameEvent::ClockChanged { secs: 65 }]);
        assert_eq!(g.clock_label(75_400.0), "01:05");
    }

    #[test]
    fn handle_dispatches_clicks_and_shuffle() {
        let mut g = game(10);
        assert!(g.handle(InputEvent::TileClicked { row: 2, col: 1 }, 0.0));
        assert!(!g.handle(InputEvent::TileClicked { row: 0, col: 0 }, 0.0));
        assert_eq!(g.moves(), 1);
        assert!(g.handle(InputEvent::ShuffleRequested, 0.0));
        assert_eq!(g.moves(), 0);
        assert!(g.handle(InputEvent::tile(g.board().neighbors(g.empty_pos())[0]), 0.0));
    }

    #[test]
    fn same_seed_same_shuffle() {
        let mut a = game(21);
        let mut b = game(21);
        a.shuffle();
        b.shuffle();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.shuffle_trail(), b.shuffle_trail());
    }
}
