use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use sweetheart_engine::{BoardView, GridPos, TileFace};

const TILE_CLASS: &str = "puzzle-tile";
const EMPTY_CLASS: &str = "empty";
const ACTIVE_CLASS: &str = "active";

/// Look up an element by id, `None` when the page does not have it.
pub fn element_by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

/// DOM implementation of the puzzle view.
/// Tile elements never move; only their background crop and `empty` class change.
pub struct DomBoardView {
    size: usize,
    tiles: Vec<HtmlElement>,
    moves: Option<Element>,
    timer: Option<Element>,
    win_message: Option<Element>,
}

impl DomBoardView {
    /// Replace the container's children with `size * size` tile elements in row-major order.
    pub fn build(
        document: &Document,
        container: &Element,
        size: usize,
        moves: Option<Element>,
        timer: Option<Element>,
        win_message: Option<Element>,
    ) -> Result<Self, JsValue> {
        container.set_inner_html("");
        let mut tiles = Vec::with_capacity(size * size);
        for _ in 0..size * size {
            let tile = document.create_element("div")?.dyn_into::<HtmlElement>()?;
            tile.set_class_name(TILE_CLASS);
            container.append_child(&tile)?;
            tiles.push(tile);
        }
        Ok(Self { size, tiles, moves, timer, win_message })
    }

    /// Tile elements with their grid position, for wiring click listeners.
    pub fn tiles(&self) -> impl Iterator<Item = (GridPos, &HtmlElement)> {
        let size = self.size;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, el)| (GridPos::new(i / size, i % size), el))
    }

    fn try_set_tile(&self, pos: GridPos, face: TileFace) -> Result<(), JsValue> {
        let Some(el) = self.tiles.get(pos.row * self.size + pos.col) else {
            return Ok(());
        };
        let style = el.style();
        match face.background_position() {
            Some(value) => style.set_property("background-position", &value)?,
            None => {
                style.remove_property("background-position")?;
            }
        }
        el.class_list()
            .toggle_with_force(EMPTY_CLASS, face == TileFace::Empty)?;
        Ok(())
    }
}

impl BoardView for DomBoardView {
    fn set_tile(&mut self, pos: GridPos, face: TileFace) {
        if let Err(err) = self.try_set_tile(pos, face) {
            log::warn!("tile {:?} update failed: {:?}", pos, err);
        }
    }

    fn set_moves(&mut self, moves: u32) {
        if let Some(el) = &self.moves {
            el.set_text_content(Some(&moves.to_string()));
        }
    }

    fn set_clock(&mut self, label: &str) {
        if let Some(el) = &self.timer {
            el.set_text_content(Some(label));
        }
    }

    fn set_won(&mut self, won: bool) {
        if let Some(el) = &self.win_message {
            if let Err(err) = el.class_list().toggle_with_force(ACTIVE_CLASS, won) {
                log::warn!("win banner update failed: {:?}", err);
            }
        }
    }
}
