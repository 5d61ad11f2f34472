pub mod canvas;
pub mod dom;
pub mod runner;

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::DocumentReadyState;

use sweetheart_engine::PageConfig;

pub use runner::{AnimatorMount, PuzzleMount};

thread_local! {
    static PAGE: RefCell<Option<Rc<Mounted>>> = RefCell::new(None);
}

/// Installs the panic hook and mounts the page with default settings once the
/// document is parsed. A later `page_init` call replaces this mount.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    if parsed(document.ready_state()) {
        boot();
        return Ok(());
    }
    let on_ready = Closure::once_into_js(boot);
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
}

/// The page's anchor elements exist once parsing has finished.
fn parsed(state: DocumentReadyState) -> bool {
    state != DocumentReadyState::Loading
}

/// Automatic activation. Skipped when the host already mounted through `page_init`.
fn boot() {
    if PAGE.with(|cell| cell.borrow().is_some()) {
        return;
    }
    match mount_page(PageConfig::default()) {
        Ok(mounted) => PAGE.with(|cell| *cell.borrow_mut() = Some(mounted)),
        Err(err) => log::warn!("sweetheart: automatic start failed: {:?}", err),
    }
}

/// Both page modules. Either may be absent; neither depends on the other.
struct Mounted {
    animator: RefCell<Option<AnimatorMount>>,
    puzzle: RefCell<Option<PuzzleMount>>,
}

impl Mounted {
    /// Drop both mounts, which detaches their listeners and timers.
    fn unmount(&self) {
        self.animator.borrow_mut().take();
        self.puzzle.borrow_mut().take();
    }
}

/// Handle to the mounted page modules. The mounts themselves live in
/// module-level storage, so the page keeps running even if the host drops this.
#[wasm_bindgen]
pub struct Page {
    mounted: Rc<Mounted>,
}

#[wasm_bindgen]
impl Page {
    /// Reshuffle the puzzle. No-op without a puzzle.
    pub fn shuffle(&self) {
        if let Some(puzzle) = self.mounted.puzzle.borrow().as_ref() {
            puzzle.shuffle();
        }
    }

    pub fn moves(&self) -> u32 {
        self.mounted.puzzle.borrow().as_ref().map(|p| p.moves()).unwrap_or(0)
    }

    #[wasm_bindgen(js_name = isWon)]
    pub fn is_won(&self) -> bool {
        self.mounted.puzzle.borrow().as_ref().map(|p| p.is_won()).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = hasAnimator)]
    pub fn has_animator(&self) -> bool {
        self.mounted.animator.borrow().is_some()
    }

    #[wasm_bindgen(js_name = hasPuzzle)]
    pub fn has_puzzle(&self) -> bool {
        self.mounted.puzzle.borrow().is_some()
    }

    #[wasm_bindgen(js_name = spriteCount)]
    pub fn sprite_count(&self) -> u32 {
        self.mounted.animator.borrow().as_ref().map(|a| a.sprite_count() as u32).unwrap_or(0)
    }
}

/// Parse the optional JSON config, set up logging and mount whatever the page provides.
/// Replaces any earlier mount, including the automatic one.
/// Modules whose anchor element is missing or fails to mount are skipped.
#[wasm_bindgen]
pub fn page_init(config_json: Option<String>) -> Result<Page, JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json.as_deref() {
        Some(json) => PageConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => PageConfig::default(),
    };

    if let Some(previous) = PAGE.with(|cell| cell.borrow_mut().take()) {
        previous.unmount();
    }
    let mounted = mount_page(config)?;
    PAGE.with(|cell| *cell.borrow_mut() = Some(mounted.clone()));
    Ok(Page { mounted })
}

fn mount_page(config: PageConfig) -> Result<Rc<Mounted>, JsValue> {
    let _ = console_log::init_with_level(config.log_level());

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let animator_seed = config.animator.seed.unwrap_or_else(random_seed);
    let puzzle_seed = config.puzzle.seed.unwrap_or_else(random_seed);

    let animator = isolate(
        "animator",
        AnimatorMount::mount(&window, &document, &config.animator, animator_seed),
    );
    let puzzle = isolate(
        "puzzle",
        PuzzleMount::mount(&window, &document, &config.puzzle, puzzle_seed),
    );

    log::info!(
        "sweetheart: initialized (animator: {}, puzzle: {})",
        animator.is_some(),
        puzzle.is_some()
    );
    Ok(Rc::new(Mounted {
        animator: RefCell::new(animator),
        puzzle: RefCell::new(puzzle),
    }))
}

/// A module that fails to mount is logged and left out; it never stops the other one.
fn isolate<T, E: Debug>(module: &str, mounted: Result<Option<T>, E>) -> Option<T> {
    match mounted {
        Ok(mount) => mount,
        Err(err) => {
            log::warn!("{}: mount failed, skipping: {:?}", module, err);
            None
        }
    }
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_mount() -> Rc<Mounted> {
        Rc::new(Mounted { animator: RefCell::new(None), puzzle: RefCell::new(None) })
    }

    #[test]
    fn mounts_immediately_once_document_is_parsed() {
        assert!(!parsed(DocumentReadyState::Loading));
        assert!(parsed(DocumentReadyState::Interactive));
        assert!(parsed(DocumentReadyState::Complete));
    }

    #[test]
    fn automatic_boot_keeps_an_existing_mount() {
        let host = empty_mount();
        PAGE.with(|cell| *cell.borrow_mut() = Some(host.clone()));
        boot();
        let stored = PAGE.with(|cell| cell.borrow_mut().take());
        assert!(stored.is_some_and(|m| Rc::ptr_eq(&m, &host)));
    }

    #[test]
    fn isolate_passes_mounted_module_through() {
        assert_eq!(isolate::<u32, String>("animator", Ok(Some(3))), Some(3));
        assert_eq!(isolate::<u32, String>("animator", Ok(None)), None);
    }

    #[test]
    fn failed_module_does_not_block_the_other() {
        let animator = isolate::<&str, String>("animator", Err("not a canvas".to_string()));
        let puzzle = isolate::<&str, String>("puzzle", Ok(Some("board")));
        assert_eq!(animator, None);
        assert_eq!(puzzle, Some("board"));
    }
}
