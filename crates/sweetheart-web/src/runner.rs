use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlCanvasElement, Window};

use sweetheart_engine::{
    format_clock, project_board, AnimatorConfig, BoardView, ConfigError, GameEvent, InputEvent,
    ParticleAnimator, PuzzleConfig, PuzzleGame, Surface, Viewport,
};

use crate::canvas::CanvasSurface;
use crate::dom::{element_by_id, DomBoardView};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn viewport_of(window: &Window) -> Viewport {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width as f32, height as f32)
}

/// Wires the particle animator to a canvas and the display refresh loop.
pub struct AnimatorRunner {
    animator: ParticleAnimator,
    surface: CanvasSurface,
}

impl AnimatorRunner {
    fn resize(&mut self, viewport: Viewport) {
        self.surface
            .resize(viewport.width as u32, viewport.height as u32);
        self.animator.resize(viewport);
    }

    /// One display frame.
    pub fn tick(&mut self) {
        self.animator.tick(&mut self.surface);
    }

    pub fn sprite_count(&self) -> usize {
        self.animator.len()
    }
}

/// Keeps the animator and its listeners alive. Dropping it stops the frame
/// loop and detaches the resize listener.
pub struct AnimatorMount {
    runner: Rc<RefCell<AnimatorRunner>>,
    window: Window,
    resize: Closure<dyn FnMut()>,
    frame: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
}

impl AnimatorMount {
    /// Start the animator on the configured canvas.
    /// Returns `Ok(None)` when the page has no such canvas.
    pub fn mount(
        window: &Window,
        document: &Document,
        config: &AnimatorConfig,
        seed: u64,
    ) -> Result<Option<Self>, JsValue> {
        let Some(element) = element_by_id(document, &config.canvas_id) else {
            log::info!("animator: no #{} element, skipping", config.canvas_id);
            return Ok(None);
        };
        let canvas = element.dyn_into::<HtmlCanvasElement>()?;
        let mut surface = CanvasSurface::new(canvas)?;

        let viewport = viewport_of(window);
        surface.resize(viewport.width as u32, viewport.height as u32);
        let animator = ParticleAnimator::new(config.clone(), viewport, seed);
        let runner = Rc::new(RefCell::new(AnimatorRunner { animator, surface }));

        let resize = {
            let runner = runner.clone();
            let window = window.clone();
            Closure::wrap(Box::new(move || {
                if let Ok(mut r) = runner.try_borrow_mut() {
                    r.resize(viewport_of(&window));
                }
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;

        let frame_id = Rc::new(Cell::new(None));
        let frame = match start_frame_loop(window, runner.clone(), frame_id.clone()) {
            Ok(frame) => frame,
            Err(err) => {
                let _ = window
                    .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
                return Err(err);
            }
        };
        log::info!(
            "animator: {} sprites on #{}",
            runner.borrow().sprite_count(),
            config.canvas_id
        );
        Ok(Some(Self { runner, window: window.clone(), resize, frame, frame_id }))
    }

    pub fn sprite_count(&self) -> usize {
        self.runner.borrow().sprite_count()
    }
}

impl Drop for AnimatorMount {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // The frame closure holds a clone of its own cell; taking it breaks the cycle.
        if let Ok(mut frame) = self.frame.try_borrow_mut() {
            frame.take();
        }
        log::debug!("animator: unmounted");
    }
}

/// Self-rescheduling `requestAnimationFrame` loop. Runs until the returned
/// cell is emptied; `frame_id` tracks the pending request so it can be cancelled.
fn start_frame_loop(
    window: &Window,
    runner: Rc<RefCell<AnimatorRunner>>,
    frame_id: Rc<Cell<Option<i32>>>,
) -> Result<FrameCallback, JsValue> {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let loop_window = window.clone();
    let loop_id = frame_id.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        loop_id.set(None);
        if let Ok(mut r) = runner.try_borrow_mut() {
            r.tick();
        }
        if let Some(callback) = f.borrow().as_ref() {
            match loop_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => loop_id.set(Some(id)),
                Err(err) => log::warn!("animator: frame request failed: {:?}", err),
            }
        }
    }) as Box<dyn FnMut()>));

    let requested = match g.borrow().as_ref() {
        Some(callback) => Some(window.request_animation_frame(callback.as_ref().unchecked_ref())),
        None => None,
    };
    let first = match requested {
        Some(first) => first,
        None => return Ok(g),
    };
    match first {
        Ok(id) => {
            frame_id.set(Some(id));
            Ok(g)
        }
        Err(err) => {
            g.borrow_mut().take();
            Err(err)
        }
    }
}

/// Drives a [`PuzzleGame`] from DOM clicks and a periodic clock.
pub struct PuzzleRunner {
    game: PuzzleGame,
    view: DomBoardView,
    window: Window,
    clock_interval_ms: i32,
    clock_handle: Option<i32>,
    clock_fn: Option<Function>,
}

impl PuzzleRunner {
    /// Apply one stimulus, then project the model and sync the clock interval.
    pub fn handle(&mut self, event: InputEvent) {
        let now = js_sys::Date::now();
        if self.game.handle(event, now) {
            self.present();
        }
    }

    /// Push pending engine events to the view.
    fn present(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::Shuffled => self.view.set_won(false),
                GameEvent::MovesChanged { moves } => self.view.set_moves(moves),
                GameEvent::ClockChanged { secs } => self.view.set_clock(&format_clock(secs)),
                GameEvent::Won { .. } => self.view.set_won(true),
            }
        }
        project_board(self.game.board(), &mut self.view);
        self.sync_clock();
    }

    /// Start or stop the periodic clock to match the game phase.
    fn sync_clock(&mut self) {
        let running = self.game.clock_running();
        match (running, self.clock_handle) {
            (true, None) => {
                let Some(callback) = &self.clock_fn else {
                    return;
                };
                match self
                    .window
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        callback,
                        self.clock_interval_ms,
                    ) {
                    Ok(handle) => self.clock_handle = Some(handle),
                    Err(err) => log::warn!("puzzle: clock start failed: {:?}", err),
                }
            }
            (false, Some(handle)) => {
                self.window.clear_interval_with_handle(handle);
                self.clock_handle = None;
            }
            _ => {}
        }
    }

    /// Clear the periodic clock, if one is scheduled.
    fn stop_clock(&mut self) {
        if let Some(handle) = self.clock_handle.take() {
            self.window.clear_interval_with_handle(handle);
        }
    }

    pub fn moves(&self) -> u32 {
        self.game.moves()
    }

    pub fn is_won(&self) -> bool {
        self.game.is_won()
    }
}

/// Validate the puzzle settings and build the model they describe.
/// The view is sized from the resulting board, never from the raw config.
fn new_game(config: &PuzzleConfig, seed: u64) -> Result<PuzzleGame, ConfigError> {
    config.validate()?;
    Ok(PuzzleGame::new(config, seed))
}

type Listener = (EventTarget, Closure<dyn FnMut()>);

/// Keeps the puzzle runner and every listener closure alive. Dropping it
/// clears the clock and detaches the click listeners.
pub struct PuzzleMount {
    runner: Rc<RefCell<PuzzleRunner>>,
    _clock: Closure<dyn FnMut()>,
    listeners: Vec<Listener>,
}

impl PuzzleMount {
    /// Build the grid inside the configured container and shuffle once.
    /// Returns `Ok(None)` when the page has no board container.
    pub fn mount(
        window: &Window,
        document: &Document,
        config: &PuzzleConfig,
        seed: u64,
    ) -> Result<Option<Self>, JsValue> {
        let Some(container) = element_by_id(document, &config.board_id) else {
            log::info!("puzzle: no #{} element, skipping", config.board_id);
            return Ok(None);
        };

        let game = new_game(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let size = game.board().size();
        let view = DomBoardView::build(
            document,
            &container,
            size,
            element_by_id(document, &config.moves_id),
            element_by_id(document, &config.timer_id),
            element_by_id(document, &config.win_message_id),
        )?;
        let runner = Rc::new(RefCell::new(PuzzleRunner {
            game,
            view,
            window: window.clone(),
            clock_interval_ms: config.clock_interval_ms.min(i32::MAX as u32) as i32,
            clock_handle: None,
            clock_fn: None,
        }));

        let clock = dispatcher(&runner, InputEvent::ClockTick);
        runner.borrow_mut().clock_fn = Some(clock.as_ref().unchecked_ref::<Function>().clone());

        let mut mount = Self { runner, _clock: clock, listeners: Vec::new() };
        let targets: Vec<(EventTarget, InputEvent)> = mount
            .runner
            .borrow()
            .view
            .tiles()
            .map(|(pos, tile)| (EventTarget::from(tile.clone()), InputEvent::tile(pos)))
            .collect();
        for (target, event) in targets {
            mount.listen(target, event)?;
        }
        if let Some(button) = element_by_id(document, &config.shuffle_button_id) {
            mount.listen(button.into(), InputEvent::ShuffleRequested)?;
        }

        mount.shuffle();
        log::info!("puzzle: {}x{} board on #{}", size, size, config.board_id);
        Ok(Some(mount))
    }

    /// Dispatch `event` on every click of `target`. Kept for detaching on drop.
    fn listen(&mut self, target: EventTarget, event: InputEvent) -> Result<(), JsValue> {
        let on_click = dispatcher(&self.runner, event);
        target.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        self.listeners.push((target, on_click));
        Ok(())
    }

    pub fn shuffle(&self) {
        self.runner.borrow_mut().handle(InputEvent::ShuffleRequested);
    }

    pub fn moves(&self) -> u32 {
        self.runner.borrow().moves()
    }

    pub fn is_won(&self) -> bool {
        self.runner.borrow().is_won()
    }
}

impl Drop for PuzzleMount {
    fn drop(&mut self) {
        for (target, on_click) in &self.listeners {
            let _ = target.remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        }
        if let Ok(mut r) = self.runner.try_borrow_mut() {
            r.stop_clock();
        }
        log::debug!("puzzle: unmounted");
    }
}

/// Closure that feeds a fixed event into the runner.
fn dispatcher(runner: &Rc<RefCell<PuzzleRunner>>, event: InputEvent) -> Closure<dyn FnMut()> {
    let runner = runner.clone();
    Closure::wrap(Box::new(move || {
        if let Ok(mut r) = runner.try_borrow_mut() {
            r.handle(event);
        }
    }) as Box<dyn FnMut()>)
}
