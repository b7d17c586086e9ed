use crate::game::{Game, Variant};
use crate::input::{Command, InputAdapter};
use crate::renderer::Renderer;
use crate::web_renderer::WebRenderer;
use log::info;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const GAME_WIDTH: f64 = 800.0;
const GAME_HEIGHT: f64 = 400.0;

struct GameLoop {
    game: Game,
    adapter: InputAdapter,
    renderer: WebRenderer,
}

impl GameLoop {
    fn new(variant: Variant) -> Result<Self, JsValue> {
        let game = Game::new(variant, GAME_WIDTH, GAME_HEIGHT);
        let adapter = InputAdapter::new(variant, GAME_WIDTH, GAME_HEIGHT);
        let mut renderer = WebRenderer::new("gameCanvas")?;
        renderer
            .init()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            game,
            adapter,
            renderer,
        })
    }

    fn update_frame(&mut self) -> Result<(), JsValue> {
        // Drain all queued events before stepping the simulation
        while let Some(event) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            match self.adapter.apply(event, &self.game) {
                Some(Command::Start) => self.game.start(),
                Some(Command::Restart) => self.game.restart(),
                Some(Command::Quit) => {
                    // In web, we can't really quit, just log it
                    info!("quit requested");
                }
                None => {}
            }
        }

        self.game.tick(self.adapter.intent());

        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(())
    }
}

fn run(variant: Variant) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    info!("starting {variant:?} game loop");
    let game_loop = Rc::new(RefCell::new(GameLoop::new(variant)?));

    // requestAnimationFrame closure that reschedules itself each frame
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let window = web_sys::window().ok_or("no window")?;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(e) = game_loop.borrow_mut().update_frame() {
            web_sys::console::error_1(&e);
            return; // Stop loop on error
        }

        let window = web_sys::window().unwrap();
        window
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    window
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        .unwrap();

    Ok(())
}

#[wasm_bindgen]
pub fn start_bot_match() -> Result<(), JsValue> {
    run(Variant::BotMatch)
}

#[wasm_bindgen]
pub fn start_duel() -> Result<(), JsValue> {
    run(Variant::Duel)
}
