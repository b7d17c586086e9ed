use crate::entity::{Direction, Side, PADDLE_HEIGHT, PADDLE_WIDTH};
use crate::game::{Countdown, Game, Phase, Variant};
use crate::renderer::{InputEvent, Renderer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

const COLOR_BACKGROUND: &str = "#000000";
const COLOR_BALL: &str = "#FFFFFF";
const COLOR_PADDLE: &str = "#FFFFFF";
const COLOR_UI: &str = "#FFFFFF";
const COLOR_OVERLAY: &str = "rgba(0, 0, 0, 0.75)";

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,

    // Raw events queued by the listeners, drained by poll_input
    events: Rc<RefCell<VecDeque<InputEvent>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            context,
            events: Rc::new(RefCell::new(VecDeque::new())),
        })
    }

    fn push(events: &Rc<RefCell<VecDeque<InputEvent>>>, event: InputEvent) {
        events.borrow_mut().push_back(event);
    }

    fn movement_key(key: &str) -> Option<(Side, Direction)> {
        match key {
            "w" | "W" => Some((Side::Left, Direction::Up)),
            "s" | "S" => Some((Side::Left, Direction::Down)),
            "ArrowUp" => Some((Side::Right, Direction::Up)),
            "ArrowDown" => Some((Side::Right, Direction::Down)),
            _ => None,
        }
    }

    fn setup_keyboard_listeners(&self) {
        let window = web_sys::window().unwrap();

        let events = self.events.clone();
        let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            // Browser auto-repeat would re-set an already-set flag
            if event.repeat() {
                return;
            }
            let input = match event.key().as_str() {
                " " => Some(InputEvent::Restart),
                "Enter" => Some(InputEvent::Start),
                key => {
                    Self::movement_key(key).map(|(side, dir)| InputEvent::KeyDown { side, dir })
                }
            };
            if let Some(input) = input {
                Self::push(&events, input);
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .unwrap();
        keydown.forget(); // Keep listener alive

        let events = self.events.clone();
        let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if let Some((side, dir)) = Self::movement_key(event.key().as_str()) {
                Self::push(&events, InputEvent::KeyUp { side, dir });
                event.prevent_default();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        window
            .add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())
            .unwrap();
        keyup.forget();
    }

    fn setup_pointer_listeners(&self) {
        let canvas = self.canvas.clone();

        // Touch positions arrive in client coordinates; the simulation
        // wants canvas coordinates.
        let to_canvas = |canvas: &HtmlCanvasElement, cx: f64, cy: f64| {
            let rect = canvas.get_bounding_client_rect();
            (cx - rect.left(), cy - rect.top())
        };

        let events = self.events.clone();
        let canvas_clone = canvas.clone();
        let touchstart = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default(); // Prevent scrolling while dragging a paddle
            // Only the first touch point drives a paddle
            if let Some(touch) = event.touches().item(0) {
                let (x, y) = to_canvas(
                    &canvas_clone,
                    touch.client_x() as f64,
                    touch.client_y() as f64,
                );
                Self::push(&events, InputEvent::TouchStart { x, y });
            }
        }) as Box<dyn FnMut(TouchEvent)>);
        canvas
            .add_event_listener_with_callback("touchstart", touchstart.as_ref().unchecked_ref())
            .unwrap();
        touchstart.forget();

        let events = self.events.clone();
        let canvas_clone = canvas.clone();
        let touchmove = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().item(0) {
                let (x, y) = to_canvas(
                    &canvas_clone,
                    touch.client_x() as f64,
                    touch.client_y() as f64,
                );
                Self::push(&events, InputEvent::TouchMove { x, y });
            }
        }) as Box<dyn FnMut(TouchEvent)>);
        canvas
            .add_event_listener_with_callback("touchmove", touchmove.as_ref().unchecked_ref())
            .unwrap();
        touchmove.forget();

        for name in ["touchend", "touchcancel"] {
            let events = self.events.clone();
            let touchend = Closure::wrap(Box::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    Self::push(&events, InputEvent::TouchEnd);
                }
            }) as Box<dyn FnMut(TouchEvent)>);
            canvas
                .add_event_listener_with_callback(name, touchend.as_ref().unchecked_ref())
                .unwrap();
            touchend.forget();
        }

        let events = self.events.clone();
        let canvas_clone = canvas.clone();
        let click = Closure::wrap(Box::new(move |event: MouseEvent| {
            let (x, y) = to_canvas(
                &canvas_clone,
                event.client_x() as f64,
                event.client_y() as f64,
            );
            Self::push(&events, InputEvent::Click { x, y });
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .unwrap();
        click.forget();
    }

    fn draw_centered_text(&self, game: &Game, text: &str, font: &str, dy: f64) {
        self.context.set_fill_style_str(COLOR_UI);
        self.context.set_font(font);
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context
            .fill_text(text, game.width / 2.0, game.height / 2.0 + dy)
            .unwrap();
    }

    fn draw_court(&self, game: &Game) {
        self.context.set_fill_style_str(COLOR_BACKGROUND);
        self.context.fill_rect(0.0, 0.0, game.width, game.height);

        self.context.set_fill_style_str(COLOR_BALL);
        self.context.begin_path();
        self.context
            .arc(
                game.ball.x,
                game.ball.y,
                game.ball.radius,
                0.0,
                std::f64::consts::TAU,
            )
            .unwrap();
        self.context.fill();

        self.context.set_fill_style_str(COLOR_PADDLE);
        self.context
            .fill_rect(0.0, game.left_paddle.y, PADDLE_WIDTH, PADDLE_HEIGHT);
        self.context.fill_rect(
            game.width - PADDLE_WIDTH,
            game.right_paddle.y,
            PADDLE_WIDTH,
            PADDLE_HEIGHT,
        );
    }

    fn draw_scores(&self, game: &Game) {
        let scores = &game.scores;
        self.context.set_fill_style_str(COLOR_UI);
        self.context.set_font("16px monospace");
        self.context.set_text_baseline("top");

        match game.variant {
            Variant::BotMatch => {
                self.context.set_text_align("left");
                self.context
                    .fill_text(&format!("You: {}", scores.left), 20.0, 10.0)
                    .unwrap();
                self.context.set_text_align("right");
                self.context
                    .fill_text(&format!("Bot: {}", scores.right), game.width - 20.0, 10.0)
                    .unwrap();
            }
            Variant::Duel => {
                self.context.set_text_align("left");
                self.context
                    .fill_text(
                        &format!("P1: {} (wins {})", scores.left, scores.left_wins),
                        20.0,
                        10.0,
                    )
                    .unwrap();
                self.context.set_text_align("right");
                self.context
                    .fill_text(
                        &format!("P2: {} (wins {})", scores.right, scores.right_wins),
                        game.width - 20.0,
                        10.0,
                    )
                    .unwrap();
                self.context.set_text_align("center");
                self.context
                    .fill_text(
                        &format!("Rally: {}  Best: {}", scores.rally, scores.high_score),
                        game.width / 2.0,
                        10.0,
                    )
                    .unwrap();
            }
        }
    }

    fn draw_overlays(&self, game: &Game) {
        match game.phase {
            Phase::Idle => {
                self.context.set_fill_style_str(COLOR_OVERLAY);
                self.context.fill_rect(0.0, 0.0, game.width, game.height);
                self.draw_centered_text(game, "Click to start", "30px monospace", 0.0);
            }
            Phase::Countdown => {
                // Countdown fills the court; no ball or paddles underneath
                self.context.set_fill_style_str(COLOR_BACKGROUND);
                self.context.fill_rect(0.0, 0.0, game.width, game.height);
                let label = match game.countdown {
                    Countdown::Running(0) => "Go!".to_string(),
                    Countdown::Running(n) => n.to_string(),
                    Countdown::Done => String::new(),
                };
                self.draw_centered_text(game, &label, "100px monospace", 0.0);
            }
            Phase::Ended => {
                self.context.set_fill_style_str(COLOR_OVERLAY);
                self.context.fill_rect(0.0, 0.0, game.width, game.height);
                self.draw_centered_text(game, "Game Over!", "40px monospace", -20.0);
                self.draw_centered_text(
                    game,
                    "Click anywhere to restart",
                    "20px monospace",
                    30.0,
                );
            }
            Phase::Playing => {}
        }
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listeners();
        self.setup_pointer_listeners();
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        if self.canvas.width() != game.width as u32 {
            self.canvas.set_width(game.width as u32);
            self.canvas.set_height(game.height as u32);
        }

        self.context.clear_rect(0.0, 0.0, game.width, game.height);
        self.draw_court(game);
        self.draw_scores(game);
        self.draw_overlays(game);
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<InputEvent>> {
        Ok(self.events.borrow_mut().pop_front())
    }
}
