use crate::entity::{Direction, Side};
use crate::game::Game;
use std::io;

/// Raw input as the frontends see it. The `InputAdapter` turns these into
/// paddle intent and lifecycle commands; renderers only produce them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { side: Side, dir: Direction },
    KeyUp { side: Side, dir: Direction },
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    Click { x: f64, y: f64 },
    Start,
    Restart,
    Quit,
}

pub trait Renderer {
    fn init(&mut self) -> io::Result<()>;
    fn render(&mut self, game: &Game) -> io::Result<()>;
    fn cleanup(&mut self) -> io::Result<()>;
    fn poll_input(&mut self) -> io::Result<Option<InputEvent>>;
}
