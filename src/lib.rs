pub mod entity;
pub mod game;
pub mod input;
pub mod renderer;
pub mod timer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use entity::{Ball, Direction, Paddle, Side};
pub use game::{Countdown, Game, Phase, Scores, Variant};
pub use input::{Command, Intent, InputAdapter, PaddleIntent};
pub use renderer::{InputEvent, Renderer};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
