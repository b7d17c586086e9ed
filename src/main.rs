use std::io;
use std::time::{Duration, Instant};
use volley::{CliRenderer, Command, Game, InputAdapter, Renderer, Variant};

const GAME_WIDTH: f64 = 800.0;
const GAME_HEIGHT: f64 = 400.0;

// Simulation step rate (the core assumes ~60 ticks/sec)
const TICK_RATE: Duration = Duration::from_millis(16);

fn main() -> io::Result<()> {
    env_logger::init();

    let variant = match std::env::args().nth(1).as_deref() {
        Some("duel") => Variant::Duel,
        _ => Variant::BotMatch,
    };

    let mut game = Game::new(variant, GAME_WIDTH, GAME_HEIGHT);
    let mut adapter = InputAdapter::new(variant, GAME_WIDTH, GAME_HEIGHT);
    let mut renderer = CliRenderer::new();

    renderer.init()?;

    let mut last_tick = Instant::now();

    'outer: loop {
        // Drain all pending input before stepping
        while let Some(event) = renderer.poll_input()? {
            match adapter.apply(event, &game) {
                Some(Command::Start) => game.start(),
                Some(Command::Restart) => game.restart(),
                Some(Command::Quit) => break 'outer,
                None => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            game.tick(adapter.intent());
            last_tick = Instant::now();
        }

        // Let renderer decide when to actually render
        // (it manages its own frame rate internally)
        renderer.render(&game)?;
    }

    renderer.cleanup()?;
    Ok(())
}
