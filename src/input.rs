use crate::entity::{Direction, Side};
use crate::game::{Game, Phase, Variant};
use crate::renderer::InputEvent;
use log::debug;

/// Per-paddle movement intent for the current frame. Keyboard flags are
/// held across frames until the matching key-up; the touch target persists
/// until the touch ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddleIntent {
    pub up: bool,
    pub down: bool,
    /// Desired paddle top, set by touch drag. The paddle steps toward it.
    pub target: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub left: PaddleIntent,
    pub right: PaddleIntent,
}

/// Lifecycle requests that the frame driver acts on, not the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    Quit,
}

/// Folds raw `InputEvent`s into `Intent`, routing touches to a paddle and
/// gating start/restart on the current phase.
pub struct InputAdapter {
    variant: Variant,
    width: f64,
    height: f64,
    intent: Intent,
    /// Active touch: which paddle it grabbed and the y offset from the
    /// paddle's top at grab time, so drags move relative, not absolute.
    touch_anchor: Option<(Side, f64)>,
}

impl InputAdapter {
    pub fn new(variant: Variant, width: f64, height: f64) -> Self {
        Self {
            variant,
            width,
            height,
            intent: Intent::default(),
            touch_anchor: None,
        }
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Apply one raw event. Reads game state for phase gating and paddle
    /// positions but never mutates it.
    pub fn apply(&mut self, event: InputEvent, game: &Game) -> Option<Command> {
        match event {
            InputEvent::KeyDown { side, dir } => {
                self.set_key(side, dir, true);
                None
            }
            InputEvent::KeyUp { side, dir } => {
                self.set_key(side, dir, false);
                None
            }
            InputEvent::TouchStart { x, y } => {
                self.touch_start(x, y, game);
                None
            }
            InputEvent::TouchMove { y, .. } => {
                if let Some((side, offset)) = self.touch_anchor {
                    self.paddle_intent_mut(side).target = Some(y - offset);
                }
                None
            }
            InputEvent::TouchEnd => {
                self.touch_anchor = None;
                self.intent.left.target = None;
                self.intent.right.target = None;
                None
            }
            InputEvent::Click { x, y } => self.click(x, y, game),
            InputEvent::Start => {
                if game.phase == Phase::Idle {
                    Some(Command::Start)
                } else {
                    None
                }
            }
            InputEvent::Restart => {
                if game.phase == Phase::Ended {
                    Some(Command::Restart)
                } else {
                    None
                }
            }
            InputEvent::Quit => Some(Command::Quit),
        }
    }

    fn set_key(&mut self, side: Side, dir: Direction, pressed: bool) {
        let intent = self.paddle_intent_mut(side);
        match dir {
            Direction::Up => intent.up = pressed,
            Direction::Down => intent.down = pressed,
        }
    }

    fn touch_start(&mut self, x: f64, y: f64, game: &Game) {
        match self.variant {
            Variant::BotMatch => {
                // Only a touch that lands on the paddle grabs it.
                if game.left_paddle.span_touches(y) {
                    self.touch_anchor = Some((Side::Left, y - game.left_paddle.y));
                }
            }
            Variant::Duel => {
                // Each half of the canvas controls its own paddle.
                let side = if x < self.width / 2.0 {
                    Side::Left
                } else {
                    Side::Right
                };
                let paddle = match side {
                    Side::Left => &game.left_paddle,
                    Side::Right => &game.right_paddle,
                };
                self.touch_anchor = Some((side, y - paddle.y));
            }
        }
        debug!("touch at ({x:.0}, {y:.0}), anchor {:?}", self.touch_anchor);
    }

    fn click(&mut self, x: f64, y: f64, game: &Game) -> Option<Command> {
        let inside = x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height;
        if !inside {
            return None;
        }
        match game.phase {
            Phase::Ended => Some(Command::Restart),
            // Any click on the idle screen doubles as the start button.
            Phase::Idle => Some(Command::Start),
            _ => None,
        }
    }

    fn paddle_intent_mut(&mut self, side: Side) -> &mut PaddleIntent {
        match side {
            Side::Left => &mut self.intent.left,
            Side::Right => &mut self.intent.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PADDLE_HEIGHT;

    const W: f64 = 800.0;
    const H: f64 = 400.0;

    fn duel_game() -> Game {
        Game::with_seed(Variant::Duel, W, H, 1)
    }

    fn bot_game() -> Game {
        Game::with_seed(Variant::BotMatch, W, H, 1)
    }

    #[test]
    fn key_down_and_up_toggle_flags() {
        let game = duel_game();
        let mut adapter = InputAdapter::new(Variant::Duel, W, H);

        adapter.apply(
            InputEvent::KeyDown {
                side: Side::Left,
                dir: Direction::Up,
            },
            &game,
        );
        assert!(adapter.intent().left.up);

        adapter.apply(
            InputEvent::KeyUp {
                side: Side::Left,
                dir: Direction::Up,
            },
            &game,
        );
        assert!(!adapter.intent().left.up);
        assert!(!adapter.intent().right.up);
    }

    #[test]
    fn bot_touch_must_land_on_paddle() {
        let game = bot_game();
        let mut adapter = InputAdapter::new(Variant::BotMatch, W, H);
        let paddle_top = game.left_paddle.y;

        // Miss: above the paddle.
        adapter.apply(
            InputEvent::TouchStart {
                x: 5.0,
                y: paddle_top - 20.0,
            },
            &game,
        );
        adapter.apply(InputEvent::TouchMove { x: 5.0, y: 100.0 }, &game);
        assert_eq!(adapter.intent().left.target, None);

        // Grab: mid-paddle, then drag; target keeps the grab offset.
        let grab_y = paddle_top + 30.0;
        adapter.apply(InputEvent::TouchStart { x: 5.0, y: grab_y }, &game);
        adapter.apply(
            InputEvent::TouchMove {
                x: 5.0,
                y: grab_y + 50.0,
            },
            &game,
        );
        assert_eq!(adapter.intent().left.target, Some(paddle_top + 50.0));
    }

    #[test]
    fn duel_touch_routes_by_canvas_half() {
        let game = duel_game();
        let mut adapter = InputAdapter::new(Variant::Duel, W, H);

        adapter.apply(InputEvent::TouchStart { x: 100.0, y: 50.0 }, &game);
        adapter.apply(InputEvent::TouchMove { x: 100.0, y: 90.0 }, &game);
        assert!(adapter.intent().left.target.is_some());
        assert_eq!(adapter.intent().right.target, None);

        adapter.apply(InputEvent::TouchEnd, &game);
        adapter.apply(InputEvent::TouchStart { x: 700.0, y: 50.0 }, &game);
        adapter.apply(InputEvent::TouchMove { x: 700.0, y: 90.0 }, &game);
        assert!(adapter.intent().right.target.is_some());
        assert_eq!(adapter.intent().left.target, None);
    }

    #[test]
    fn duel_touch_grabs_anywhere_in_the_half() {
        // Unlike the bot variant, the touch need not land on the paddle.
        let game = duel_game();
        let mut adapter = InputAdapter::new(Variant::Duel, W, H);

        adapter.apply(InputEvent::TouchStart { x: 700.0, y: 10.0 }, &game);
        let offset = 10.0 - game.right_paddle.y;
        adapter.apply(InputEvent::TouchMove { x: 700.0, y: 200.0 }, &game);
        assert_eq!(adapter.intent().right.target, Some(200.0 - offset));
    }

    #[test]
    fn touch_end_clears_targets() {
        let game = duel_game();
        let mut adapter = InputAdapter::new(Variant::Duel, W, H);

        adapter.apply(InputEvent::TouchStart { x: 100.0, y: 150.0 }, &game);
        adapter.apply(InputEvent::TouchMove { x: 100.0, y: 250.0 }, &game);
        assert!(adapter.intent().left.target.is_some());

        adapter.apply(InputEvent::TouchEnd, &game);
        assert_eq!(adapter.intent().left.target, None);

        // A move with no active touch does nothing.
        adapter.apply(InputEvent::TouchMove { x: 100.0, y: 300.0 }, &game);
        assert_eq!(adapter.intent().left.target, None);
    }

    #[test]
    fn click_restarts_only_when_ended_and_inside() {
        let mut game = bot_game();
        let mut adapter = InputAdapter::new(Variant::BotMatch, W, H);

        // Idle: click acts as the start button.
        assert_eq!(
            adapter.apply(InputEvent::Click { x: 400.0, y: 200.0 }, &game),
            Some(Command::Start)
        );

        game.phase = Phase::Playing;
        assert_eq!(
            adapter.apply(InputEvent::Click { x: 400.0, y: 200.0 }, &game),
            None
        );

        game.phase = Phase::Ended;
        assert_eq!(
            adapter.apply(InputEvent::Click { x: 400.0, y: 200.0 }, &game),
            Some(Command::Restart)
        );
        assert_eq!(
            adapter.apply(InputEvent::Click { x: -5.0, y: 200.0 }, &game),
            None
        );
        assert_eq!(
            adapter.apply(InputEvent::Click { x: 400.0, y: 500.0 }, &game),
            None
        );
    }

    #[test]
    fn start_and_restart_are_phase_gated() {
        let mut game = bot_game();
        let mut adapter = InputAdapter::new(Variant::BotMatch, W, H);

        assert_eq!(adapter.apply(InputEvent::Restart, &game), None);
        assert_eq!(adapter.apply(InputEvent::Start, &game), Some(Command::Start));

        game.phase = Phase::Playing;
        assert_eq!(adapter.apply(InputEvent::Start, &game), None);

        game.phase = Phase::Ended;
        assert_eq!(
            adapter.apply(InputEvent::Restart, &game),
            Some(Command::Restart)
        );
    }

    #[test]
    fn quit_always_passes_through() {
        let game = duel_game();
        let mut adapter = InputAdapter::new(Variant::Duel, W, H);
        assert_eq!(adapter.apply(InputEvent::Quit, &game), Some(Command::Quit));
    }

    #[test]
    fn drag_target_can_exceed_bounds() {
        // The adapter passes raw targets through; the simulation clamps.
        let game = duel_game();
        let mut adapter = InputAdapter::new(Variant::Duel, W, H);
        adapter.apply(InputEvent::TouchStart { x: 100.0, y: 150.0 }, &game);
        adapter.apply(InputEvent::TouchMove { x: 100.0, y: H + 200.0 }, &game);
        let target = adapter.intent().left.target.unwrap();
        assert!(target > H - PADDLE_HEIGHT);
    }
}
