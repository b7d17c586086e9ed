use crate::entity::{Ball, Paddle, Side, PADDLE_HEIGHT, PADDLE_STEP, PADDLE_WIDTH};
use crate::input::{Intent, PaddleIntent};
use crate::timer::IntervalTimer;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Assumed frame-driver cadence. The simulation takes no wall-clock delta;
/// one call to `tick` is one frame.
pub const TICKS_PER_SECOND: u32 = 60;

/// Rally points needed to take a duel game.
pub const WIN_SCORE: u32 = 5;

pub const COUNTDOWN_START: i32 = 3;

/// Ball speed multiplier applied once per ramp interval (5% per second).
const RAMP_FACTOR: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Single player on the left, proportional bot on the right. A single
    /// lost ball ends the game; wins are tallied across games.
    BotMatch,
    /// Two players, first to five points. The shared rally counter tracks
    /// consecutive paddle exchanges and feeds the session high score.
    Duel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Countdown,
    Playing,
    Ended,
}

/// Pre-game countdown shown in the bot variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Running(i32),
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    /// Per-side rally scores; reset every game.
    pub left: u32,
    pub right: u32,
    /// Per-side win counters; persist across games within the session.
    pub left_wins: u32,
    pub right_wins: u32,
    /// Duel only: consecutive paddle exchanges in the current game.
    pub rally: u32,
    /// Duel only: best rally count seen this session.
    pub high_score: u32,
}

pub struct Game {
    pub variant: Variant,
    pub width: f64,
    pub height: f64,
    pub ball: Ball,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub scores: Scores,
    pub phase: Phase,
    pub countdown: Countdown,
    ramp_timer: IntervalTimer,
    countdown_timer: IntervalTimer,
    rng: SmallRng,
}

impl Game {
    pub fn new(variant: Variant, width: f64, height: f64) -> Self {
        Self::with_rng(variant, width, height, SmallRng::from_entropy())
    }

    /// Deterministic construction for tests: the wall-bounce scaling is the
    /// only source of randomness, so a fixed seed fixes the whole run.
    pub fn with_seed(variant: Variant, width: f64, height: f64, seed: u64) -> Self {
        Self::with_rng(variant, width, height, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(variant: Variant, width: f64, height: f64, rng: SmallRng) -> Self {
        let mut game = Self {
            variant,
            width,
            height,
            ball: Ball::new(width / 2.0, height / 2.0),
            left_paddle: Paddle::centered(height),
            right_paddle: Paddle::centered(height),
            scores: Scores::default(),
            phase: Phase::Idle,
            countdown: Countdown::Done,
            ramp_timer: IntervalTimer::new(TICKS_PER_SECOND),
            countdown_timer: IntervalTimer::new(TICKS_PER_SECOND),
            rng,
        };

        // The duel starts hot; the bot match waits for an explicit start.
        if variant == Variant::Duel {
            game.phase = Phase::Playing;
            game.ramp_timer.start();
        }

        game
    }

    /// Begin the pre-game countdown (bot variant; no-op once underway).
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        info!("starting countdown");
        self.phase = Phase::Countdown;
        self.countdown = Countdown::Running(COUNTDOWN_START);
        self.countdown_timer.start();
    }

    /// Fresh game: ball and paddles re-centered, rally scores zeroed, any
    /// running timers cancelled before the ramp is re-armed. Win counters
    /// and the duel high score survive.
    pub fn restart(&mut self) {
        info!("restarting game");
        self.countdown_timer.cancel();
        self.ramp_timer.cancel();

        self.ball.reset(self.width / 2.0, self.height / 2.0);
        self.left_paddle = Paddle::centered(self.height);
        self.right_paddle = Paddle::centered(self.height);
        self.scores.left = 0;
        self.scores.right = 0;
        self.scores.rally = 0;
        self.countdown = Countdown::Done;
        self.phase = Phase::Playing;
        self.ramp_timer.start();
    }

    pub fn ramp_running(&self) -> bool {
        self.ramp_timer.is_running()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown_timer.is_running()
    }

    /// Advance the simulation by one frame. Intent is read, never written.
    pub fn tick(&mut self, intent: &Intent) {
        match self.phase {
            Phase::Idle | Phase::Ended => return,
            Phase::Countdown => {
                self.tick_countdown();
                return;
            }
            Phase::Playing => {}
        }

        self.move_paddles(intent);

        self.ball.x += self.ball.speed_x;
        self.ball.y += self.ball.speed_y;

        // Top/bottom wall bounce with a random magnitude wobble.
        if self.ball.y + self.ball.radius > self.height || self.ball.y - self.ball.radius < 0.0 {
            let scale = self.rng.gen_range(0.8..1.2);
            self.ball.speed_y = -self.ball.speed_y * scale;
        }

        // Paddle contact is checked before the out-of-bounds loss so a save
        // on the goal line still counts.
        if self.ball.x - self.ball.radius < PADDLE_WIDTH
            && self.left_paddle.span_contains(self.ball.y)
        {
            self.ball.speed_x = -self.ball.speed_x;
            self.score_hit(Side::Left);
        } else if self.ball.x + self.ball.radius > self.width - PADDLE_WIDTH
            && self.right_paddle.span_contains(self.ball.y)
        {
            self.ball.speed_x = -self.ball.speed_x;
            self.score_hit(Side::Right);
        } else if self.ball.x - self.ball.radius < 0.0 {
            self.lose_point(Side::Left);
        } else if self.ball.x + self.ball.radius > self.width {
            self.lose_point(Side::Right);
        }

        if self.ramp_timer.tick() {
            self.ball.speed_x *= RAMP_FACTOR;
            self.ball.speed_y *= RAMP_FACTOR;
        }
    }

    fn tick_countdown(&mut self) {
        if !self.countdown_timer.tick() {
            return;
        }
        if let Countdown::Running(n) = self.countdown {
            if n > 0 {
                self.countdown = Countdown::Running(n - 1);
            } else {
                self.countdown = Countdown::Done;
                self.countdown_timer.cancel();
                self.phase = Phase::Playing;
                self.ramp_timer.start();
                info!("countdown finished, game on");
            }
        }
    }

    fn move_paddles(&mut self, intent: &Intent) {
        let height = self.height;
        Self::move_paddle(&mut self.left_paddle, &intent.left, height);
        match self.variant {
            Variant::BotMatch => {
                // Proportional bot: one step toward the ball, nothing else.
                let target = self.ball.y - PADDLE_HEIGHT / 2.0;
                Self::step_toward(&mut self.right_paddle, target, height);
            }
            Variant::Duel => {
                Self::move_paddle(&mut self.right_paddle, &intent.right, height);
            }
        }
    }

    /// Keyboard flags win over a touch target; up is checked before down,
    /// so only one branch moves the paddle per tick.
    fn move_paddle(paddle: &mut Paddle, intent: &PaddleIntent, height: f64) {
        if intent.up {
            paddle.y -= PADDLE_STEP;
            paddle.clamp(height);
        } else if intent.down {
            paddle.y += PADDLE_STEP;
            paddle.clamp(height);
        } else if let Some(target) = intent.target {
            Self::step_toward(paddle, target, height);
        }
    }

    fn step_toward(paddle: &mut Paddle, target: f64, height: f64) {
        let delta = (target - paddle.y).clamp(-PADDLE_STEP, PADDLE_STEP);
        paddle.y += delta;
        paddle.clamp(height);
    }

    fn score_hit(&mut self, side: Side) {
        match self.variant {
            Variant::BotMatch => {
                match side {
                    Side::Left => self.scores.left += 1,
                    Side::Right => self.scores.right += 1,
                }
                debug!("paddle hit, scores {}:{}", self.scores.left, self.scores.right);
            }
            Variant::Duel => {
                self.scores.rally += 1;
                if self.scores.rally > self.scores.high_score {
                    self.scores.high_score = self.scores.rally;
                }
                debug!("rally at {}", self.scores.rally);
            }
        }
    }

    /// The ball crossed the boundary on `side` without a save.
    fn lose_point(&mut self, side: Side) {
        let winner = side.opposite();
        match self.variant {
            Variant::BotMatch => {
                match winner {
                    Side::Left => self.scores.left_wins += 1,
                    Side::Right => self.scores.right_wins += 1,
                }
                info!(
                    "ball out on the {:?} side, wins now {}:{}",
                    side, self.scores.left_wins, self.scores.right_wins
                );
                self.end_game();
            }
            Variant::Duel => {
                match winner {
                    Side::Left => self.scores.left += 1,
                    Side::Right => self.scores.right += 1,
                }
                debug!("point, game at {}:{}", self.scores.left, self.scores.right);
                if self.scores.left >= WIN_SCORE || self.scores.right >= WIN_SCORE {
                    self.check_winner();
                } else {
                    // New serve from the center; one loss event per crossing.
                    self.ball.reset(self.width / 2.0, self.height / 2.0);
                    self.scores.rally = 0;
                }
            }
        }
    }

    /// Win attribution follows the ball's current half of the board, not
    /// the score that crossed the threshold.
    /// TODO: this looks inverted when the ball sits in the loser's half;
    /// confirm the intended rule before changing it.
    fn check_winner(&mut self) {
        if self.scores.left >= WIN_SCORE {
            if self.ball.x < self.width / 2.0 {
                self.scores.right_wins += 1;
            } else {
                self.scores.left_wins += 1;
            }
        } else if self.scores.right >= WIN_SCORE {
            if self.ball.x > self.width / 2.0 {
                self.scores.left_wins += 1;
            } else {
                self.scores.right_wins += 1;
            }
        }
        self.end_game();
    }

    /// Terminal transition: physics halts, rally scores and ball velocity
    /// go back to their initial values, and both timers are cancelled so
    /// nothing keeps mutating state behind the overlay. The ball's
    /// *position* is left where it stopped until an explicit restart.
    fn end_game(&mut self) {
        self.phase = Phase::Ended;
        self.scores.left = 0;
        self.scores.right = 0;
        self.scores.rally = 0;
        self.ball.reset_speed();
        self.ramp_timer.cancel();
        self.countdown_timer.cancel();
        info!(
            "game over, session wins {}:{}",
            self.scores.left_wins, self.scores.right_wins
        );
    }
}
