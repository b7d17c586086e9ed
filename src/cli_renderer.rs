use crate::entity::{Direction, Side, PADDLE_HEIGHT};
use crate::game::{Countdown, Game, Phase, Variant};
use crate::renderer::{InputEvent, Renderer};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

// Character-grid court size; game coordinates are scaled down to fit.
const COLS: u16 = 80;
const ROWS: u16 = 20;

// Without release reporting a press is treated as a hold this long,
// refreshed by terminal auto-repeat.
const SYNTHETIC_HOLD: Duration = Duration::from_millis(150);

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    /// Whether key-release reporting was successfully enabled. Without it
    /// the terminal only delivers presses, so releases are synthesized
    /// from a hold deadline instead.
    enhanced_keys: bool,
    held: Option<(Side, Direction, Instant)>,
    pending: Option<InputEvent>,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
            enhanced_keys: false,
            held: None,
            pending: None,
        }
    }

    fn scale_x(&self, game: &Game, x: f64) -> u16 {
        ((x / game.width) * f64::from(COLS)).clamp(0.0, f64::from(COLS - 1)) as u16
    }

    fn scale_y(&self, game: &Game, y: f64) -> u16 {
        ((y / game.height) * f64::from(ROWS)).clamp(0.0, f64::from(ROWS - 1)) as u16
    }

    fn draw_court(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        let left_top = self.scale_y(game, game.left_paddle.y);
        let left_bottom = self.scale_y(game, game.left_paddle.y + PADDLE_HEIGHT);
        let right_top = self.scale_y(game, game.right_paddle.y);
        let right_bottom = self.scale_y(game, game.right_paddle.y + PADDLE_HEIGHT);
        let ball_col = self.scale_x(game, game.ball.x);
        let ball_row = self.scale_y(game, game.ball.y);

        for row in 0..ROWS {
            queue!(stdout, cursor::MoveTo(0, row))?;
            for col in 0..COLS {
                if col == 0 && row >= left_top && row <= left_bottom {
                    queue!(stdout, SetForegroundColor(Color::Green), Print("█"))?;
                } else if col == COLS - 1 && row >= right_top && row <= right_bottom {
                    queue!(stdout, SetForegroundColor(Color::Blue), Print("█"))?;
                } else if col == ball_col && row == ball_row && game.phase == Phase::Playing {
                    queue!(stdout, SetForegroundColor(Color::Yellow), Print("O"))?;
                } else if col == COLS / 2 {
                    queue!(stdout, SetForegroundColor(Color::DarkGrey), Print("|"))?;
                } else {
                    queue!(stdout, Print(" "))?;
                }
            }
            queue!(stdout, ResetColor)?;
        }
        Ok(())
    }

    fn draw_info(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        let scores = &game.scores;
        let line = match game.variant {
            Variant::BotMatch => format!(
                "Player: {}  Bot: {}  |  Wins {} - {}",
                scores.left, scores.right, scores.left_wins, scores.right_wins
            ),
            Variant::Duel => format!(
                "P1: {}  P2: {}  Rally: {}  Best: {}  |  Wins {} - {}",
                scores.left,
                scores.right,
                scores.rally,
                scores.high_score,
                scores.left_wins,
                scores.right_wins
            ),
        };
        queue!(stdout, cursor::MoveTo(0, ROWS + 1), ResetColor, Print(line))?;

        let controls = match game.variant {
            Variant::BotMatch => "Controls: W/S to move | Enter to start | Space to restart | Q to quit",
            Variant::Duel => "Controls: W/S and Up/Down | Space to restart | Q to quit",
        };
        queue!(stdout, cursor::MoveTo(0, ROWS + 2), Print(controls))?;

        match game.phase {
            Phase::Idle => {
                queue!(
                    stdout,
                    cursor::MoveTo(0, ROWS + 3),
                    SetForegroundColor(Color::Green),
                    Print("Press ENTER to start"),
                    ResetColor
                )?;
            }
            Phase::Countdown => {
                let label = match game.countdown {
                    Countdown::Running(0) => "Go!".to_string(),
                    Countdown::Running(n) => n.to_string(),
                    Countdown::Done => String::new(),
                };
                queue!(
                    stdout,
                    cursor::MoveTo(COLS / 2 - 2, ROWS / 2),
                    SetForegroundColor(Color::Yellow),
                    Print(label),
                    ResetColor
                )?;
            }
            Phase::Ended => {
                queue!(
                    stdout,
                    cursor::MoveTo(0, ROWS + 3),
                    SetForegroundColor(Color::Red),
                    Print("GAME OVER! Press SPACE to restart"),
                    ResetColor
                )?;
            }
            Phase::Playing => {}
        }

        Ok(())
    }

    fn map_key(&mut self, code: KeyCode, kind: KeyEventKind) -> Option<InputEvent> {
        let movement = match code {
            KeyCode::Char('w') | KeyCode::Char('W') => Some((Side::Left, Direction::Up)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some((Side::Left, Direction::Down)),
            KeyCode::Up => Some((Side::Right, Direction::Up)),
            KeyCode::Down => Some((Side::Right, Direction::Down)),
            _ => None,
        };
        if let Some((side, dir)) = movement {
            if self.enhanced_keys {
                return match kind {
                    KeyEventKind::Press => Some(InputEvent::KeyDown { side, dir }),
                    KeyEventKind::Release => Some(InputEvent::KeyUp { side, dir }),
                    KeyEventKind::Repeat => None,
                };
            }
            return self.synthetic_press(side, dir);
        }

        if kind != KeyEventKind::Press {
            return None;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
            KeyCode::Char(' ') => Some(InputEvent::Restart),
            KeyCode::Enter => Some(InputEvent::Start),
            _ => None,
        }
    }

    /// Press handling when the terminal never reports releases: the first
    /// press starts a hold, auto-repeat presses extend it, and switching
    /// keys releases the previous one first.
    fn synthetic_press(&mut self, side: Side, dir: Direction) -> Option<InputEvent> {
        let deadline = Instant::now() + SYNTHETIC_HOLD;
        match self.held {
            Some((held_side, held_dir, _)) if (held_side, held_dir) == (side, dir) => {
                self.held = Some((side, dir, deadline));
                None
            }
            Some((held_side, held_dir, _)) => {
                self.held = Some((side, dir, deadline));
                self.pending = Some(InputEvent::KeyDown { side, dir });
                Some(InputEvent::KeyUp {
                    side: held_side,
                    dir: held_dir,
                })
            }
            None => {
                self.held = Some((side, dir, deadline));
                Some(InputEvent::KeyDown { side, dir })
            }
        }
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        if terminal::supports_keyboard_enhancement()? {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();
        self.draw_court(game, &mut stdout)?;
        self.draw_info(game, &mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        if self.enhanced_keys {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
            self.enhanced_keys = false;
        }
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<InputEvent>> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }
        if let Some((side, dir, deadline)) = self.held {
            if Instant::now() >= deadline {
                self.held = None;
                return Ok(Some(InputEvent::KeyUp { side, dir }));
            }
        }
        if event::poll(Duration::from_millis(1))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                return Ok(self.map_key(code, kind));
            }
        }
        Ok(None)
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
