pub const PADDLE_HEIGHT: f64 = 100.0;
pub const PADDLE_WIDTH: f64 = 10.0;
pub const PADDLE_STEP: f64 = 5.0;
pub const BALL_RADIUS: f64 = 10.0;
pub const BALL_SPEED: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub radius: f64,
}

impl Ball {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            speed_x: BALL_SPEED,
            speed_y: BALL_SPEED,
            radius: BALL_RADIUS,
        }
    }

    /// Back to the serve position with the initial velocity.
    pub fn reset(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.reset_speed();
    }

    /// Velocity only; position is left where it is.
    pub fn reset_speed(&mut self) {
        self.speed_x = BALL_SPEED;
        self.speed_y = BALL_SPEED;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub y: f64,
}

impl Paddle {
    pub fn centered(canvas_height: f64) -> Self {
        Self {
            y: (canvas_height - PADDLE_HEIGHT) / 2.0,
        }
    }

    pub fn clamp(&mut self, canvas_height: f64) {
        self.y = self.y.clamp(0.0, canvas_height - PADDLE_HEIGHT);
    }

    pub fn center(&self) -> f64 {
        self.y + PADDLE_HEIGHT / 2.0
    }

    /// Open interval: a ball centered exactly on a paddle edge is a miss.
    pub fn span_contains(&self, y: f64) -> bool {
        y > self.y && y < self.y + PADDLE_HEIGHT
    }

    /// Closed interval, used for touch grabs.
    pub fn span_touches(&self, y: f64) -> bool {
        y >= self.y && y <= self.y + PADDLE_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_paddle_on_canvas() {
        let mut paddle = Paddle { y: -20.0 };
        paddle.clamp(400.0);
        assert_eq!(paddle.y, 0.0);

        paddle.y = 500.0;
        paddle.clamp(400.0);
        assert_eq!(paddle.y, 400.0 - PADDLE_HEIGHT);
    }

    #[test]
    fn span_is_open_on_both_edges() {
        let paddle = Paddle { y: 150.0 };
        assert!(!paddle.span_contains(150.0));
        assert!(!paddle.span_contains(250.0));
        assert!(paddle.span_contains(150.1));
        assert!(paddle.span_contains(249.9));
    }

    #[test]
    fn touch_span_is_closed() {
        let paddle = Paddle { y: 150.0 };
        assert!(paddle.span_touches(150.0));
        assert!(paddle.span_touches(250.0));
        assert!(!paddle.span_touches(250.1));
    }

    #[test]
    fn ball_reset_restores_initial_velocity() {
        let mut ball = Ball::new(400.0, 200.0);
        ball.speed_x = -7.3;
        ball.speed_y = 4.1;
        ball.reset(400.0, 200.0);
        assert_eq!(ball.speed_x, BALL_SPEED);
        assert_eq!(ball.speed_y, BALL_SPEED);
    }
}
