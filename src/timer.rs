/// A cancellable interval timer counted in simulation ticks.
///
/// The game loop runs at a fixed cadence, so "once per second" is modeled
/// as "once every `period` ticks" and advanced from inside the tick. A
/// timer that is not running never fires; cancelling also clears the
/// elapsed count so a later `start` begins a full interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period: u32,
    elapsed: u32,
    running: bool,
}

impl IntervalTimer {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            elapsed: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.elapsed = 0;
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.elapsed = 0;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one tick. Returns true on the ticks where the interval fires.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let mut timer = IntervalTimer::new(3);
        timer.start();
        let fires: Vec<bool> = (0..7).map(|_| timer.tick()).collect();
        assert_eq!(fires, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn does_not_fire_unless_started() {
        let mut timer = IntervalTimer::new(1);
        for _ in 0..10 {
            assert!(!timer.tick());
        }
    }

    #[test]
    fn cancel_stops_and_clears_progress() {
        let mut timer = IntervalTimer::new(3);
        timer.start();
        timer.tick();
        timer.tick();
        timer.cancel();
        assert!(!timer.is_running());
        assert!(!timer.tick());

        // Restart begins a full interval, not the leftover one.
        timer.start();
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
    }

    #[test]
    fn start_while_running_resets_the_interval() {
        let mut timer = IntervalTimer::new(4);
        timer.start();
        timer.tick();
        timer.tick();
        timer.start();
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
    }
}
