use std::time::{Duration, Instant};

/// 周期定时器，由宿主循环轮询
///
/// 每次触发后从触发时刻重新计时，错过的周期不会补发。
#[derive(Debug, Clone)]
pub struct AutoSaveTimer {
    interval: Duration,
    deadline: Instant,
}

impl AutoSaveTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            deadline: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn restart(&mut self, now: Instant) {
        self.deadline = now + self.interval;
    }

    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.restart(now);
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        self.deadline = now + self.interval;
        true
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/watchers/auto_save_timer.rs"]
mod tests;
