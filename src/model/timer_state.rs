use std::time::{Duration, SystemTime};

#[derive(Clone, Debug)]
pub struct TimerState {
    pub started_timestamp: SystemTime,
    pub ended_timestamp: Option<SystemTime>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            started_timestamp: SystemTime::now(),
            ended_timestamp: None,
        }
    }
}

impl TimerState {
    pub fn is_ended(&self) -> bool {
        self.ended_timestamp.is_some()
    }

    /// Time since the start; frozen at the ended timestamp once the puzzle
    /// is solved.
    pub fn elapsed(&self) -> Duration {
        let until_time = self.ended_timestamp.unwrap_or_else(SystemTime::now);
        until_time
            .duration_since(self.started_timestamp)
            .unwrap_or_default()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn ended(&self, now: SystemTime) -> TimerState {
        let mut new_state = self.clone();
        new_state.ended_timestamp = Some(now);
        new_state
    }
}
