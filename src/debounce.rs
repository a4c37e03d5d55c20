use std::time::Duration;

use tokio::time::{sleep_until, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

/// Trailing-edge debounce: every `trigger` pushes the deadline out again, and
/// only the quiet period after the last one fires.
///
/// `fired` is meant for a `select!` arm. It is cancel safe: a dropped wait
/// leaves the deadline armed.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn trigger(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves once the armed deadline passes; never resolves while disarmed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending().await,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}
