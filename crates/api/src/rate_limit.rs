use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window limiter keyed by client address. Each admitted request
/// stays in the window for `window`; a full window rejects with the time left
/// until its oldest entry expires.
///
/// Keys come from a client-supplied header, so clients whose window has
/// drained are swept out at most once per window.
#[derive(Debug, Clone)]
pub struct ClientRateLimiter {
    inner: Arc<Mutex<LimiterState>>,
    window: Duration,
    max_requests: usize,
}

#[derive(Debug)]
struct LimiterState {
    clients: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl ClientRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LimiterState {
                clients: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            window,
            max_requests,
        }
    }

    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut state = self.inner.lock();
        if now.saturating_duration_since(state.last_sweep) >= self.window {
            state.clients.retain(|_, queue| {
                expire(queue, now, self.window);
                !queue.is_empty()
            });
            state.last_sweep = now;
        }

        let queue = state.clients.entry(key.to_string()).or_default();
        expire(queue, now, self.window);

        if queue.len() >= self.max_requests {
            let retry_after = queue
                .front()
                .map(|front| self.window.saturating_sub(now.duration_since(*front)))
                .unwrap_or(self.window);
            return Err(retry_after);
        }

        queue.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.inner.lock().clients.len()
    }
}

fn expire(queue: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while queue
        .front()
        .is_some_and(|front| now.saturating_duration_since(*front) >= window)
    {
        queue.pop_front();
    }
}
