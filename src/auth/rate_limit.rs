use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_ATTEMPTS: usize = 5;
const WINDOW: Duration = Duration::from_secs(900); // 15 minutes
/// Tracked IPs before `record_failure` sweeps out stale ones.
const SWEEP_THRESHOLD: usize = 1024;

type Attempts = HashMap<IpAddr, Vec<Instant>>;

/// Failed-login tracker keyed by client IP.
#[derive(Clone, Default)]
pub struct RateLimiter {
    attempts: Arc<Mutex<Attempts>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the IP has `MAX_ATTEMPTS` failures inside the window.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        self.is_blocked_at(ip, Instant::now())
    }

    pub fn record_failure(&self, ip: IpAddr) {
        self.record_failure_at(ip, Instant::now());
    }

    /// Forget the IP's failures (after a successful login).
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }

    fn is_blocked_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let Some(timestamps) = map.get_mut(&ip) else {
            return false;
        };
        if let Some(cutoff) = now.checked_sub(WINDOW) {
            timestamps.retain(|t| *t > cutoff);
        }
        let blocked = timestamps.len() >= MAX_ATTEMPTS;
        if timestamps.is_empty() {
            map.remove(&ip);
        }
        blocked
    }

    fn record_failure_at(&self, ip: IpAddr, now: Instant) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        if map.len() >= SWEEP_THRESHOLD {
            sweep(&mut map, now);
        }
        map.entry(ip).or_default().push(now);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Drop failures older than the window, and IPs left with none.
fn sweep(map: &mut Attempts, now: Instant) {
    let Some(cutoff) = now.checked_sub(WINDOW) else {
        return;
    };
    map.retain(|_, timestamps| {
        timestamps.retain(|t| *t > cutoff);
        !timestamps.is_empty()
    });
}
