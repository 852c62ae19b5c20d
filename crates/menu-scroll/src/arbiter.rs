//! Arbitration and rate limiting
//!
//! [`Arbiter`] owns the active section. A candidate only replaces it when it
//! differs and the cooldown since the last change has passed; a candidate
//! that arrives too early is parked and applied by [`Arbiter::tick`] unless
//! a later candidate supersedes it.

use crate::geometry::SectionId;
use std::time::{Duration, Instant};

/// At most one admission per interval
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether an evaluation may run at `now`; records it if so
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Single owner of the active section id
#[derive(Debug, Clone)]
pub struct Arbiter {
    cooldown: Duration,
    active: Option<SectionId>,
    last_change: Option<Instant>,
    pending: Option<SectionId>,
}

impl Arbiter {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            active: None,
            last_change: None,
            pending: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<&SectionId> {
        self.pending.as_ref()
    }

    /// Seed the active section without starting a cooldown
    pub fn seed(&mut self, id: SectionId) {
        self.active = Some(id);
        self.pending = None;
    }

    /// Offer a candidate. Returns the new active id when it changed.
    pub fn propose(&mut self, candidate: SectionId, now: Instant) -> Option<SectionId> {
        if self.active.as_ref() == Some(&candidate) {
            self.pending = None;
            return None;
        }
        if self.cooling(now) {
            self.pending = Some(candidate);
            return None;
        }
        self.commit(candidate, now)
    }

    /// Apply a parked candidate once the cooldown has passed
    pub fn tick(&mut self, now: Instant) -> Option<SectionId> {
        if self.cooling(now) {
            return None;
        }
        let candidate = self.pending.take()?;
        if self.active.as_ref() == Some(&candidate) {
            return None;
        }
        self.commit(candidate, now)
    }

    /// Set the active id directly, bypassing the cooldown
    ///
    /// Starts a fresh cooldown so producers cannot immediately undo it.
    pub fn force(&mut self, id: SectionId, now: Instant) -> Option<SectionId> {
        self.pending = None;
        self.last_change = Some(now);
        if self.active.as_ref() == Some(&id) {
            return None;
        }
        self.active = Some(id.clone());
        Some(id)
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.pending = None;
        self.last_change = None;
    }

    fn cooling(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|at| now.saturating_duration_since(at) < self.cooldown)
    }

    fn commit(&mut self, id: SectionId, now: Instant) -> Option<SectionId> {
        self.pending = None;
        self.last_change = Some(now);
        self.active = Some(id.clone());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(50);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn same_candidate_is_not_a_change() {
        let mut arbiter = Arbiter::new(COOLDOWN);
        arbiter.seed(SectionId::new("a"));
        assert!(arbiter.propose(SectionId::new("a"), Instant::now()).is_none());
    }

    #[test]
    fn change_within_cooldown_is_parked_then_flushed() {
        let t0 = Instant::now();
        let mut arbiter = Arbiter::new(COOLDOWN);
        arbiter.seed(SectionId::new("a"));

        assert_eq!(arbiter.propose(SectionId::new("b"), t0), Some(SectionId::new("b")));
        assert!(arbiter.propose(SectionId::new("c"), t0 + ms(10)).is_none());
        assert_eq!(arbiter.pending(), Some(&SectionId::new("c")));

        assert!(arbiter.tick(t0 + ms(30)).is_none());
        assert_eq!(arbiter.tick(t0 + ms(60)), Some(SectionId::new("c")));
    }

    #[test]
    fn returning_to_active_cancels_pending() {
        let t0 = Instant::now();
        let mut arbiter = Arbiter::new(COOLDOWN);
        arbiter.seed(SectionId::new("a"));
        arbiter.propose(SectionId::new("b"), t0);

        arbiter.propose(SectionId::new("a"), t0 + ms(5));
        arbiter.propose(SectionId::new("b"), t0 + ms(10));

        assert!(arbiter.pending().is_none());
        assert!(arbiter.tick(t0 + ms(100)).is_none());
        assert_eq!(arbiter.active(), Some(&SectionId::new("b")));
    }

    #[test]
    fn force_bypasses_and_restarts_cooldown() {
        let t0 = Instant::now();
        let mut arbiter = Arbiter::new(COOLDOWN);
        arbiter.seed(SectionId::new("a"));
        arbiter.propose(SectionId::new("b"), t0);

        assert_eq!(
            arbiter.force(SectionId::new("c"), t0 + ms(1)),
            Some(SectionId::new("c"))
        );
        assert!(arbiter.propose(SectionId::new("b"), t0 + ms(20)).is_none());
        assert_eq!(arbiter.active(), Some(&SectionId::new("c")));
    }

    #[test]
    fn gate_admits_once_per_frame() {
        let t0 = Instant::now();
        let mut gate = FrameGate::new(ms(16));
        assert!(gate.admit(t0));
        assert!(!gate.admit(t0 + ms(8)));
        assert!(gate.admit(t0 + ms(16)));
    }
}
