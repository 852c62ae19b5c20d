//! Scroll-sync resolver
//!
//! Event-driven: the host calls [`ScrollSyncResolver::on_visibility`],
//! [`ScrollSyncResolver::on_scroll`] and [`ScrollSyncResolver::tick`] with
//! the event time. Nothing here reads a clock, so timing is fully
//! reproducible.
//!
//! Which producers run depends on the viewport:
//! - wide, observer available: visibility reports only
//! - wide, no observer: scroll fallback only
//! - narrow: both, the scroll fallback always

use crate::arbiter::{Arbiter, FrameGate};
use crate::config::ResolverConfig;
use crate::error::{Result, ScrollError};
use crate::geometry::{visible_ratio, SectionBounds, SectionId, Viewport, ViewportClass};
use crate::producer::{CandidateProducer, ScrollProducer, VisibilityEntry, VisibilityProducer};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::watch;

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// No sections registered yet; events are ignored
    Initializing,
    /// Sections registered, active section is reported
    Tracking,
}

/// Tracks which section is the Active Section Signal
#[derive(Debug)]
pub struct ScrollSyncResolver {
    config: ResolverConfig,
    state: ResolverState,
    sections: Vec<SectionBounds>,
    visibility: Option<VisibilityProducer>,
    scroll: ScrollProducer,
    gate: FrameGate,
    arbiter: Arbiter,
    viewport: Option<Viewport>,
    deferred_scroll: bool,
    publisher: watch::Sender<Option<SectionId>>,
}

impl ScrollSyncResolver {
    /// Resolver with no sections
    ///
    /// # Errors
    /// Returns error if `config` is out of range
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        let (publisher, _) = watch::channel(None);
        Ok(Self {
            visibility: config.observer_available.then(VisibilityProducer::new),
            scroll: ScrollProducer,
            gate: FrameGate::new(config.frame()),
            arbiter: Arbiter::new(config.cooldown()),
            state: ResolverState::Initializing,
            sections: Vec::new(),
            viewport: None,
            deferred_scroll: false,
            publisher,
            config,
        })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ResolverState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[SectionBounds] {
        &self.sections
    }

    /// Current active section
    #[must_use]
    pub fn active(&self) -> Option<SectionId> {
        self.arbiter.active().cloned()
    }

    /// Receiver of the active section; closes on teardown
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SectionId>> {
        self.publisher.subscribe()
    }

    /// Track `sections`, in registration order
    ///
    /// The first call moves the resolver to `Tracking` with the first
    /// section active. Later calls replace the layout (after a resize, say)
    /// and keep the active section if it is still present.
    ///
    /// # Errors
    /// Returns error on an empty list, duplicate ids or invalid bounds
    pub fn register(&mut self, sections: Vec<SectionBounds>) -> Result<()> {
        let first = sections.first().ok_or(ScrollError::NoSections)?.id.clone();
        let mut seen = HashSet::new();
        for section in &sections {
            if !section.is_valid() {
                return Err(ScrollError::InvalidBounds(section.id.clone()));
            }
            if !seen.insert(&section.id) {
                return Err(ScrollError::DuplicateSection(section.id.clone()));
            }
        }

        let keep = self
            .arbiter
            .active()
            .is_some_and(|id| seen.contains(id));
        self.sections = sections;
        if !keep {
            self.arbiter.seed(first.clone());
            self.publisher.send_replace(Some(first));
        }
        if let Some(visibility) = &mut self.visibility {
            visibility.reset();
        }
        if self.state == ResolverState::Initializing {
            tracing::debug!("scroll sync tracking {} sections", self.sections.len());
            self.state = ResolverState::Tracking;
        }
        Ok(())
    }

    /// Feed visibility reports
    ///
    /// Returns the new active section if it changed. Ignored when the
    /// observer is disabled or nothing is registered.
    pub fn on_visibility(
        &mut self,
        entries: impl IntoIterator<Item = VisibilityEntry>,
        viewport: Viewport,
        now: Instant,
    ) -> Option<SectionId> {
        if self.state != ResolverState::Tracking {
            return None;
        }
        let visibility = self.visibility.as_mut()?;
        visibility.record(entries);
        self.viewport = Some(viewport);
        let candidate = visibility.candidate(&self.sections, &viewport, &self.config)?;
        self.propose(candidate, now)
    }

    /// Derive visibility reports from geometry and feed them
    ///
    /// Stands in for a platform observer when the host only knows layout.
    pub fn observe(&mut self, viewport: Viewport, now: Instant) -> Option<SectionId> {
        let entries: Vec<VisibilityEntry> = self
            .sections
            .iter()
            .map(|s| VisibilityEntry::new(s.id.clone(), visible_ratio(s, &viewport)))
            .collect();
        self.on_visibility(entries, viewport, now)
    }

    /// Feed a scroll event
    ///
    /// Evaluated at most once per frame; an event inside a frame is
    /// remembered and evaluated by the next `tick`.
    pub fn on_scroll(&mut self, viewport: Viewport, now: Instant) -> Option<SectionId> {
        if self.state != ResolverState::Tracking {
            return None;
        }
        self.viewport = Some(viewport);
        if !self.scroll_applies(&viewport) {
            return None;
        }
        if !self.gate.admit(now) {
            self.deferred_scroll = true;
            return None;
        }
        self.evaluate_scroll(viewport, now)
    }

    /// Flush deferred work: a throttled scroll, then a parked candidate
    pub fn tick(&mut self, now: Instant) -> Option<SectionId> {
        if self.state != ResolverState::Tracking {
            return None;
        }
        let mut changed = None;
        if self.deferred_scroll && self.gate.admit(now) {
            self.deferred_scroll = false;
            if let Some(viewport) = self.viewport {
                changed = self.evaluate_scroll(viewport, now);
            }
        }
        if let Some(id) = self.arbiter.tick(now) {
            tracing::trace!("active section -> {} (deferred)", id);
            self.publisher.send_replace(Some(id.clone()));
            changed = Some(id);
        }
        changed
    }

    /// Set the active section directly, e.g. after a navbar click
    ///
    /// Bypasses the cooldown and starts a new one, so observation settles
    /// before it can override the choice.
    ///
    /// # Errors
    /// Returns error if `id` is not registered
    pub fn set_active(&mut self, id: SectionId, now: Instant) -> Result<()> {
        if !self.sections.iter().any(|s| s.id == id) {
            return Err(ScrollError::UnknownSection(id));
        }
        if let Some(id) = self.arbiter.force(id, now) {
            tracing::debug!("active section -> {} (override)", id);
            self.publisher.send_replace(Some(id));
        }
        Ok(())
    }

    /// Release every section and close subscriber channels
    pub fn teardown(self) {
        tracing::debug!(
            "scroll sync released {} sections, {} subscribers",
            self.sections.len(),
            self.publisher.receiver_count()
        );
    }

    fn scroll_applies(&self, viewport: &Viewport) -> bool {
        self.visibility.is_none()
            || viewport.class(self.config.narrow_breakpoint) == ViewportClass::Narrow
    }

    fn evaluate_scroll(&mut self, viewport: Viewport, now: Instant) -> Option<SectionId> {
        let candidate = self
            .scroll
            .candidate(&self.sections, &viewport, &self.config)?;
        self.propose(candidate, now)
    }

    fn propose(&mut self, candidate: SectionId, now: Instant) -> Option<SectionId> {
        let id = self.arbiter.propose(candidate, now)?;
        tracing::trace!("active section -> {}", id);
        self.publisher.send_replace(Some(id.clone()));
        Some(id)
    }
}
