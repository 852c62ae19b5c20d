//! Candidate producers
//!
//! A producer looks at section geometry and proposes which section should
//! be active. Producers never change the active section themselves; the
//! resolver feeds their output to the arbiter. Either producer can be left
//! out on a platform without touching arbitration.

use crate::config::ResolverConfig;
use crate::geometry::{SectionBounds, SectionId, Viewport, ViewportClass};
use std::collections::HashMap;

/// Something that proposes an active section
pub trait CandidateProducer {
    /// Best section for `viewport`, if any
    fn candidate(
        &self,
        sections: &[SectionBounds],
        viewport: &Viewport,
        config: &ResolverConfig,
    ) -> Option<SectionId>;
}

/// One visibility report
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub id: SectionId,
    /// Visible fraction, `0.0..=1.0`
    pub ratio: f64,
}

impl VisibilityEntry {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, ratio: f64) -> Self {
        Self {
            id: id.into(),
            ratio,
        }
    }
}

/// Picks the most visible section from the latest ratio reports
///
/// Reports arrive only when a section crosses a threshold, so the producer
/// keeps the last ratio seen for every section.
#[derive(Debug, Default)]
pub struct VisibilityProducer {
    ratios: HashMap<SectionId, f64>,
}

impl VisibilityProducer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record reports, replacing earlier ratios for the same sections
    pub fn record(&mut self, entries: impl IntoIterator<Item = VisibilityEntry>) {
        for entry in entries {
            self.ratios.insert(entry.id, entry.ratio.clamp(0.0, 1.0));
        }
    }

    /// Last known ratio of a section
    #[must_use]
    pub fn ratio(&self, id: &SectionId) -> f64 {
        self.ratios.get(id).copied().unwrap_or(0.0)
    }

    /// Forget every recorded ratio
    pub fn reset(&mut self) {
        self.ratios.clear();
    }
}

impl CandidateProducer for VisibilityProducer {
    fn candidate(
        &self,
        sections: &[SectionBounds],
        viewport: &Viewport,
        config: &ResolverConfig,
    ) -> Option<SectionId> {
        let class = viewport.class(config.narrow_breakpoint);
        let line = viewport.reference_line(class, config.offset);
        let visible: Vec<(&SectionBounds, f64)> = sections
            .iter()
            .map(|s| (s, self.ratio(&s.id)))
            .filter(|(_, ratio)| *ratio > 0.0)
            .collect();

        let best = visible
            .iter()
            .filter(|(_, ratio)| *ratio >= config.threshold)
            .map(|(_, ratio)| *ratio)
            .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.max(r))));

        // Ties at the top ratio, or nothing over threshold, go to whichever
        // section sits closest to the reference line.
        let pool = visible
            .iter()
            .filter(|(_, ratio)| best.map_or(true, |b| (*ratio - b).abs() < f64::EPSILON));
        closest_to(pool.map(|(s, _)| *s), line)
    }
}

/// Geometric fallback driven by scroll position
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollProducer;

impl CandidateProducer for ScrollProducer {
    fn candidate(
        &self,
        sections: &[SectionBounds],
        viewport: &Viewport,
        config: &ResolverConfig,
    ) -> Option<SectionId> {
        match viewport.class(config.narrow_breakpoint) {
            ViewportClass::Wide => {
                let line = viewport.scroll_y + config.offset;
                sections
                    .iter()
                    .rev()
                    .find(|s| s.contains(line))
                    .map(|s| s.id.clone())
            }
            ViewportClass::Narrow => {
                let line = viewport.center();
                let containing = sections.iter().filter(|s| s.contains(line));
                containing
                    .min_by(|a, b| {
                        (a.center() - line)
                            .abs()
                            .total_cmp(&(b.center() - line).abs())
                    })
                    .map(|s| s.id.clone())
            }
        }
    }
}

fn closest_to<'a>(sections: impl Iterator<Item = &'a SectionBounds>, line: f64) -> Option<SectionId> {
    sections
        .min_by(|a, b| a.distance_to(line).total_cmp(&b.distance_to(line)))
        .map(|s| s.id.clone())
}
