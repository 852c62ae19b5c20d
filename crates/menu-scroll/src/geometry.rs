//! Section and viewport geometry
//!
//! All positions are in document coordinates (pixels from the top of the
//! scrollable content). Sections are half-open spans `[top, top + height)`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Identifier of a tracked section, usually the category id it renders
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Vertical extent of one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: SectionId,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Whether `y` falls inside `[top, bottom)`
    #[inline]
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }

    /// Distance from `y` to the nearest edge, zero when inside
    #[must_use]
    pub fn distance_to(&self, y: f64) -> f64 {
        if y < self.top {
            self.top - y
        } else if y >= self.bottom() {
            y - self.bottom()
        } else {
            0.0
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height >= 0.0
    }
}

/// Coarse device class, decides which reference line and producers apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewportClass {
    /// Desktop-like: reference line is `scroll_y + offset`
    Wide,
    /// Touch-like: reference line is the viewport centre
    Narrow,
}

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_y,
            width,
            height,
        }
    }

    /// Same viewport scrolled to `scroll_y`
    #[inline]
    #[must_use]
    pub fn scrolled_to(self, scroll_y: f64) -> Self {
        Self { scroll_y, ..self }
    }

    #[must_use]
    pub fn class(&self, narrow_breakpoint: f64) -> ViewportClass {
        if self.width < narrow_breakpoint {
            ViewportClass::Narrow
        } else {
            ViewportClass::Wide
        }
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> f64 {
        self.scroll_y + self.height / 2.0
    }

    /// Line the active section is measured against
    #[must_use]
    pub fn reference_line(&self, class: ViewportClass, offset: f64) -> f64 {
        match class {
            ViewportClass::Wide => self.scroll_y + offset,
            ViewportClass::Narrow => self.center(),
        }
    }
}

/// Visible fraction of `section` inside `viewport`, in `0.0..=1.0`
///
/// Measured against the smaller of the section and viewport heights, so a
/// section taller than the viewport reads 1.0 while it fills the screen.
#[must_use]
pub fn visible_ratio(section: &SectionBounds, viewport: &Viewport) -> f64 {
    let overlap = section.bottom().min(viewport.bottom()) - section.top.max(viewport.scroll_y);
    let basis = section.height.min(viewport.height);
    if overlap <= 0.0 || basis <= 0.0 {
        return 0.0;
    }
    (overlap / basis).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_fully_visible_section_is_one() {
        let section = SectionBounds::new("a", 100.0, 200.0);
        let viewport = Viewport::new(0.0, 1024.0, 800.0);
        assert!((visible_ratio(&section, &viewport) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_of_half_visible_section() {
        let section = SectionBounds::new("a", 700.0, 200.0);
        let viewport = Viewport::new(0.0, 1024.0, 800.0);
        assert!((visible_ratio(&section, &viewport) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ratio_of_offscreen_section_is_zero() {
        let section = SectionBounds::new("a", 2000.0, 200.0);
        let viewport = Viewport::new(0.0, 1024.0, 800.0);
        assert_eq!(visible_ratio(&section, &viewport), 0.0);
    }

    #[test]
    fn tall_section_filling_viewport_reads_one() {
        let section = SectionBounds::new("a", 0.0, 3000.0);
        let viewport = Viewport::new(1000.0, 1024.0, 800.0);
        assert!((visible_ratio(&section, &viewport) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reference_line_depends_on_class() {
        let viewport = Viewport::new(500.0, 400.0, 600.0);
        assert_eq!(viewport.class(768.0), ViewportClass::Narrow);
        assert_eq!(viewport.reference_line(ViewportClass::Wide, 80.0), 580.0);
        assert_eq!(viewport.reference_line(ViewportClass::Narrow, 80.0), 800.0);
    }

    #[test]
    fn spans_are_half_open() {
        let section = SectionBounds::new("a", 100.0, 50.0);
        assert!(section.contains(100.0));
        assert!(!section.contains(150.0));
        assert_eq!(section.distance_to(160.0), 10.0);
    }
}
