//! Active-section tracking and scroll-to-section navigation.
//!
//! The tracker answers one question for the navigation UI: which section is
//! the reader looking at? On every scroll event it re-reads the section
//! extents from the host layout and picks the first section (in document
//! order) whose half-open extent contains `scroll_y + fixed_offset`. When no
//! section matches, the previous answer stands, so there is always exactly
//! one active section.
//!
//! ## Programmatic scrolls
//!
//! A navigation click sets the active section immediately and hands the host
//! a [`ScrollCommand`] to animate. While that animation runs, scroll events
//! would walk the highlight through every section in between, so tracking is
//! suspended until a settle deadline passes (or the host reports the scroll
//! has ended via [`SectionTracker::scroll_settled`]). A second click while
//! suspended re-arms the deadline; nothing is queued.
//!
//! Time is passed in as milliseconds rather than read from a clock.

use crate::config::ScrollConfig;
use crate::types::{Extent, SectionId};
use log::debug;

/// Source of rendered section extents.
///
/// Implemented by the host page. Returning `None` means the section is not
/// present in the document.
pub trait SectionLayout {
    fn extent(&self, id: SectionId) -> Option<Extent>;
}

/// A smooth scroll the host must perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    /// Target document-relative `scrollY`.
    pub top: f64,
    pub smooth: bool,
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: Vec<SectionId>,
    active: SectionId,
    suspended_until: Option<u64>,
    header_elevated: bool,
    fixed_offset: f64,
    header_offset: f64,
    settle_delay_ms: u64,
    elevation_threshold: f64,
}

impl SectionTracker {
    /// Track every [`SectionId`] in document order.
    pub fn new(config: &ScrollConfig) -> Self {
        Self::with_sections(config, SectionId::ALL.to_vec())
    }

    /// Track a subset of sections. Order of `sections` is the tie-break order.
    pub fn with_sections(config: &ScrollConfig, sections: Vec<SectionId>) -> Self {
        Self {
            sections,
            active: SectionId::Home,
            suspended_until: None,
            header_elevated: false,
            fixed_offset: config.fixed_offset,
            header_offset: config.header_offset,
            settle_delay_ms: config.settle_delay_ms,
            elevation_threshold: config.elevation_threshold,
        }
    }

    pub fn active_section(&self) -> SectionId {
        self.active
    }

    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    /// Whether the page has scrolled far enough for the elevated header style.
    pub fn header_elevated(&self) -> bool {
        self.header_elevated
    }

    /// True while a programmatic scroll is settling at `now_ms`.
    pub fn is_suspended(&self, now_ms: u64) -> bool {
        self.suspended_until.is_some_and(|deadline| now_ms < deadline)
    }

    /// Recompute the active section for a scroll event.
    pub fn on_scroll<L: SectionLayout + ?Sized>(&mut self, scroll_y: f64, layout: &L, now_ms: u64) {
        self.header_elevated = scroll_y > self.elevation_threshold;

        self.tick(now_ms);
        if self.suspended_until.is_some() {
            return;
        }

        let position = scroll_y + self.fixed_offset;
        let hit = self
            .sections
            .iter()
            .copied()
            .find(|id| layout.extent(*id).is_some_and(|e| e.contains(position)));

        match hit {
            Some(id) if id != self.active => {
                debug!("active section {} -> {} at y={}", self.active, id, scroll_y);
                self.active = id;
            }
            _ => {}
        }
    }

    /// Start a smooth scroll to `id`.
    ///
    /// Returns `None` and leaves all state untouched when the section is not
    /// rendered.
    pub fn scroll_to_section<L: SectionLayout + ?Sized>(
        &mut self,
        id: SectionId,
        layout: &L,
        now_ms: u64,
    ) -> Option<ScrollCommand> {
        let Some(extent) = layout.extent(id) else {
            debug!("scroll to missing section {id} ignored");
            return None;
        };

        self.active = id;
        self.suspended_until = Some(now_ms.saturating_add(self.settle_delay_ms));
        debug!(
            "scroll to {id}: top={} suspended until {}ms",
            extent.top - self.header_offset,
            now_ms.saturating_add(self.settle_delay_ms)
        );

        Some(ScrollCommand {
            top: extent.top - self.header_offset,
            smooth: true,
        })
    }

    /// Clear an expired suspension.
    pub fn tick(&mut self, now_ms: u64) {
        if self
            .suspended_until
            .is_some_and(|deadline| now_ms >= deadline)
        {
            self.suspended_until = None;
        }
    }

    /// The host saw the smooth scroll finish; resume tracking right away.
    pub fn scroll_settled(&mut self) {
        self.suspended_until = None;
    }

    /// Next time `tick` has work to do, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.suspended_until
    }
}

/// Fixed extents, handy for hosts that precompute the layout and for tests.
impl SectionLayout for [(SectionId, Extent)] {
    fn extent(&self, id: SectionId) -> Option<Extent> {
        self.iter().find(|(s, _)| *s == id).map(|(_, e)| *e)
    }
}

impl SectionLayout for Vec<(SectionId, Extent)> {
    fn extent(&self, id: SectionId) -> Option<Extent> {
        self.as_slice().extent(id)
    }
}
