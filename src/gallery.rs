//! Indexed preview dialog shared by every gallery on the page.
//!
//! Certifications, achievements and projects all behave the same way: click
//! an item to open it in a dialog, step through neighbours with prev/next
//! (wrapping at both ends), close with an exit animation. [`Gallery`] is that
//! behaviour once, generic over the item type.
//!
//! ## State machine
//!
//! ```text
//!            open(i)                      probe result
//! Closed ───────────────▶ Open(i, loading) ─────────────▶ Open(i, loaded)
//!   ▲                        ▲      │ navigate(dir)             │
//!   │ tick ≥ forget_at       │      └──────────◀────────────────┘
//!   │                        │ open(j)
//! Closing(i, forget_at) ◀────┴──────────── close() from either Open state
//! ```
//!
//! Image sizes are unknown until the file header has been read, so every
//! open/navigate returns a [`ProbeRequest`] for the host to run out of band.
//! The result comes back through [`Gallery::complete_probe`] tagged with the
//! request's [`Ticket`]; only the newest ticket is accepted, so a slow probe
//! for an item the visitor has already moved past cannot overwrite the
//! current dimensions. Success or failure, the result always ends `loading`.
//!
//! Closing hides the dialog at once but keeps the item and its dimensions
//! until `close_grace_ms` has passed, so the exit animation still has content
//! to show.

use crate::config::DialogConfig;
use crate::sizing::{self, DialogBox};
use crate::types::{Dimensions, Direction, Viewport};
use log::debug;
use std::fmt::Display;

/// Anything that can be previewed in the dialog.
pub trait GalleryEntry {
    /// Image URI shown in the dialog and probed for its natural size.
    fn image_uri(&self) -> &str;
}

/// Identifies one probe request. Newer tickets compare greater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Out-of-band image size lookup the host must start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub ticket: Ticket,
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Closed,
    Open,
    Closing { forget_at: u64 },
}

/// Snapshot of the dialog as the gallery UI sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryState {
    /// Item shown (or still fading out) in the dialog.
    pub open_index: Option<usize>,
    /// Whether the dialog is on screen.
    pub visible: bool,
    pub loading: bool,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone)]
pub struct Gallery<T> {
    items: Vec<T>,
    phase: Phase,
    index: Option<usize>,
    loading: bool,
    dimensions: Dimensions,
    placeholder: Dimensions,
    config: DialogConfig,
    ticket: u64,
}

impl<T: GalleryEntry> Gallery<T> {
    pub fn new(items: Vec<T>, config: &DialogConfig) -> Self {
        let placeholder = config.placeholder_dimensions();
        Self {
            items,
            phase: Phase::Closed,
            index: None,
            loading: false,
            dimensions: placeholder,
            placeholder,
            config: config.clone(),
            ticket: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the dialog is on screen.
    pub fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    pub fn state(&self) -> GalleryState {
        GalleryState {
            open_index: self.index,
            visible: self.is_open(),
            loading: self.loading,
            dimensions: self.dimensions,
        }
    }

    /// Item currently in the dialog, including during the close grace period.
    pub fn current(&self) -> Option<&T> {
        self.index.and_then(|i| self.items.get(i))
    }

    /// Open the dialog on `index`.
    ///
    /// Out-of-range indexes are ignored and leave the state untouched.
    pub fn open(&mut self, index: usize) -> Option<ProbeRequest> {
        if index >= self.items.len() {
            debug!("open({index}) ignored: gallery has {} items", self.items.len());
            return None;
        }
        self.phase = Phase::Open;
        Some(self.select(index))
    }

    /// Step to the neighbouring item, wrapping at both ends.
    ///
    /// Only meaningful while the dialog is visible; otherwise a no-op.
    pub fn navigate(&mut self, direction: Direction) -> Option<ProbeRequest> {
        let (Phase::Open, Some(index)) = (self.phase, self.index) else {
            return None;
        };
        let next = step(index, self.items.len(), direction);
        Some(self.select(next))
    }

    fn select(&mut self, index: usize) -> ProbeRequest {
        self.index = Some(index);
        self.loading = true;
        self.dimensions = self.placeholder;
        self.ticket += 1;
        debug!("dialog -> item {index} (ticket {})", self.ticket);
        ProbeRequest {
            ticket: Ticket(self.ticket),
            uri: self.items[index].image_uri().to_string(),
        }
    }

    /// Feed back the outcome of a probe request.
    ///
    /// Returns `false` when the ticket is stale and the result was dropped.
    pub fn complete_probe<E: Display>(
        &mut self,
        ticket: Ticket,
        result: Result<Dimensions, E>,
    ) -> bool {
        if ticket != Ticket(self.ticket) || self.phase != Phase::Open {
            debug!("dropping stale probe result for ticket {}", ticket.0);
            return false;
        }
        match result {
            Ok(dims) => self.dimensions = dims,
            Err(e) => {
                debug!("probe failed, keeping placeholder: {e}");
                self.dimensions = self.placeholder;
            }
        }
        self.loading = false;
        true
    }

    /// Hide the dialog; the item is forgotten once the grace period ends.
    pub fn close(&mut self, now_ms: u64) {
        if self.phase != Phase::Open {
            return;
        }
        self.phase = Phase::Closing {
            forget_at: now_ms.saturating_add(self.config.close_grace_ms),
        };
        self.loading = false;
        // Invalidate any in-flight probe.
        self.ticket += 1;
    }

    /// Forget the closed item once its grace period has passed.
    pub fn tick(&mut self, now_ms: u64) {
        match self.phase {
            Phase::Closing { forget_at } if now_ms >= forget_at => self.forget(),
            _ => {}
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        match self.phase {
            Phase::Closing { forget_at } => Some(forget_at),
            _ => None,
        }
    }

    fn forget(&mut self) {
        self.phase = Phase::Closed;
        self.index = None;
        self.loading = false;
        self.dimensions = self.placeholder;
    }

    /// Dialog box for the current dimensions in `viewport`.
    pub fn dialog_box(&self, viewport: Viewport) -> DialogBox {
        sizing::dialog_box(self.dimensions, viewport, &self.config)
    }
}

impl<T: GalleryEntry + PartialEq> Gallery<T> {
    /// Swap the item list, following the open item to its new position.
    ///
    /// If the open item is not in the new list the dialog is closed and
    /// forgotten immediately; there is nothing left to animate out.
    pub fn replace_items(&mut self, items: Vec<T>) {
        let new_index = self
            .current()
            .and_then(|cur| items.iter().position(|item| item == cur));
        self.items = items;

        match (self.index, new_index) {
            (None, _) => {}
            (Some(_), Some(i)) => self.index = Some(i),
            (Some(_), None) => {
                debug!("open item filtered out, closing dialog");
                self.ticket += 1;
                self.forget();
            }
        }
    }
}

/// Circular step over `len` items. `len` must be non-zero.
fn step(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Prev => (index + len - 1) % len,
        Direction::Next => (index + 1) % len,
    }
}

impl GalleryEntry for String {
    fn image_uri(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(names: &[&str]) -> Gallery<String> {
        Gallery::new(
            names.iter().map(|s| s.to_string()).collect(),
            &DialogConfig::default(),
        )
    }

    fn index(g: &Gallery<String>) -> Option<usize> {
        g.state().open_index
    }

    fn ok(w: u32, h: u32) -> Result<Dimensions, String> {
        Ok(Dimensions::new(w, h))
    }

    // =========================================================================
    // open
    // =========================================================================

    #[test]
    fn starts_closed() {
        let g = gallery(&["a", "b"]);
        let s = g.state();
        assert_eq!(s.open_index, None);
        assert!(!s.visible);
        assert!(!s.loading);
    }

    #[test]
    fn open_enters_loading_with_placeholder() {
        let mut g = gallery(&["a.png", "b.png"]);
        let req = g.open(1).unwrap();
        assert_eq!(req.uri, "b.png");
        let s = g.state();
        assert_eq!(s.open_index, Some(1));
        assert!(s.visible);
        assert!(s.loading);
        assert_eq!(s.dimensions, Dimensions::new(800, 600));
    }

    #[test]
    fn open_out_of_range_is_ignored() {
        let mut g = gallery(&["a", "b"]);
        assert!(g.open(2).is_none());
        assert_eq!(g.state().open_index, None);

        g.open(0);
        assert!(g.open(99).is_none());
        assert_eq!(index(&g), Some(0));
    }

    #[test]
    fn open_on_empty_gallery_is_ignored() {
        let mut g = gallery(&[]);
        assert!(g.open(0).is_none());
        assert!(!g.is_open());
    }

    // =========================================================================
    // probe completion
    // =========================================================================

    #[test]
    fn successful_probe_sets_dimensions_and_clears_loading() {
        let mut g = gallery(&["a"]);
        let req = g.open(0).unwrap();
        assert!(g.complete_probe(req.ticket, ok(1600, 900)));
        let s = g.state();
        assert!(!s.loading);
        assert_eq!(s.dimensions, Dimensions::new(1600, 900));
    }

    #[test]
    fn failed_probe_keeps_placeholder_and_clears_loading() {
        let mut g = gallery(&["a"]);
        let req = g.open(0).unwrap();
        assert!(g.complete_probe(req.ticket, Err::<Dimensions, _>("404")));
        let s = g.state();
        assert!(!s.loading);
        assert_eq!(s.dimensions, Dimensions::new(800, 600));
    }

    #[test]
    fn stale_probe_result_is_dropped() {
        let mut g = gallery(&["a", "b", "c"]);
        let first = g.open(0).unwrap();
        let second = g.navigate(Direction::Next).unwrap();

        // First probe arrives late
        assert!(!g.complete_probe(first.ticket, ok(10, 10)));
        assert!(g.state().loading);

        assert!(g.complete_probe(second.ticket, ok(20, 20)));
        assert_eq!(g.state().dimensions, Dimensions::new(20, 20));
    }

    #[test]
    fn probe_after_close_is_dropped() {
        let mut g = gallery(&["a"]);
        let req = g.open(0).unwrap();
        g.close(0);
        assert!(!g.complete_probe(req.ticket, ok(10, 10)));
        assert_eq!(g.state().dimensions, Dimensions::new(800, 600));
        assert!(!g.state().loading);
    }

    #[test]
    fn tickets_increase() {
        let mut g = gallery(&["a", "b"]);
        let a = g.open(0).unwrap();
        let b = g.navigate(Direction::Next).unwrap();
        assert!(b.ticket > a.ticket);
    }

    // =========================================================================
    // navigate
    // =========================================================================

    #[test]
    fn prev_wraps_from_first_to_last() {
        let mut g = gallery(&["A", "B", "C"]);
        g.open(1);
        g.navigate(Direction::Prev);
        assert_eq!(index(&g), Some(0));
        let req = g.navigate(Direction::Prev).unwrap();
        assert_eq!(index(&g), Some(2));
        assert_eq!(req.uri, "C");
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        let mut g = gallery(&["A", "B", "C"]);
        g.open(2);
        g.navigate(Direction::Next);
        assert_eq!(index(&g), Some(0));
    }

    #[test]
    fn n_steps_return_to_start() {
        for n in 1..=7usize {
            let names: Vec<String> = (0..n).map(|i| format!("img{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            for start in 0..n {
                for dir in [Direction::Next, Direction::Prev] {
                    let mut g = gallery(&refs);
                    g.open(start);
                    for _ in 0..n {
                        g.navigate(dir);
                        let i = index(&g).unwrap();
                        assert!(i < n);
                    }
                    assert_eq!(index(&g), Some(start), "n={n} start={start} {dir:?}");
                }
            }
        }
    }

    #[test]
    fn single_item_navigation_reselects_and_reloads() {
        let mut g = gallery(&["only"]);
        let req = g.open(0).unwrap();
        g.complete_probe(req.ticket, ok(5, 5));
        let again = g.navigate(Direction::Next).unwrap();
        assert_eq!(index(&g), Some(0));
        assert!(g.state().loading);
        assert_eq!(again.uri, "only");
    }

    #[test]
    fn navigate_resets_loading_and_dimensions() {
        let mut g = gallery(&["a", "b"]);
        let req = g.open(0).unwrap();
        g.complete_probe(req.ticket, ok(1000, 1000));
        g.navigate(Direction::Next);
        let s = g.state();
        assert!(s.loading);
        assert_eq!(s.dimensions, Dimensions::new(800, 600));
    }

    #[test]
    fn navigate_while_closed_is_noop() {
        let mut g = gallery(&["a", "b"]);
        assert!(g.navigate(Direction::Next).is_none());
        g.open(0);
        g.close(0);
        assert!(g.navigate(Direction::Next).is_none());
        assert_eq!(index(&g), Some(0));
    }

    // =========================================================================
    // close
    // =========================================================================

    #[test]
    fn close_hides_immediately_and_forgets_after_grace() {
        let mut g = gallery(&["a", "b"]);
        let req = g.open(1).unwrap();
        g.complete_probe(req.ticket, ok(640, 480));
        g.close(1_000);

        let s = g.state();
        assert!(!s.visible);
        assert_eq!(s.open_index, Some(1));
        assert_eq!(s.dimensions, Dimensions::new(640, 480));
        assert_eq!(g.next_deadline(), Some(1_300));

        g.tick(1_299);
        assert_eq!(index(&g), Some(1));
        g.tick(1_300);
        assert_eq!(index(&g), None);
        assert_eq!(g.state().dimensions, Dimensions::new(800, 600));
        assert_eq!(g.next_deadline(), None);
    }

    #[test]
    fn reopen_during_grace_cancels_forget() {
        let mut g = gallery(&["a", "b"]);
        g.open(0);
        g.close(0);
        g.open(1);
        g.tick(10_000);
        assert_eq!(index(&g), Some(1));
        assert!(g.is_open());
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut g = gallery(&["a"]);
        g.close(0);
        assert_eq!(g.next_deadline(), None);
    }

    // =========================================================================
    // replace_items
    // =========================================================================

    #[test]
    fn replace_items_follows_open_item() {
        let mut g = gallery(&["a", "b", "c"]);
        g.open(2);
        g.replace_items(vec!["c".to_string(), "a".to_string()]);
        assert_eq!(index(&g), Some(0));
        assert_eq!(g.current().map(String::as_str), Some("c"));
        assert!(g.is_open());
    }

    #[test]
    fn replace_items_closes_when_item_filtered_out() {
        let mut g = gallery(&["a", "b", "c"]);
        let req = g.open(1).unwrap();
        g.replace_items(vec!["a".to_string()]);
        assert_eq!(index(&g), None);
        assert!(!g.is_open());
        assert!(!g.complete_probe(req.ticket, ok(1, 1)));
    }

    #[test]
    fn replace_items_while_closed_just_swaps() {
        let mut g = gallery(&["a"]);
        g.replace_items(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(g.len(), 2);
        assert_eq!(index(&g), None);
    }

    // =========================================================================
    // sizing
    // =========================================================================

    #[test]
    fn dialog_box_tracks_probed_dimensions() {
        let viewport = Viewport { width: 1280.0, height: 800.0 };
        let mut g = gallery(&["a"]);
        let req = g.open(0).unwrap();
        g.complete_probe(req.ticket, ok(5000, 5000));
        let b = g.dialog_box(viewport);
        assert_eq!(b.width, 1248.0);
        assert_eq!(b.height, 768.0);
    }

    #[test]
    fn dialog_box_uses_gallery_chrome_settings() {
        let config = DialogConfig {
            padding: [100.0, 50.0],
            margin: [40.0, 40.0],
            ..DialogConfig::default()
        };
        let mut g = Gallery::new(vec!["a".to_string()], &config);
        let req = g.open(0).unwrap();
        g.complete_probe(req.ticket, ok(400, 300));
        let b = g.dialog_box(Viewport { width: 1280.0, height: 800.0 });
        assert_eq!(b.width, 500.0);
        assert_eq!(b.height, 350.0);
    }
}
