//! The single-page event loop.
//!
//! [`Page`] owns every piece of interaction state on the page (the section
//! tracker, the three gallery dialogs and the project filter) and is driven
//! by [`PageEvent`]s from the host. Handling an event may ask the host to do
//! something it alone can do: animate a scroll or start an image probe.
//! Those requests come back as [`Effect`]s.
//!
//! Everything runs on one thread. Probe results re-enter as
//! [`PageEvent::ProbeFinished`], timers as [`PageEvent::Tick`]; there is no
//! locking because nothing else touches the state.

use crate::config::SiteConfig;
use crate::content::{Content, GalleryItem, GalleryKind};
use crate::filter::FilterSelector;
use crate::gallery::{Gallery, GalleryState, ProbeRequest};
use crate::listeners::{Subscription, WindowEvent, WindowListeners};
use crate::probe::ProbeOutcome;
use crate::section::{ScrollCommand, SectionLayout, SectionTracker};
use crate::sizing::DialogBox;
use crate::types::{Direction, SectionId, Viewport};
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Input to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Window(WindowEvent),
    /// A navigation link or scroll-indicator dot was clicked. Also closes
    /// the mobile menu.
    NavClick(SectionId),
    /// The mobile menu button was pressed.
    ToggleMenu,
    /// An item was clicked. For projects, `index` is into the filtered list.
    OpenItem { gallery: GalleryKind, index: usize },
    Navigate { gallery: GalleryKind, direction: Direction },
    Close { gallery: GalleryKind },
    SelectFilter(String),
    ProbeFinished(ProbeOutcome),
    /// Timer wake-up; expires settle and close-grace deadlines.
    Tick,
}

/// Work the host must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ScrollTo(ScrollCommand),
    Probe {
        gallery: GalleryKind,
        request: ProbeRequest,
    },
}

/// Read-only view of the whole page, for rendering and reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub active_section: SectionId,
    pub header_elevated: bool,
    pub menu_open: bool,
    pub tracking_suspended: bool,
    pub filter: String,
    pub visible_projects: Vec<String>,
    pub galleries: Vec<GallerySnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GallerySnapshot {
    pub kind: GalleryKind,
    pub state: GalleryState,
    pub title: Option<String>,
    pub dialog: Option<DialogBox>,
}

pub struct Page<L> {
    config: SiteConfig,
    layout: L,
    tracker: SectionTracker,
    scroll_y: f64,
    viewport: Viewport,
    now_ms: u64,
    menu_open: bool,
    certifications: Gallery<GalleryItem>,
    achievements: Gallery<GalleryItem>,
    projects: Gallery<GalleryItem>,
    filter: FilterSelector<GalleryItem>,
}

impl<L: SectionLayout> Page<L> {
    pub fn new(config: SiteConfig, content: Content, layout: L) -> Self {
        let tracker = SectionTracker::new(&config.scroll);
        let certifications = Gallery::new(content.certifications, &config.dialog);
        let achievements = Gallery::new(content.achievements, &config.dialog);
        let projects = Gallery::new(content.projects.clone(), &config.dialog);
        let filter = FilterSelector::new(content.projects, content.filters);
        Self {
            config,
            layout,
            tracker,
            scroll_y: 0.0,
            viewport: Viewport::default(),
            now_ms: 0,
            menu_open: false,
            certifications,
            achievements,
            projects,
            filter,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Swap in a new layout, e.g. after fonts or images changed section heights.
    pub fn set_layout(&mut self, layout: L) {
        self.layout = layout;
    }

    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    pub fn active_section(&self) -> SectionId {
        self.tracker.active_section()
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn filter(&self) -> &FilterSelector<GalleryItem> {
        &self.filter
    }

    pub fn gallery(&self, kind: GalleryKind) -> &Gallery<GalleryItem> {
        match kind {
            GalleryKind::Certifications => &self.certifications,
            GalleryKind::Achievements => &self.achievements,
            GalleryKind::Projects => &self.projects,
        }
    }

    fn gallery_mut(&mut self, kind: GalleryKind) -> &mut Gallery<GalleryItem> {
        match kind {
            GalleryKind::Certifications => &mut self.certifications,
            GalleryKind::Achievements => &mut self.achievements,
            GalleryKind::Projects => &mut self.projects,
        }
    }

    /// Handle one event at `now_ms` and return the effects it produced.
    pub fn handle(&mut self, event: PageEvent, now_ms: u64) -> Vec<Effect> {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        let mut effects = Vec::new();

        match event {
            PageEvent::Window(window) => self.handle_window(&window, now),
            PageEvent::NavClick(id) => {
                if let Some(cmd) = self.tracker.scroll_to_section(id, &self.layout, now) {
                    effects.push(Effect::ScrollTo(cmd));
                }
                // Closes even when the section is not rendered.
                self.menu_open = false;
            }
            PageEvent::ToggleMenu => {
                self.menu_open = !self.menu_open;
                debug!("menu open: {}", self.menu_open);
            }
            PageEvent::OpenItem { gallery, index } => {
                if let Some(request) = self.gallery_mut(gallery).open(index) {
                    effects.push(Effect::Probe { gallery, request });
                }
            }
            PageEvent::Navigate { gallery, direction } => {
                if let Some(request) = self.gallery_mut(gallery).navigate(direction) {
                    effects.push(Effect::Probe { gallery, request });
                }
            }
            PageEvent::Close { gallery } => self.gallery_mut(gallery).close(now),
            PageEvent::SelectFilter(tag) => {
                debug!("filter -> {tag}");
                self.filter.select(tag);
                let visible: Vec<GalleryItem> =
                    self.filter.visible_items().into_iter().cloned().collect();
                self.projects.replace_items(visible);
            }
            PageEvent::ProbeFinished(outcome) => {
                self.gallery_mut(outcome.gallery)
                    .complete_probe(outcome.ticket, outcome.result);
            }
            PageEvent::Tick => self.tick(now),
        }

        effects
    }

    /// Scroll, resize and scroll-end from the window.
    pub fn handle_window(&mut self, event: &WindowEvent, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        match *event {
            WindowEvent::Scroll { scroll_y } => {
                self.scroll_y = scroll_y;
                self.tracker.on_scroll(scroll_y, &self.layout, self.now_ms);
            }
            WindowEvent::Resize(viewport) => {
                self.viewport = viewport;
                // Section heights follow the viewport width; re-evaluate in place.
                self.tracker.on_scroll(self.scroll_y, &self.layout, self.now_ms);
            }
            WindowEvent::ScrollEnd => self.tracker.scroll_settled(),
        }
    }

    fn tick(&mut self, now_ms: u64) {
        self.tracker.tick(now_ms);
        self.certifications.tick(now_ms);
        self.achievements.tick(now_ms);
        self.projects.tick(now_ms);
    }

    /// Earliest pending timer deadline, so the host knows when to send `Tick`.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.tracker.next_deadline(),
            self.certifications.next_deadline(),
            self.achievements.next_deadline(),
            self.projects.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let galleries = GalleryKind::ALL
            .into_iter()
            .map(|kind| {
                let gallery = self.gallery(kind);
                let state = gallery.state();
                GallerySnapshot {
                    kind,
                    state,
                    title: gallery.current().map(|item| item.title.clone()),
                    dialog: state
                        .visible
                        .then(|| gallery.dialog_box(self.viewport)),
                }
            })
            .collect();

        PageSnapshot {
            active_section: self.tracker.active_section(),
            header_elevated: self.tracker.header_elevated(),
            menu_open: self.menu_open,
            tracking_suspended: self.tracker.is_suspended(self.now_ms),
            filter: self.filter.selected().to_string(),
            visible_projects: self.projects.items().iter().map(|p| p.title.clone()).collect(),
            galleries,
        }
    }
}

impl<L: SectionLayout + 'static> Page<L> {
    /// Attach a shared page to the window's scroll and resize events.
    ///
    /// The listener holds only a weak reference: once the page is dropped it
    /// goes quiet, and dropping the subscription detaches it outright.
    #[must_use = "dropping the subscription detaches the page from the window"]
    pub fn attach(page: &Rc<RefCell<Self>>, window: &WindowListeners) -> Subscription {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(page);
        window.subscribe(move |event, now_ms| {
            if let Some(page) = weak.upgrade() {
                page.borrow_mut().handle_window(event, now_ms);
            }
        })
    }
}
