//! Scripted interaction replay.
//!
//! A replay script is a TOML file describing a page layout and a timeline of
//! visitor actions. [`run_script`] drives a [`Page`] through it the way a
//! browser host would: window events go through the attached listener,
//! everything else through [`Page::handle`], pending timers fire as `Tick`
//! before each step, and image probes run on the rayon pool and are fed back
//! before the step is recorded.
//!
//! ```toml
//! viewport = { width = 1280, height = 800 }
//!
//! [[sections]]
//! id = "home"
//! top = 0
//! height = 900
//!
//! [[sections]]
//! id = "about"
//! top = 900
//! height = 700
//!
//! # Optional fixed probe answers; without them images are read from public/
//! [[images]]
//! uri = "/images/aws.png"
//! width = 1200
//! height = 900
//!
//! [[steps]]
//! at = 0
//! action = "scroll"
//! y = 950
//!
//! [[steps]]
//! at = 200
//! action = "open"
//! gallery = "certifications"
//! index = 0
//! ```
//!
//! Actions: `scroll { y }`, `resize { width, height }`, `scroll_end`,
//! `nav { section }`, `open { gallery, index }`, `next { gallery }`,
//! `prev { gallery }`, `close { gallery }`, `filter { tag }`, `tick`.

use crate::config::SiteConfig;
use crate::content::{Content, GalleryKind};
use crate::listeners::{WindowEvent, WindowListeners};
use crate::page::{Effect, Page, PageEvent, PageSnapshot};
use crate::probe::{ImageProbe, ProbeDispatcher, StaticProbe};
use crate::section::SectionLayout;
use crate::types::{Dimensions, Direction, Extent, SectionId, Viewport};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("step {index} at {at}ms is earlier than the step before it")]
    OutOfOrder { index: usize, at: u64 },
    #[error("section {0} is listed twice")]
    DuplicateSection(SectionId),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub images: Vec<ImageSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub id: SectionId,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSpec {
    pub uri: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Step {
    /// Milliseconds since the page loaded.
    pub at: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Scroll { y: f64 },
    Resize { width: f64, height: f64 },
    ScrollEnd,
    Nav { section: SectionId },
    Open { gallery: GalleryKind, index: usize },
    Next { gallery: GalleryKind },
    Prev { gallery: GalleryKind },
    Close { gallery: GalleryKind },
    Filter { tag: String },
    /// Mobile menu button.
    Menu,
    Tick,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Scroll { y } => write!(f, "scroll y={y}"),
            Action::Resize { width, height } => write!(f, "resize {width}x{height}"),
            Action::ScrollEnd => f.write_str("scroll end"),
            Action::Nav { section } => write!(f, "nav {section}"),
            Action::Open { gallery, index } => write!(f, "open {gallery}[{index}]"),
            Action::Next { gallery } => write!(f, "next {gallery}"),
            Action::Prev { gallery } => write!(f, "prev {gallery}"),
            Action::Close { gallery } => write!(f, "close {gallery}"),
            Action::Filter { tag } => write!(f, "filter {tag}"),
            Action::Menu => f.write_str("menu"),
            Action::Tick => f.write_str("tick"),
        }
    }
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let script: Script = toml::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ReplayError> {
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.id == section.id) {
                return Err(ReplayError::DuplicateSection(section.id));
            }
        }
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at < pair[0].at {
                return Err(ReplayError::OutOfOrder {
                    index: index + 1,
                    at: pair[1].at,
                });
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> Vec<(SectionId, Extent)> {
        self.sections
            .iter()
            .map(|s| (s.id, Extent::new(s.top, s.height)))
            .collect()
    }

    /// Fixed probe answers, if the script lists any images.
    pub fn static_probe(&self) -> Option<StaticProbe> {
        if self.images.is_empty() {
            return None;
        }
        Some(StaticProbe::new(
            self.images
                .iter()
                .map(|i| (i.uri.clone(), Dimensions::new(i.width, i.height))),
        ))
    }
}

/// What one script step did.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    pub at: u64,
    pub action: Action,
    pub effects: Vec<Effect>,
    pub snapshot: PageSnapshot,
}

/// Run `script` against a fresh page.
pub fn run_script(
    script: &Script,
    config: SiteConfig,
    content: Content,
    probe: Arc<dyn ImageProbe>,
) -> Vec<ReplayStep> {
    let page = Rc::new(RefCell::new(Page::new(config, content, script.layout())));
    let window = WindowListeners::new();
    let _attached = Page::attach(&page, &window);
    let mut dispatcher = ProbeDispatcher::new(probe);
    let mut steps = Vec::with_capacity(script.steps.len());

    window.emit(&WindowEvent::Resize(script.viewport), 0);

    for step in &script.steps {
        fire_timers(&page, step.at);

        let effects = match to_event(&step.action) {
            Dispatch::Window(event) => {
                window.emit(&event, step.at);
                Vec::new()
            }
            Dispatch::Page(event) => page.borrow_mut().handle(event, step.at),
        };

        for effect in &effects {
            if let Effect::Probe { gallery, request } = effect {
                dispatcher.submit(*gallery, request.clone());
            }
        }
        for outcome in dispatcher.wait_all() {
            page.borrow_mut()
                .handle(PageEvent::ProbeFinished(outcome), step.at);
        }

        steps.push(ReplayStep {
            at: step.at,
            action: step.action.clone(),
            effects,
            snapshot: page.borrow().snapshot(),
        });
    }

    steps
}

fn fire_timers<L: SectionLayout>(page: &Rc<RefCell<Page<L>>>, until: u64) {
    loop {
        let deadline = page.borrow().next_deadline();
        match deadline {
            Some(at) if at <= until => {
                page.borrow_mut().handle(PageEvent::Tick, at);
            }
            _ => break,
        }
    }
}

enum Dispatch {
    Window(WindowEvent),
    Page(PageEvent),
}

fn to_event(action: &Action) -> Dispatch {
    match action {
        Action::Scroll { y } => Dispatch::Window(WindowEvent::Scroll { scroll_y: *y }),
        Action::Resize { width, height } => Dispatch::Window(WindowEvent::Resize(Viewport {
            width: *width,
            height: *height,
        })),
        Action::ScrollEnd => Dispatch::Window(WindowEvent::ScrollEnd),
        Action::Nav { section } => Dispatch::Page(PageEvent::NavClick(*section)),
        Action::Open { gallery, index } => Dispatch::Page(PageEvent::OpenItem {
            gallery: *gallery,
            index: *index,
        }),
        Action::Next { gallery } => Dispatch::Page(PageEvent::Navigate {
            gallery: *gallery,
            direction: Direction::Next,
        }),
        Action::Prev { gallery } => Dispatch::Page(PageEvent::Navigate {
            gallery: *gallery,
            direction: Direction::Prev,
        }),
        Action::Close { gallery } => Dispatch::Page(PageEvent::Close { gallery: *gallery }),
        Action::Filter { tag } => Dispatch::Page(PageEvent::SelectFilter(tag.clone())),
        Action::Menu => Dispatch::Page(PageEvent::ToggleMenu),
        Action::Tick => Dispatch::Page(PageEvent::Tick),
    }
}
