//! Image dimension discovery.
//!
//! The dialog has to know an image's natural size before it can size itself,
//! and that size is only available once the file header has been read. The
//! [`ImageProbe`] trait is that lookup; [`FsProbe`] implements it against the
//! site's public directory with `image::image_dimensions`, which reads the
//! header only and never decodes pixels.
//!
//! [`ProbeDispatcher`] runs probes fire-and-forget on the rayon pool and
//! hands results back over a channel. The event loop drains them with
//! [`ProbeDispatcher::poll`] and feeds each one to its gallery, so all state
//! changes stay on the loop thread. There is no cancellation: a probe whose
//! ticket has been superseded finishes anyway and its result is discarded by
//! the gallery.

use crate::content::GalleryKind;
use crate::gallery::{ProbeRequest, Ticket};
use crate::types::Dimensions;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("unsupported image URI: {0}")]
    UnsupportedUri(String),
    #[error("failed to read dimensions of {uri}: {reason}")]
    Unreadable { uri: String, reason: String },
}

/// Looks up the natural size of an image by URI.
pub trait ImageProbe: Send + Sync {
    fn dimensions(&self, uri: &str) -> Result<Dimensions, ProbeError>;
}

/// Probe that resolves site-relative URIs against a public directory.
///
/// `/images/a.png?v=2` → `<public>/images/a.png`. Absolute URLs and paths
/// escaping the public directory are rejected.
#[derive(Debug, Clone)]
pub struct FsProbe {
    root: PathBuf,
}

impl FsProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URI to a file under the public directory.
    pub fn resolve(&self, uri: &str) -> Result<PathBuf, ProbeError> {
        if uri.contains("://") || uri.starts_with("//") || uri.starts_with("data:") {
            return Err(ProbeError::UnsupportedUri(uri.to_string()));
        }
        let path_part = uri.split(['?', '#']).next().unwrap_or_default();
        let relative = Path::new(path_part.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ProbeError::UnsupportedUri(uri.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ImageProbe for FsProbe {
    fn dimensions(&self, uri: &str) -> Result<Dimensions, ProbeError> {
        let path = self.resolve(uri)?;
        if !path.is_file() {
            return Err(ProbeError::NotFound(uri.to_string()));
        }
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| ProbeError::Unreadable {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Dimensions { width, height })
    }
}

/// A finished probe, routed back to the gallery that asked.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub gallery: GalleryKind,
    pub ticket: Ticket,
    pub uri: String,
    pub result: Result<Dimensions, ProbeError>,
}

/// Runs probes off the event-loop thread.
pub struct ProbeDispatcher {
    probe: Arc<dyn ImageProbe>,
    tx: Sender<ProbeOutcome>,
    rx: Receiver<ProbeOutcome>,
    in_flight: usize,
}

impl ProbeDispatcher {
    pub fn new(probe: Arc<dyn ImageProbe>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            probe,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start a probe on the rayon pool and return immediately.
    pub fn submit(&mut self, gallery: GalleryKind, request: ProbeRequest) {
        let probe = Arc::clone(&self.probe);
        let tx = self.tx.clone();
        self.in_flight += 1;
        log::debug!("probe {} for {gallery} submitted", request.uri);
        rayon::spawn(move || {
            let result = probe.dimensions(&request.uri);
            // The receiver only goes away with the dispatcher; nothing to report then.
            let _ = tx.send(ProbeOutcome {
                gallery,
                ticket: request.ticket,
                uri: request.uri,
                result,
            });
        });
    }

    /// Collect every probe that has finished since the last call.
    pub fn poll(&mut self) -> Vec<ProbeOutcome> {
        let outcomes: Vec<_> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        outcomes
    }

    /// Block until every submitted probe has reported back.
    pub fn wait_all(&mut self) -> Vec<ProbeOutcome> {
        let mut outcomes = Vec::with_capacity(self.in_flight);
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    outcomes.push(outcome);
                }
                Err(_) => break,
            }
        }
        outcomes
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Probe answering from a fixed table, for tests and scripted replays.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    sizes: Vec<(String, Dimensions)>,
}

impl StaticProbe {
    pub fn new(sizes: impl IntoIterator<Item = (String, Dimensions)>) -> Self {
        Self {
            sizes: sizes.into_iter().collect(),
        }
    }
}

impl ImageProbe for StaticProbe {
    fn dimensions(&self, uri: &str) -> Result<Dimensions, ProbeError> {
        self.sizes
            .iter()
            .find(|(u, _)| u == uri)
            .map(|(_, d)| *d)
            .ok_or_else(|| ProbeError::NotFound(uri.to_string()))
    }
}
