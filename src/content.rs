//! Gallery content loading.
//!
//! The galleries and the project filter buttons are described in a single
//! `content.toml` in the content directory:
//!
//! ```text
//! content/
//! ├── config.toml        # Site config (optional)
//! └── content.toml       # Galleries and filters
//! public/
//! └── images/            # Image files referenced as /images/...
//! ```
//!
//! ```toml
//! [[projects]]
//! title = "E-commerce Platform"
//! description = "A full-featured e-commerce platform"
//! image = "/images/shop.png"
//! tags = ["web", "django"]
//! tech = ["Django", "React"]
//! demo_url = "https://example.com"
//!
//! [[certifications]]
//! title = "AWS Certified Solutions Architect"
//! subtitle = "Amazon"
//! year = "2023"
//! image = "/images/aws.png"
//!
//! [[achievements]]
//! title = "Hackathon Winner"
//! subtitle = "TechFest 2023"
//! description = "Led a team to build a real-time collaboration app."
//! image = "/images/hackathon.jpg"
//!
//! [[filters]]
//! label = "Web"
//! value = "web"
//! ```
//!
//! Every list is optional. Unknown keys are rejected.

use crate::filter::{self, FilterOption, Tagged};
use crate::gallery::GalleryEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{gallery} item {index}: {reason}")]
    InvalidItem {
        gallery: GalleryKind,
        index: usize,
        reason: String,
    },
}

/// The three galleries on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryKind {
    Certifications,
    Achievements,
    Projects,
}

impl GalleryKind {
    pub const ALL: [GalleryKind; 3] = [
        GalleryKind::Certifications,
        GalleryKind::Achievements,
        GalleryKind::Projects,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GalleryKind::Certifications => "certifications",
            GalleryKind::Achievements => "achievements",
            GalleryKind::Projects => "projects",
        }
    }
}

impl fmt::Display for GalleryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One previewable entry in any gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Site-relative image URI (`/images/aws.png`).
    pub image: String,
    /// Filter categories (projects only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Issuer for certifications, event for achievements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Longer write-up shown in the dialog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Technology badges (display only, not filterable).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_url: Option<String>,
}

impl GalleryEntry for GalleryItem {
    fn image_uri(&self) -> &str {
        &self.image
    }
}

impl Tagged for GalleryItem {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Everything `content.toml` describes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Content {
    pub certifications: Vec<GalleryItem>,
    pub achievements: Vec<GalleryItem>,
    pub projects: Vec<GalleryItem>,
    pub filters: Vec<FilterOption>,
}

impl Content {
    pub fn gallery(&self, kind: GalleryKind) -> &[GalleryItem] {
        match kind {
            GalleryKind::Certifications => &self.certifications,
            GalleryKind::Achievements => &self.achievements,
            GalleryKind::Projects => &self.projects,
        }
    }

    /// Reject items the page could not render.
    pub fn validate(&self) -> Result<(), ContentError> {
        for kind in GalleryKind::ALL {
            for (index, item) in self.gallery(kind).iter().enumerate() {
                let reason = if item.title.trim().is_empty() {
                    "title must not be empty"
                } else if item.image.trim().is_empty() {
                    "image must not be empty"
                } else {
                    continue;
                };
                return Err(ContentError::InvalidItem {
                    gallery: kind,
                    index,
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Non-fatal problems worth reporting from `check`.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for option in &self.filters {
            if option.value == filter::ALL {
                continue;
            }
            if !self.projects.iter().any(|p| p.tags.contains(&option.value)) {
                warnings.push(format!(
                    "filter '{}' ({}) matches no project",
                    option.label, option.value
                ));
            }
        }
        for kind in [GalleryKind::Certifications, GalleryKind::Achievements] {
            for item in self.gallery(kind) {
                if !item.tags.is_empty() {
                    warnings.push(format!(
                        "{kind} item '{}' has tags; only projects are filterable",
                        item.title
                    ));
                }
            }
        }
        warnings
    }
}

/// Load and validate `content.toml` from the content directory.
///
/// A missing file is not an error: the page simply has empty galleries.
pub fn load_content(dir: &Path) -> Result<Content, ContentError> {
    let path = dir.join("content.toml");
    if !path.exists() {
        return Ok(Content::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ContentError::Io {
        path: path.clone(),
        source,
    })?;
    let content: Content =
        toml::from_str(&text).map_err(|source| ContentError::Toml { path, source })?;
    content.validate()?;
    Ok(content)
}
