//! Shared types used across the interaction core.
//!
//! Sections, extents and dimensions flow between the tracker, the galleries
//! and the host that renders the page, so they live here rather than in any
//! one module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed, vertically stacked regions of the page.
///
/// Declaration order is document order; the tracker relies on it when more
/// than one section could match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Home,
    About,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Contact,
}

impl SectionId {
    /// Every section in document order.
    pub const ALL: [SectionId; 7] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Certifications,
        SectionId::Achievements,
        SectionId::Contact,
    ];

    /// Element id used in the rendered document (`section#about`).
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::About => "about",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
            SectionId::Certifications => "certifications",
            SectionId::Achievements => "achievements",
            SectionId::Contact => "contact",
        }
    }

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::About => "About",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
            SectionId::Certifications => "Certifications",
            SectionId::Achievements => "Achievements",
            SectionId::Contact => "Contact",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Document-relative vertical extent of a rendered section, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub top: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Half-open containment: `top <= position < top + height`.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Natural pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Visible browser area, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Step direction for gallery navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_ids_round_trip_through_str() {
        for id in SectionId::ALL {
            assert_eq!(id.as_str().parse::<SectionId>().unwrap(), id);
        }
    }

    #[test]
    fn unknown_section_is_error() {
        let err = "blog".parse::<SectionId>().unwrap_err();
        assert_eq!(err, UnknownSection("blog".to_string()));
    }

    #[test]
    fn section_order_is_document_order() {
        let mut sorted = SectionId::ALL;
        sorted.sort();
        assert_eq!(sorted, SectionId::ALL);
        assert_eq!(SectionId::ALL[0], SectionId::Home);
        assert_eq!(SectionId::ALL[6], SectionId::Contact);
    }

    #[test]
    fn extent_is_half_open() {
        let e = Extent::new(100.0, 100.0);
        assert!(e.contains(100.0));
        assert!(e.contains(199.9));
        assert!(!e.contains(200.0));
        assert!(!e.contains(99.9));
    }

    #[test]
    fn zero_height_extent_contains_nothing() {
        let e = Extent::new(50.0, 0.0);
        assert!(!e.contains(50.0));
    }

    #[test]
    fn section_id_serializes_lowercase() {
        let json = serde_json::to_string(&SectionId::Certifications).unwrap();
        assert_eq!(json, "\"certifications\"");
    }
}
