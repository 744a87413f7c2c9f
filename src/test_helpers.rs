//! Shared test utilities for the simple-folio test suite.
//!
//! Builders for gallery content and synthetic images, so each module's tests
//! don't repeat eleven-field struct literals or PNG encoding boilerplate.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_png(&tmp.path().join("images/aws.png"), 40, 30);
//!
//! let item = gallery_item("AWS", "/images/aws.png", &[]);
//! let layout = stacked_layout(800.0);
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;

use crate::content::GalleryItem;
use crate::types::{Extent, SectionId};

// =========================================================================
// Content builders
// =========================================================================

/// A gallery item with only the fields the interaction logic reads.
pub fn gallery_item(title: &str, image: &str, tags: &[&str]) -> GalleryItem {
    GalleryItem {
        title: title.to_string(),
        description: String::new(),
        image: image.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        subtitle: None,
        year: None,
        details: None,
        features: vec![],
        tech: vec![],
        demo_url: None,
        code_url: None,
    }
}

/// Every section in document order, each `height` tall, stacked from 0.
pub fn stacked_layout(height: f64) -> Vec<(SectionId, Extent)> {
    SectionId::ALL
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, Extent::new(i as f64 * height, height)))
        .collect()
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a valid PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
