//! Site inventory for the `check` command.
//!
//! Probes every gallery image in parallel, counts what each filter button
//! would show, and lists image files under the public directory that no
//! gallery references. Nothing here fails: a missing or unreadable image is
//! reported, since the page itself degrades to the placeholder size.

use crate::content::{Content, GalleryKind};
use crate::filter::{FilterOption, FilterSelector};
use crate::probe::{FsProbe, ImageProbe, ProbeError};
use crate::types::Dimensions;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "tif", "tiff"];

#[derive(Debug, Clone)]
pub struct ImageReport {
    pub gallery: GalleryKind,
    pub index: usize,
    pub title: String,
    pub uri: String,
    pub result: Result<Dimensions, ProbeError>,
}

#[derive(Debug, Clone)]
pub struct FilterReport {
    pub option: FilterOption,
    pub matches: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub images: Vec<ImageReport>,
    pub filters: Vec<FilterReport>,
    /// Public-relative paths of image files no gallery item points at.
    pub unreferenced: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn failed(&self) -> usize {
        self.images.iter().filter(|i| i.result.is_err()).count()
    }
}

pub fn check_site(content: &Content, probe: &FsProbe) -> CheckReport {
    let jobs: Vec<_> = GalleryKind::ALL
        .into_iter()
        .flat_map(|kind| {
            content
                .gallery(kind)
                .iter()
                .enumerate()
                .map(move |(index, item)| (kind, index, item))
        })
        .collect();

    let images: Vec<ImageReport> = jobs
        .par_iter()
        .map(|(gallery, index, item)| ImageReport {
            gallery: *gallery,
            index: *index,
            title: item.title.clone(),
            uri: item.image.clone(),
            result: probe.dimensions(&item.image),
        })
        .collect();

    let mut selector = FilterSelector::new(content.projects.clone(), content.filters.clone());
    let filters = selector
        .options()
        .into_iter()
        .map(|option| {
            selector.select(option.value.clone());
            FilterReport {
                matches: selector.visible_items().len(),
                option,
            }
        })
        .collect();

    let referenced: HashSet<PathBuf> = images
        .iter()
        .filter_map(|i| probe.resolve(&i.uri).ok())
        .collect();

    CheckReport {
        images,
        filters,
        unreferenced: unreferenced_images(probe.root(), &referenced),
        warnings: content.warnings(),
    }
}

fn unreferenced_images(root: &Path, referenced: &HashSet<PathBuf>) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image(e.path()))
        .filter(|e| !referenced.contains(e.path()))
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    found.sort();
    found
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
