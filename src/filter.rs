//! Category filter for the projects gallery.

use serde::{Deserialize, Serialize};

/// Tag value that matches every item.
pub const ALL: &str = "all";

/// Items carrying category tags.
pub trait Tagged {
    fn tags(&self) -> &[String];
}

/// A labelled filter button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

/// Selected category tag plus the list it filters.
///
/// The visible subset is recomputed on every read; the item list is never
/// reordered or mutated.
#[derive(Debug, Clone)]
pub struct FilterSelector<T> {
    items: Vec<T>,
    options: Vec<FilterOption>,
    selected: String,
}

impl<T: Tagged> FilterSelector<T> {
    pub fn new(items: Vec<T>, options: Vec<FilterOption>) -> Self {
        Self {
            items,
            options,
            selected: ALL.to_string(),
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Replace the selected tag. Any tag is accepted; one that no item
    /// carries simply yields an empty view.
    pub fn select(&mut self, tag: impl Into<String>) {
        self.selected = tag.into();
    }

    pub fn visible_items(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| matches(*item, &self.selected))
            .collect()
    }

    pub fn all_items(&self) -> &[T] {
        &self.items
    }

    /// Filter buttons with an "All" entry guaranteed first.
    pub fn options(&self) -> Vec<FilterOption> {
        let mut options = Vec::with_capacity(self.options.len() + 1);
        if !self.options.iter().any(|o| o.value == ALL) {
            options.push(FilterOption {
                label: "All".to_string(),
                value: ALL.to_string(),
            });
        }
        options.extend(self.options.iter().cloned());
        options
    }
}

fn matches<T: Tagged>(item: &T, tag: &str) -> bool {
    tag == ALL || item.tags().iter().any(|t| t == tag)
}
