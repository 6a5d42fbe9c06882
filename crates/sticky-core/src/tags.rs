//! Tag registry and color assignment.
//!
//! Names are unique under case-insensitive comparison. Lookups by name are
//! exact: since stored names never differ only by case, an exact lookup is
//! unambiguous.

use rand::Rng;

use crate::error::{Result, StickyError};
use crate::model::{ALL_TAG, PERSONAL_COLOR, PERSONAL_TAG, Tag};

/// Hand-picked pastel colors handed out before random generation starts.
pub const PALETTE: [&str; 6] = [
    "#f3d1b0", "#d0f4de", "#a9def9", "#e4c1f9", "#cfbaf0", "#b9fbc0",
];

/// Random pastel draws tried before accepting a color already in use.
pub const MAX_COLOR_ATTEMPTS: usize = 20;

/// Where a newly assigned color came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource {
    /// First unused palette entry.
    Palette,
    /// Random pastel not used by any tag.
    Generated,
    /// Every random draw collided; the last one was accepted anyway.
    Collision { attempts: usize },
}

/// A color chosen for a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPick {
    pub color: String,
    pub source: ColorSource,
}

/// Result of a successful `add_tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAdded {
    pub tag: Tag,
    pub source: ColorSource,
}

/// Format a pastel HSL color for the given hue.
#[must_use]
pub fn pastel_hsl(hue: u16) -> String {
    format!("hsl({hue}, 70%, 90%)")
}

/// Owns the tag set. `Personal` is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    /// Create a registry holding only `Personal`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tags: vec![Tag::personal()],
        }
    }

    /// Build a registry from a stored tag list, replacing the defaults.
    ///
    /// A stored `Personal` keeps its stored color; a case variant such as
    /// `personal` is renamed to `Personal`. If the list has no `Personal`, the
    /// default one is put first. Later case-insensitive duplicates and entries
    /// named `All` are dropped.
    #[must_use]
    pub fn from_tags(stored: Vec<Tag>) -> Self {
        let mut tags: Vec<Tag> = Vec::with_capacity(stored.len() + 1);
        for mut tag in stored {
            if tag.name.eq_ignore_ascii_case(ALL_TAG) {
                tracing::warn!("Dropping stored tag '{}': name is reserved", tag.name);
                continue;
            }
            if let Some(existing) = tags.iter().find(|t| same_name(&t.name, &tag.name)) {
                tracing::warn!(
                    "Dropping stored tag '{}': duplicates '{}'",
                    tag.name,
                    existing.name
                );
                continue;
            }
            if tag.name != PERSONAL_TAG && same_name(&tag.name, PERSONAL_TAG) {
                tracing::warn!("Renaming stored tag '{}' to '{}'", tag.name, PERSONAL_TAG);
                tag.name = PERSONAL_TAG.to_string();
            }
            tags.push(tag);
        }
        if !tags.iter().any(|t| t.name == PERSONAL_TAG) {
            tags.insert(0, Tag::personal());
        }
        Self { tags }
    }

    /// All stored tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// `Personal` and `All` can never be deleted.
    #[must_use]
    pub fn is_protected(name: &str) -> bool {
        name == PERSONAL_TAG || name == ALL_TAG
    }

    /// Color of the named tag, or `Personal`'s color when there is no such tag
    /// (including `All` and deleted tags).
    #[must_use]
    pub fn color(&self, name: &str) -> &str {
        self.get(name)
            .or_else(|| self.get(PERSONAL_TAG))
            .map_or(PERSONAL_COLOR, |t| t.color.as_str())
    }

    /// Pick the next color using the thread RNG for random hues.
    #[must_use]
    pub fn next_color(&self) -> ColorPick {
        let mut rng = rand::rng();
        self.next_color_with(|| rng.random_range(0..360))
    }

    /// Pick the next color, drawing random hues from `hue`.
    ///
    /// The first palette entry not in use wins. Once the palette is exhausted,
    /// up to [`MAX_COLOR_ATTEMPTS`] pastel HSL colors are drawn; if all of them
    /// collide, the last draw is returned flagged as a collision.
    #[must_use]
    pub fn next_color_with(&self, mut hue: impl FnMut() -> u16) -> ColorPick {
        let in_use = |color: &str| self.tags.iter().any(|t| t.color == color);

        if let Some(color) = PALETTE.iter().find(|c| !in_use(c)) {
            return ColorPick {
                color: (*color).to_string(),
                source: ColorSource::Palette,
            };
        }

        let mut color = String::new();
        for _ in 0..MAX_COLOR_ATTEMPTS {
            color = pastel_hsl(hue() % 360);
            if !in_use(&color) {
                return ColorPick {
                    color,
                    source: ColorSource::Generated,
                };
            }
        }

        tracing::warn!(
            "No unused color after {} attempts; reusing {}",
            MAX_COLOR_ATTEMPTS,
            color
        );
        ColorPick {
            color,
            source: ColorSource::Collision {
                attempts: MAX_COLOR_ATTEMPTS,
            },
        }
    }

    /// Add a tag with an automatically assigned color.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the trimmed name is empty or is the reserved
    /// `All`, and `DuplicateTag` if a tag with the same name in any case exists.
    pub fn add_tag(&mut self, name: &str) -> Result<TagAdded> {
        let mut rng = rand::rng();
        self.add_tag_with(name, || rng.random_range(0..360))
    }

    /// [`add_tag`](Self::add_tag) with an explicit hue source.
    ///
    /// # Errors
    ///
    /// Same as [`add_tag`](Self::add_tag).
    pub fn add_tag_with(&mut self, name: &str, hue: impl FnMut() -> u16) -> Result<TagAdded> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StickyError::validation("name", "tag name cannot be empty"));
        }
        if name.eq_ignore_ascii_case(ALL_TAG) {
            return Err(StickyError::validation(
                "name",
                format!("'{name}' is reserved for the unfiltered view"),
            ));
        }
        if let Some(existing) = self.tags.iter().find(|t| same_name(&t.name, name)) {
            return Err(StickyError::DuplicateTag {
                name: name.to_string(),
                existing: existing.name.clone(),
            });
        }

        let pick = self.next_color_with(hue);
        let tag = Tag::new(name, pick.color);
        tracing::debug!("Added tag '{}' with color {}", tag.name, tag.color);
        self.tags.push(tag.clone());
        Ok(TagAdded {
            tag,
            source: pick.source,
        })
    }

    /// Remove a tag by exact name. Does not touch note items; the store
    /// handles the cascade.
    ///
    /// # Errors
    ///
    /// Returns `ProtectedTag` for `Personal`/`All` and `TagNotFound` otherwise
    /// when no tag matches.
    pub fn remove_tag(&mut self, name: &str) -> Result<Tag> {
        if Self::is_protected(name) {
            tracing::warn!("Refusing to delete protected tag '{}'", name);
            return Err(StickyError::ProtectedTag {
                name: name.to_string(),
            });
        }
        let idx = self
            .tags
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| StickyError::TagNotFound {
                name: name.to_string(),
            })?;
        Ok(self.tags.remove(idx))
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_hues(hues: Vec<u16>) -> impl FnMut() -> u16 {
        let mut iter = hues.into_iter().cycle();
        move || iter.next().unwrap_or(0)
    }

    #[test]
    fn test_new_registry_has_personal() {
        let registry = TagRegistry::new();
        assert_eq!(registry.tags(), &[Tag::personal()]);
    }

    #[test]
    fn test_add_tag_uses_palette_in_order() {
        let mut registry = TagRegistry::new();
        let work = registry.add_tag("Work").unwrap();
        let home = registry.add_tag("Chores").unwrap();
        assert_eq!(work.tag.color, PALETTE[0]);
        assert_eq!(work.source, ColorSource::Palette);
        assert_eq!(home.tag.color, PALETTE[1]);
    }

    #[test]
    fn test_add_tag_case_insensitive_duplicate() {
        let mut registry = TagRegistry::new();
        registry.add_tag("work").unwrap();
        let err = registry.add_tag("Work").unwrap_err();
        assert!(matches!(err, StickyError::DuplicateTag { ref existing, .. } if existing == "work"));
        let names: Vec<&str> = registry.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Personal", "work"]);
    }

    #[test]
    fn test_add_tag_trims_and_rejects_blank() {
        let mut registry = TagRegistry::new();
        assert!(matches!(
            registry.add_tag("   "),
            Err(StickyError::Validation { .. })
        ));
        let added = registry.add_tag("  Urgent  ").unwrap();
        assert_eq!(added.tag.name, "Urgent");
        assert!(matches!(
            registry.add_tag("personal"),
            Err(StickyError::DuplicateTag { .. })
        ));
    }

    #[test]
    fn test_add_tag_rejects_reserved_all() {
        let mut registry = TagRegistry::new();
        assert!(matches!(
            registry.add_tag("all"),
            Err(StickyError::Validation { .. })
        ));
        assert_eq!(registry.tags().len(), 1);
    }

    #[test]
    fn test_palette_exhaustion_generates_pastel() {
        let mut registry = TagRegistry::new();
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            let added = registry.add_tag(name).unwrap();
            assert_eq!(added.tag.color, PALETTE[i]);
        }
        let seventh = registry.add_tag_with("G", fixed_hues(vec![42])).unwrap();
        assert_eq!(seventh.tag.color, "hsl(42, 70%, 90%)");
        assert_eq!(seventh.source, ColorSource::Generated);
        assert!(!PALETTE.contains(&seventh.tag.color.as_str()));
    }

    #[test]
    fn test_generated_color_retries_on_collision() {
        let mut registry = TagRegistry::new();
        for name in ["A", "B", "C", "D", "E", "F"] {
            registry.add_tag(name).unwrap();
        }
        registry.add_tag_with("G", fixed_hues(vec![10])).unwrap();
        let h = registry
            .add_tag_with("H", fixed_hues(vec![10, 10, 200]))
            .unwrap();
        assert_eq!(h.tag.color, "hsl(200, 70%, 90%)");
        assert_eq!(h.source, ColorSource::Generated);
    }

    #[test]
    fn test_collision_after_max_attempts_is_flagged() {
        let mut registry = TagRegistry::new();
        for name in ["A", "B", "C", "D", "E", "F"] {
            registry.add_tag(name).unwrap();
        }
        registry.add_tag_with("G", fixed_hues(vec![10])).unwrap();
        let mut calls = 0;
        let h = registry
            .add_tag_with("H", || {
                calls += 1;
                10
            })
            .unwrap();
        assert_eq!(calls, MAX_COLOR_ATTEMPTS);
        assert_eq!(h.tag.color, "hsl(10, 70%, 90%)");
        assert_eq!(
            h.source,
            ColorSource::Collision {
                attempts: MAX_COLOR_ATTEMPTS
            }
        );
        assert_eq!(registry.tags().len(), 9);
    }

    #[test]
    fn test_deleted_palette_color_is_reused() {
        let mut registry = TagRegistry::new();
        registry.add_tag("A").unwrap();
        registry.add_tag("B").unwrap();
        registry.remove_tag("A").unwrap();
        let c = registry.add_tag("C").unwrap();
        assert_eq!(c.tag.color, PALETTE[0]);
    }

    #[test]
    fn test_remove_protected_tags() {
        let mut registry = TagRegistry::new();
        registry.add_tag("Work").unwrap();
        let before = registry.clone();
        assert!(matches!(
            registry.remove_tag("Personal"),
            Err(StickyError::ProtectedTag { .. })
        ));
        assert!(matches!(
            registry.remove_tag("All"),
            Err(StickyError::ProtectedTag { .. })
        ));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_remove_unknown_tag() {
        let mut registry = TagRegistry::new();
        assert!(matches!(
            registry.remove_tag("Nope"),
            Err(StickyError::TagNotFound { .. })
        ));
    }

    #[test]
    fn test_color_falls_back_to_personal() {
        let mut registry = TagRegistry::new();
        registry.add_tag("Work").unwrap();
        assert_eq!(registry.color("Work"), PALETTE[0]);
        assert_eq!(registry.color("All"), PERSONAL_COLOR);
        assert_eq!(registry.color("Deleted"), PERSONAL_COLOR);
    }

    #[test]
    fn test_from_tags_replaces_defaults() {
        let registry = TagRegistry::from_tags(vec![
            Tag::new("Personal", "#123456"),
            Tag::new("Work", "#abcdef"),
        ]);
        assert_eq!(registry.color("Personal"), "#123456");
        assert_eq!(registry.color("Missing"), "#123456");
        assert_eq!(registry.tags().len(), 2);
    }

    #[test]
    fn test_from_tags_seeds_missing_personal_and_drops_duplicates() {
        let registry = TagRegistry::from_tags(vec![
            Tag::new("Work", "#abcdef"),
            Tag::new("WORK", "#000000"),
            Tag::new("All", "#111111"),
        ]);
        let names: Vec<&str> = registry.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Personal", "Work"]);
    }

    #[test]
    fn test_from_tags_canonicalizes_personal_case() {
        let registry = TagRegistry::from_tags(vec![
            Tag::new("Work", "#abcdef"),
            Tag::new("personal", "#123456"),
            Tag::new("PERSONAL", "#654321"),
        ]);
        let names: Vec<&str> = registry.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Personal"]);
        assert_eq!(registry.color("Personal"), "#123456");
        assert!(registry.get("personal").is_none());
    }
}
