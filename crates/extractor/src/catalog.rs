//! Well-known Signal UI signals, grouped by intent.

use signal_protocol::{Category, SignalRecord};

/// A catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

const fn entry(name: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry { name, description }
}

const TONE: &[CatalogEntry] = &[
    entry("primary", "Primary visual tone"),
    entry("secondary", "Secondary visual tone"),
    entry("accent", "Accent visual tone"),
    entry("neutral", "Neutral visual tone"),
    entry("muted", "Muted visual tone"),
    entry("subtle", "Subtle visual tone"),
];

const SIZE: &[CatalogEntry] = &[
    entry("xs", "Extra small size"),
    entry("sm", "Small size"),
    entry("md", "Medium size"),
    entry("lg", "Large size"),
    entry("xl", "Extra large size"),
    entry("2xl", "2x large size"),
    entry("3xl", "3x large size"),
];

const SHAPE: &[CatalogEntry] = &[
    entry("rounded", "Rounded corners"),
    entry("pill", "Pill shape (fully rounded)"),
    entry("square", "Square corners"),
    entry("circle", "Circular shape"),
];

const BEHAVIOR: &[CatalogEntry] = &[
    entry("hoverEnlarge", "Enlarge on hover"),
    entry("hoverShrink", "Shrink on hover"),
    entry("hoverFade", "Fade on hover"),
    entry("pressShrink", "Shrink when pressed"),
    entry("pressEnlarge", "Enlarge when pressed"),
    entry("focusJump", "Jump effect on focus"),
    entry("focusGlow", "Glow effect on focus"),
    entry("slideUp", "Slide up animation"),
    entry("slideDown", "Slide down animation"),
    entry("slideLeft", "Slide left animation"),
    entry("slideRight", "Slide right animation"),
    entry("fadeIn", "Fade in animation"),
    entry("fadeOut", "Fade out animation"),
    entry("pulse", "Pulse animation"),
    entry("bounce", "Bounce animation"),
    entry("spin", "Spin animation"),
];

const STATE: &[CatalogEntry] = &[
    entry("loading", "Loading state"),
    entry("disabled", "Disabled state"),
    entry("error", "Error state"),
    entry("success", "Success state"),
    entry("warning", "Warning state"),
    entry("active", "Active state"),
    entry("selected", "Selected state"),
];

const LAYOUT: &[CatalogEntry] = &[
    entry("flex", "Flex layout"),
    entry("grid", "Grid layout"),
    entry("block", "Block layout"),
    entry("inline", "Inline layout"),
    entry("inlineBlock", "Inline block layout"),
    entry("hidden", "Hidden element"),
    entry("visible", "Visible element"),
    entry("absolute", "Absolute positioning"),
    entry("relative", "Relative positioning"),
    entry("fixed", "Fixed positioning"),
    entry("sticky", "Sticky positioning"),
];

const SCRIPT: &[CatalogEntry] = &[
    entry("submitForm", "Submit form behavior"),
    entry("confirmOnClick", "Show confirmation dialog on click"),
    entry("toggle", "Toggle behavior"),
    entry("expand", "Expand/collapse behavior"),
    entry("modal", "Modal behavior"),
    entry("dropdown", "Dropdown behavior"),
    entry("tooltip", "Tooltip behavior"),
];

/// Catalog groups in display order
pub const CATALOG: &[(Category, &[CatalogEntry])] = &[
    (Category::Tone, TONE),
    (Category::Size, SIZE),
    (Category::Shape, SHAPE),
    (Category::Behavior, BEHAVIOR),
    (Category::State, STATE),
    (Category::Layout, LAYOUT),
    (Category::Script, SCRIPT),
];

/// Flatten the catalog into records tagged with their group
pub fn all_signals() -> Vec<SignalRecord> {
    CATALOG
        .iter()
        .flat_map(|(category, entries)| {
            entries
                .iter()
                .map(|e| SignalRecord::new(e.name, e.description, *category))
        })
        .collect()
}

/// Records of a single catalog group
pub fn signals_in(category: Category) -> Vec<SignalRecord> {
    CATALOG
        .iter()
        .filter(|(group, _)| *group == category)
        .flat_map(|(_, entries)| entries.iter())
        .map(|e| SignalRecord::new(e.name, e.description, category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_names_are_unique() {
        let all = all_signals();
        let names: HashSet<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn every_group_is_a_catalog_category() {
        for (category, entries) in CATALOG {
            assert!(category.is_catalog());
            assert!(!entries.is_empty());
        }
    }

    #[test]
    fn group_lookup() {
        let tone = signals_in(Category::Tone);
        assert_eq!(tone.first().map(|r| r.name.as_str()), Some("primary"));
        assert!(tone.iter().all(|r| r.category == Category::Tone));
        assert!(signals_in(Category::Signal).is_empty());
    }
}
