//! Selective bundling: which labels get bundles.
//!
//! In exclude mode (the default) every label is bundled except the listed
//! ones; in include mode only the listed ones are. Names match
//! case-insensitively. With the defaults every label is bundled.

use std::collections::HashSet;

use crate::config::Settings;
use crate::domain::LabelChip;

/// Label inclusion policy derived from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectiveBundling {
    exclude: bool,
    labels: HashSet<String>,
}

impl Default for SelectiveBundling {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SelectiveBundling {
    /// Builds the policy from the current settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            exclude: settings.exclude,
            labels: settings.label_set(),
        }
    }

    /// Whether a label with this title may be bundled.
    pub fn includes(&self, title: &str) -> bool {
        self.labels.contains(&title.to_lowercase()) != self.exclude
    }

    /// The chips that may be bundled, in their original order.
    pub fn filter<'a>(&self, chips: &'a [LabelChip]) -> Vec<&'a LabelChip> {
        chips.iter().filter(|c| self.includes(&c.title)).collect()
    }

    /// Titles of the chips that may be bundled, in their original order.
    pub fn filter_titles<'a>(&self, chips: &'a [LabelChip]) -> Vec<&'a str> {
        self.filter(chips)
            .into_iter()
            .map(|c| c.title.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(exclude: bool, labels: &[&str]) -> SelectiveBundling {
        SelectiveBundling::from_settings(&Settings {
            exclude,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    fn chips(titles: &[&str]) -> Vec<LabelChip> {
        titles.iter().map(|t| LabelChip::new(*t)).collect()
    }

    #[test]
    fn exclude_mode_drops_listed_labels_case_insensitively() {
        let policy = policy(true, &["bank"]);
        let chips = chips(&["Bank", "Trips"]);

        assert_eq!(policy.filter_titles(&chips), vec!["Trips"]);
    }

    #[test]
    fn include_mode_keeps_only_listed_labels() {
        let policy = policy(false, &["TRIPS", "school"]);
        let chips = chips(&["Bank", "Trips", "School"]);

        assert_eq!(policy.filter_titles(&chips), vec!["Trips", "School"]);
    }

    #[test]
    fn defaults_bundle_everything() {
        let policy = SelectiveBundling::default();
        assert!(policy.includes("Anything"));
    }

    #[test]
    fn include_mode_with_empty_list_bundles_nothing() {
        let policy = policy(false, &[]);
        assert!(policy.filter(&chips(&["Bank"])).is_empty());
    }
}
