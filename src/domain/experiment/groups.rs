//! Group label synonym table
//!
//! Upstream data tags every row with a free-form group label. The table maps
//! those labels onto the two experiment roles.

use serde::{Deserialize, Serialize};

use super::entity::GroupRole;

/// Case-insensitive label synonyms for each role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupLabels {
    pub treatment: Vec<String>,
    pub control: Vec<String>,
}

impl Default for GroupLabels {
    fn default() -> Self {
        Self {
            treatment: vec!["p".to_string(), "assetario".to_string()],
            control: vec!["c".to_string(), "control".to_string()],
        }
    }
}

impl GroupLabels {
    /// Resolve a label to its role; labels matching neither side yield `None`
    pub fn classify(&self, label: &str) -> Option<GroupRole> {
        let label = label.trim();
        let matches = |synonyms: &[String]| {
            synonyms
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(label))
        };

        if matches(&self.treatment) {
            Some(GroupRole::Treatment)
        } else if matches(&self.control) {
            Some(GroupRole::Control)
        } else {
            None
        }
    }

    pub fn synonyms(&self, role: GroupRole) -> &[String] {
        match role {
            GroupRole::Treatment => &self.treatment,
            GroupRole::Control => &self.control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_synonyms() {
        let labels = GroupLabels::default();
        assert_eq!(labels.classify("P"), Some(GroupRole::Treatment));
        assert_eq!(labels.classify("assetario"), Some(GroupRole::Treatment));
        assert_eq!(labels.classify("Assetario"), Some(GroupRole::Treatment));
        assert_eq!(labels.classify("c"), Some(GroupRole::Control));
        assert_eq!(labels.classify("CONTROL"), Some(GroupRole::Control));
        assert_eq!(labels.classify(" control "), Some(GroupRole::Control));
    }

    #[test]
    fn test_unknown_labels_are_excluded() {
        let labels = GroupLabels::default();
        assert_eq!(labels.classify("personalized"), None);
        assert_eq!(labels.classify(""), None);
    }

    #[test]
    fn test_custom_table() {
        let labels = GroupLabels {
            treatment: vec!["B".to_string()],
            control: vec!["A".to_string()],
        };
        assert_eq!(labels.classify("b"), Some(GroupRole::Treatment));
        assert_eq!(labels.classify("p"), None);
        assert_eq!(labels.synonyms(GroupRole::Control), &["A".to_string()]);
    }
}
