use regex::{Regex, RegexBuilder};

use crate::domain::models::{EpisodeRecord, RawItem};
use crate::error::PatternError;

/// A show label plus the case-insensitive title pattern that selects its
/// episodes. The single capture group yields the episode number.
#[derive(Debug, Clone)]
pub struct ShowPattern {
    label: String,
    matcher: Regex,
}

impl ShowPattern {
    pub fn new(label: &str, pattern: &str) -> Result<Self, PatternError> {
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Regex {
                label: label.to_string(),
                source,
            })?;

        // captures_len counts the implicit whole-match group
        let found = matcher.captures_len() - 1;
        if found != 1 {
            return Err(PatternError::CaptureGroups {
                label: label.to_string(),
                found,
            });
        }

        Ok(Self {
            label: label.to_string(),
            matcher,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// Returns `None` when the title does not match or the captured text is
    /// not a base-10 number that fits in a `u32`.
    pub fn classify(&self, item: &RawItem) -> Option<EpisodeRecord> {
        let caps = self.matcher.captures(&item.title)?;
        let episode_number = caps.get(1)?.as_str().parse::<u32>().ok()?;

        Some(EpisodeRecord {
            name: item.title.clone(),
            link: item.enclosure_url.clone(),
            episode_number,
        })
    }

    /// Classifies every item, keeping feed order and dropping non-matches.
    pub fn collect(&self, items: &[RawItem]) -> Vec<EpisodeRecord> {
        items.iter().filter_map(|item| self.classify(item)).collect()
    }
}
