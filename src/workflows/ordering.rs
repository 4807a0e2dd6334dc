use crate::domain::models::EpisodeRecord;

/// Sort by episode number, ascending. Stable, so re-uploads sharing a number
/// keep their feed order; nothing is deduplicated.
pub fn sort_episodes(episodes: &mut [EpisodeRecord]) {
    episodes.sort_by_key(|episode| episode.episode_number);
}
