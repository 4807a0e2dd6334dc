use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::models::EpisodeRecord;

const AUDIO_EXTENSION: &str = "mp3";

/// Common filesystem limit for a single path component, in bytes.
const MAX_FILENAME_BYTES: usize = 255;
/// Room kept for a collision suffix such as ` (12345)`.
const SUFFIX_RESERVE_BYTES: usize = 12;
const MAX_STEM_BYTES: usize = MAX_FILENAME_BYTES - SUFFIX_RESERVE_BYTES - AUDIO_EXTENSION.len() - 1;

pub fn episode_filename(episode: &EpisodeRecord) -> String {
    let stem = truncate_on_char_boundary(&sanitize_filename(&episode.name), MAX_STEM_BYTES)
        .trim_end()
        .to_string();
    if stem.is_empty() {
        format!("episode-{}.{AUDIO_EXTENSION}", episode.episode_number)
    } else {
        format!("{stem}.{AUDIO_EXTENSION}")
    }
}

fn sanitize_filename(name: &str) -> String {
    // Remove or replace invalid filename characters
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Destination paths handed out during one run.
///
/// A name already claimed gets a ` (n)` suffix; files left on disk by earlier
/// runs are not considered and get overwritten. Names are compared ignoring
/// case so two titles differing only in case cannot share a file on
/// case-insensitive filesystems.
#[derive(Debug, Default)]
pub struct FilenameClaims {
    claimed: HashSet<String>,
}

impl FilenameClaims {
    pub fn claim(&mut self, directory: &Path, base_filename: &str) -> PathBuf {
        let mut path = directory.join(base_filename);
        let mut counter = 1;

        while self.claimed.contains(&claim_key(&path)) {
            let stem = Path::new(base_filename)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("episode");
            let extension = Path::new(base_filename)
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or(AUDIO_EXTENSION);

            path = directory.join(format!("{stem} ({counter}).{extension}"));
            counter += 1;
        }

        self.claimed.insert(claim_key(&path));
        path
    }
}

fn claim_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
