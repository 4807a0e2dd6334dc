use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::naming::{episode_filename, FilenameClaims};
use crate::domain::models::EpisodeRecord;
use crate::error::{EpisodeError, TagError};
use crate::infra::http::Fetcher;
use crate::media::tagger::Tagger;

const SEPARATOR: &str = "----------------------";

#[derive(Debug)]
pub enum EpisodeOutcome {
    /// The file is on disk. A tagging failure does not undo the download.
    Downloaded {
        path: PathBuf,
        tag_error: Option<TagError>,
    },
    Failed(EpisodeError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub downloaded: usize,
    pub tagged: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &EpisodeOutcome) {
        self.attempted += 1;
        match outcome {
            EpisodeOutcome::Downloaded { tag_error, .. } => {
                self.downloaded += 1;
                if tag_error.is_none() {
                    self.tagged += 1;
                }
            }
            EpisodeOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &BatchSummary) {
        self.attempted += other.attempted;
        self.downloaded += other.downloaded;
        self.tagged += other.tagged;
        self.failed += other.failed;
    }
}

/// Downloads episodes one after another into a single output directory and
/// tags each file as soon as it is written.
pub struct Downloader<'a> {
    fetcher: &'a dyn Fetcher,
    tagger: &'a dyn Tagger,
    output_dir: PathBuf,
    claims: FilenameClaims,
}

impl<'a> Downloader<'a> {
    /// The output directory must already exist.
    pub fn new(
        fetcher: &'a dyn Fetcher,
        tagger: &'a dyn Tagger,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            tagger,
            output_dir: output_dir.into(),
            claims: FilenameClaims::default(),
        }
    }

    /// Process every episode in order. A failing episode is reported and
    /// skipped; it never stops the rest of the batch.
    pub fn download_all(&mut self, episodes: &[EpisodeRecord]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for episode in episodes {
            print_episode(episode);
            let outcome = self.download_one(episode);
            report(episode, &outcome);
            summary.record(&outcome);
            println!("{SEPARATOR}");
        }

        summary
    }

    pub fn download_one(&mut self, episode: &EpisodeRecord) -> EpisodeOutcome {
        let path = match self.save_enclosure(episode) {
            Ok(path) => path,
            Err(e) => return EpisodeOutcome::Failed(e),
        };

        let tag_error = self
            .tagger
            .set_metadata(&path, episode.episode_number, &episode.name)
            .err();

        EpisodeOutcome::Downloaded { path, tag_error }
    }

    fn save_enclosure(&mut self, episode: &EpisodeRecord) -> Result<PathBuf, EpisodeError> {
        if episode.link.trim().is_empty() {
            return Err(EpisodeError::MissingEnclosure);
        }

        let mut body = self.fetcher.get(&episode.link)?;

        let base_filename = episode_filename(episode);
        let path = self.claims.claim(&self.output_dir, &base_filename);
        if path != self.output_dir.join(&base_filename) {
            warn!("{base_filename} already written this run, saving as {path:?}");
            println!("Name already used this run, saving as {}", path.display());
        }

        let mut file = File::create(&path).map_err(|source| EpisodeError::FileSystem {
            path: path.clone(),
            source,
        })?;

        match io::copy(&mut body, &mut file) {
            Ok(bytes) => {
                debug!("Wrote {bytes} bytes to {path:?}");
                Ok(path)
            }
            Err(source) => {
                drop(file);
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Could not remove partial download {path:?}: {e}");
                }
                Err(EpisodeError::Transfer { path, source })
            }
        }
    }
}

pub fn print_episode(episode: &EpisodeRecord) {
    println!("Title: {}", episode.name);
    println!("Link: {}", episode.link);
    println!("Episode Number: {}", episode.episode_number);
}

fn report(episode: &EpisodeRecord, outcome: &EpisodeOutcome) {
    match outcome {
        EpisodeOutcome::Downloaded { path, tag_error } => {
            println!("Saved to {}", path.display());
            match tag_error {
                None => println!("Track number set successfully."),
                Some(e) => eprintln!("Error setting track number: {e}"),
            }
        }
        EpisodeOutcome::Failed(e) => {
            eprintln!("Error downloading '{}': {e}", episode.name);
        }
    }
}
