use std::fs;
use std::path::Path;

use tracing::info;

use super::downloader::{BatchSummary, Downloader};
use super::ordering::sort_episodes;
use crate::domain::models::{EpisodeRecord, RawItem};
use crate::domain::show::ShowPattern;
use crate::error::FeedError;
use crate::infra::feed::parse_feed;
use crate::infra::http::Fetcher;
use crate::media::tagger::Tagger;

/// One show's episodes, sorted by episode number.
#[derive(Debug, Clone)]
pub struct ShowEpisodes {
    pub label: String,
    pub episodes: Vec<EpisodeRecord>,
}

#[derive(Debug, Clone)]
pub struct ShowSummary {
    pub label: String,
    pub batch: BatchSummary,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub items: usize,
    pub shows: Vec<ShowSummary>,
}

impl RunSummary {
    pub fn total(&self) -> BatchSummary {
        let mut total = BatchSummary::default();
        for show in &self.shows {
            total.merge(&show.batch);
        }
        total
    }
}

pub fn load_feed(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<RawItem>, FeedError> {
    let body = fetcher.fetch(url)?;
    info!("Fetched {} bytes from {url}", body.len());
    Ok(parse_feed(&body)?)
}

/// Classify the items once per show and order each show's episodes.
pub fn plan(shows: &[ShowPattern], items: &[RawItem]) -> Vec<ShowEpisodes> {
    shows
        .iter()
        .map(|show| {
            let mut episodes = show.collect(items);
            sort_episodes(&mut episodes);
            info!(
                "{} /{}/: {} matching episodes",
                show.label(),
                show.pattern(),
                episodes.len()
            );
            ShowEpisodes {
                label: show.label().to_string(),
                episodes,
            }
        })
        .collect()
}

/// Fetch and parse the feed, then download and tag every matching episode,
/// show by show in the order given.
///
/// Only feed-level failures are returned as errors; per-episode failures are
/// reported as they happen and counted in the summary.
pub fn run_feed(
    fetcher: &dyn Fetcher,
    url: &str,
    shows: &[ShowPattern],
    downloader: &mut Downloader<'_>,
) -> Result<RunSummary, FeedError> {
    let items = load_feed(fetcher, url)?;

    let mut summary = RunSummary {
        items: items.len(),
        shows: Vec::with_capacity(shows.len()),
    };

    for show in plan(shows, &items) {
        let batch = downloader.download_all(&show.episodes);
        summary.shows.push(ShowSummary {
            label: show.label,
            batch,
        });
    }

    Ok(summary)
}

/// Create the output directory, then run the whole feed into it.
///
/// A directory that cannot be created aborts the run before the feed is
/// requested.
pub fn download_feed(
    fetcher: &dyn Fetcher,
    tagger: &dyn Tagger,
    url: &str,
    shows: &[ShowPattern],
    output_dir: &Path,
) -> Result<RunSummary, FeedError> {
    fs::create_dir_all(output_dir).map_err(|source| FeedError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut downloader = Downloader::new(fetcher, tagger, output_dir);
    run_feed(fetcher, url, shows, &mut downloader)
}
