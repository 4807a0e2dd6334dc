use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A transfer that did not produce a usable response body.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed reading response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// The feed body was not a readable RSS document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed feed: {0}")]
    Feed(#[from] rss::Error),

    #[error("malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected content after the root element at byte {position}")]
    TrailingContent { position: u64 },
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern for show '{label}': {source}")]
    Regex {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern for show '{label}' must have exactly one capture group, found {found}")]
    CaptureGroups { label: String, found: usize },
}

/// Failure local to a single episode. Never aborts the batch.
#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error("episode has no enclosure URL")]
    MissingEnclosure,

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("cannot create {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("transfer into {} failed: {source}", path.display())]
    Transfer {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("{program} not found. Please install it and ensure it's in your PATH.")]
    ToolNotFound { program: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("ID3 write failed: {0}")]
    Id3(#[from] id3::Error),
}

/// Failure before any episode is processed. Aborts the run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("could not fetch feed: {0}")]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
