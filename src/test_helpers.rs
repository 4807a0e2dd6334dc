//! Scripted collaborators for exercising the download flow without a network
//! or an installed tagging tool.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::domain::models::EpisodeRecord;
use crate::error::{NetworkError, TagError};
use crate::infra::http::Fetcher;
use crate::media::tagger::Tagger;

enum FakeResponse {
    Body(Vec<u8>),
    Status(u16),
    /// Yields a few bytes, then a connection reset.
    Broken,
}

/// Answers GETs from a fixed table. Unknown URLs get HTTP 404.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, FakeResponse>,
    requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.to_string(), FakeResponse::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), FakeResponse::Status(status));
        self
    }

    pub fn with_broken_body(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), FakeResponse::Broken);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, NetworkError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some(FakeResponse::Body(body)) => Ok(Box::new(Cursor::new(body.clone()))),
            Some(FakeResponse::Broken) => Ok(Box::new(BrokenReader { sent: false })),
            Some(FakeResponse::Status(status)) => Err(NetworkError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(NetworkError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

struct BrokenReader {
    sent: bool,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.sent || buf.len() < 4 {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ));
        }
        self.sent = true;
        buf[..4].copy_from_slice(b"ID3\x04");
        Ok(4)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCall {
    pub path: PathBuf,
    pub track: u32,
    pub title: String,
}

/// Records every call; fails for the listed track numbers.
#[derive(Default)]
pub struct RecordingTagger {
    calls: RefCell<Vec<TagCall>>,
    failing_tracks: Vec<u32>,
}

impl RecordingTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, track: u32) -> Self {
        self.failing_tracks.push(track);
        self
    }

    pub fn calls(&self) -> Vec<TagCall> {
        self.calls.borrow().clone()
    }
}

impl Tagger for RecordingTagger {
    fn set_metadata(&self, path: &Path, track: u32, title: &str) -> Result<(), TagError> {
        self.calls.borrow_mut().push(TagCall {
            path: path.to_path_buf(),
            track,
            title: title.to_string(),
        });

        if self.failing_tracks.contains(&track) {
            return Err(TagError::Failed {
                program: "fake-tagger".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "unsupported file".to_string(),
            });
        }
        Ok(())
    }
}

pub fn episode(name: &str, link: &str, number: u32) -> EpisodeRecord {
    EpisodeRecord {
        name: name.to_string(),
        link: link.to_string(),
        episode_number: number,
    }
}
