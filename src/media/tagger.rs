use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use super::id3_native::NativeId3Tagger;
use super::id3v2::Id3v2Tagger;
use crate::error::TagError;

/// Writes track number and title metadata into a downloaded audio file.
pub trait Tagger {
    fn set_metadata(&self, path: &Path, track: u32, title: &str) -> Result<(), TagError>;
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaggerKind {
    /// Run the external `id3v2` program
    #[default]
    #[value(name = "id3v2")]
    Id3v2,
    /// Write ID3v2.4 frames in-process
    Native,
}

impl TaggerKind {
    pub fn build(self) -> Box<dyn Tagger> {
        match self {
            TaggerKind::Id3v2 => Box::new(Id3v2Tagger::default()),
            TaggerKind::Native => Box::new(NativeId3Tagger),
        }
    }
}
