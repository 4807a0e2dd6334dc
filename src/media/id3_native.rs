//! In-process tagging with the `id3` crate.

use std::path::Path;

use id3::{ErrorKind, Tag, TagLike, Version};

use super::tagger::Tagger;
use crate::error::TagError;

/// Sets TRCK and TIT2, keeping every other frame already in the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeId3Tagger;

impl Tagger for NativeId3Tagger {
    fn set_metadata(&self, path: &Path, track: u32, title: &str) -> Result<(), TagError> {
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
            Err(e) => return Err(e.into()),
        };

        tag.set_track(track);
        tag.set_title(title);
        tag.write_to_path(path, Version::Id3v24)?;
        Ok(())
    }
}
