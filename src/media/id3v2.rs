use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::tagger::Tagger;
use crate::error::TagError;

/// Tags files by running `id3v2 --track <n> --song <title> <path>`.
#[derive(Debug, Clone)]
pub struct Id3v2Tagger {
    program: String,
}

impl Default for Id3v2Tagger {
    fn default() -> Self {
        Self::new("id3v2")
    }
}

impl Id3v2Tagger {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Tagger for Id3v2Tagger {
    fn set_metadata(&self, path: &Path, track: u32, title: &str) -> Result<(), TagError> {
        debug!("{} --track {track} --song {title:?} {path:?}", self.program);

        // Arguments are passed discretely, so titles with quotes are safe.
        let output = Command::new(&self.program)
            .arg("--track")
            .arg(track.to_string())
            .arg("--song")
            .arg(title)
            .arg(path)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TagError::ToolNotFound {
                    program: self.program.clone(),
                });
            }
            Err(source) => {
                return Err(TagError::Spawn {
                    program: self.program.clone(),
                    source,
                });
            }
        };

        if !output.status.success() {
            return Err(TagError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
