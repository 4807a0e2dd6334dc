use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::cli::Cli;
use crate::domain::show::ShowPattern;
use crate::media::tagger::TaggerKind;

const OUTPUT_DIR_ENV: &str = "PODGRAB_OUTPUT_DIR";
const DEFAULT_OUTPUT_DIR: &str = "Downloads";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    tagger: Option<TaggerKind>,
    timeout_secs: Option<u64>,
    shows: Vec<ShowConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct ShowConfig {
    label: String,
    pattern: String,
}

/// Effective settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub tagger: TaggerKind,
    pub timeout: Option<Duration>,
    /// Processed in this order.
    pub shows: Vec<ShowPattern>,
}

pub fn load(cli: &Cli) -> Result<Settings> {
    let file = read_config_file(cli.config.as_deref())?;
    resolve(cli, file, env::var(OUTPUT_DIR_ENV).ok())
}

fn read_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let config_path = match explicit {
        Some(path) if !path.exists() => bail!("Config file not found: {}", path.display()),
        Some(path) => path.to_path_buf(),
        None => get_config_path(),
    };

    if !config_path.exists() {
        debug!("No config file at {}", config_path.display());
        return Ok(ConfigFile::default());
    }

    debug!("Using config file {}", config_path.display());
    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: ConfigFile = toml::from_str(&config_content)
        .with_context(|| format!("Invalid config file {}", config_path.display()))?;
    Ok(config)
}

/// Command line beats environment beats config file beats defaults.
fn resolve(cli: &Cli, file: ConfigFile, env_output_dir: Option<String>) -> Result<Settings> {
    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| env_output_dir.filter(|dir| !dir.is_empty()).map(PathBuf::from))
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let shows = if !cli.shows.is_empty() {
        cli.shows.clone()
    } else {
        let configured = if file.shows.is_empty() {
            default_shows()
        } else {
            file.shows
        };
        configured
            .iter()
            .map(|show| ShowPattern::new(&show.label, &show.pattern))
            .collect::<Result<Vec<_>, _>>()?
    };

    if file.timeout_secs == Some(0) {
        bail!("timeout_secs must be at least 1; leave it unset for no timeout");
    }

    Ok(Settings {
        output_dir,
        tagger: cli.tagger.or(file.tagger).unwrap_or_default(),
        timeout: file.timeout_secs.map(Duration::from_secs),
        shows,
    })
}

fn default_shows() -> Vec<ShowConfig> {
    vec![
        ShowConfig {
            label: "MAG".to_string(),
            pattern: r"MAG (\d+)".to_string(),
        },
        ShowConfig {
            label: "The Magnus Protocol".to_string(),
            pattern: r"The Magnus Protocol (\d+)".to_string(),
        },
    ]
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("podgrab"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(["podgrab", "https://feeds.test/rss"].iter().chain(args)).unwrap()
    }

    fn labels(settings: &Settings) -> Vec<&str> {
        settings.shows.iter().map(|s| s.label()).collect()
    }

    #[test]
    fn test_defaults() {
        let settings = resolve(&cli(&[]), ConfigFile::default(), None).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("Downloads"));
        assert_eq!(settings.tagger, TaggerKind::Id3v2);
        assert_eq!(settings.timeout, None);
        assert_eq!(labels(&settings), ["MAG", "The Magnus Protocol"]);
    }

    #[test]
    fn test_config_file_values() {
        let file: ConfigFile = toml::from_str(
            r#"
output_dir = "/srv/podcasts"
tagger = "native"
timeout_secs = 600

[[shows]]
label = "Bonus"
pattern = 'Bonus Episode (\d+)'
"#,
        )
        .unwrap();

        let settings = resolve(&cli(&[]), file, None).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("/srv/podcasts"));
        assert_eq!(settings.tagger, TaggerKind::Native);
        assert_eq!(settings.timeout, Some(Duration::from_secs(600)));
        assert_eq!(labels(&settings), ["Bonus"]);
    }

    #[test]
    fn test_precedence() {
        let file = ConfigFile {
            output_dir: Some(PathBuf::from("from-file")),
            tagger: Some(TaggerKind::Native),
            ..ConfigFile::default()
        };

        let settings = resolve(&cli(&[]), file, Some("from-env".to_string())).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("from-env"));
        assert_eq!(settings.tagger, TaggerKind::Native);

        let file = ConfigFile {
            output_dir: Some(PathBuf::from("from-file")),
            ..ConfigFile::default()
        };
        let settings = resolve(
            &cli(&["-o", "from-cli", "--tagger", "id3v2", "--show", r"X=X(\d+)"]),
            file,
            Some("from-env".to_string()),
        )
        .unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("from-cli"));
        assert_eq!(settings.tagger, TaggerKind::Id3v2);
        assert_eq!(labels(&settings), ["X"]);
    }

    #[test]
    fn test_invalid_configured_pattern_is_an_error() {
        let file = ConfigFile {
            shows: vec![ShowConfig {
                label: "Broken".to_string(),
                pattern: "no group".to_string(),
            }],
            ..ConfigFile::default()
        };
        assert!(resolve(&cli(&[]), file, None).is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let file: ConfigFile = toml::from_str("timeout_secs = 0").unwrap();
        assert!(resolve(&cli(&[]), file, None).is_err());

        let file: ConfigFile = toml::from_str("timeout_secs = 1").unwrap();
        let settings = resolve(&cli(&[]), file, None).unwrap();
        assert_eq!(settings.timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("outptu_dir = \"typo\"").is_err());
    }

    #[test]
    fn test_read_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "output_dir = \"episodes\"\n").unwrap();

        let file = read_config_file(Some(&path)).unwrap();
        assert_eq!(file.output_dir, Some(PathBuf::from("episodes")));

        assert!(read_config_file(Some(&temp_dir.path().join("absent.toml"))).is_err());
    }
}
