use clap::Parser;
use std::path::PathBuf;

use crate::domain::show::ShowPattern;
use crate::media::tagger::TaggerKind;

#[derive(Parser)]
#[command(name = "podgrab")]
#[command(about = "Download podcast episodes matching show patterns from an RSS feed and tag them with their episode number")]
pub struct Cli {
    /// RSS feed URL
    pub url: String,

    /// Directory episodes are saved into
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Show to extract, as LABEL=REGEX; the single capture group is the episode number.
    /// Repeat for several shows. Replaces the configured shows.
    #[arg(long = "show", value_name = "LABEL=REGEX", value_parser = parse_show)]
    pub shows: Vec<ShowPattern>,

    /// How downloaded files are tagged
    #[arg(long)]
    pub tagger: Option<TaggerKind>,

    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List matching episodes without downloading anything
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_show(value: &str) -> Result<ShowPattern, String> {
    let (label, pattern) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=REGEX, got '{value}'"))?;

    let label = label.trim();
    if label.is_empty() {
        return Err("show label must not be empty".to_string());
    }

    ShowPattern::new(label, pattern).map_err(|e| e.to_string())
}
