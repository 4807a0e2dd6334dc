mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod media;
#[cfg(test)]
mod test_helpers;
mod workflows;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use infra::http::HttpFetcher;
use workflows::downloader::print_episode;
use workflows::pipeline::{self, RunSummary};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = config::load(&cli)?;

    println!("{}", cli.url);

    let fetcher = HttpFetcher::new(settings.timeout).context("Failed to build HTTP client")?;

    if cli.dry_run {
        let items = pipeline::load_feed(&fetcher, &cli.url)?;
        for show in pipeline::plan(&settings.shows, &items) {
            println!("== {} ({} episodes)", show.label, show.episodes.len());
            for episode in &show.episodes {
                print_episode(episode);
            }
        }
        return Ok(());
    }

    let tagger = settings.tagger.build();
    let summary = pipeline::download_feed(
        &fetcher,
        tagger.as_ref(),
        &cli.url,
        &settings.shows,
        &settings.output_dir,
    )?;
    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Feed items: {}", summary.items);
    for show in &summary.shows {
        let batch = &show.batch;
        println!(
            "{}: {}/{} downloaded, {} tagged, {} failed",
            show.label, batch.downloaded, batch.attempted, batch.tagged, batch.failed
        );
    }

    let total = summary.total();
    if total.failed > 0 || total.tagged < total.downloaded {
        println!(
            "Finished with problems: {} episodes failed, {} files left untagged",
            total.failed,
            total.downloaded - total.tagged
        );
    }
}
