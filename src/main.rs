use std::process::ExitCode;

use clap::Parser;
use owo_colors::{OwoColorize, Stream::Stderr};

use crate::{
    aggregator::collect_works,
    cli::Cli,
    config::Config,
    order::sort_descending_by_year,
    registry::{Endpoints, OrcidClient},
    report::Reporter,
    writer::write_output,
};

mod aggregator;
mod cli;
mod config;
mod json;
mod order;
mod registry;
mod report;
mod work;
mod writer;

fn main() -> ExitCode {
    let config = Config::from(Cli::parse());
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{} building {}: {e:#}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                config.output.display()
            );
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let client = OrcidClient::new(config.timeout);
    let endpoints = Endpoints::new(config.api_base.clone(), config.subject.clone());
    let reporter = Reporter::new(config.quiet);

    let harvest = collect_works(&client, &endpoints, config.delay, &reporter)?;
    reporter.finish(&harvest.tally);

    let records = sort_descending_by_year(harvest.records);
    let written = write_output(&config.output, &records)?;
    println!("Wrote {} with {written} items", config.output.display());
    Ok(())
}
