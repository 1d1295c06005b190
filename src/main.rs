//! src/main.rs
use anyhow::Context;
use wordcount::configuration::get_configuration;
use wordcount::job::WordCountJob;
use wordcount::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing("wordcount")?;
    let configuration = get_configuration().context("Failed to read configuration.")?;

    let source = std::env::args()
        .nth(1)
        .context("Usage: wordcount <source-file>")?;

    let report = WordCountJob::new(configuration).run(&source).await?;
    println!(
        "{} fragments mapped, {} result files written",
        report.fragments, report.result_files
    );
    Ok(())
}
