//! src/job.rs
use crate::configuration::Settings;
use crate::engine::{run_engine, Task};
use crate::splitter::Partitioner;
use crate::staging::{fan_in, fan_out};
use crate::wordcount::{map_words, reduce_counts, shuffle};
use anyhow::Context;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug)]
pub struct JobReport {
    pub fragments: usize,
    pub result_files: usize,
}

/// Runs the whole word-count pipeline for one source file: synchronous
/// partitioning, then source stage, engine and sink stage concurrently.
pub struct WordCountJob {
    settings: Settings,
}

impl WordCountJob {
    pub fn new(settings: Settings) -> Self {
        WordCountJob { settings }
    }

    #[tracing::instrument(
        name = "Run word count job",
        skip_all,
        fields(job_id = %Uuid::new_v4(), source = %source.as_ref().display())
    )]
    pub async fn run(&self, source: impl AsRef<Path>) -> Result<JobReport, anyhow::Error> {
        let storage = &self.settings.storage;
        std::fs::create_dir_all(&storage.map_dir)
            .context("Failed to create the fragment directory")?;
        std::fs::create_dir_all(&storage.result_dir)
            .context("Failed to create the result directory")?;

        let partitioner = Partitioner::new(
            source.as_ref().to_path_buf(),
            storage.map_dir.clone(),
            self.settings.split.chunk_size,
        );
        let fragments = partitioner
            .split()
            .context("Failed to partition the input file")?;

        let (input, fan_in_handle) = fan_in(
            storage.map_dir.clone(),
            fragments,
            self.settings.pipeline.map_buffer,
        );
        let (output, fan_out_handle) = fan_out(
            storage.result_dir.clone(),
            self.settings.pipeline.reduce_buffer,
        );

        let task = Task {
            num_input_units: fragments,
            num_reduce_jobs: self.settings.pipeline.reduce_jobs,
            map_fn: map_words,
            reduce_fn: reduce_counts,
            shuffle_fn: shuffle,
        };
        let engine_handle = tokio::spawn(run_engine(task, input, output));

        // No cancellation path: the first error aborts the whole run.
        fan_in_handle.await.context("Source stage panicked")??;
        engine_handle.await.context("Engine panicked")??;
        let result_files = fan_out_handle.await.context("Sink stage panicked")??;

        tracing::info!("wrote {result_files} result files for {fragments} fragments");
        Ok(JobReport {
            fragments,
            result_files,
        })
    }
}
