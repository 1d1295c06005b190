//! src/staging.rs
use crate::engine::KeyValue;
use crate::splitter::map_file_name;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

pub fn result_file_name(result_dir: &Path, id: usize) -> PathBuf {
    result_dir.join(format!("result-{id}"))
}

/// Source stage: one background worker reading fragment files in sequence
/// order and pushing their contents onto a bounded channel. A full channel
/// suspends the send, so disk reads run ahead of the consumer by at most
/// `capacity` fragments. The channel closes once the worker finishes or
/// fails; a read failure surfaces through the join handle.
pub fn fan_in(
    map_dir: PathBuf,
    fragment_count: usize,
    capacity: usize,
) -> (Receiver<Vec<u8>>, JoinHandle<anyhow::Result<()>>) {
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move {
        for id in 0..fragment_count {
            let path = map_file_name(&map_dir, id);
            let buffer = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read fragment file {}", path.display()))?;
            tracing::debug!("fanning in {}", path.display());
            if tx.send(buffer).await.is_err() {
                // consumer went away; its own failure is reported elsewhere
                break;
            }
        }
        Ok(())
    });
    (rx, handle)
}

/// Sink stage: one background worker draining reduce-job output batches into
/// result files numbered by arrival order, which is not necessarily
/// reduce-job index order. The join handle resolves only after the channel
/// has closed and the last batch is on disk, yielding the file count.
pub fn fan_out(
    result_dir: PathBuf,
    capacity: usize,
) -> (Sender<Vec<KeyValue>>, JoinHandle<anyhow::Result<usize>>) {
    let (tx, mut rx) = mpsc::channel::<Vec<KeyValue>>(capacity);
    let handle = tokio::spawn(async move {
        let mut result_counter = 0usize;
        while let Some(batch) = rx.recv().await {
            let path = result_file_name(&result_dir, result_counter);
            tracing::debug!("fanning out {}", path.display());
            write_result_file(&path, &batch)
                .with_context(|| format!("Failed to write result file {}", path.display()))?;
            result_counter += 1;
        }
        Ok(result_counter)
    });
    (tx, handle)
}

// One JSON record per line, in batch order. Files are created once and never
// rewritten.
fn write_result_file(path: &Path, batch: &[KeyValue]) -> Result<(), anyhow::Error> {
    let file = std::fs::File::create(path).context("Failed to create result file")?;
    let mut writer = std::io::BufWriter::new(file);
    for pair in batch {
        serde_json::to_writer(&mut writer, pair).context("Failed to encode result record")?;
        writer
            .write_all(b"\n")
            .context("Failed to write record delimiter")?;
    }
    writer.flush().context("Failed to flush result file")?;
    Ok(())
}
