//! src/engine.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};

/// One intermediate or final record. The value is string-typed at the
/// boundary; on the reduce side it always parses as a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: &str, value: &str) -> Self {
        KeyValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

pub type MapFn = fn(&[u8]) -> Vec<KeyValue>;
pub type ReduceFn = fn(Vec<KeyValue>) -> Vec<KeyValue>;
pub type ShuffleFn = fn(&str, u32) -> u32;

/// Read-only parameters for one run; not mutated once the job starts.
pub struct Task {
    pub num_input_units: usize,
    pub num_reduce_jobs: u32,
    pub map_fn: MapFn,
    pub reduce_fn: ReduceFn,
    pub shuffle_fn: ShuffleFn,
}

/// Drives one in-process run: map once per input unit, shuffle once per
/// intermediate key, reduce once per reduce job, then emit exactly one batch
/// per reduce job (empty when no key routed to it) and close the sink by
/// dropping it. Batches are emitted in reduce-job index order here, but the
/// sink contract does not depend on that.
#[tracing::instrument(name = "Run engine", skip_all)]
pub async fn run_engine(
    task: Task,
    mut input: Receiver<Vec<u8>>,
    output: Sender<Vec<KeyValue>>,
) -> Result<(), anyhow::Error> {
    let mut partitions: Vec<Vec<KeyValue>> = vec![Vec::new(); task.num_reduce_jobs as usize];

    let mut units = 0usize;
    while let Some(buffer) = input.recv().await {
        let pairs = (task.map_fn)(&buffer);
        tracing::debug!("mapped unit {units} into {} pairs", pairs.len());
        for pair in pairs {
            let r = (task.shuffle_fn)(&pair.key, task.num_reduce_jobs) as usize;
            partitions
                .get_mut(r)
                .context("Shuffle routed a key to an out-of-range reduce job")?
                .push(pair);
        }
        units += 1;
    }

    if units != task.num_input_units {
        anyhow::bail!(
            "Expected {} input units but the source delivered {units}",
            task.num_input_units
        );
    }

    for batch in partitions {
        let merged = (task.reduce_fn)(batch);
        output
            .send(merged)
            .await
            .context("Result sink closed before the run finished")?;
    }
    Ok(())
}
