//! tests/api/pipeline.rs
use crate::helpers::{scratch_dir, test_data_dir, test_settings};
use claims::assert_some_eq;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use wordcount::job::WordCountJob;
use wordcount::splitter::map_file_name;
use wordcount::staging::result_file_name;

// The same tokenization the map callback applies, in one pass over the
// whole text.
fn reference_counts(text: &str) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
        if !word.is_empty() {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn collect_result_counts(settings: &wordcount::configuration::Settings) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    let mut id = 0;
    loop {
        let path = result_file_name(&settings.storage.result_dir, id);
        if !path.exists() {
            break;
        }
        let contents = fs::read_to_string(&path).expect("Failed to read result file");
        for line in contents.lines() {
            let record: Value = serde_json::from_str(line).expect("Malformed result record");
            let key = record["Key"].as_str().expect("Key is not a string");
            let value = record["Value"].as_str().expect("Value is not a string");
            let previous = counts.insert(key.to_string(), value.parse::<u64>().unwrap());
            assert!(previous.is_none(), "word {key} reached two reduce jobs");
        }
        id += 1;
    }
    counts
}

#[tokio::test]
async fn a_run_should_match_a_single_pass_count_of_the_source() {
    let scratch = scratch_dir();
    let settings = test_settings(&scratch, 64, 4);
    let source = test_data_dir().join("small_test.txt");
    let text = fs::read_to_string(&source).expect("Failed to read test fixture");

    let report = WordCountJob::new(settings.clone())
        .run(&source)
        .await
        .expect("Failed to run job");

    assert!(report.fragments > 1, "fixture should span several fragments");
    assert_eq!(report.result_files, 4);
    assert_eq!(collect_result_counts(&settings), reference_counts(&text));
}

#[tokio::test]
async fn fragments_on_disk_should_concatenate_back_to_the_source() {
    let scratch = scratch_dir();
    let settings = test_settings(&scratch, 64, 4);
    let source = test_data_dir().join("small_test.txt");

    let report = WordCountJob::new(settings.clone())
        .run(&source)
        .await
        .expect("Failed to run job");

    let mut rebuilt = Vec::new();
    for id in 0..report.fragments {
        rebuilt.extend(
            fs::read(map_file_name(&settings.storage.map_dir, id))
                .expect("Failed to read fragment"),
        );
    }
    assert_eq!(rebuilt, fs::read(&source).expect("Failed to read fixture"));
}

#[tokio::test]
async fn chunking_should_not_change_the_totals() {
    let source = test_data_dir().join("small_test.txt");

    let one_fragment = scratch_dir();
    let single = test_settings(&one_fragment, 1 << 20, 3);
    WordCountJob::new(single.clone())
        .run(&source)
        .await
        .expect("Failed to run job");

    let many_fragments = scratch_dir();
    let chunked = test_settings(&many_fragments, 48, 3);
    WordCountJob::new(chunked.clone())
        .run(&source)
        .await
        .expect("Failed to run job");

    assert_eq!(
        collect_result_counts(&single),
        collect_result_counts(&chunked)
    );
}

#[tokio::test]
async fn the_scenario_text_should_produce_the_expected_counts() {
    let scratch = scratch_dir();
    let settings = test_settings(&scratch, 1 << 20, 1);
    let source = scratch.join("scenario.txt");
    fs::write(&source, "Go Go gopher! 3 3 go.").expect("Failed to write scenario file");

    let report = WordCountJob::new(settings.clone())
        .run(&source)
        .await
        .expect("Failed to run job");
    assert_eq!(report.fragments, 1);
    assert_eq!(report.result_files, 1);

    let counts = collect_result_counts(&settings);
    assert_eq!(counts.len(), 3);
    assert_some_eq!(counts.get("go"), &3);
    assert_some_eq!(counts.get("gopher"), &1);
    assert_some_eq!(counts.get("3"), &2);
}

#[tokio::test]
async fn a_missing_source_file_should_fail_the_run() {
    let scratch = scratch_dir();
    let settings = test_settings(&scratch, 64, 4);

    let result = WordCountJob::new(settings)
        .run(scratch.join("non_existent_file.txt"))
        .await;
    claims::assert_err!(result);
}
