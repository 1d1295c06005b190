//! src/configuration.rs
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    pub split: SplitSettings,
    pub pipeline: PipelineSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct StorageSettings {
    pub map_dir: PathBuf,
    pub result_dir: PathBuf,
}

#[derive(serde::Deserialize, Clone)]
pub struct SplitSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub chunk_size: usize,
}

#[derive(serde::Deserialize, Clone)]
pub struct PipelineSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reduce_jobs: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub map_buffer: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reduce_buffer: usize,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory.");
    let config_dir = base_path.join("configuration");

    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("pipeline.yaml")))
        .add_source(
            config::Environment::with_prefix("WORDCOUNT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
