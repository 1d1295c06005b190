//! src/splitter.rs
use anyhow::Context;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Bytes held back below the nominal chunk size. The carry-over prefixed onto
/// the next fragment stays within this reserve as long as no word is longer
/// than it, which keeps fragments at or under `chunk_size`.
pub const CARRY_OVER_RESERVE: usize = 15;

pub fn map_file_name(map_dir: &Path, id: usize) -> PathBuf {
    map_dir.join(format!("map-{id}"))
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// Splits a source file into sequence-numbered fragment files of bounded
/// size, never ending a fragment mid-word. The trailing word-in-progress of
/// each read is held back and prefixed onto the next fragment, so
/// concatenating the fragments in order reproduces the source exactly.
pub struct Partitioner {
    source: PathBuf,
    map_dir: PathBuf,
    chunk_size: usize,
}

impl Partitioner {
    pub fn new(source: PathBuf, map_dir: PathBuf, chunk_size: usize) -> Self {
        Partitioner {
            source,
            map_dir,
            chunk_size,
        }
    }

    /// Returns the number of fragment files written under the map directory.
    #[tracing::instrument(name = "Split source file", skip(self), fields(source = %self.source.display()))]
    pub fn split(&self) -> Result<usize, anyhow::Error> {
        if self.chunk_size <= CARRY_OVER_RESERVE {
            return Err(anyhow::anyhow!(
                "Chunk size of {} bytes does not exceed the carry-over reserve of {} bytes",
                self.chunk_size,
                CARRY_OVER_RESERVE
            ));
        }
        if !self.source.exists() {
            return Err(anyhow::anyhow!(format!(
                "Input file doesn't exist: {}",
                self.source.display()
            )));
        }

        let mut file = File::open(&self.source).context("Failed to open input file")?;
        let mut buffer = vec![0u8; self.chunk_size - CARRY_OVER_RESERVE];
        let mut carry_over: Vec<u8> = Vec::new();
        let mut fragments = 0usize;

        loop {
            let bytes_read =
                read_chunk(&mut file, &mut buffer).context("Failed to read from input file")?;
            if bytes_read == 0 {
                break;
            }
            let chunk = &buffer[..bytes_read];

            // Position just past the last non-word byte; everything after it
            // is a word still in progress at the chunk edge.
            match chunk.iter().rposition(|byte| !is_word_byte(*byte)) {
                Some(last_delimiter) => {
                    let (body, tail) = chunk.split_at(last_delimiter + 1);
                    self.write_fragment(fragments, &carry_over, body)?;
                    fragments += 1;
                    carry_over.clear();
                    carry_over.extend_from_slice(tail);
                }
                None => {
                    // A single word spans the whole chunk; keep accumulating
                    // it so it still lands whole in one fragment. Fragment
                    // sizes degrade for such inputs, word integrity does not.
                    carry_over.extend_from_slice(chunk);
                }
            }
        }

        if !carry_over.is_empty() {
            self.write_fragment(fragments, &carry_over, &[])?;
            fragments += 1;
        }

        tracing::info!("split {} into {fragments} fragments", self.source.display());
        Ok(fragments)
    }

    // The fragment is fully written before the next read happens.
    fn write_fragment(
        &self,
        id: usize,
        carry_over: &[u8],
        body: &[u8],
    ) -> Result<(), anyhow::Error> {
        let path = map_file_name(&self.map_dir, id);
        let mut out = File::create(&path)
            .with_context(|| format!("Failed to create fragment file at: {}", path.display()))?;
        out.write_all(carry_over)
            .context("Failed to write carry-over to fragment file")?;
        out.write_all(body)
            .context("Failed to write chunk to fragment file")?;
        Ok(())
    }
}

// Read::read may return short; keep going until the buffer is full or the
// input is exhausted, so chunks only come up short at end of file.
fn read_chunk(reader: &mut impl Read, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        let bytes_read = reader.read(&mut buffer[filled..])?;
        if bytes_read == 0 {
            break;
        }
        filled += bytes_read;
    }
    Ok(filled)
}
