//! Reading and writing task dumps on disk.
//!
//! A dump is any JSON payload the normalizer understands. Paths ending in
//! `.br` are Brotli-compressed (e.g. `tasks.json.br`).

use crate::normalize::normalize_payload;
use crate::task::TaskRecord;
use anyhow::{Context, Result};
use brotli::enc::BrotliEncoderParams;
use brotli::{CompressorWriter, Decompressor};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "br")
}

/// Reads and normalizes the task records stored at `path`.
pub fn read_task_file(path: &Path) -> Result<Vec<TaskRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let reader: Box<dyn Read> = if is_compressed(path) {
        Box::new(BufReader::new(Decompressor::new(file, 4096)))
    } else {
        Box::new(BufReader::new(file))
    };

    let payload: Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;

    let records = normalize_payload(payload);
    tracing::info!(path = %path.display(), count = records.len(), "loaded task dump");
    Ok(records)
}

/// Writes `records` as `{"tasks": [...]}`.
pub fn write_task_file(path: &Path, records: &[TaskRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    let mut writer: Box<dyn Write> = if is_compressed(path) {
        let params = BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        };
        Box::new(CompressorWriter::with_params(BufWriter::new(file), 4096, &params))
    } else {
        Box::new(BufWriter::new(file))
    };

    let tasks: Vec<Value> = records.iter().map(TaskRecord::to_json).collect();
    serde_json::to_writer(&mut writer, &json!({ "tasks": tasks }))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
