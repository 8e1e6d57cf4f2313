use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::features::{self, ANALYSIS_FEATURES};
use crate::models::{Batch, StudentRecord};

pub fn read_batch(csv_path: &Path) -> anyhow::Result<Batch> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("could not read CSV {}", csv_path.display()))?;
    read_batch_from(file)
}

/// Parses a student CSV. Column presence is checked before any row is read.
pub fn read_batch_from<R: Read>(source: R) -> anyhow::Result<Batch> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let missing = features::missing_columns(&columns, &ANALYSIS_FEATURES);
    if !missing.is_empty() {
        return Err(AnalysisError::Schema { missing }.into());
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<StudentRecord>() {
        records.push(result.context("malformed student row")?);
    }

    let batch = Batch::new(columns, records);
    features::validate(&batch, &ANALYSIS_FEATURES)?;
    Ok(batch)
}

pub fn sample_records() -> Vec<StudentRecord> {
    vec![
        StudentRecord {
            student_id: 5000,
            avg_score: 85.5,
            avg_time_spent: 12.5,
            chapter_retries: 2,
        },
        StudentRecord {
            student_id: 5001,
            avg_score: 72.3,
            avg_time_spent: 8.3,
            chapter_retries: 3,
        },
        StudentRecord {
            student_id: 5002,
            avg_score: 45.8,
            avg_time_spent: 5.2,
            chapter_retries: 8,
        },
    ]
}

pub fn write_sample_csv(out: &Path) -> anyhow::Result<usize> {
    ensure_parent(out)?;
    let mut writer = csv::Writer::from_path(out)
        .with_context(|| format!("could not create {}", out.display()))?;
    let records = sample_records();
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(records.len())
}

pub fn write_json<T: Serialize>(out: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    write_text(out, &body)
}

pub fn write_text(out: &Path, body: &str) -> anyhow::Result<()> {
    ensure_parent(out)?;
    std::fs::write(out, body).with_context(|| format!("could not write {}", out.display()))
}

fn ensure_parent(out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    Ok(())
}
