//! Modified-C4.5 import/export.
//!
//! A dataset on disk is a pair of files: `<name>.names` holds the class
//! labels on its first line and one attribute declaration per following
//! line (`continuous`, or `discrete v1 v2 ...`); `<name>.data` holds one
//! space-delimited record per line. Blank lines are skipped in both files.
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::dataset::{DataSet, DataSetInfo, Record};
use crate::data::schema::{AttributeType, RecordSchema};
use crate::Result;

/// Caller-owned cache of imported datasets keyed by path. Repeated imports
/// of the same file pair return the cached dataset; the cache is never
/// invalidated, so it must not outlive the files it mirrors.
#[derive(Debug, Default)]
pub struct DatasetCache {
    loaded: HashMap<PathBuf, Arc<DataSet>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import the dataset named `name` from `dir`, reusing a previously
    /// imported copy when present.
    pub fn import(&mut self, dir: &Path, name: &str) -> Result<Arc<DataSet>> {
        let key = dir.join(name);
        if let Some(data) = self.loaded.get(&key) {
            log::debug!("dataset '{}' served from cache", name);
            return Ok(Arc::clone(data));
        }
        let data = Arc::new(import_dataset(dir, name)?);
        self.loaded.insert(key, Arc::clone(&data));
        Ok(data)
    }
}

/// Import `<dir>/<name>.names` + `<dir>/<name>.data` into a dataset.
pub fn import_dataset(dir: &Path, name: &str) -> Result<DataSet> {
    let stem = dir.join(name);
    let schema = Arc::new(read_schema(&stem.with_extension("names"))?);
    let records = read_records(&stem.with_extension("data"), &schema)?;

    let mut info = DataSetInfo::named(name);
    info.path = stem.to_string_lossy().into_owned();
    info.num_records = records.len();
    info.num_classes = schema.num_labels();
    info.num_continuous = schema
        .attribute_types
        .iter()
        .filter(|t| **t == AttributeType::Continuous)
        .count();
    info.num_nominal = schema.num_attributes() - info.num_continuous;

    let data = DataSet::new(schema, records, info);
    data.log_summary();
    Ok(data)
}

fn read_schema(path: &Path) -> Result<RecordSchema> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());

    // First non-blank line: space-separated class labels.
    let labels: Vec<String> = lines
        .next()
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut attribute_types = Vec::new();
    let mut attribute_values = Vec::new();
    for line in lines {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some(tag) if tag.eq_ignore_ascii_case("continuous") => {
                attribute_types.push(AttributeType::Continuous);
                attribute_values.push(Vec::new());
            }
            _ => {
                attribute_types.push(AttributeType::Discrete);
                attribute_values.push(fields.map(str::to_string).collect());
            }
        }
    }

    Ok(RecordSchema::new(labels, attribute_types, attribute_values))
}

fn read_records(path: &Path, schema: &RecordSchema) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields: Vec<&str> = row.iter().filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        records.push(schema.translate_record(&fields)?);
    }
    Ok(records)
}

/// Write a dataset back to `<dir>/<name>.names` + `<dir>/<name>.data` in
/// the same format `import_dataset` reads.
pub fn export_dataset(data: &DataSet, dir: &Path, name: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let stem = dir.join(name);

    let mut names = fs::File::create(stem.with_extension("names"))?;
    writeln!(names, "{}", data.schema.labels.join(" "))?;
    writeln!(names)?;
    for (ty, values) in data
        .schema
        .attribute_types
        .iter()
        .zip(&data.schema.attribute_values)
    {
        match ty {
            AttributeType::Continuous => writeln!(names, "continuous")?,
            AttributeType::Discrete => writeln!(names, "discrete {}", values.join(" "))?,
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .from_path(stem.with_extension("data"))?;
    for record in &data.records {
        let fields: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, &v)| untranslate(&data.schema, i, v))
            .collect();
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

fn untranslate(schema: &RecordSchema, attribute: usize, value: f64) -> String {
    if attribute == schema.label_index() {
        schema.labels[value as usize].clone()
    } else if schema.attribute_types[attribute] == AttributeType::Discrete {
        schema.attribute_values[attribute][value as usize].clone()
    } else {
        value.to_string()
    }
}
