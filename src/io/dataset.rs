//! Dataset loading.
//!
//! The four source files are plain CSVs whose first row is a header. We keep
//! each data row as an ordered list of string fields; column meaning is
//! resolved later by the monthly extractors, which know the fixed layouts.
//!
//! `Datasets` is an explicitly owned handle: callers load it once, pass it by
//! reference to the series builder, and `refresh` it when the files change.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::DatasetKind;
use crate::error::{AppError, DataError};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "CSI_DATA_DIR";

/// One data row: fields in file order.
pub type RawRow = Vec<String>;

/// Where the four dataset files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub dir: PathBuf,
}

impl DatasetPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the data directory: explicit value, else `CSI_DATA_DIR`
    /// (from the environment or `.env`), else the working directory.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(dir) = explicit {
            return Self::new(dir);
        }
        dotenvy::dotenv().ok();
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir.trim()),
            _ => Self::new("."),
        }
    }

    pub fn path(&self, kind: DatasetKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Fail early (exit code 2) when any dataset file is missing.
    pub fn ensure_exist(&self) -> Result<(), AppError> {
        let missing: Vec<String> = DatasetKind::ALL
            .iter()
            .map(|&k| self.path(k))
            .filter(|p| !p.is_file())
            .map(|p| p.display().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::new(
                2,
                format!(
                    "Missing dataset file(s): {}. Set --data-dir or {DATA_DIR_ENV}.",
                    missing.join(", ")
                ),
            ))
        }
    }
}

/// The four raw row collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub covid: Vec<RawRow>,
    pub unemployment: Vec<RawRow>,
    pub baskets: Vec<RawRow>,
    pub cpi: Vec<RawRow>,
    source: Option<DatasetPaths>,
}

impl Datasets {
    /// Build a handle from rows already in memory (no backing files).
    pub fn from_rows(
        covid: Vec<RawRow>,
        unemployment: Vec<RawRow>,
        baskets: Vec<RawRow>,
        cpi: Vec<RawRow>,
    ) -> Self {
        Self {
            covid,
            unemployment,
            baskets,
            cpi,
            source: None,
        }
    }

    /// Read all four dataset files.
    pub fn load(paths: &DatasetPaths) -> Result<Self, DataError> {
        let datasets = Self {
            covid: read_rows(DatasetKind::Covid, &paths.path(DatasetKind::Covid))?,
            unemployment: read_rows(
                DatasetKind::Unemployment,
                &paths.path(DatasetKind::Unemployment),
            )?,
            baskets: read_rows(DatasetKind::Baskets, &paths.path(DatasetKind::Baskets))?,
            cpi: read_rows(DatasetKind::Cpi, &paths.path(DatasetKind::Cpi))?,
            source: Some(paths.clone()),
        };
        info!(
            dir = %paths.dir.display(),
            covid = datasets.covid.len(),
            unemployment = datasets.unemployment.len(),
            baskets = datasets.baskets.len(),
            cpi = datasets.cpi.len(),
            "loaded datasets"
        );
        Ok(datasets)
    }

    /// Re-read the backing files. In-memory handles are left untouched.
    pub fn refresh(&mut self) -> Result<(), DataError> {
        let Some(paths) = self.source.clone() else {
            debug!("refresh skipped: dataset handle has no backing files");
            return Ok(());
        };
        *self = Self::load(&paths)?;
        Ok(())
    }

    pub fn source(&self) -> Option<&DatasetPaths> {
        self.source.as_ref()
    }

    pub fn rows(&self, kind: DatasetKind) -> &[RawRow] {
        match kind {
            DatasetKind::Covid => &self.covid,
            DatasetKind::Unemployment => &self.unemployment,
            DatasetKind::Baskets => &self.baskets,
            DatasetKind::Cpi => &self.cpi,
        }
    }
}

/// Read a CSV file, dropping its header row.
pub fn read_rows(kind: DatasetKind, path: &Path) -> Result<Vec<RawRow>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        dataset: kind,
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| DataError::Csv {
            dataset: kind,
            path: path.display().to_string(),
            source,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(dataset = %kind, rows = rows.len(), path = %path.display(), "read dataset");
    Ok(rows)
}
