use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::NaiveDateTime;

use crate::timestamp::{parse_timestamp, TimestampError};

/// Meter exports processed when no other file is given
pub const DEFAULT_FILES: [&str; 3] = [
    "KwhConsumptionBlower78_1.csv",
    "KwhConsumptionBlower78_2.csv",
    "KwhConsumptionBlower78_3.csv",
];
pub const DATE_COLUMN: &str = "TxnDate";
pub const TIME_COLUMN: &str = "TxnTime";
pub const CONSUMPTION_COLUMN: &str = "Consumption";

#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    #[error("The following files are missing: {0:?}")]
    MissingFiles(Vec<PathBuf>),
    #[error("failed to read {1:?}")]
    Io(#[source] std::io::Error, PathBuf),
    #[error("failed to parse CSV file {1:?}")]
    Csv(#[source] csv::Error, PathBuf),
    #[error("column {column:?} not found in {path:?}")]
    MissingColumn { column: String, path: PathBuf },
    #[error("invalid consumption {value:?} in {path:?} (line {line})")]
    Consumption {
        value: String,
        path: PathBuf,
        line: u64,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("non-finite consumption {value:?} in {path:?} (line {line})")]
    NonFinite { value: String, path: PathBuf, line: u64 },
    #[error("{0:?} is bzip2 compressed but bzip2 support is not compiled in (enable the `bzip2` feature)")]
    Bzip2Disabled(PathBuf),
    #[error("invalid timestamp in {path:?} (line {line})")]
    Timestamp {
        path: PathBuf,
        line: u64,
        #[source]
        source: TimestampError,
    },
    #[error("no consumption record found in {0:?}")]
    NoRecords(Vec<PathBuf>),
}
type Result<T> = std::result::Result<T, LoaderError>;

/// A single meter reading
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Energy used since the previous reading [kWh]
    pub consumption: f64,
    /// Index of the file the reading comes from
    pub source: usize,
}

/// Meter exports loader
///
/// Every declared file must exist: the loader refuses to read anything
/// if one of them is missing.
#[derive(Debug, Clone)]
pub struct ConsumptionLoader {
    files: Vec<PathBuf>,
    date_column: String,
    time_column: String,
    consumption_column: String,
}
impl Default for ConsumptionLoader {
    fn default() -> Self {
        Self {
            files: DEFAULT_FILES.iter().map(PathBuf::from).collect(),
            date_column: DATE_COLUMN.to_string(),
            time_column: TIME_COLUMN.to_string(),
            consumption_column: CONSUMPTION_COLUMN.to_string(),
        }
    }
}
impl ConsumptionLoader {
    /// Replaces the list of files to load
    pub fn files<I, P>(self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(|f| f.into()).collect(),
            ..self
        }
    }
    /// Prefixes every relative file path with `data_path`
    pub fn data_path<P: AsRef<Path>>(self, data_path: P) -> Self {
        let files = self
            .files
            .iter()
            .map(|f| data_path.as_ref().join(f))
            .collect();
        Self { files, ..self }
    }
    pub fn date_column<S: Into<String>>(self, column: S) -> Self {
        Self {
            date_column: column.into(),
            ..self
        }
    }
    pub fn time_column<S: Into<String>>(self, column: S) -> Self {
        Self {
            time_column: column.into(),
            ..self
        }
    }
    pub fn consumption_column<S: Into<String>>(self, column: S) -> Self {
        Self {
            consumption_column: column.into(),
            ..self
        }
    }
    pub fn file_list(&self) -> &[PathBuf] {
        &self.files
    }
    /// Returns the declared files that cannot be found
    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.files.iter().filter(|f| !f.exists()).cloned().collect()
    }
    #[cfg(feature = "bzip2")]
    fn bunzip(path: &Path, file: File) -> Result<String> {
        let mut contents = String::new();
        let mut bz2 = bzip2::bufread::BzDecoder::new(BufReader::new(file));
        bz2.read_to_string(&mut contents)
            .map_err(|e| LoaderError::Io(e, path.to_path_buf()))?;
        Ok(contents)
    }
    #[cfg(not(feature = "bzip2"))]
    fn bunzip(path: &Path, _file: File) -> Result<String> {
        Err(LoaderError::Bzip2Disabled(path.to_path_buf()))
    }
    /// Reads a whole file, decompressing `.gz` (and `.bz2`) exports on the fly
    fn decompress(path: &Path) -> Result<String> {
        let file = File::open(path).map_err(|e| LoaderError::Io(e, path.to_path_buf()))?;
        log::debug!("Loading {:?}...", path);
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") | Some("z") => {
                let mut contents = String::new();
                let mut gz = flate2::read::GzDecoder::new(file);
                gz.read_to_string(&mut contents)
                    .map_err(|e| LoaderError::Io(e, path.to_path_buf()))?;
                Ok(contents)
            }
            Some("bz2") => Self::bunzip(path, file),
            _ => {
                let mut contents = String::new();
                BufReader::new(file)
                    .read_to_string(&mut contents)
                    .map_err(|e| LoaderError::Io(e, path.to_path_buf()))?;
                Ok(contents)
            }
        }
    }
    fn column_index(&self, headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| LoaderError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            })
    }
    fn load_file(&self, source: usize, path: &Path, readings: &mut Vec<Reading>) -> Result<usize> {
        let contents = Self::decompress(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| LoaderError::Csv(e, path.to_path_buf()))?
            .clone();
        let i_date = self.column_index(&headers, &self.date_column, path)?;
        let i_time = self.column_index(&headers, &self.time_column, path)?;
        let i_kwh = self.column_index(&headers, &self.consumption_column, path)?;

        let n = readings.len();
        for result in rdr.records() {
            let record = result.map_err(|e| LoaderError::Csv(e, path.to_path_buf()))?;
            let line = record.position().map_or(0, |p| p.line());
            let field = |i: usize| record.get(i).unwrap_or_default();
            let timestamp =
                parse_timestamp(field(i_date), field(i_time)).map_err(|source| {
                    LoaderError::Timestamp {
                        path: path.to_path_buf(),
                        line,
                        source,
                    }
                })?;
            let consumption =
                field(i_kwh)
                    .parse::<f64>()
                    .map_err(|source| LoaderError::Consumption {
                        value: field(i_kwh).to_string(),
                        path: path.to_path_buf(),
                        line,
                        source,
                    })?;
            if !consumption.is_finite() {
                return Err(LoaderError::NonFinite {
                    value: field(i_kwh).to_string(),
                    path: path.to_path_buf(),
                    line,
                });
            }
            if consumption < 0. {
                log::warn!(
                    "{:?} (line {}): negative consumption {}",
                    path,
                    line,
                    consumption
                );
            }
            readings.push(Reading {
                timestamp,
                consumption,
                source,
            });
        }
        Ok(readings.len() - n)
    }
    /// Loads and concatenates the readings of all the files
    ///
    /// Readings are returned in file order, then row order.
    pub fn load(self) -> Result<Vec<Reading>> {
        let missing = self.missing_files();
        if !missing.is_empty() {
            return Err(LoaderError::MissingFiles(missing));
        }
        let now = Instant::now();
        let mut readings = vec![];
        for (source, path) in self.files.iter().enumerate() {
            let n = self.load_file(source, path, &mut readings)?;
            log::info!("{:?}: {} readings", path, n);
        }
        if readings.is_empty() {
            return Err(LoaderError::NoRecords(self.files));
        }
        log::info!(
            "... {} readings loaded in {}ms",
            readings.len(),
            now.elapsed().as_millis()
        );
        Ok(readings)
    }
}
