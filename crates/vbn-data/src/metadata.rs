//! Project metadata tables stored as CSV

use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use vbn_core::{DataConfig, SessionId, VbnError, VbnResult};

/// Column holding the session identifier in session-keyed tables
pub const SESSION_ID_COLUMN: &str = "ecephys_session_id";

/// Column holding the unit identifier in the units table
pub const UNIT_ID_COLUMN: &str = "unit_id";

/// The four standard project metadata tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetadataKind {
    Sessions,
    Channels,
    Probes,
    Units,
}

impl MetadataKind {
    pub const ALL: [MetadataKind; 4] = [
        MetadataKind::Sessions,
        MetadataKind::Channels,
        MetadataKind::Probes,
        MetadataKind::Units,
    ];

    /// File stem of the table inside the metadata directory
    pub fn table_name(self) -> &'static str {
        match self {
            MetadataKind::Sessions => "ecephys_sessions",
            MetadataKind::Channels => "channels",
            MetadataKind::Probes => "probes",
            MetadataKind::Units => "units",
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for MetadataKind {
    type Err = VbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sessions" | "ecephys_sessions" => Ok(MetadataKind::Sessions),
            "channels" => Ok(MetadataKind::Channels),
            "probes" => Ok(MetadataKind::Probes),
            "units" => Ok(MetadataKind::Units),
            other => Err(VbnError::ConfigurationError {
                message: format!("Unknown metadata table '{}'", other),
            }),
        }
    }
}

/// In-memory table: a header row plus string records
///
/// Cells stay as text; typed access parses on demand so a bad cell is
/// reported with its row and column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataTable {
    name: String,
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MetadataTable {
    /// Build a table from headers and rows; every row must match the header width
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> VbnResult<Self> {
        let source = PathBuf::from(format!("{}.csv", name));

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(VbnError::MalformedTable {
                path: source,
                reason: format!(
                    "row {} has {} fields, header has {}",
                    index,
                    row.len(),
                    headers.len()
                ),
            });
        }

        Ok(MetadataTable {
            name: name.to_string(),
            source,
            headers,
            rows,
        })
    }

    /// Read a CSV file with a header row
    pub fn read_csv(path: impl AsRef<Path>) -> VbnResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| VbnError::io(path, e))?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| table_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| table_error(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(
            path = %path.display(),
            columns = headers.len(),
            rows = rows.len(),
            "read metadata table"
        );

        Ok(MetadataTable {
            name,
            source: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Write the table as CSV, header first
    pub fn write_csv(&self, path: impl AsRef<Path>) -> VbnResult<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path).map_err(|e| table_error(path, e))?;

        writer
            .write_record(&self.headers)
            .map_err(|e| table_error(path, e))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|e| table_error(path, e))?;
        }
        writer.flush().map_err(|e| VbnError::io(path, e))?;

        tracing::debug!(path = %path.display(), rows = self.rows.len(), "wrote metadata table");
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the table was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Cell at a row and named column
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Raw text of one column
    pub fn column(&self, column: &str) -> VbnResult<Vec<&str>> {
        let index = self.require_column(column)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Parse every cell of a column
    pub fn column_values<T>(&self, column: &str) -> VbnResult<Vec<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let index = self.require_column(column)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                row[index].parse::<T>().map_err(|e| VbnError::MalformedTable {
                    path: self.source.clone(),
                    reason: format!(
                        "row {} column '{}': cannot parse '{}': {}",
                        row_index, column, row[index], e
                    ),
                })
            })
            .collect()
    }

    /// Rows whose `column` equals `value`
    pub fn filter_eq(&self, column: &str, value: &str) -> VbnResult<MetadataTable> {
        let index = self.require_column(column)?;

        Ok(MetadataTable {
            name: self.name.clone(),
            source: self.source.clone(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| row[index] == value)
                .cloned()
                .collect(),
        })
    }

    /// Session identifiers listed in the table
    pub fn session_ids(&self) -> VbnResult<Vec<SessionId>> {
        self.column_values::<SessionId>(SESSION_ID_COLUMN)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> MetadataTable {
        MetadataTable {
            name: self.name.clone(),
            source: self.source.clone(),
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    fn require_column(&self, column: &str) -> VbnResult<usize> {
        self.column_index(column)
            .ok_or_else(|| VbnError::MalformedTable {
                path: self.source.clone(),
                reason: format!("missing column '{}'", column),
            })
    }
}

fn table_error(path: &Path, err: csv::Error) -> VbnError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => VbnError::io(path, source),
        _ => VbnError::MalformedTable {
            path: path.to_path_buf(),
            reason,
        },
    }
}

fn check_table_name(table_name: &str) -> VbnResult<()> {
    let invalid = table_name.is_empty()
        || table_name.contains(['/', '\\'])
        || table_name == "."
        || table_name == "..";

    if invalid {
        return Err(VbnError::ConfigurationError {
            message: format!("Invalid metadata table name '{}'", table_name),
        });
    }
    Ok(())
}

/// Read `<table_name>.csv` from the metadata directory
pub fn get_metadata_table(config: &DataConfig, table_name: &str) -> VbnResult<MetadataTable> {
    check_table_name(table_name)?;
    MetadataTable::read_csv(config.metadata_file(table_name))
}

/// Write a table to `<name>.csv` in the metadata directory
pub fn write_metadata_table(config: &DataConfig, table: &MetadataTable) -> VbnResult<PathBuf> {
    check_table_name(table.name())?;
    std::fs::create_dir_all(&config.metadata_dir)
        .map_err(|e| VbnError::io(&config.metadata_dir, e))?;

    let path = config.metadata_file(table.name());
    table.write_csv(&path)?;
    Ok(path)
}

/// Read one of the standard tables
pub fn get_standard_table(config: &DataConfig, kind: MetadataKind) -> VbnResult<MetadataTable> {
    get_metadata_table(config, kind.table_name())
}

pub fn get_session_table(config: &DataConfig) -> VbnResult<MetadataTable> {
    get_standard_table(config, MetadataKind::Sessions)
}

pub fn get_channels_table(config: &DataConfig) -> VbnResult<MetadataTable> {
    get_standard_table(config, MetadataKind::Channels)
}

pub fn get_probes_table(config: &DataConfig) -> VbnResult<MetadataTable> {
    get_standard_table(config, MetadataKind::Probes)
}

pub fn get_units_table(config: &DataConfig) -> VbnResult<MetadataTable> {
    get_standard_table(config, MetadataKind::Units)
}
