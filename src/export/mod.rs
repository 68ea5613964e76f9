//! JSON and CSV export of a selected record
//!
//! Only the first selected item is exported. Blank names and zero
//! populations are written as `"Unknown"`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use serde::Serialize;

use crate::error::{PopulationError, Result};
use crate::models::{CountryAggregate, PopulationRecord};
use crate::view::display_population;

const UNKNOWN: &str = "Unknown";

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON object
    Json,
    /// Header line plus one row
    Csv,
}

impl ExportFormat {
    /// File extension without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// MIME type of the document
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format {other:?}; expected json or csv")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A record selected in one of the two views
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    /// Row from the city view
    City(&'a PopulationRecord),
    /// Row from the country view
    Country(&'a CountryAggregate),
}

/// A generated file, ready to be written or offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Suggested file name
    pub file_name: String,
    /// MIME type
    pub mime_type: &'static str,
    /// File content
    pub content: String,
}

impl ExportDocument {
    /// Write the document into `dir` under its file name
    ///
    /// Only the final component of `file_name` is used, so the file always
    /// lands directly inside `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let name = Path::new(&self.file_name).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file name: {:?}", self.file_name),
            )
        })?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(name);
        std::fs::write(&path, &self.content)?;
        info!("Wrote {} ({} bytes)", path.display(), self.content.len());
        Ok(path)
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Field {
    Count(u64),
    Text(String),
}

impl Field {
    fn text(value: &str) -> Self {
        if value.trim().is_empty() {
            Self::Text(UNKNOWN.to_string())
        } else {
            Self::Text(value.to_string())
        }
    }

    fn count(value: u64) -> Self {
        if value == 0 {
            Self::Text(UNKNOWN.to_string())
        } else {
            Self::Count(value)
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Serialize)]
struct CityExport {
    city: Field,
    country: Field,
    population: Field,
}

#[derive(Debug, Serialize)]
struct CountryExport {
    name: Field,
    population: Field,
}

/// File name stem for a display name
///
/// Path separators, reserved characters and control characters become `_`,
/// leading dots are dropped.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_start_matches('.').trim();
    if stem.is_empty() {
        UNKNOWN.to_string()
    } else {
        stem.to_string()
    }
}

/// Export the first item of `selection` in `format`
pub fn export_selection(
    selection: &[Selection<'_>],
    format: ExportFormat,
) -> Result<ExportDocument> {
    let first = selection.first().ok_or(PopulationError::EmptySelection)?;

    let (stem, content) = match *first {
        Selection::City(record) => {
            let row = CityExport {
                city: Field::text(&record.city),
                country: Field::text(&record.country),
                population: Field::count(display_population(record.headline_population())),
            };
            let content = match format {
                ExportFormat::Json => serde_json::to_string_pretty(&row)?,
                ExportFormat::Csv => to_csv(
                    &["City", "Country", "Population"],
                    &[&row.city, &row.country, &row.population],
                )?,
            };
            (row.country.to_string(), content)
        }
        Selection::Country(country) => {
            let row = CountryExport {
                name: Field::text(&country.name),
                population: Field::count(country.population),
            };
            let content = match format {
                ExportFormat::Json => serde_json::to_string_pretty(&row)?,
                ExportFormat::Csv => {
                    to_csv(&["Name", "Population"], &[&row.name, &row.population])?
                }
            };
            (row.name.to_string(), content)
        }
    };

    Ok(ExportDocument {
        file_name: format!("{}_data.{}", file_stem(&stem), format.extension()),
        mime_type: format.mime_type(),
        content,
    })
}

fn to_csv(header: &[&str], row: &[&Field]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    writer.write_record(row.iter().map(ToString::to_string))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| PopulationError::Io(e.into_error()))?;
    let mut content = String::from_utf8(bytes)
        .map_err(|e| PopulationError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}
