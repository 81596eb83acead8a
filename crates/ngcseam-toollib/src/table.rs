//! LinuxCNC tool table generation

use crate::error::{ToolTableError, ToolTableResult};
use crate::library::{LibraryEntry, ToolLibrary};
use crate::pocket::PocketPolicy;
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::path::Path;

/// Default output file name
pub const DEFAULT_TOOL_TABLE: &str = "tool.tbl";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Requested origin of the Z length offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZSourceKind {
    #[default]
    Zero,
    Assembly,
    Value,
}

/// Resolved origin of the Z length offsets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ZSource {
    /// 0.000 for every tool (touch-off workflow)
    #[default]
    Zero,
    /// The library's assembly gauge length, 0 when missing
    Assembly,
    /// The same constant for every tool
    Value(f64),
}

impl ZSource {
    /// Combine the requested source with an optional constant.
    ///
    /// A constant always wins; asking for a constant without one is an error.
    pub fn resolve(kind: ZSourceKind, value: Option<f64>) -> ToolTableResult<Self> {
        match (kind, value) {
            (_, Some(value)) => Ok(Self::Value(value)),
            (ZSourceKind::Value, None) => Err(ToolTableError::MissingZValue),
            (ZSourceKind::Zero, None) => Ok(Self::Zero),
            (ZSourceKind::Assembly, None) => Ok(Self::Assembly),
        }
    }

    fn length_for(&self, entry: &LibraryEntry) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Assembly => entry.assembly_gauge_length().unwrap_or(0.0),
            Self::Value(value) => *value,
        }
    }
}

/// Row ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Tool,
    Pocket,
}

/// Conversion settings
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub z_source: ZSource,
    pub pockets: PocketPolicy,
    pub sort: SortKey,
}

/// One tool table line
#[derive(Debug, Clone, PartialEq)]
pub struct ToolTableRow {
    pub tool: i64,
    pub pocket: i64,
    /// Diameter in mm
    pub diameter: f64,
    /// Length offset in mm
    pub z: f64,
    pub comment: String,
}

impl fmt::Display for ToolTableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = format!(
            "T{:>3}  P{:>3}  D{:.3}  Z{:.3}   ; {}",
            self.tool, self.pocket, self.diameter, self.z, self.comment
        );
        f.write_str(line.trim_end())
    }
}

/// A rendered-ready tool table
#[derive(Debug, Clone)]
pub struct ToolTable {
    /// File name of the library, shown in the header
    pub source_name: String,
    pub generated: NaiveDateTime,
    pub rows: Vec<ToolTableRow>,
    /// Library entries without a tool number
    pub skipped: usize,
}

impl ToolTable {
    /// Build rows from every numbered library entry
    pub fn from_library(
        library: &ToolLibrary,
        source_name: impl Into<String>,
        options: &ConvertOptions,
    ) -> Self {
        let mut rows = Vec::with_capacity(library.data.len());
        let mut skipped = 0;

        for entry in &library.data {
            let Some(tool) = entry.tool_number() else {
                tracing::debug!("Skipping library entry without tool number: {}", entry.tool_type);
                skipped += 1;
                continue;
            };

            rows.push(ToolTableRow {
                tool,
                pocket: options.pockets.pocket_for(tool),
                diameter: entry.diameter(),
                z: options.z_source.length_for(entry),
                comment: entry.comment(),
            });
        }

        match options.sort {
            SortKey::Tool => rows.sort_by_key(|row| row.tool),
            SortKey::Pocket => rows.sort_by_key(|row| row.pocket),
        }

        Self {
            source_name: source_name.into(),
            generated: Local::now().naive_local(),
            rows,
            skipped,
        }
    }

    pub fn with_generated(mut self, generated: NaiveDateTime) -> Self {
        self.generated = generated;
        self
    }

    /// Header lines in front of the rows
    pub fn header(&self) -> Vec<String> {
        vec![
            "; LinuxCNC tool table generated from Fusion 360 library".to_string(),
            format!("; Source: {}", self.source_name),
            format!("; Generated: {}", self.generated.format(TIMESTAMP_FORMAT)),
            "; Fields: T (tool), P (pocket), D (diameter mm), Z (length offset mm)".to_string(),
            "; NOTE: Z may be 0.000 when touchoff is used. Adjust if you measure/probe tool lengths."
                .to_string(),
            format!("; {}", "-".repeat(77)),
        ]
    }

    /// Full table text, newline-terminated
    pub fn render(&self) -> String {
        let mut lines = self.header();
        lines.extend(self.rows.iter().map(ToString::to_string));
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    pub fn write_to(&self, path: &Path) -> ToolTableResult<()> {
        std::fs::write(path, self.render()).map_err(|source| ToolTableError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read a library file
pub fn load_library(path: &Path) -> ToolTableResult<ToolLibrary> {
    let content = std::fs::read_to_string(path).map_err(|source| ToolTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ToolTableError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert the library at `input` into a tool table at `output`
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> ToolTableResult<ToolTable> {
    let library = load_library(input)?;
    let source_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let table = ToolTable::from_library(&library, source_name, options);
    table.write_to(output)?;
    tracing::debug!(
        "Converted {} tool(s), skipped {} from {}",
        table.rows.len(),
        table.skipped,
        input.display()
    );
    Ok(table)
}
