use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use common::{BarRequest, BarSource, Cell, Error, RawFrame, Result};

/// Offline bar source reading `<dir>/<symbol>.csv`.
///
/// Headers become column labels as-is, so exported files with any of the
/// usual naming schemes go through the same normalization as live data.
/// Interval and period are ignored; the file is whatever was exported.
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{symbol}{suffix}.csv"))
    }

    async fn read(&self, path: &Path) -> Result<RawFrame> {
        debug!(path = %path.display(), "Reading bar file");
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::EmptyData(format!("no file at {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        parse_csv(&content)
    }
}

#[async_trait]
impl BarSource for CsvSource {
    async fn download(&self, req: &BarRequest) -> Result<RawFrame> {
        self.read(&self.path_for(&req.symbol, "")).await
    }

    /// Prefers `<symbol>.history.csv`, falling back to the main file.
    async fn history(&self, req: &BarRequest) -> Result<RawFrame> {
        let alt = self.path_for(&req.symbol, ".history");
        if tokio::fs::try_exists(&alt).await.unwrap_or(false) {
            self.read(&alt).await
        } else {
            self.download(req).await
        }
    }
}

/// Parse CSV text into a raw frame. Every cell is kept as text; blank cells
/// are `Missing`. Short rows are tolerated.
pub fn parse_csv(content: &str) -> Result<RawFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| Error::Parse(e.to_string()))?;
        for (i, column) in columns.iter_mut().enumerate() {
            let cell = match record.get(i) {
                Some(v) if !v.is_empty() => Cell::Text(v.to_string()),
                _ => Cell::Missing,
            };
            column.push(cell);
        }
    }

    let mut frame = RawFrame::new();
    for (label, cells) in headers.into_iter().zip(columns) {
        frame.push_column(label, cells);
    }
    Ok(frame)
}
