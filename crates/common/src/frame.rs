/// A single untyped value as delivered by a bar source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Numeric coercion. Text is trimmed and parsed; anything non-finite is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Missing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// Labeled columns as returned by a source, before schema normalization.
///
/// Column lengths are not enforced here; normalization reads row `i` of a
/// short column as `Cell::Missing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    columns: Vec<RawColumn>,
}

impl RawFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_column(&mut self, label: impl Into<String>, cells: Vec<Cell>) {
        self.columns.push(RawColumn {
            label: label.into(),
            cells,
        });
    }

    /// Add a column with a hierarchical label, flattened by joining the
    /// non-empty levels with `_` (`["Close", "GC=F"]` becomes `Close_GC=F`).
    pub fn push_multi_column(&mut self, levels: &[&str], cells: Vec<Cell>) {
        let label = levels
            .iter()
            .filter(|l| !l.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("_");
        self.push_column(label, cells);
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    /// Number of rows, taken as the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}
