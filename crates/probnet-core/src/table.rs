//! # Tabular Interface
//!
//! Typed rows with optional per-row weights, as consumed by network
//! training. Reading files is the caller's concern; this module only
//! types already-split records.
//!
//! Column types come from an explicit type row or are inferred per column
//! from the cells.

use crate::error::{ProbNetError, Result};
use crate::range::ContinuousKind;
use crate::variant::{ScalarKind, Variant, parse_timestamp, scan_bool};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// COLUMN TYPES
// =============================================================================

/// Declared type of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Bool,
    Char,
    Int,
    UInt,
    Float,
    Text,
    Date,
    Gaussian,
    Exponential,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Text => "string",
            Self::Date => "date",
            Self::Gaussian => "gaussian",
            Self::Exponential => "exponential",
        }
    }

    /// Kind of the values stored in the column.
    pub fn scalar_kind(self) -> ScalarKind {
        match self {
            Self::Bool => ScalarKind::Bool,
            Self::Char => ScalarKind::Char,
            Self::Int => ScalarKind::Int,
            Self::UInt => ScalarKind::UInt,
            Self::Float | Self::Gaussian | Self::Exponential => ScalarKind::Float,
            Self::Text => ScalarKind::Text,
            Self::Date => ScalarKind::Timestamp,
        }
    }

    /// Continuous family a node over this column gets when trained as
    /// continuous.
    pub fn continuous_kind(self) -> Option<ContinuousKind> {
        match self {
            Self::Float => Some(ContinuousKind::FloatUniform),
            Self::Gaussian => Some(ContinuousKind::Gaussian),
            Self::Exponential => Some(ContinuousKind::Exponential),
            _ => None,
        }
    }
}

impl FromStr for ColumnType {
    type Err = ProbNetError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let column_type = match lowered.as_str() {
            "b" | "bool" | "boolean" | "truefalse" => Self::Bool,
            "c" | "char" | "character" | "letter" => Self::Char,
            "i" | "int" | "integer" => Self::Int,
            "u" | "uint" | "unsigned" | "ordinal" => Self::UInt,
            "f" | "float" | "real" | "floating point" => Self::Float,
            "d" | "date" => Self::Date,
            "s" | "string" | "text" => Self::Text,
            "e" | "exp" | "exponential" => Self::Exponential,
            "g" | "gauss" | "gaussian" | "bell" | "normal" => Self::Gaussian,
            _ => {
                return Err(ProbNetError::Table(format!("unknown column type '{s}'")));
            }
        };
        Ok(column_type)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// INFERENCE
// =============================================================================

/// Most specific type a single cell reads as.
pub fn classify_cell(cell: &str) -> ColumnType {
    let cell = cell.trim();
    let digits = cell.strip_prefix(['-', '+']).unwrap_or(cell);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return if cell.starts_with('-') {
            ColumnType::Int
        } else {
            ColumnType::UInt
        };
    }
    if cell.contains(['.', 'e', 'E']) && cell.parse::<f64>().is_ok_and(f64::is_finite) {
        return ColumnType::Float;
    }
    if parse_timestamp(cell).is_some() {
        return ColumnType::Date;
    }
    if scan_bool(cell).is_ok() {
        return ColumnType::Bool;
    }
    if cell.chars().count() == 1 {
        return ColumnType::Char;
    }
    ColumnType::Text
}

/// Unify the cell classes of one column.
///
/// A single class wins outright. Mixed columns become `bool` when every
/// cell is a boolean literal, `int` for signed and unsigned integers,
/// `float` for any other numeric mix, and `string` otherwise.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let cells: Vec<&str> = cells.into_iter().collect();
    let classes: BTreeSet<ColumnType> = cells.iter().map(|c| classify_cell(c)).collect();
    if classes.len() == 1
        && let Some(only) = classes.first()
    {
        return *only;
    }
    if classes.is_empty() {
        return ColumnType::Text;
    }
    if cells.iter().all(|c| scan_bool(c).is_ok()) {
        return ColumnType::Bool;
    }
    let integral = [ColumnType::Int, ColumnType::UInt];
    if classes.iter().all(|c| integral.contains(c)) {
        return ColumnType::Int;
    }
    if classes
        .iter()
        .all(|c| integral.contains(c) || *c == ColumnType::Float)
    {
        return ColumnType::Float;
    }
    ColumnType::Text
}

// =============================================================================
// TABLE
// =============================================================================

/// Layout of delimited text handed to [`Table::parse_delimited`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub delimiter: char,
    pub has_header: bool,
    pub has_types: bool,
    pub has_probability_column: bool,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
            has_types: false,
            has_probability_column: false,
        }
    }
}

/// Typed rows with one weight per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    header: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Variant>>,
    weights: Vec<f64>,
}

impl Table {
    /// Type raw records.
    ///
    /// With `has_probability_column` the last cell of each record is the
    /// row weight; a header or type row may name that column too, in which
    /// case its last entry is dropped. Missing headers become
    /// `Column0..ColumnN-1`; missing types are inferred per column.
    pub fn from_records(
        header: Option<Vec<String>>,
        types: Option<Vec<ColumnType>>,
        records: Vec<Vec<String>>,
        has_probability_column: bool,
    ) -> Result<Self> {
        let extra = usize::from(has_probability_column);
        let record_width = records
            .first()
            .map(Vec::len)
            .or_else(|| header.as_ref().map(|h| h.len() + extra))
            .or_else(|| types.as_ref().map(|t| t.len() + extra))
            .unwrap_or(0);
        if record_width <= extra {
            return Err(ProbNetError::Table("table has no data columns".to_owned()));
        }
        let width = record_width - extra;
        if let Some((i, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != record_width)
        {
            return Err(ProbNetError::Table(format!(
                "row {i} has {} cells, expected {record_width}",
                record.len()
            )));
        }

        let header = match header {
            Some(names) => fit_width(names, width, extra, "header")?,
            None => (0..width).map(|i| format!("Column{i}")).collect(),
        };
        if let Some(duplicate) = first_duplicate(&header) {
            return Err(ProbNetError::Table(format!(
                "column '{duplicate}' appears twice"
            )));
        }
        let types = match types {
            Some(types) => fit_width(types, width, extra, "type row")?,
            None => (0..width)
                .map(|col| infer_column_type(records.iter().map(|r| r[col].as_str())))
                .collect(),
        };

        let mut rows = Vec::with_capacity(records.len());
        let mut weights = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(width);
            for (col, cell) in record.iter().take(width).enumerate() {
                let value = Variant::scan(cell, types[col].scalar_kind()).map_err(|err| {
                    ProbNetError::Table(format!("row {i}, column '{}': {err}", header[col]))
                })?;
                row.push(value);
            }
            let weight = if has_probability_column {
                let cell = record[width].trim();
                cell.parse::<f64>().map_err(|_| {
                    ProbNetError::Table(format!("row {i}: weight '{cell}' is not a number"))
                })?
            } else {
                1.0
            };
            rows.push(row);
            weights.push(weight);
        }

        Ok(Self {
            header,
            types,
            rows,
            weights,
        })
    }

    /// Split delimited text into records and type them.
    ///
    /// Blank lines and lines starting with `#` are skipped. Cells are
    /// trimmed; quoting is not supported.
    pub fn parse_delimited(text: &str, layout: &TableLayout) -> Result<Self> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                line.split(layout.delimiter)
                    .map(|cell| cell.trim().to_owned())
                    .collect::<Vec<String>>()
            });
        let header = if layout.has_header {
            Some(
                lines
                    .next()
                    .ok_or_else(|| ProbNetError::Table("missing header row".to_owned()))?,
            )
        } else {
            None
        };
        let types = if layout.has_types {
            let row = lines
                .next()
                .ok_or_else(|| ProbNetError::Table("missing type row".to_owned()))?;
            Some(
                row.iter()
                    .map(|t| t.parse::<ColumnType>())
                    .collect::<Result<Vec<_>>>()?,
            )
        } else {
            None
        };
        Self::from_records(header, types, lines.collect(), layout.has_probability_column)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Vec<Variant>] {
        &self.rows
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|i| self.types[i])
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Variant> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// Accept `width` entries, or `width + extra` with the trailing ones
/// naming the probability column.
fn fit_width<T>(mut entries: Vec<T>, width: usize, extra: usize, what: &str) -> Result<Vec<T>> {
    if entries.len() == width + extra {
        entries.truncate(width);
    }
    if entries.len() != width {
        return Err(ProbNetError::Table(format!(
            "{what} has {} entries, expected {width}",
            entries.len()
        )));
    }
    Ok(entries)
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = BTreeSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
            .collect()
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!("Boolean".parse::<ColumnType>().expect("bool"), ColumnType::Bool);
        assert_eq!("LETTER".parse::<ColumnType>().expect("char"), ColumnType::Char);
        assert_eq!("ordinal".parse::<ColumnType>().expect("uint"), ColumnType::UInt);
        assert_eq!(
            "Floating Point".parse::<ColumnType>().expect("float"),
            ColumnType::Float
        );
        assert_eq!("bell".parse::<ColumnType>().expect("gauss"), ColumnType::Gaussian);
        assert_eq!("exp".parse::<ColumnType>().expect("exp"), ColumnType::Exponential);
        assert_eq!("text".parse::<ColumnType>().expect("text"), ColumnType::Text);
        assert!("complex".parse::<ColumnType>().is_err());
    }

    #[test]
    fn cells_classify_in_order() {
        assert_eq!(classify_cell("42"), ColumnType::UInt);
        assert_eq!(classify_cell("-42"), ColumnType::Int);
        assert_eq!(classify_cell("4.2"), ColumnType::Float);
        assert_eq!(classify_cell("1e3"), ColumnType::Float);
        assert_eq!(classify_cell("2024-02-29"), ColumnType::Date);
        assert_eq!(classify_cell("yes"), ColumnType::Bool);
        assert_eq!(classify_cell("x"), ColumnType::Char);
        assert_eq!(classify_cell("heavy"), ColumnType::Text);
    }

    #[test]
    fn mixed_columns_unify() {
        assert_eq!(infer_column_type(["1", "-2"]), ColumnType::Int);
        assert_eq!(infer_column_type(["1", "2.5"]), ColumnType::Float);
        assert_eq!(infer_column_type(["true", "0", "no"]), ColumnType::Bool);
        assert_eq!(infer_column_type(["heavy", "1"]), ColumnType::Text);
    }

    #[test]
    fn missing_header_is_generated() {
        let table = Table::from_records(None, None, records(&[&["1", "a"], &["2", "b"]]), false)
            .expect("table");
        assert_eq!(table.header(), ["Column0", "Column1"]);
        assert_eq!(table.types(), [ColumnType::UInt, ColumnType::Char]);
        assert_eq!(table.weights(), [1.0, 1.0]);
    }

    #[test]
    fn probability_column_becomes_weights() {
        let header = vec!["Cloud".to_owned(), "Rain".to_owned(), "p".to_owned()];
        let table = Table::from_records(
            Some(header),
            Some(vec![ColumnType::Text, ColumnType::Text]),
            records(&[&["yes", "heavy", "0.999"], &["no", "none", "0.5"]]),
            true,
        )
        .expect("table");
        assert_eq!(table.header(), ["Cloud", "Rain"]);
        assert_eq!(table.weights(), [0.999, 0.5]);
        assert_eq!(table.rows()[0][1], Variant::from("heavy"));
    }

    #[test]
    fn ragged_rows_and_bad_cells_fail() {
        let ragged = Table::from_records(None, None, records(&[&["1", "2"], &["3"]]), false);
        assert!(matches!(ragged, Err(ProbNetError::Table(_))));

        let bad = Table::from_records(
            None,
            Some(vec![ColumnType::Int]),
            records(&[&["1"], &["one"]]),
            false,
        );
        assert!(matches!(bad, Err(ProbNetError::Table(_))));
    }

    #[test]
    fn delimited_text_with_type_row() {
        let text = "# sprinkler\nCloud;Sprinkler;w\nstring;int;float\nyes;3;0.999\n\nno;2;0.001\n";
        let layout = TableLayout {
            delimiter: ';',
            has_header: true,
            has_types: true,
            has_probability_column: true,
        };
        let table = Table::parse_delimited(text, &layout).expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_type("Sprinkler"), Some(ColumnType::Int));
        assert_eq!(table.rows()[1][1], Variant::Int(2));
        assert_eq!(table.weights(), [0.999, 0.001]);
    }
}
