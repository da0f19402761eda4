//! Series text reader.
//!
//! Accepts one observation per line, or delimited rows with the value in one
//! column. A first line whose value field is not numeric is a header. Blank
//! lines and missing-value tokens become gaps that are forward-filled from
//! the previous observation; leading gaps are dropped.

use std::fs;
use std::path::Path;

use augur_series::Series;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::IoError;

/// Which field of a delimited row holds the observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Column {
    /// The last field (a single-column file is its own last field).
    #[default]
    Last,
    /// Zero-based field index.
    Index(usize),
    /// Field named in the header row.
    Name(String),
}

/// Configuration for [`read_series`].
///
/// # Example
///
/// ```
/// use augur_io::{Column, ReaderConfig};
///
/// let config = ReaderConfig::default()
///     .with_delimiter(Some(','))
///     .with_column(Column::Name("value".into()));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field separator; `None` detects comma, then tab, then whitespace
    /// from the first non-blank line.
    delimiter: Option<char>,
    /// Field holding the observation.
    column: Column,
    /// Tokens read as missing values (compared case-insensitively).
    missing: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            column: Column::Last,
            missing: vec!["nan".into(), "na".into(), "null".into()],
        }
    }
}

impl ReaderConfig {
    /// Set the field separator, or `None` to detect it from the file.
    /// A space separates fields on runs of whitespace.
    pub fn with_delimiter(mut self, delimiter: Option<char>) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the field holding the observation.
    pub fn with_column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    /// Replace the missing-value tokens.
    pub fn with_missing_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the field separator.
    pub fn delimiter(&self) -> Option<char> {
        self.delimiter
    }

    /// Returns the value column.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Returns the missing-value tokens.
    pub fn missing_tokens(&self) -> &[String] {
        &self.missing
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidConfig`] if the delimiter is not a single
    /// ASCII byte, could appear in a number, or the column name is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        if let Some(d) = self.delimiter {
            if !d.is_ascii() {
                return Err(IoError::InvalidConfig {
                    reason: format!("delimiter {d:?} is not a single ASCII byte"),
                });
            }
            if d.is_ascii_alphanumeric() || matches!(d, '.' | '-' | '+') {
                return Err(IoError::InvalidConfig {
                    reason: format!("delimiter {d:?} can occur inside a number"),
                });
            }
        }
        if let Column::Name(name) = &self.column
            && name.trim().is_empty()
        {
            return Err(IoError::InvalidConfig {
                reason: "column name is empty".to_string(),
            });
        }
        Ok(())
    }

    fn is_missing(&self, token: &str) -> bool {
        token.is_empty() || self.missing.iter().any(|m| m.eq_ignore_ascii_case(token))
    }
}

/// Read a series from a text file.
///
/// # Errors
///
/// [`IoError::FileNotFound`] / [`IoError::Io`] on filesystem failures, plus
/// every error of [`parse_series`].
pub fn read_series(path: &Path, config: &ReaderConfig) -> Result<Series, IoError> {
    config.validate()?;
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    let series = parse_series(&text, config)?;
    info!(path = %path.display(), n = series.len(), "read series");
    Ok(series)
}

/// Field separator resolved for one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Byte(u8),
    /// Runs of spaces; empty fields between them are dropped.
    Whitespace,
}

impl Separator {
    fn resolve(config: &ReaderConfig, text: &str) -> Self {
        match config.delimiter {
            Some(' ') => Separator::Whitespace,
            // validate() guarantees an ASCII delimiter.
            Some(d) => Separator::Byte(d as u8),
            None => {
                let first = text.lines().map(str::trim).find(|l| !l.is_empty());
                match first {
                    Some(l) if l.contains(',') => Separator::Byte(b','),
                    Some(l) if l.contains('\t') => Separator::Byte(b'\t'),
                    _ => Separator::Whitespace,
                }
            }
        }
    }

    fn byte(self) -> u8 {
        match self {
            Separator::Byte(b) => b,
            Separator::Whitespace => b' ',
        }
    }
}

/// Parse series text already in memory.
///
/// # Errors
///
/// [`IoError::Parse`] for a non-numeric value or a missing column,
/// [`IoError::Series`] when no observation remains.
pub fn parse_series(text: &str, config: &ReaderConfig) -> Result<Series, IoError> {
    config.validate()?;
    let separator = Separator::resolve(config, text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(separator.byte())
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut index = match &config.column {
        Column::Index(i) => Some(*i),
        Column::Last | Column::Name(_) => None,
    };
    let mut values = Vec::new();
    let mut seen_content = false;
    let mut last_line: Option<u64> = None;
    let mut record = StringRecord::new();

    while reader.read_record(&mut record).map_err(csv_error)? {
        let line_no = record.position().map_or(0, |p| p.line());
        // The reader skips blank lines; each skipped line is a gap.
        if let Some(prev) = last_line {
            values.extend((prev + 1..line_no).map(|_| f64::NAN));
        }
        last_line = Some(line_no);
        let line = line_no as usize;

        let fields: Vec<&str> = record
            .iter()
            .filter(|f| separator != Separator::Whitespace || !f.is_empty())
            .collect();
        if fields.iter().all(|f| f.is_empty()) {
            if seen_content {
                values.push(f64::NAN);
            }
            continue;
        }

        if !seen_content {
            seen_content = true;
            if let Column::Name(name) = &config.column {
                let pos = fields.iter().position(|f| f == name).ok_or_else(|| {
                    IoError::Parse {
                        line,
                        reason: format!("header has no column named {name:?}"),
                    }
                })?;
                index = Some(pos);
                debug!(column = %name, index = pos, "header row");
                continue;
            }
            let token = pick(&fields, index, line)?;
            if !config.is_missing(token) && token.parse::<f64>().is_err() {
                debug!(line, "skipping header row");
                continue;
            }
        }

        let token = pick(&fields, index, line)?;
        if config.is_missing(token) {
            values.push(f64::NAN);
            continue;
        }
        let v: f64 = token.parse().map_err(|e| IoError::Parse {
            line,
            reason: format!("{token:?}: {e}"),
        })?;
        values.push(if v.is_finite() { v } else { f64::NAN });
    }

    Ok(Series::forward_filled(&values)?)
}

fn csv_error(e: csv::Error) -> IoError {
    IoError::Parse {
        line: e.position().map_or(0, |p| p.line() as usize),
        reason: e.to_string(),
    }
}

fn pick<'a>(fields: &[&'a str], index: Option<usize>, line: usize) -> Result<&'a str, IoError> {
    let field = match index {
        Some(i) => fields.get(i),
        None => fields.last(),
    };
    field.copied().ok_or_else(|| IoError::Parse {
        line,
        reason: format!(
            "row has {} field(s), column {} requested",
            fields.len(),
            index.unwrap_or(0)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<f64> {
        parse_series(text, &ReaderConfig::default())
            .unwrap()
            .into_values()
    }

    #[test]
    fn one_value_per_line() {
        assert_eq!(parse("1.5\n2\n-3e1\n"), vec![1.5, 2.0, -30.0]);
    }

    #[test]
    fn header_is_skipped() {
        assert_eq!(parse("value\n1\n2\n"), vec![1.0, 2.0]);
    }

    #[test]
    fn last_column_of_csv() {
        assert_eq!(
            parse("timestamp,value\n100,1.0\n200,2.0\n300,4.0\n"),
            vec![1.0, 2.0, 4.0]
        );
    }

    #[test]
    fn named_column() {
        let config = ReaderConfig::default().with_column(Column::Name("value".into()));
        let s = parse_series("value,timestamp\n1.0,100\n2.0,200\n", &config).unwrap();
        assert_eq!(s.values(), &[1.0, 2.0]);

        let config = ReaderConfig::default().with_column(Column::Name("missing".into()));
        assert!(matches!(
            parse_series("a,b\n1,2\n", &config),
            Err(IoError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn indexed_column_with_whitespace() {
        let config = ReaderConfig::default().with_column(Column::Index(1));
        let s = parse_series("t v\n0   5.0\n1   6.0\n", &config).unwrap();
        assert_eq!(s.values(), &[5.0, 6.0]);

        assert!(matches!(
            parse_series("1\n2\n", &config),
            Err(IoError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn gaps_are_forward_filled() {
        assert_eq!(parse("1\n\nNaN\n4\nNA\n"), vec![1.0, 1.0, 1.0, 4.0, 4.0]);
    }

    #[test]
    fn leading_gaps_and_trailing_blanks_dropped() {
        assert_eq!(parse("\nna\n3\n4\n\n\n"), vec![3.0, 4.0]);
    }

    #[test]
    fn bad_value_reports_line() {
        let err = parse_series("1\n2\nabc\n", &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn all_missing_is_series_error() {
        assert!(matches!(
            parse_series("nan\nnan\n", &ReaderConfig::default()),
            Err(IoError::Series(_))
        ));
        assert!(matches!(
            parse_series("", &ReaderConfig::default()),
            Err(IoError::Series(_))
        ));
    }

    #[test]
    fn validate_rejects_numeric_delimiter() {
        assert!(matches!(
            ReaderConfig::default().with_delimiter(Some('.')).validate(),
            Err(IoError::InvalidConfig { .. })
        ));
        assert!(matches!(
            ReaderConfig::default()
                .with_column(Column::Name(" ".into()))
                .validate(),
            Err(IoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        assert_eq!(
            parse("date,value\n\"Jan 1, 2020\",1.5\n\"Jan 2, 2020\",2.5\n"),
            vec![1.5, 2.5]
        );
    }

    #[test]
    fn explicit_semicolon_delimiter() {
        let config = ReaderConfig::default()
            .with_delimiter(Some(';'))
            .with_column(Column::Index(0));
        let s = parse_series("v;x\n1,5;y\n", &config);
        // A comma is not a decimal separator.
        assert!(matches!(s, Err(IoError::Parse { line: 2, .. })), "{s:?}");

        let s = parse_series("1.5;x\n;y\n2.5;z\n", &config).unwrap();
        assert_eq!(s.values(), &[1.5, 1.5, 2.5]);
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        assert!(matches!(
            ReaderConfig::default().with_delimiter(Some('§')).validate(),
            Err(IoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn custom_missing_tokens() {
        let config = ReaderConfig::default().with_missing_tokens(["-999"]);
        let s = parse_series("1\n-999\n3\n", &config).unwrap();
        assert_eq!(s.values(), &[1.0, 1.0, 3.0]);
    }
}
