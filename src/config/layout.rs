//! Layout matrix: which screens sit next to each other
//!
//! The `[Layout]` section lists rows as `Row_<n> = <key> <key> ...`. Rows are
//! ordered by `<n>`, not by where they appear in the file. A flat list of
//! keys given on the command line replaces the section entirely.

use ini::Properties;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::ini::ROW_PREFIX;
use crate::types::ScreenKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout row '{option}' must be a list of numbers and spaces, got '{value}'")]
    MalformedRow { option: String, value: String },

    #[error("layout row '{option}' has an out-of-range row number")]
    InvalidRowNumber { option: String },

    #[error("layout row '{option}' does not list any screen")]
    EmptyRow { option: String },

    #[error("the [Layout] section does not contain any Row_<n> option")]
    NoRows,

    #[error("a layout must be given on the command line when using --wrap")]
    WrapWithoutLayout,

    #[error("wrap must be a positive integer")]
    ZeroWrap,
}

/// Ordered rows of screen keys, top to bottom, each left to right
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    rows: Vec<Vec<ScreenKey>>,
}

impl Layout {
    pub fn from_rows(rows: Vec<Vec<ScreenKey>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<ScreenKey>] {
        &self.rows
    }

    /// Every referenced key, in layout order (repeats included)
    pub fn keys(&self) -> impl Iterator<Item = ScreenKey> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Build a layout from a flat command-line list
    ///
    /// Returns `None` when no keys were given, meaning the config file's
    /// `[Layout]` section applies. With `wrap`, keys are chunked into rows of
    /// that width and the last row may be shorter.
    pub fn from_command_line(
        keys: &[ScreenKey],
        wrap: Option<usize>,
    ) -> Result<Option<Self>, LayoutError> {
        match wrap {
            Some(0) => Err(LayoutError::ZeroWrap),
            Some(_) if keys.is_empty() => Err(LayoutError::WrapWithoutLayout),
            _ if keys.is_empty() => Ok(None),
            Some(width) => Ok(Some(Self::from_rows(
                keys.chunks(width).map(<[ScreenKey]>::to_vec).collect(),
            ))),
            None => Ok(Some(Self::from_rows(vec![keys.to_vec()]))),
        }
    }

    /// Parse the `[Layout]` section, reporting every bad row
    pub fn parse_section(section: &Properties) -> Result<Self, Vec<LayoutError>> {
        let mut numbered = Vec::new();
        let mut errors = Vec::new();

        for (option, value) in section.iter() {
            let Some(number) = row_number(option) else {
                warn!(option = %option, "Ignoring unknown option in [Layout]");
                continue;
            };
            let Some(number) = number else {
                errors.push(LayoutError::InvalidRowNumber {
                    option: option.to_string(),
                });
                continue;
            };
            match parse_row(option, value) {
                Ok(row) => numbered.push((number, row)),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        if numbered.is_empty() {
            return Err(vec![LayoutError::NoRows]);
        }

        // Stable: rows sharing a number (Row_1, Row_01) keep file order
        numbered.sort_by_key(|(number, _)| *number);
        debug!(rows = numbered.len(), "Parsed layout section");

        Ok(Self::from_rows(numbered.into_iter().map(|(_, row)| row).collect()))
    }
}

/// `Row_<n>` -> `Some(Some(n))`, `Some(None)` when `n` is too large
fn row_number(option: &str) -> Option<Option<u64>> {
    let digits = option.strip_prefix(ROW_PREFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().ok())
}

fn parse_row(option: &str, value: &str) -> Result<Vec<ScreenKey>, LayoutError> {
    let malformed = || LayoutError::MalformedRow {
        option: option.to_string(),
        value: value.to_string(),
    };

    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit() || c == ' ') {
        return Err(malformed());
    }

    let row = value
        .split_whitespace()
        .map(|key| key.parse::<ScreenKey>().map_err(|_| malformed()))
        .collect::<Result<Vec<_>, _>>()?;

    if row.is_empty() {
        return Err(LayoutError::EmptyRow {
            option: option.to_string(),
        });
    }
    Ok(row)
}
