//! Spreadsheet surface boundary.
//!
//! The assistant core never owns a spreadsheet engine. It talks to the
//! host spreadsheet through [`SheetSurface`], which exposes exactly four
//! contracts: active-sheet info, rectangular range writes, single-cell
//! reads, and the current selection. [`MemorySurface`] is the in-memory
//! implementation used by the CLI and tests.

pub mod cell;
pub mod cell_ref;
pub mod memory;

pub use cell::CellValue;
pub use cell_ref::{column_to_index, index_to_column, parse_cell_ref, AddressError, CellRef};
pub use memory::MemorySurface;

use serde::{Deserialize, Serialize};

/// A rectangular cell range, 0-indexed, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    pub fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self { start_row, start_col, end_row, end_col }
    }

    /// Single-cell range.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn rows(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn cols(&self) -> usize {
        self.end_col - self.start_col + 1
    }
}

/// Info about the active sheet, captured before each turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetInfo {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

/// Error from a surface primitive.
#[derive(Debug, Clone)]
pub enum SurfaceError {
    /// No workbook/sheet is open
    NoSheet,
    /// Values do not match the range dimensions
    DimensionMismatch { expected: (usize, usize), got: (usize, usize) },
    /// Host rejected the write
    WriteRejected(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::NoSheet => write!(f, "no active sheet"),
            SurfaceError::DimensionMismatch { expected, got } => write!(
                f,
                "value block is {}x{} but range is {}x{}",
                got.0, got.1, expected.0, expected.1
            ),
            SurfaceError::WriteRejected(msg) => write!(f, "write rejected: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The external spreadsheet collaborator.
///
/// The assistant depends only on these four operations' contracts, not
/// on how the host implements them. A write overwrites every cell in
/// the range; "clearing" is writing [`CellValue::Empty`].
pub trait SheetSurface {
    /// Active sheet accessor. `None` when no sheet is open.
    fn sheet_info(&self) -> Option<SheetInfo>;

    /// Overwrite a rectangular range with row-major values.
    fn write_range(&mut self, range: &Range, values: &[Vec<CellValue>]) -> Result<(), SurfaceError>;

    /// Read a single cell. Absent cells read as `Empty`.
    fn read_cell(&self, row: usize, col: usize) -> CellValue;

    /// Current active selection, if any.
    fn active_selection(&self) -> Option<Range>;
}
