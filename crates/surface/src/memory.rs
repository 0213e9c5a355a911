//! In-memory sheet surface.
//!
//! Backs the CLI and tests. Deliberately not a spreadsheet engine: no
//! formula evaluation, no formatting, just a sparse grid of values and
//! a settable selection.

use std::collections::HashMap;

use crate::cell::CellValue;
use crate::{Range, SheetInfo, SheetSurface, SurfaceError};

const DEFAULT_ROWS: usize = 1000;
const DEFAULT_COLS: usize = 26;

#[derive(Debug, Clone)]
pub struct MemorySurface {
    name: String,
    rows: usize,
    cols: usize,
    cells: HashMap<(usize, usize), CellValue>,
    selection: Option<Range>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            name: String::from("Sheet1"),
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cells: HashMap::new(),
            selection: None,
        }
    }

    pub fn with_name(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::new() }
    }

    /// Set a single cell directly (test/CLI seeding).
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    pub fn select(&mut self, range: Range) {
        self.selection = Some(range);
    }

    pub fn clear_selection_state(&mut self) {
        self.selection = None;
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }
}

impl SheetSurface for MemorySurface {
    fn sheet_info(&self) -> Option<SheetInfo> {
        Some(SheetInfo {
            name: self.name.clone(),
            rows: self.rows,
            cols: self.cols,
        })
    }

    fn write_range(&mut self, range: &Range, values: &[Vec<CellValue>]) -> Result<(), SurfaceError> {
        let rows = values.len();
        let cols = values.first().map(|r| r.len()).unwrap_or(0);
        if rows != range.rows() || values.iter().any(|r| r.len() != range.cols()) {
            return Err(SurfaceError::DimensionMismatch {
                expected: (range.rows(), range.cols()),
                got: (rows, cols),
            });
        }

        for (dr, row_values) in values.iter().enumerate() {
            for (dc, value) in row_values.iter().enumerate() {
                self.set_cell(range.start_row + dr, range.start_col + dc, value.clone());
            }
        }
        Ok(())
    }

    fn read_cell(&self, row: usize, col: usize) -> CellValue {
        self.cells.get(&(row, col)).cloned().unwrap_or(CellValue::Empty)
    }

    fn active_selection(&self) -> Option<Range> {
        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let mut surface = MemorySurface::new();
        let range = Range::new(0, 0, 1, 1);
        surface
            .write_range(
                &range,
                &[
                    vec![CellValue::Text("a".into()), CellValue::Number(1.0)],
                    vec![CellValue::Text("b".into()), CellValue::Number(2.0)],
                ],
            )
            .unwrap();

        assert_eq!(surface.read_cell(0, 0), CellValue::Text("a".into()));
        assert_eq!(surface.read_cell(1, 1), CellValue::Number(2.0));
        assert_eq!(surface.read_cell(5, 5), CellValue::Empty);
    }

    #[test]
    fn test_write_dimension_mismatch() {
        let mut surface = MemorySurface::new();
        let range = Range::new(0, 0, 1, 1);
        let err = surface
            .write_range(&range, &[vec![CellValue::Number(1.0)]])
            .unwrap_err();
        assert!(matches!(err, SurfaceError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_writing_empty_clears() {
        let mut surface = MemorySurface::new();
        surface.set_cell(0, 0, CellValue::Text("x".into()));
        assert_eq!(surface.occupied(), 1);

        surface
            .write_range(&Range::cell(0, 0), &[vec![CellValue::Empty]])
            .unwrap();
        assert_eq!(surface.occupied(), 0);
        assert_eq!(surface.read_cell(0, 0), CellValue::Empty);
    }

    #[test]
    fn test_selection() {
        let mut surface = MemorySurface::new();
        assert!(surface.active_selection().is_none());

        surface.select(Range::new(2, 2, 4, 4));
        assert_eq!(surface.active_selection(), Some(Range::new(2, 2, 4, 4)));
    }
}
