//! Operation dispatcher.
//!
//! Executes a parsed batch strictly in order against the sheet surface.
//! Each operation yields exactly one result line; a failure becomes an
//! error line for that operation only and never aborts its siblings.

use serde_json::Value;

use gridmate_surface::{
    column_to_index, parse_cell_ref, AddressError, CellValue, Range, SheetSurface, SurfaceError,
};

use crate::catalog::Operation;

// ── Scan windows and defaults ───────────────────────────────────────

/// Rows inspected when locating the last occupied cell of a column.
const COLUMN_SCAN_ROWS: usize = 100;

/// Search window: 50 rows x 20 columns from the top-left.
const SEARCH_ROWS: usize = 50;
const SEARCH_COLS: usize = 20;

/// Block cleared when there is no active selection (10x10 at A1).
const DEFAULT_CLEAR: Range = Range { start_row: 0, start_col: 0, end_row: 9, end_col: 9 };

const DEFAULT_COLUMN: &str = "B";
const DEFAULT_KEYWORD: &str = "test";
const DEFAULT_CELL: &str = "A1";
const DEFAULT_VALUE: &str = "default";

/// Failure of a single operation within a batch.
#[derive(Debug)]
pub enum OperationError {
    Address(AddressError),
    Surface(SurfaceError),
    /// Column token is not a letter sequence
    BadColumn(String),
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationError::Address(e) => write!(f, "{}", e),
            OperationError::Surface(e) => write!(f, "{}", e),
            OperationError::BadColumn(column) => write!(f, "invalid column: {}", column),
        }
    }
}

impl std::error::Error for OperationError {}

impl From<AddressError> for OperationError {
    fn from(e: AddressError) -> Self {
        OperationError::Address(e)
    }
}

impl From<SurfaceError> for OperationError {
    fn from(e: SurfaceError) -> Self {
        OperationError::Surface(e)
    }
}

/// Execute a batch of operations, in input order, one result line each.
pub fn execute_operations<S: SheetSurface>(
    surface: &mut S,
    operations: &[Operation],
) -> Vec<String> {
    operations
        .iter()
        .map(|op| match execute_one(surface, op) {
            Ok(line) => line,
            Err(e) => format!("❌ Error: {}", e),
        })
        .collect()
}

fn execute_one<S: SheetSurface>(
    surface: &mut S,
    operation: &Operation,
) -> Result<String, OperationError> {
    match operation {
        Operation::CreateRevenueTable => {
            write_table(surface, revenue_table())?;
            Ok("✅ Created revenue table".to_string())
        }
        Operation::CreateEmployeeTable => {
            write_table(surface, employee_table())?;
            Ok("✅ Created employee table".to_string())
        }
        Operation::CreateSampleTable => {
            write_table(surface, sample_table())?;
            Ok("✅ Created sample table".to_string())
        }
        Operation::SumColumn { column } => {
            let column = column.as_deref().unwrap_or(DEFAULT_COLUMN);
            sum_column(surface, column)
        }
        Operation::ClearSelection => {
            let range = surface.active_selection().unwrap_or(DEFAULT_CLEAR);
            clear_range(surface, &range)?;
            Ok("✅ Cleared data".to_string())
        }
        Operation::SearchData { keyword } => {
            let keyword = stringify(keyword.as_ref(), DEFAULT_KEYWORD);
            let count = search(surface, &keyword);
            Ok(format!("🔍 Found {} results", count))
        }
        Operation::SetCellValue { cell, value } => {
            let cell = cell.as_deref().unwrap_or(DEFAULT_CELL);
            let target = parse_cell_ref(cell)?;
            let value = value
                .as_ref()
                .map(CellValue::from_json)
                .unwrap_or_else(|| CellValue::Text(DEFAULT_VALUE.to_string()));
            surface.write_range(&Range::cell(target.row, target.col), &[vec![value]])?;
            Ok(format!("✅ Added data to cell {}", target.to_a1()))
        }
        Operation::Unknown { kind } => Ok(format!("❓ Unknown operation: {}", kind)),
    }
}

// ── Individual operations ───────────────────────────────────────────

fn sum_column<S: SheetSurface>(surface: &mut S, column: &str) -> Result<String, OperationError> {
    if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(OperationError::BadColumn(column.to_string()));
    }
    let column = column.to_uppercase();
    let col = column_to_index(&column)
        .map_err(|_| OperationError::BadColumn(column.clone()))?;

    let last_row = find_last_row(surface, col);
    if last_row <= 1 {
        // Header only, or nothing at all: no formula to write.
        return Ok(format!("ℹ️ Column {} has no data to sum", column));
    }

    let formula = format!("=SUM({col}2:{col}{row})", col = column, row = last_row);
    // Formula lands two rows below the last occupied row:
    // 1-based row last_row + 2, 0-based index last_row + 1.
    let target_row = last_row + 1;
    surface.write_range(
        &Range::cell(target_row, col),
        &[vec![CellValue::Text(formula)]],
    )?;
    Ok(format!("✅ Summed column {}", column))
}

/// Last occupied 1-based row of a column within the scan window.
/// 0 when the column is empty.
fn find_last_row<S: SheetSurface>(surface: &S, col: usize) -> usize {
    let mut last_row = 0;
    for i in 0..COLUMN_SCAN_ROWS {
        if !surface.read_cell(i, col).is_empty() {
            last_row = i + 1;
        }
    }
    last_row
}

fn clear_range<S: SheetSurface>(surface: &mut S, range: &Range) -> Result<(), OperationError> {
    let values = vec![vec![CellValue::Empty; range.cols()]; range.rows()];
    surface.write_range(range, &values)?;
    Ok(())
}

/// Case-insensitive substring count over the fixed search window.
fn search<S: SheetSurface>(surface: &S, keyword: &str) -> usize {
    let needle = keyword.to_lowercase();
    let mut count = 0;
    for row in 0..SEARCH_ROWS {
        for col in 0..SEARCH_COLS {
            let value = surface.read_cell(row, col);
            if !value.is_empty() && value.to_text().to_lowercase().contains(&needle) {
                count += 1;
            }
        }
    }
    count
}

fn write_table<S: SheetSurface>(
    surface: &mut S,
    data: Vec<Vec<CellValue>>,
) -> Result<(), OperationError> {
    let range = Range::new(0, 0, data.len() - 1, data[0].len() - 1);
    surface.write_range(&range, &data)?;
    Ok(())
}

// ── Fixed table datasets ────────────────────────────────────────────

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn revenue_table() -> Vec<Vec<CellValue>> {
    vec![
        vec![text("Month"), text("Revenue"), text("Profit")],
        vec![text("January"), num(1_000_000.0), num(200_000.0)],
        vec![text("February"), num(1_200_000.0), num(250_000.0)],
        vec![text("March"), num(1_100_000.0), num(220_000.0)],
        vec![text("April"), num(1_300_000.0), num(270_000.0)],
        vec![text("May"), num(1_150_000.0), num(230_000.0)],
        vec![text("June"), num(1_400_000.0), num(290_000.0)],
    ]
}

fn employee_table() -> Vec<Vec<CellValue>> {
    vec![
        vec![text("Name"), text("Position"), text("Salary"), text("Department")],
        vec![text("John Doe"), text("Developer"), num(15_000_000.0), text("IT")],
        vec![text("Jane Smith"), text("Designer"), num(12_000_000.0), text("Design")],
        vec![text("Mike Johnson"), text("Manager"), num(20_000_000.0), text("Management")],
        vec![text("Sarah Wilson"), text("Tester"), num(10_000_000.0), text("QA")],
        vec![text("Tom Brown"), text("DevOps"), num(18_000_000.0), text("IT")],
    ]
}

fn sample_table() -> Vec<Vec<CellValue>> {
    vec![
        vec![text("ID"), text("Product"), text("Price"), text("Quantity")],
        vec![num(1.0), text("Laptop"), num(15_000_000.0), num(10.0)],
        vec![num(2.0), text("Mouse"), num(200_000.0), num(50.0)],
        vec![num(3.0), text("Keyboard"), num(500_000.0), num(30.0)],
        vec![num(4.0), text("Monitor"), num(3_000_000.0), num(15.0)],
    ]
}

fn stringify(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}
