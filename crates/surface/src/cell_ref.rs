//! Cell reference codec.
//!
//! Column letters are a base-26 number with digits 1..26 (A=1 .. Z=26,
//! AA=27, ...) mapped to a 0-based index. Rows are 1-based in A1
//! notation and 0-based internally.

use std::fmt;

/// A single cell position, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Render back to A1 notation.
    pub fn to_a1(&self) -> String {
        format!("{}{}", index_to_column(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Error parsing a cell address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressError {
    pub input: String,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell address: {}", self.input)
    }
}

impl std::error::Error for AddressError {}

/// Convert column letters to a 0-based index (A=0, B=1, ..., Z=25, AA=26).
///
/// Fails on empty or non-letter input, and on tokens whose index does
/// not fit in `usize` — the model occasionally emits runaway letter
/// strings, and those must surface as an error, not a panic.
pub fn column_to_index(column: &str) -> Result<usize, AddressError> {
    if column.is_empty() {
        return Err(AddressError { input: column.to_string() });
    }
    let mut col: usize = 0;
    for c in column.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(AddressError { input: column.to_string() });
        }
        let digit = c.to_ascii_uppercase() as usize - 'A' as usize + 1;
        col = col
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| AddressError { input: column.to_string() })?;
    }
    Ok(col - 1)
}

/// Convert a 0-based column index to Excel-style letter(s).
pub fn index_to_column(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Parse a cell reference like "A1" or "AA100".
///
/// Accepts one-or-more letters followed by one-or-more digits, case
/// insensitive. Row 0 does not exist in A1 notation.
pub fn parse_cell_ref(s: &str) -> Result<CellRef, AddressError> {
    let upper = s.trim().to_uppercase();
    let mut col_str = String::new();
    let mut row_str = String::new();

    for c in upper.chars() {
        if c.is_ascii_alphabetic() && row_str.is_empty() {
            col_str.push(c);
        } else if c.is_ascii_digit() {
            row_str.push(c);
        } else {
            return Err(AddressError { input: s.to_string() });
        }
    }

    if col_str.is_empty() || row_str.is_empty() {
        return Err(AddressError { input: s.to_string() });
    }

    let row: usize = row_str.parse().map_err(|_| AddressError { input: s.to_string() })?;
    if row == 0 {
        return Err(AddressError { input: s.to_string() });
    }

    Ok(CellRef::new(row - 1, column_to_index(&col_str)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_index_anchors() {
        assert_eq!(column_to_index("A").unwrap(), 0);
        assert_eq!(column_to_index("Z").unwrap(), 25);
        assert_eq!(column_to_index("AA").unwrap(), 26);
        assert_eq!(column_to_index("AB").unwrap(), 27);
    }

    #[test]
    fn test_column_to_index_rejects_bad_input() {
        assert!(column_to_index("").is_err());
        assert!(column_to_index("A1").is_err());
        // Token whose base-26 value exceeds usize
        assert!(column_to_index("AAAAAAAAAAAAAAAAAAAA").is_err());
        assert!(parse_cell_ref("AAAAAAAAAAAAAAAAAAAA1").is_err());
    }

    #[test]
    fn test_index_to_column() {
        assert_eq!(index_to_column(0), "A");
        assert_eq!(index_to_column(1), "B");
        assert_eq!(index_to_column(25), "Z");
        assert_eq!(index_to_column(26), "AA");
        assert_eq!(index_to_column(701), "ZZ");
        assert_eq!(index_to_column(702), "AAA");
    }

    #[test]
    fn test_round_trip_known_columns() {
        for col in ["A", "B", "Z", "AA", "AZ", "BA", "ZZ", "AAA", "XFD"] {
            assert_eq!(
                index_to_column(column_to_index(col).unwrap()),
                col,
                "column {}",
                col
            );
        }
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1").unwrap(), CellRef::new(0, 0));
        assert_eq!(parse_cell_ref("B3").unwrap(), CellRef::new(2, 1));
        assert_eq!(parse_cell_ref("AA100").unwrap(), CellRef::new(99, 26));
        assert_eq!(parse_cell_ref("b3").unwrap(), CellRef::new(2, 1));
    }

    #[test]
    fn test_parse_cell_ref_rejects_garbage() {
        assert!(parse_cell_ref("").is_err());
        assert!(parse_cell_ref("A").is_err());
        assert!(parse_cell_ref("123").is_err());
        assert!(parse_cell_ref("A0").is_err());
        assert!(parse_cell_ref("A1B").is_err());
        assert!(parse_cell_ref("A-1").is_err());
        assert!(parse_cell_ref("hello world").is_err());
    }

    #[test]
    fn test_to_a1() {
        assert_eq!(CellRef::new(0, 0).to_a1(), "A1");
        assert_eq!(CellRef::new(8, 1).to_a1(), "B9");
        assert_eq!(CellRef::new(9, 26).to_a1(), "AA10");
    }

    proptest! {
        #[test]
        fn prop_index_round_trips(i in 0usize..200_000) {
            prop_assert_eq!(column_to_index(&index_to_column(i)).unwrap(), i);
        }

        #[test]
        fn prop_a1_round_trips(row in 0usize..100_000, col in 0usize..20_000) {
            let cell = CellRef::new(row, col);
            prop_assert_eq!(parse_cell_ref(&cell.to_a1()).unwrap(), cell);
        }
    }
}
