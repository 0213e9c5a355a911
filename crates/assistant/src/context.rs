//! Sheet context for the prompt.
//!
//! A compact snapshot of the active sheet, captured once per turn and
//! embedded verbatim in the system prompt.

use serde::Serialize;

use gridmate_surface::SheetSurface;

/// Context the model sees about the current sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetContext {
    #[serde(rename = "sheetName")]
    pub sheet_name: String,
    #[serde(rename = "totalRows")]
    pub total_rows: usize,
    #[serde(rename = "totalCols")]
    pub total_cols: usize,
    #[serde(rename = "hasData")]
    pub has_data: bool,
}

impl SheetContext {
    /// Capture context from the surface, rendered as the prompt string.
    pub fn capture<S: SheetSurface>(surface: &S) -> String {
        match surface.sheet_info() {
            Some(info) => {
                let context = SheetContext {
                    sheet_name: info.name,
                    total_rows: info.rows,
                    total_cols: info.cols,
                    has_data: info.rows > 0,
                };
                serde_json::to_string(&context)
                    .unwrap_or_else(|_| "Unable to get spreadsheet context".to_string())
            }
            None => "No spreadsheet open".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmate_surface::MemorySurface;

    #[test]
    fn test_capture_includes_sheet_shape() {
        let surface = MemorySurface::with_name("Budget");
        let context = SheetContext::capture(&surface);
        assert!(context.contains("\"sheetName\":\"Budget\""));
        assert!(context.contains("\"hasData\":true"));
    }
}
