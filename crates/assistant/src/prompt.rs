//! System prompt construction.
//!
//! Pure string assembly; no credential check here (the session gates
//! that before any prompt is built). The prompt pins the exact
//! operation schema so the parser has a fighting chance of getting
//! clean JSON back.

/// Build the system instruction embedding the operation catalog, the
/// sheet context, and the user message verbatim.
pub fn build_system_prompt(context: &str, user_message: &str) -> String {
    format!(
        r#"You are an assistant that converts natural language spreadsheet requests into JSON operations.
Return ONLY valid JSON (no markdown) matching this schema:
{{"explanation":"string","operations":[{{"type":"one_of(create_revenue_table,create_employee_table,create_sample_table,sum_column,clear_selection,search_data,set_cell_value)","column?":"A|B|C...","cell?":"e.g. B3","value?":"any","keyword?":"any"}}]}}

Rules:
- If user wants to insert text into a cell: type=set_cell_value with cell + value
- If user says 'sum column X' -> type=sum_column with column=X (single letter)
- If user asks to clear -> type=clear_selection
- If user wants a table (revenue/employee/sample) -> corresponding create_* table
- If search/find -> type=search_data with keyword
- If ambiguity, default to write text into A1
CurrentContext: {context}
User: {user_message}"#
    )
}
