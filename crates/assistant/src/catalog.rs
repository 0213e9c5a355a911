//! Operation catalog.
//!
//! The closed set of spreadsheet mutations the translator can emit.
//! Dispatch is an exhaustive match; adding a kind here forces every
//! consumer to handle it at compile time. `Unknown` is never produced
//! by serde — the parser constructs it for kinds outside the catalog so
//! a bad element degrades to a reported line instead of aborting the
//! batch.

use serde::Deserialize;
use serde_json::Value;

/// One spreadsheet operation, as emitted by the model.
///
/// Payload fields are optional on the wire; the dispatcher substitutes
/// fixed defaults for missing ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    CreateRevenueTable,
    CreateEmployeeTable,
    CreateSampleTable,
    SumColumn {
        #[serde(default)]
        column: Option<String>,
    },
    ClearSelection,
    SearchData {
        #[serde(default)]
        keyword: Option<Value>,
    },
    SetCellValue {
        #[serde(default)]
        cell: Option<String>,
        #[serde(default)]
        value: Option<Value>,
    },
    /// A kind outside the catalog. Reported, never executed.
    #[serde(skip)]
    Unknown { kind: String },
}

/// Structured result of one model turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub explanation: String,
    pub operations: Vec<Operation>,
}
