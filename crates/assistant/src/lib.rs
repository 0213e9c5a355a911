// Natural-language spreadsheet assistant core
//
// The assistant translates chat requests into spreadsheet operations.
// It does not compute, render, or persist sheets; all mutation goes
// through the SheetSurface boundary and every turn resolves to a
// user-visible chat message.

pub mod catalog;
pub mod context;
pub mod conversation;
pub mod dispatch;
pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod session;

pub use catalog::{ModelResponse, Operation};
pub use context::SheetContext;
pub use conversation::{ChatMessage, Conversation, Role};
pub use dispatch::{execute_operations, OperationError};
pub use gateway::{GatewayError, ModelGateway};
pub use parser::parse_model_response;
pub use prompt::build_system_prompt;
pub use session::ChatSession;
