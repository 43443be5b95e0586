//! Gateway HTTP body types.

use crate::prompt::PromptKind;
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /generate/:kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub kind: PromptKind,
    /// Reply with newlines as `<br>`, ready for the ticket editor.
    pub html: String,
}

/// Body of every non-2xx response: `{ "error": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
