//! Gateway: HTTP surface for a helpdesk sidebar app.
//!
//! Single port. The sidebar posts the ticket's `ticket.conversation` response and gets back
//! either the prompt request (`/prompt/:kind`) or the generated editor HTML (`/generate/:kind`).

mod protocol;
mod server;

pub use protocol::{ErrorBody, GenerateResponse};
pub use server::{router, run_gateway, GatewayState};
