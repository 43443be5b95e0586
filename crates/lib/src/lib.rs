//! Deskmate core library — ticket conversation normalization, transcripts, prompts, and the
//! chat-completion transport, used by the CLI and the gateway.

pub mod assist;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod init;
pub mod llm;
pub mod prompt;
pub mod source;
pub mod transcript;
