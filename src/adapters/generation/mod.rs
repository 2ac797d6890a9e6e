//! Generation provider adapters.

pub mod openai;

pub use openai::{OpenAiChatConfig, OpenAiChatProvider};
