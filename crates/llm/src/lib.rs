//! Language model access for the sales dashboard: the provider abstraction,
//! the Google Gemini provider and the AI query relay.

mod errors;
pub mod providers;
pub mod relay;

pub use errors::{LlmError, LlmResult};
pub use providers::*;
pub use relay::{AiRelay, GenerationSettings, RelayOutcome};
