//! Core of the Mira property assistant client: listing and transcript types,
//! the gateway traits the backend is reached through, and the chat session
//! state machine that ties them together.

pub mod config;
pub mod error;
pub mod gateway;
pub mod listings;
pub mod session;
pub mod transcript;

pub use config::{ClientConfig, SessionContext};
pub use error::{ConfigError, GatewayError};
pub use listings::{AssistantReply, PropertyListing, QuickFilters};
pub use session::{ChatSession, Outcome, RequestState, SkipReason};
pub use transcript::{Author, TranscriptEntry};
