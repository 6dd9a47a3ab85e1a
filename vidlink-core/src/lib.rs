//! Vidlink Core - Typed records and derived state for a video platform API
//!
//! Decoded media, actor and error records plus the pure queries callers
//! actually need from them: playability, purchase classification, resume
//! position, engagement counts and affordances, and failure classification.
//! Nothing here performs I/O; transport and retries live with the caller.

pub mod actor;
pub mod api_error;
pub mod decode;
pub mod engagement;
pub mod errors;
pub mod media;
pub mod pin_code;
pub mod tracing_setup;
pub mod wire;

// Re-export main types for convenient access
pub use actor::{AccountType, ActorRecord, UserBadgeType};
pub use api_error::{ErrorBody, ErrorCode, ErrorRecord, InvalidParameter, TransportResponse};
pub use decode::{JsonDecoder, RecordDecoder};
pub use engagement::{ConnectionKind, Engaged, EngagementGraph, InteractionKind};
pub use errors::ModelError;
pub use media::{MediaRecord, MediaStatus, PlayStatus, PlaybackRecord, TvodVideoType};
pub use pin_code::PinCodeInfo;
pub use wire::WireValue;

pub type Result<T> = std::result::Result<T, ModelError>;
