//! Integration tests for Vidlink
//!
//! Decode recorded API payloads from `fixtures/` and check the derived state
//! end to end, through the same decoder a client would use.

#[path = "integration/media_resolution.rs"]
mod media_resolution;

#[path = "integration/actor_profile.rs"]
mod actor_profile;

#[path = "integration/error_classification.rs"]
mod error_classification;

#[path = "integration/response_decoding.rs"]
mod response_decoding;
