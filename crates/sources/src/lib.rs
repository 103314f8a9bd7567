//! esrelay sources
//!
//! The forward-protocol TCP listener and the per-record transformer that
//! turns decoded wire records into sink-specific documents.
//!
//! # Design Principles
//!
//! - **One task per connection**: handlers share nothing with each other
//!   except the bounded sink queues.
//! - **Backpressure over drops**: producers block on a full queue, so a
//!   slow sink throttles ingestion instead of silently losing records.
//! - **Connection-local failure**: a malformed stream or an expired idle
//!   deadline closes only the offending connection.

mod error;
mod forward;
mod transform;

pub use error::SourceError;
pub use forward::{ForwardSource, ForwardSourceConfig};
pub use transform::Transformer;
