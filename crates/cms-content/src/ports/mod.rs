//! Ports layer
//!
//! - `inbound`: use cases offered to the HTTP layer
//! - `outbound`: persistence the application depends on

pub mod inbound;
pub mod outbound;
