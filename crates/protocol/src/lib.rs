//! Wire types for the KMap workspace graph endpoint.
//!
//! The backend returns loosely shaped JSON: every field besides the record
//! arrays themselves is optional, `nodes`/`links` may be absent or null, and
//! individual records may be malformed. This crate owns that boundary: it
//! decodes leniently, drops bad records instead of failing the payload, and
//! exposes the display-name fallback chain so nothing downstream has to look
//! at raw fields again.

mod payload;

pub use payload::{RawGraphPayload, RawLink, RawNode};
