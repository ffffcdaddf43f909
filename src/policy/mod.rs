//! Response policy engine.
//!
//! Pure functions of the upstream result: status normalization, header
//! copy-through, content-type-driven Cache-Control. No state, no I/O.

pub mod cache_control;
pub mod response;

pub use cache_control::{cache_control, max_age, CACHE_MAX_AGES};
pub use response::{build_response, not_found_file, not_found_host};
