//! Structured logging facility for entx
//!
//! - Single initialization point via [`init`]
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   emitting the canonical fields from `entx_core_types::schema`
//! - In-memory capture layer for deterministic assertions in tests
//!
//! ```rust
//! use entx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
