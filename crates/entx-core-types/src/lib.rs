//! Types shared by the entx error and logging facilities
//!
//! - **Correlation**: [`RequestId`] and [`RequestContext`] tie an engine call to
//!   the request that triggered it
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId};
