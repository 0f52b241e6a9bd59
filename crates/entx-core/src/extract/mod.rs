//! Mutation extraction from the two input channels.
//!
//! - [`instance`]: form submissions, already tokenized into field paths
//! - [`request`]: JSON bodies of the create/update API

pub mod instance;
pub mod request;

pub use instance::{
    extract_from_instance, FormField, SubmissionEntity, SubmissionRecord, SubmissionSystem,
};
pub use request::{extract_from_request, RequestEntity, RequestSystem};
