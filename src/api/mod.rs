pub mod client;
pub mod endpoints;
pub mod resources;

pub use client::{ApiClient, ApiRequest};
pub use resources::{CustomerFilter, JobFilter};
