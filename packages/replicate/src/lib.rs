// ABOUTME: HTTP client for the Replicate inference API
// ABOUTME: Supports run-by-identifier and pinned-version prediction calls

pub mod client;

pub use client::{ReplicateClient, ReplicateError, ReplicateResult};
