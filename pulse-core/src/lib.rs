//! Pulse Core
//!
//! Core types and abstractions for the Pulse instance monitor.
//!
//! This crate contains:
//! - Domain types: Core business entities (instances, statuses, files)
//! - DTOs: Data transfer objects for the compute API wire format
//! - Log decoding: decoder for the compressed log blobs instances produce

pub mod domain;
pub mod dto;
pub mod log;
