//! # Dost Core
//!
//! Domain types, traits, and error definitions for the Dost tutor chat.
//! This crate has **no framework dependencies**: it defines the domain model
//! that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! The completion backend is defined as a trait here and implemented in
//! `dost-providers`. Session logic only ever sees `dyn Provider`, so tests can
//! drive it with scripted stubs.

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, ServiceError};
pub use message::{format_timestamp, ChatMessage, Role, SessionId, Turn, TIMESTAMP_FORMAT};
pub use provider::{CompletionRequest, CompletionResponse, Provider, Usage};
