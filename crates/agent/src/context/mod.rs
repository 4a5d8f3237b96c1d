//! Bounded context window assembly.
//!
//! Each request carries one instruction turn plus the trailing
//! `window_size` transcript turns whose role is user or assistant.
//! Windowing counts turns; the token estimate is informational only.

pub mod assembler;
pub mod token;

pub use assembler::{assemble, AssembledContext, AssemblyMetadata, ContextAssembler};
