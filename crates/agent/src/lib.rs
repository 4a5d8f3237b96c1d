//! Chat session orchestration for Dost.
//!
//! One submission follows a fixed path:
//!
//! 1. **Record** the user turn in the session transcript
//! 2. **Assemble** the instruction turn plus the bounded context window
//! 3. **Call** the configured provider once, awaiting the result
//! 4. **Record** the reply, or a synthesized error turn if the call failed
//!
//! The transcript is the single source of truth for both the next request and
//! the exported document.

pub mod context;
pub mod policy;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod test_helpers;

pub use context::{assemble, AssembledContext, AssemblyMetadata, ContextAssembler};
pub use policy::DEFAULT_INSTRUCTION;
pub use session::ChatSession;
pub use transcript::Transcript;
