//! Context window assembly.
//!
//! Builds the ordered message list for one completion request:
//!
//! 1. **Instruction**: the fixed behavioral policy, always first, never
//!    derived from the transcript
//! 2. **Window**: the last `window_size` transcript turns, keeping only
//!    user and assistant roles, in original order
//!
//! # Determinism
//!
//! Assembly is a pure function of the transcript snapshot, the window size and
//! the instruction text. It never mutates the transcript and never truncates
//! a turn's content.

use crate::context::token;
use dost_core::message::{ChatMessage, Turn};
use serde::{Deserialize, Serialize};

/// The assembled request messages plus bookkeeping for logs.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    /// Instruction turn followed by the windowed conversation.
    pub messages: Vec<ChatMessage>,
    /// Assembly metadata (window counts, token estimate).
    pub metadata: AssemblyMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyMetadata {
    /// Turns in the transcript at assembly time.
    pub transcript_turns: usize,
    /// Turns that fell inside the window before role filtering.
    pub window_turns: usize,
    /// Window turns dropped because their role is not conversational.
    pub filtered_turns: usize,
    /// Rough token estimate of the whole message list.
    pub estimated_tokens: usize,
}

/// The context assembler. Stateless apart from its configuration.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    window_size: usize,
    instruction: String,
}

impl ContextAssembler {
    pub fn new(window_size: usize, instruction: impl Into<String>) -> Self {
        Self {
            window_size,
            instruction: instruction.into(),
        }
    }

    /// An assembler using the built-in tutor policy.
    pub fn with_default_instruction(window_size: usize) -> Self {
        Self::new(window_size, crate::policy::DEFAULT_INSTRUCTION)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Assemble the request messages for the given transcript turns.
    pub fn assemble(&self, turns: &[Turn]) -> AssembledContext {
        let start = turns.len().saturating_sub(self.window_size);
        let window = &turns[start..];

        let mut messages = Vec::with_capacity(window.len() + 1);
        messages.push(ChatMessage::system(self.instruction.clone()));
        messages.extend(
            window
                .iter()
                .filter(|turn| turn.role.is_conversational())
                .map(ChatMessage::from),
        );

        let metadata = AssemblyMetadata {
            transcript_turns: turns.len(),
            window_turns: window.len(),
            filtered_turns: window.len() + 1 - messages.len(),
            estimated_tokens: token::estimate_messages_tokens(&messages),
        };

        AssembledContext { messages, metadata }
    }
}

/// Assemble with an explicit window size and instruction.
pub fn assemble(turns: &[Turn], window_size: usize, instruction: &str) -> Vec<ChatMessage> {
    ContextAssembler::new(window_size, instruction)
        .assemble(turns)
        .messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use dost_core::message::Role;

    const POLICY: &str = "You are a DSA tutor.";

    fn alternating(len: usize) -> Vec<Turn> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("question {i}"))
                } else {
                    Turn::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn length_is_min_plus_instruction() {
        for len in 0..20 {
            let turns = alternating(len);
            for window in 0..16 {
                let messages = assemble(&turns, window, POLICY);
                let kept = len.min(window);
                assert_eq!(messages.len(), kept + 1, "len={len} window={window}");

                let expected: Vec<ChatMessage> =
                    turns[len - kept..].iter().map(ChatMessage::from).collect();
                assert_eq!(&messages[1..], expected.as_slice());
            }
        }
    }

    #[test]
    fn instruction_always_first() {
        let messages = assemble(&alternating(5), 3, POLICY);
        assert_eq!(messages[0], ChatMessage::system(POLICY));
    }

    #[test]
    fn empty_transcript_yields_only_instruction() {
        let messages = assemble(&[], 12, POLICY);
        assert_eq!(messages, vec![ChatMessage::system(POLICY)]);
    }

    #[test]
    fn zero_window_yields_only_instruction() {
        let messages = assemble(&alternating(9), 0, POLICY);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
    }

    #[test]
    fn non_conversational_turns_filtered_after_windowing() {
        let turns = vec![
            Turn::user("a"),
            Turn::assistant("b"),
            Turn {
                role: Role::System,
                content: "transcript cleared".into(),
                created_at: String::new(),
            },
            Turn::user("c"),
        ];
        let asm = ContextAssembler::new(3, POLICY);
        let ctx = asm.assemble(&turns);

        // Window covers [b, notice, c]; the notice is dropped, "a" is outside.
        let contents: Vec<_> = ctx.messages[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c"]);
        assert_eq!(ctx.metadata.window_turns, 3);
        assert_eq!(ctx.metadata.filtered_turns, 1);
    }

    #[test]
    fn content_not_truncated() {
        let long = "x".repeat(50_000);
        let turns = vec![Turn::user(long.clone())];
        let messages = assemble(&turns, 12, POLICY);
        assert_eq!(messages[1].content, long);
    }

    #[test]
    fn assembly_is_deterministic_and_non_mutating() {
        let turns = alternating(15);
        let before = turns.clone();
        let asm = ContextAssembler::with_default_instruction(12);
        let a = asm.assemble(&turns).messages;
        let b = asm.assemble(&turns).messages;
        assert_eq!(a, b);
        assert_eq!(turns, before);
    }
}
