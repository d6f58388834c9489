//! Scripted generator for local development and tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::ports::{DialogueGenerator, GenerationError, GenerationRequest};

/// Returns canned outputs in order, repeating the last one when the script
/// runs out. With no script it echoes a fixed placeholder reply.
pub struct ScriptedDialogueGenerator {
    script: Mutex<Vec<String>>,
    cursor: Mutex<usize>,
}

impl ScriptedDialogueGenerator {
    /// Creates a generator with no script.
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    /// Creates a generator replaying the given outputs.
    pub fn with_script(script: Vec<String>) -> Self {
        Self {
            script: Mutex::new(script),
            cursor: Mutex::new(0),
        }
    }
}

impl Default for ScriptedDialogueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogueGenerator for ScriptedDialogueGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        let script = self.script.lock().unwrap();
        if script.is_empty() {
            return Ok("Assistant: Could you tell me more about what this product does?"
                .to_string());
        }
        let mut cursor = self.cursor.lock().unwrap();
        let output = script[(*cursor).min(script.len() - 1)].clone();
        *cursor += 1;
        Ok(output)
    }
}
