//! Composition root
//!
//! An [`App`] owns the stacks wired together by an entry point. Composition
//! is one-shot: build the producing stacks, hand their handles or names to
//! the consuming stacks, add everything, synthesize.

use crate::artifact::StackArtifact;
use crate::error::Result;
use crate::stack::Stack;
use crate::synth;

/// Composition root holding the stacks of one deployment definition
#[derive(Debug, Clone, Default)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack. Order is preserved and becomes the deploy order.
    pub fn add_stack(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Synthesize every stack into its deployment artifact
    ///
    /// Handles crossing stack boundaries become export/import pairs;
    /// name references resolve to plain strings. All validation the model
    /// can do locally happens here, in one pass over the definition tree.
    pub fn synth(&self) -> Result<Vec<StackArtifact>> {
        synth::synth_app(&self.stacks)
    }
}
