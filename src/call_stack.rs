//! Explicit call stack used while folding a flat enter/exit stream
//!
//! Events arrive pre-flattened and ordered by timestamp, so nesting is
//! rebuilt with a plain ordered sequence of frames instead of recursion.

use crate::call_path::CallPath;

/// An open method invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// `Class::method`
    pub qualified_name: String,
    /// Enter timestamp (nanoseconds)
    pub start_time: i64,
}

/// Pushing would exceed the configured depth limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOverflow {
    pub limit: usize,
}

/// Why a frame could not be popped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackViolation {
    /// Pop requested with no open frame
    Empty,
    /// Top frame does not match the name being closed
    Mismatch { expected: String, found: String },
}

/// Stack of open frames with a hard depth limit
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    pub fn push(&mut self, qualified_name: String, start_time: i64) -> Result<(), StackOverflow> {
        if self.frames.len() >= self.max_depth {
            return Err(StackOverflow {
                limit: self.max_depth,
            });
        }
        self.frames.push(CallFrame {
            qualified_name,
            start_time,
        });
        Ok(())
    }

    /// Path of the innermost open frame
    pub fn current_path(&self) -> CallPath {
        CallPath::from_segments(self.frames.iter().map(|f| f.qualified_name.as_str()))
    }

    /// Pop the top frame only if its name equals `qualified_name`.
    ///
    /// On mismatch the stack is left untouched.
    pub fn pop_verified(&mut self, qualified_name: &str) -> Result<CallFrame, StackViolation> {
        let top = self.frames.last().ok_or(StackViolation::Empty)?;
        if top.qualified_name != qualified_name {
            return Err(StackViolation::Mismatch {
                expected: top.qualified_name.clone(),
                found: qualified_name.to_string(),
            });
        }
        self.frames.pop().ok_or(StackViolation::Empty)
    }

    pub fn top(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
