//! Outbound command queue.
//!
//! Holds the wire text of commands the stove has not yet deleted. The
//! stove polls for work (`AT+CMGR`) and acknowledges each command
//! (`AT+CMGD`), so a command stays at the front until it is explicitly
//! popped. Commands are never merged: two control events before a poll
//! are delivered as two separate read/delete cycles.

use std::collections::VecDeque;

/// FIFO of pending wire commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<String>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command at the back.
    pub fn push(&mut self, command: impl Into<String>) {
        self.pending.push_back(command.into());
    }

    /// Command the stove will receive on its next read, if any.
    pub fn front(&self) -> Option<&String> {
        self.pending.front()
    }

    /// Remove the front command. Popping an empty queue is a no-op.
    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pending commands in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.pending.iter()
    }
}
