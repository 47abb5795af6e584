//! Page event queue between the host and the stage

use crate::event::PageEvent;
use std::collections::VecDeque;
use std::mem;

/// FIFO of page events awaiting the stage.
///
/// Resizes and theme changes only matter for their latest value: pushing one
/// drops the pending event of the same kind, and the new one queues at the back
/// so it still lands after everything pushed before it.
#[derive(Debug, Default)]
pub struct EventBus {
    pending: VecDeque<PageEvent>,
    coalesced: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PageEvent) {
        if supersedes_same_kind(&event) {
            let kind = mem::discriminant(&event);
            let before = self.pending.len();
            self.pending.retain(|queued| mem::discriminant(queued) != kind);
            self.coalesced += (before - self.pending.len()) as u64;
        }
        self.pending.push_back(event);
    }

    /// Hand every pending event over in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = PageEvent> {
        mem::take(&mut self.pending).into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Events dropped because a newer one of the same kind replaced them
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

fn supersedes_same_kind(event: &PageEvent) -> bool {
    matches!(event, PageEvent::Resized { .. } | PageEvent::ThemeChanged { .. })
}
