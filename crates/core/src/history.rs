use std::sync::Arc;

use no_brainer_chat_interface::HistoryEntry;

/// The conversation log of one widget. Append-only, oldest first.
#[derive(Clone, Default, Debug)]
pub(crate) struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    #[inline]
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Copies the current entries into a read-only view.
    ///
    /// Later appends don't show up in a view taken earlier.
    #[inline]
    pub fn snapshot(&self) -> Arc<[HistoryEntry]> {
        Arc::from(self.entries.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_frozen() {
        let mut history = History::default();
        history.push(HistoryEntry::new("hi", "user"));
        let snapshot = history.snapshot();

        history.push(HistoryEntry::new("hello", "Assistant"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            history.snapshot().last(),
            Some(&HistoryEntry::new("hello", "Assistant"))
        );
    }
}
