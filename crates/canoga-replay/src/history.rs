use crate::Snapshot;

/// One labeled entry in the match history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub label: String,
    pub snapshot: Snapshot,
}

/// An append-only, ordered log of snapshots.
///
/// Rewinding hands back a copy of the chosen snapshot for the driver to
/// restore; entries after the rewound index are kept, so rewinding forward
/// again ("redo") stays possible.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, snapshot: Snapshot) {
        self.entries.push(HistoryEntry {
            label: label.into(),
            snapshot,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The snapshot at `index`, to become the live state again.
    #[must_use]
    pub fn rewind(&self, index: usize) -> Option<Snapshot> {
        self.entries.get(index).map(|entry| entry.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deserialize;
    use canoga_engine::PlayerId;

    fn snapshot_with_score(human_score: u32) -> Snapshot {
        let text = format!(
            "Computer:\n   Squares: 1 2 3 4 5 6 7 8 9\n   Score: 0\n\
             Human:\n   Squares: 1 2 3 4 5 6 7 8 9\n   Score: {human_score}\n\
             First Turn: Human\nNext Turn: Human\n"
        );
        deserialize(&text).unwrap()
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.push("round 1 start", snapshot_with_score(0));
        history.push("round 1 end", snapshot_with_score(12));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].label, "round 1 start");
        assert_eq!(history.entries()[1].label, "round 1 end");
    }

    #[test]
    fn test_rewind_returns_the_selected_snapshot() {
        let mut history = History::new();
        history.push("a", snapshot_with_score(0));
        history.push("b", snapshot_with_score(12));
        let rewound = history.rewind(0).unwrap();
        assert_eq!(rewound.scores[PlayerId::Human], 0);
        assert!(history.rewind(2).is_none());
    }

    #[test]
    fn test_rewind_preserves_later_entries() {
        let mut history = History::new();
        history.push("a", snapshot_with_score(0));
        history.push("b", snapshot_with_score(12));
        history.push("c", snapshot_with_score(30));
        let _ = history.rewind(0).unwrap();
        // Rewinding is read-only on the log itself: redo stays available.
        assert_eq!(history.len(), 3);
        assert_eq!(history.rewind(2).unwrap().scores[PlayerId::Human], 30);
    }
}
