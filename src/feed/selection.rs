use crate::models::{Signal, SignalId};

/// Tracks which signal, if any, is expanded for detail viewing. Holds the
/// id rather than a copy so `current` always resolves against the batch
/// actually installed in the feed.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<SignalId>,
}

impl SelectionState {
    pub fn select(&mut self, signal: &Signal) {
        self.selected = Some(signal.id.clone());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&SignalId> {
        self.selected.as_ref()
    }

    pub fn current<'a>(&self, signals: &'a [Signal]) -> Option<&'a Signal> {
        let id = self.selected.as_ref()?;
        signals.iter().find(|s| &s.id == id)
    }

    /// Drops the selection when the selected id is absent from a freshly
    /// installed batch. Called on every successful refresh.
    pub fn revalidate(&mut self, signals: &[Signal]) {
        if let Some(id) = &self.selected {
            if !signals.iter().any(|s| &s.id == id) {
                self.selected = None;
            }
        }
    }
}
