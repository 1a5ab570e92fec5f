use std::collections::HashMap;
use std::hash::Hash;

use super::errors::AttendanceError;
use super::types::{Completeness, RosterEntry};

/// Unsaved status edits for one scope, merged over the server snapshot
///
/// Draft entries exist only for rows the user explicitly marked in this
/// scope's lifetime; every other row inherits its server status. The board
/// never talks to the network.
#[derive(Debug)]
pub(crate) struct DraftBoard<S> {
    roster: Vec<RosterEntry<S>>,
    draft: HashMap<i64, S>,
    committed: bool,
    commit_error: Option<String>,
}

impl<S> Default for DraftBoard<S> {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            draft: HashMap::new(),
            committed: false,
            commit_error: None,
        }
    }
}

impl<S: Copy + Eq + Hash> DraftBoard<S> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Install a fresh server snapshot; unsaved edits survive a reload
    /// within the same scope
    pub(crate) fn replace_roster(&mut self, roster: Vec<RosterEntry<S>>) {
        self.roster = roster;
    }

    pub(crate) fn roster(&self) -> &[RosterEntry<S>] {
        &self.roster
    }

    pub(crate) fn is_dirty(&self) -> bool {
        !self.draft.is_empty()
    }

    pub(crate) fn set_status(&mut self, subject_id: i64, status: S) {
        self.draft.insert(subject_id, status);
        // the draft is dirty again; stale commit outcomes would mislead
        self.committed = false;
        self.commit_error = None;
    }

    pub(crate) fn mark_all(&mut self, status: S) {
        let ids: Vec<i64> = self.roster.iter().map(|entry| entry.subject_id).collect();
        for id in ids {
            self.set_status(id, status);
        }
    }

    /// Draft value, else the server value, else unmarked
    pub(crate) fn effective_status(&self, entry: &RosterEntry<S>) -> Option<S> {
        self.draft
            .get(&entry.subject_id)
            .copied()
            .or(entry.server_status)
    }

    pub(crate) fn effective_status_of(&self, subject_id: i64) -> Option<S> {
        self.roster
            .iter()
            .find(|entry| entry.subject_id == subject_id)
            .and_then(|entry| self.effective_status(entry))
    }

    pub(crate) fn completeness(&self) -> Completeness {
        let unmarked = self
            .roster
            .iter()
            .filter(|entry| self.effective_status(entry).is_none())
            .count();
        Completeness {
            unmarked,
            total: self.roster.len(),
        }
    }

    /// Effective-status counts, for the summary tiles
    pub(crate) fn tally(&self) -> HashMap<S, usize> {
        let mut counts = HashMap::new();
        for entry in &self.roster {
            if let Some(status) = self.effective_status(entry) {
                *counts.entry(status).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Bulk payload over the whole roster, from effective statuses
    ///
    /// Server-confirmed rows are resubmitted as-is so the write is one
    /// consistent snapshot of the scope, not a diff of touched rows.
    pub(crate) fn payload(&self) -> Result<Vec<(i64, S)>, AttendanceError> {
        let completeness = self.completeness();
        if !completeness.all_marked() {
            return Err(AttendanceError::Incomplete(completeness.unmarked));
        }
        Ok(self
            .roster
            .iter()
            .filter_map(|entry| {
                self.effective_status(entry)
                    .map(|status| (entry.subject_id, status))
            })
            .collect())
    }

    /// Fold a successful commit back into the snapshot and reset the draft
    ///
    /// The server is now the source of truth for these values, so
    /// effective statuses keep reading them without a refetch.
    pub(crate) fn absorb_commit(&mut self, payload: &[(i64, S)]) {
        for (subject_id, status) in payload {
            if let Some(entry) = self
                .roster
                .iter_mut()
                .find(|entry| entry.subject_id == *subject_id)
            {
                entry.server_status = Some(*status);
            }
        }
        self.draft.clear();
        self.committed = true;
        self.commit_error = None;
    }

    pub(crate) fn note_rejection(&mut self, message: String) {
        self.committed = false;
        self.commit_error = Some(message);
    }

    pub(crate) fn last_commit_succeeded(&self) -> bool {
        self.committed
    }

    pub(crate) fn commit_error(&self) -> Option<&str> {
        self.commit_error.as_deref()
    }
}
