//! Row selection for bulk actions

use crate::core::record::Record;
use indexmap::IndexSet;

/// Selected record identities, in the order they were selected
///
/// Selection is keyed by identity, not position, so it survives re-filtering
/// and re-sorting. Rows hidden by a filter stay selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<Id: std::hash::Hash + Eq> {
    ids: IndexSet<Id>,
}

impl<Id: std::hash::Hash + Eq + Clone> Selection<Id> {
    pub fn new() -> Self {
        Self {
            ids: IndexSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    /// Select or deselect one row; returns whether it is now selected
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: Id) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: &Id) {
        self.ids.shift_remove(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }
}

impl<Id: std::hash::Hash + Eq + Clone> Selection<Id> {
    pub fn is_selected<R>(&self, record: &R) -> bool
    where
        R: Record<Id = Id>,
    {
        self.ids.contains(&record.record_id())
    }

    /// Whether every row in `rows` is selected; false for no rows
    pub fn is_all_selected<'r, R, I>(&self, rows: I) -> bool
    where
        R: Record<Id = Id> + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let mut any = false;
        for row in rows {
            if !self.is_selected(row) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Header checkbox: select every row in `rows`, or clear them all if they
    /// already are
    pub fn toggle_all<'r, R, I>(&mut self, rows: I)
    where
        R: Record<Id = Id> + 'r,
        I: IntoIterator<Item = &'r R> + Clone,
    {
        if self.is_all_selected(rows.clone()) {
            for row in rows {
                self.ids.shift_remove(&row.record_id());
            }
        } else {
            self.select_all(rows);
        }
    }

    pub fn select_all<'r, R, I>(&mut self, rows: I)
    where
        R: Record<Id = Id> + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        self.ids.extend(rows.into_iter().map(|row| row.record_id()));
    }

    /// Selected records from `records`, in collection order
    pub fn selected_records<'r, R>(&self, records: &'r [R]) -> Vec<&'r R>
    where
        R: Record<Id = Id>,
    {
        records.iter().filter(|r| self.is_selected(*r)).collect()
    }
}

impl<Id: std::hash::Hash + Eq + Clone> Default for Selection<Id> {
    fn default() -> Self {
        Self::new()
    }
}
