//! The page plan: the ordered, mutable sequence of pages in an article.
//!
//! Every mutation — append, remove, reorder, swap — renumbers the plan in
//! a single walk so that page numbers stay contiguous from 1, each entry
//! advancing by its page span. Page identity across mutations is the
//! `page_uid`, which is also the correlation key for persistence and the
//! rendering service.
//!
//! Operations return a [`PlanChange`] so callers can observe page-count
//! changes (the trigger for re-running template recommendation) instead
//! of diffing the plan.

use log::debug;
use rand::{RngExt, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

use maquette_core::document::LayoutDocument;

use crate::catalogue::LayoutCatalogue;
use crate::render::RenderState;

/// Page span of a plan entry, using the catalogue's wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    #[serde(rename = "1 pager")]
    OnePager,
    #[serde(rename = "2 pager")]
    TwoPager,
}

impl PageKind {
    /// Number of physical pages this entry occupies.
    pub fn span(self) -> u32 {
        match self {
            Self::OnePager => 1,
            Self::TwoPager => 2,
        }
    }
}

/// One row in the article's page sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// 1-based, recomputed after every mutation; never authoritative.
    pub page_number: u32,
    pub kind: PageKind,
    pub layout_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<LayoutDocument>,
    /// Stable identity across reorders and swaps.
    pub page_uid: String,
    #[serde(default)]
    pub render: RenderState,
}

impl PageEntry {
    /// Creates a fresh entry with a new uid and a pristine render state.
    pub fn new(kind: PageKind, layout_id: i64, document: Option<LayoutDocument>) -> Self {
        Self {
            page_number: 0,
            kind,
            layout_id,
            document,
            page_uid: new_page_uid(),
            render: RenderState::default(),
        }
    }
}

/// Observable outcome of a plan mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanChange {
    /// Nothing happened (e.g. a swap referencing an unknown layout).
    None,
    /// Order or layouts changed but the total page count did not.
    Renumbered,
    /// The total page count changed; template recommendation should be
    /// re-run.
    PageCountChanged { previous: u32, current: u32 },
}

/// The ordered page sequence of one article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    entries: Vec<PageEntry>,
}

impl PagePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plan from entries, renumbering them.
    pub fn from_entries(entries: Vec<PageEntry>) -> Self {
        let mut plan = Self { entries };
        plan.renumber();
        plan
    }

    /// Entries in sequence order.
    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    /// Mutable access to one entry by index.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut PageEntry> {
        self.entries.get_mut(index)
    }

    /// Looks up an entry by its stable uid.
    pub fn by_uid(&self, page_uid: &str) -> Option<&PageEntry> {
        self.entries.iter().find(|entry| entry.page_uid == page_uid)
    }

    /// Mutable lookup by uid.
    pub fn by_uid_mut(&mut self, page_uid: &str) -> Option<&mut PageEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.page_uid == page_uid)
    }

    /// Total physical page count.
    pub fn total_pages(&self) -> u32 {
        self.entries.iter().map(|entry| entry.kind.span()).sum()
    }

    /// Appends an entry at the end of the sequence.
    pub fn append(&mut self, entry: PageEntry) -> PlanChange {
        let previous = self.total_pages();
        self.entries.push(entry);
        self.renumber();
        PlanChange::PageCountChanged {
            previous,
            current: self.total_pages(),
        }
    }

    /// Removes the entry at `index`. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> PlanChange {
        if index >= self.entries.len() {
            debug!(index; "Remove index out of range");
            return PlanChange::None;
        }
        let previous = self.total_pages();
        self.entries.remove(index);
        self.renumber();
        PlanChange::PageCountChanged {
            previous,
            current: self.total_pages(),
        }
    }

    /// Replaces the sequence order. `new_order` must list exactly the
    /// current uids; anything else is a no-op.
    pub fn reorder(&mut self, new_order: &[String]) -> PlanChange {
        if new_order.len() != self.entries.len() {
            debug!(expected = self.entries.len(), got = new_order.len();
                "Reorder uid count mismatch");
            return PlanChange::None;
        }

        let mut reordered = Vec::with_capacity(self.entries.len());
        for uid in new_order {
            match self.entries.iter().position(|entry| &entry.page_uid == uid) {
                Some(position) => reordered.push(position),
                None => {
                    debug!(page_uid = uid.as_str(); "Reorder references unknown page");
                    return PlanChange::None;
                }
            }
        }
        let mut seen = reordered.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.entries.len() {
            debug!("Reorder repeats a page uid");
            return PlanChange::None;
        }

        let mut old_entries: Vec<Option<PageEntry>> =
            std::mem::take(&mut self.entries).into_iter().map(Some).collect();
        self.entries = reordered
            .into_iter()
            .filter_map(|position| old_entries[position].take())
            .collect();
        self.renumber();
        PlanChange::Renumbered
    }

    /// Swaps the layout at `index` for one or two replacement layouts.
    ///
    /// - same page span: the entry is updated in place;
    /// - 1-pager → 2-pager (or the reverse): the entry is updated and
    ///   every subsequent page number shifts;
    /// - 2-pager → two 1-pagers: the entry becomes the first 1-pager and
    ///   a fresh entry (new uid) is inserted after it for the second.
    ///
    /// A swap whose layouts are not all present in the catalogue is a
    /// no-op: the plan is a client-side view and a missing layout is a
    /// state-sync artifact, not a user mistake.
    ///
    /// Any swap replaces the entry's document, so its render state is
    /// reset — the remote workspace no longer matches.
    pub fn swap(
        &mut self,
        index: usize,
        layout_ids: &[i64],
        catalogue: &LayoutCatalogue,
    ) -> PlanChange {
        if index >= self.entries.len() {
            debug!(index; "Swap index out of range");
            return PlanChange::None;
        }

        let mut resolved = Vec::with_capacity(layout_ids.len());
        for &layout_id in layout_ids {
            match catalogue.get(layout_id) {
                Some(entry) => resolved.push(entry),
                None => {
                    debug!(layout_id; "Swap references a layout missing from the catalogue");
                    return PlanChange::None;
                }
            }
        }

        let previous = self.total_pages();
        match resolved.as_slice() {
            [replacement] => {
                let entry = &mut self.entries[index];
                entry.kind = replacement.layout_metadata.type_of_page;
                entry.layout_id = replacement.layout_id;
                entry.document = Some(replacement.layout_json.clone());
                entry.render = RenderState::default();
            }
            [first, second] => {
                let entry = &mut self.entries[index];
                entry.kind = first.layout_metadata.type_of_page;
                entry.layout_id = first.layout_id;
                entry.document = Some(first.layout_json.clone());
                entry.render = RenderState::default();

                let second_entry = PageEntry::new(
                    second.layout_metadata.type_of_page,
                    second.layout_id,
                    Some(second.layout_json.clone()),
                );
                self.entries.insert(index + 1, second_entry);
            }
            _ => {
                debug!(count = layout_ids.len(); "Swap takes one or two layouts");
                return PlanChange::None;
            }
        }

        self.renumber();
        let current = self.total_pages();
        if current == previous {
            PlanChange::Renumbered
        } else {
            PlanChange::PageCountChanged { previous, current }
        }
    }

    /// Recomputes every entry's page number in one walk.
    fn renumber(&mut self) {
        let mut next = 1;
        for entry in &mut self.entries {
            entry.page_number = next;
            next += entry.kind.span();
        }
    }
}

/// Generates a fresh page uid.
fn new_page_uid() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}
