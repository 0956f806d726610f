//! Debounced search-and-select over a preloaded candidate set
//!
//! The candidate set is loaded once (through the query cache) and filtered
//! locally. Typing updates the visible search text immediately, while the
//! filter only follows the last value that survived the [`Debouncer`].
//! Selecting a candidate copies a snapshot of it into the parent form.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::entities::buyer::ActiveBuyer;
use crate::entities::inventory::InventoryItem;
use crate::entities::sample_request::{FabricItemForm, SampleRequestForm};

/// Default quiet period before a search is applied
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer
///
/// Each call to [`Debouncer::settle`] supersedes the ones before it. After the
/// quiet period only the newest call gets its value back.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet period; `None` if newer input arrived meanwhile
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) == ticket {
            Some(value)
        } else {
            None
        }
    }
}

/// Something offered in an autocomplete dropdown
pub trait Candidate: Clone {
    /// Stable identifier used to pick the candidate
    fn key(&self) -> &str;

    /// Text shown in the search box once selected
    fn label(&self) -> String;

    /// Fields the search term is matched against
    fn search_fields(&self) -> Vec<String>;

    /// Case-insensitive substring match on any search field
    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Candidate for InventoryItem {
    fn key(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.fabric_name.clone()
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.fabric_name.clone(),
            self.color.clone(),
            self.gsm.to_string(),
        ]
    }
}

impl Candidate for ActiveBuyer {
    fn key(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

/// A form that receives a candidate snapshot
pub trait SnapshotTarget<C> {
    fn apply_snapshot(&mut self, candidate: &C);
    fn clear_snapshot(&mut self);
}

impl SnapshotTarget<InventoryItem> for FabricItemForm {
    fn apply_snapshot(&mut self, candidate: &InventoryItem) {
        FabricItemForm::apply_snapshot(self, candidate);
    }

    fn clear_snapshot(&mut self) {
        FabricItemForm::clear_snapshot(self);
    }
}

impl SnapshotTarget<ActiveBuyer> for SampleRequestForm {
    fn apply_snapshot(&mut self, candidate: &ActiveBuyer) {
        self.apply_buyer(&candidate.name, &candidate.contact_person);
    }

    fn clear_snapshot(&mut self) {
        self.apply_buyer("", "");
    }
}

/// Dropdown state over a candidate set
#[derive(Debug, Clone)]
pub struct Autocomplete<C> {
    candidates: Vec<C>,
    search_text: String,
    applied_term: String,
    open: bool,
    selected: Option<C>,
}

impl<C: Candidate> Autocomplete<C> {
    pub fn new(candidates: Vec<C>) -> Self {
        Self {
            candidates,
            search_text: String::new(),
            applied_term: String::new(),
            open: false,
            selected: None,
        }
    }

    pub fn candidates(&self) -> &[C] {
        &self.candidates
    }

    /// What the user has typed so far
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The debounced term the suggestions follow
    pub fn applied_term(&self) -> &str {
        &self.applied_term
    }

    /// Record a keystroke: update the text and open the dropdown
    pub fn type_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.open = true;
    }

    /// Apply a settled search term to the suggestions
    pub fn apply_term(&mut self, term: impl Into<String>) {
        self.applied_term = term.into();
    }

    /// Type, wait out the debounce, then apply if still current
    pub async fn input(&mut self, debouncer: &Debouncer, text: impl Into<String>) -> bool {
        let text = text.into();
        self.type_text(text.clone());
        match debouncer.settle(text).await {
            Some(term) => {
                self.apply_term(term);
                true
            }
            None => false,
        }
    }

    /// Candidates matching the applied term; all of them when it is empty
    pub fn suggestions(&self) -> Vec<&C> {
        if self.applied_term.is_empty() {
            return self.candidates.iter().collect();
        }
        self.candidates
            .iter()
            .filter(|c| c.matches(&self.applied_term))
            .collect()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Pointer interaction outside the dropdown closes it
    pub fn pointer_outside(&mut self) {
        self.close();
    }

    pub fn selected(&self) -> Option<&C> {
        self.selected.as_ref()
    }

    /// Pick a candidate by key and copy its snapshot into `target`
    ///
    /// Returns false, leaving everything untouched, when no candidate has
    /// that key.
    pub fn select_into<T: SnapshotTarget<C>>(&mut self, key: &str, target: &mut T) -> bool {
        let Some(candidate) = self.candidates.iter().find(|c| c.key() == key).cloned() else {
            return false;
        };
        target.apply_snapshot(&candidate);
        self.search_text = candidate.label();
        self.open = false;
        self.selected = Some(candidate);
        true
    }

    /// Reset the search and selection, and unlock the target's fields
    pub fn clear_into<T: SnapshotTarget<C>>(&mut self, target: &mut T) {
        self.search_text.clear();
        self.applied_term.clear();
        self.open = false;
        self.selected = None;
        target.clear_snapshot();
    }
}
