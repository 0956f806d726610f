//! List views: paging, client-side filtering and row expansion

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

use crate::console::filters::{DateFilter, NameFilter, StatusFilter, StockFilter};
use crate::entities::inventory::InventoryItem;
use crate::entities::sample_request::{SampleRequest, SampleRequestPage};

/// The three independent sample request filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilters {
    pub status: StatusFilter,
    pub date: DateFilter,
    pub customer: NameFilter,
}

impl RequestFilters {
    pub fn matches(&self, request: &SampleRequest, now: DateTime<Utc>) -> bool {
        self.status.matches(&request.current_status())
            && self.date.matches(request.required_by_date, now)
            && self.customer.matches(&request.buyer_name)
    }

    pub fn apply<'a>(
        &self,
        requests: &'a [SampleRequest],
        now: DateTime<Utc>,
    ) -> Vec<&'a SampleRequest> {
        requests.iter().filter(|r| self.matches(r, now)).collect()
    }
}

/// Token for one page load
///
/// Only the ticket issued last may complete; older responses are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    page: u32,
    generation: u64,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Paged sample request list with filters and expanded rows
#[derive(Debug, Clone, Default)]
pub struct RequestListView {
    page: u32,
    rows: Vec<SampleRequest>,
    total: u64,
    total_pages: u32,
    latest: u64,
    loaded: bool,
    pub filters: RequestFilters,
    expanded: HashSet<String>,
}

impl RequestListView {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    /// Start loading `page`; any earlier outstanding load becomes stale
    pub fn begin_load(&mut self, page: u32) -> PageTicket {
        self.latest += 1;
        PageTicket {
            page: page.max(1),
            generation: self.latest,
        }
    }

    /// Install a loaded page if its ticket is still the latest
    ///
    /// Returns false when the result was discarded. Loading a different
    /// page collapses every expanded row.
    pub fn complete_load(&mut self, ticket: PageTicket, result: SampleRequestPage) -> bool {
        if ticket.generation != self.latest {
            tracing::debug!(
                page = ticket.page,
                generation = ticket.generation,
                latest = self.latest,
                "dropping stale page"
            );
            return false;
        }

        if ticket.page != self.page {
            self.expanded.clear();
        }
        self.page = ticket.page;
        self.total = result.total;
        self.total_pages = result.total_pages;
        self.rows = result.requests;
        self.loaded = true;
        true
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Every row on the current page, unfiltered
    pub fn rows(&self) -> &[SampleRequest] {
        &self.rows
    }

    /// Rows on the current page that pass all filters
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&SampleRequest> {
        self.filters.apply(&self.rows, now)
    }

    /// Distinct buyer names on the current page, for the customer filter
    pub fn customer_options(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.buyer_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Flip a row's expansion; returns the new state
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Inventory list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilters {
    pub fabric: NameFilter,
    pub stock: StockFilter,
}

impl InventoryFilters {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        self.fabric.matches(&item.fabric_name) && self.stock.matches(item.stock_level())
    }

    pub fn apply<'a>(&self, items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
        items.iter().filter(|i| self.matches(i)).collect()
    }
}

/// Distinct fabric names, sorted, for the fabric filter
pub fn fabric_options(items: &[InventoryItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.fabric_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Priority, Status};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn request(id: &str) -> SampleRequest {
        SampleRequest {
            id: id.to_string(),
            buyer_name: "Acme Co.".to_string(),
            contact_person: "Ann".to_string(),
            required_by_date: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
            priority: Priority::Medium,
            remarks: None,
            attachments: Vec::new(),
            items: Vec::new(),
            created_at: None,
        }
    }

    fn page(ids: &[&str], page: u32) -> SampleRequestPage {
        SampleRequestPage {
            requests: ids.iter().map(|id| request(id)).collect(),
            total: 25,
            page,
            total_pages: 3,
        }
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut view = RequestListView::new();
        let first = view.begin_load(2);
        let second = view.begin_load(3);

        assert!(view.complete_load(second, page(&["c1"], 3)));
        assert!(!view.complete_load(first, page(&["b1"], 2)));
        assert_eq!(view.page(), 3);
        assert_eq!(view.rows()[0].id, "c1");
    }

    #[test]
    fn test_expansion_survives_filters_but_not_page_change() {
        let mut view = RequestListView::new();
        let t = view.begin_load(1);
        view.complete_load(t, page(&["a1", "a2"], 1));

        assert!(view.toggle_expanded("a1"));
        view.filters.status = StatusFilter::Sent;
        assert!(view.is_expanded("a1"));

        let t = view.begin_load(1);
        view.complete_load(t, page(&["a1", "a2"], 1));
        assert!(view.is_expanded("a1"));

        let t = view.begin_load(2);
        view.complete_load(t, page(&["b1"], 2));
        assert!(!view.is_expanded("a1"));
        assert!(view.has_prev() && view.has_next());
    }

    #[test]
    fn test_toggle_twice_collapses() {
        let mut view = RequestListView::new();
        assert!(view.toggle_expanded("x"));
        assert!(!view.toggle_expanded("x"));
        assert!(!view.is_expanded("x"));
    }

    #[test]
    fn test_request_without_items_filters_as_requested() {
        let now = Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap();
        let filters = RequestFilters {
            status: StatusFilter::Requested,
            ..Default::default()
        };
        assert!(filters.matches(&request("r1"), now));
        assert_eq!(request("r1").current_status(), Status::Requested);
    }

    #[test]
    fn test_inventory_filters() {
        let item = |name: &str, meters: i64| InventoryItem {
            id: name.to_string(),
            fabric_name: name.to_string(),
            color: "Blue".to_string(),
            gsm: 200,
            available_meters: Decimal::from(meters),
        };
        let items = vec![item("Denim", 40), item("Linen", 80), item("Denim", 150)];

        let filters = InventoryFilters {
            fabric: NameFilter::Exact("Denim".to_string()),
            stock: StockFilter::High,
        };
        let hits = filters.apply(&items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].available_meters, Decimal::from(150));

        assert_eq!(fabric_options(&items), vec!["Denim", "Linen"]);
    }
}
