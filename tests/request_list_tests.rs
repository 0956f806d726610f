//! Request list filtering, paging and autocomplete behavior

mod common;

use chrono::{TimeZone, Utc};
use common::{item_json, request_json, request_page_json};
use ferp::console::{
    Autocomplete, DateFilter, Debouncer, NameFilter, RequestListView, StatusFilter,
};
use ferp::entities::inventory::InventoryItem;
use ferp::entities::sample_request::SampleRequestPage;
use serde_json::json;
use std::time::Duration;

fn page(requests: Vec<serde_json::Value>, page: u32, total_pages: u32) -> SampleRequestPage {
    serde_json::from_value(request_page_json(requests, page, total_pages)).unwrap()
}

fn fixture_page() -> SampleRequestPage {
    page(
        vec![
            // SENT, due in 3 days, Acme
            request_json(
                "r1",
                "Acme Co.",
                "2026-10-19T00:00:00Z",
                vec![item_json("a", "Cotton Poplin", "SENT", 10.0)],
            ),
            // SENT, due in 3 days, other buyer
            request_json(
                "r2",
                "Bolt Mills",
                "2026-10-19T00:00:00Z",
                vec![item_json("b", "Denim", "SENT", 10.0)],
            ),
            // SENT, Acme, but due next month
            request_json(
                "r3",
                "Acme Co.",
                "2026-11-20T00:00:00Z",
                vec![item_json("c", "Linen", "SENT", 10.0)],
            ),
            // Acme this week, but first item still REQUESTED
            request_json(
                "r4",
                "Acme Co.",
                "2026-10-14T00:00:00Z",
                vec![
                    item_json("d", "Twill", "REQUESTED", 10.0),
                    item_json("e", "Twill", "SENT", 10.0),
                ],
            ),
        ],
        1,
        1,
    )
}

#[test]
fn test_filters_combine_with_and() {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let mut view = RequestListView::new();
    let ticket = view.begin_load(1);
    assert!(view.complete_load(ticket, fixture_page()));

    view.filters.status = StatusFilter::Sent;
    view.filters.date = DateFilter::ThisWeek;
    view.filters.customer = NameFilter::from_option(Some("Acme Co."));

    let ids: Vec<&str> = view.visible(now).iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1"]);

    // Dropping the customer filter lets the other buyer through
    view.filters.customer = NameFilter::All;
    let ids: Vec<&str> = view.visible(now).iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2"]);
}

#[test]
fn test_customer_options_come_from_loaded_rows() {
    let mut view = RequestListView::new();
    let ticket = view.begin_load(1);
    view.complete_load(ticket, fixture_page());

    assert_eq!(
        view.customer_options(),
        vec!["Acme Co.".to_string(), "Bolt Mills".to_string()]
    );
}

#[test]
fn test_stale_page_response_is_dropped() {
    let mut view = RequestListView::new();
    let first = view.begin_load(1);
    let second = view.begin_load(2);

    let page_two = page(
        vec![request_json("r11", "Acme Co.", "2026-10-19T00:00:00Z", vec![])],
        2,
        2,
    );
    assert!(view.complete_load(second, page_two));

    // Page 1 answers late and must not overwrite page 2
    assert!(!view.complete_load(first, fixture_page()));
    assert_eq!(view.page(), 2);
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].id, "r11");
}

#[test]
fn test_expansion_resets_on_page_change() {
    let mut view = RequestListView::new();
    let ticket = view.begin_load(1);
    view.complete_load(ticket, fixture_page());

    assert!(view.toggle_expanded("r1"));
    assert!(view.is_expanded("r1"));

    let ticket = view.begin_load(2);
    view.complete_load(
        ticket,
        page(vec![request_json("r11", "Acme Co.", "2026-10-19T00:00:00Z", vec![])], 2, 2),
    );
    assert!(!view.is_expanded("r1"));
}

// ============================================================================
// Debounced fabric search
// ============================================================================

fn fabrics() -> Vec<InventoryItem> {
    serde_json::from_value(json!([
        { "_id": "i1", "fabricName": "Cotton Poplin", "color": "Navy", "gsm": 180, "availableMeters": 120 },
        { "_id": "i2", "fabricName": "Linen Slub", "color": "Natural", "gsm": 150, "availableMeters": 35 },
        { "_id": "i3", "fabricName": "Denim", "color": "Indigo", "gsm": 320, "availableMeters": 80 }
    ]))
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_only_last_keystroke_applies() {
    let debouncer = Debouncer::new(Duration::from_millis(300));
    let mut picker = Autocomplete::new(fabrics());

    let fast = async {
        let early = debouncer.settle("co".to_string());
        let late = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            debouncer.settle("navy".to_string()).await
        };
        tokio::join!(early, late)
    };
    let (early, late) = fast.await;
    assert_eq!(early, None);
    assert_eq!(late.as_deref(), Some("navy"));

    assert!(picker.input(&debouncer, "180").await);
    let hits: Vec<&str> = picker.suggestions().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(hits, vec!["i1"]);
    assert!(picker.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_search_matches_name_and_color() {
    let debouncer = Debouncer::new(Duration::from_millis(300));
    let mut picker = Autocomplete::new(fabrics());

    picker.input(&debouncer, "INDIGO").await;
    let hits: Vec<&str> = picker.suggestions().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(hits, vec!["i3"]);

    picker.input(&debouncer, "slub").await;
    let hits: Vec<&str> = picker.suggestions().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(hits, vec!["i2"]);

    // An empty term lists everything
    picker.input(&debouncer, "").await;
    assert_eq!(picker.suggestions().len(), 3);

    picker.pointer_outside();
    assert!(!picker.is_open());
}
