//! Tests for the table state controller.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use deskkit::clock::ManualClock;
use deskkit::table::{
    ColumnDef, ColumnSort, FilterValue, RefetchRequest, SortDirection, TableController,
    TableError, TableRow, TableState,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
struct Customer {
    id: u32,
    name: String,
    status: String,
    city: String,
}

impl Customer {
    fn new(id: u32, name: &str, status: &str, city: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: status.to_string(),
            city: city.to_string(),
        }
    }
}

impl TableRow for Customer {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.name.clone()),
            "status" => Some(self.status.clone()),
            "city" => Some(self.city.clone()),
            _ => None,
        }
    }
}

type Requests = Arc<Mutex<Vec<RefetchRequest>>>;

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name").sortable().filterable(),
        ColumnDef::new("status", "Status").filterable(),
        ColumnDef::new("city", "City").sortable(),
        ColumnDef::new("balance", "Balance").size(12),
    ]
}

fn mount(clock: &ManualClock) -> (TableController<Customer>, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&requests);
    let table = TableController::builder(columns())
        .clock(Arc::new(clock.clone()))
        .on_refetch(move |request| sink.lock().unwrap().push(request.clone()))
        .build()
        .unwrap();
    (table, requests)
}

fn count(requests: &Requests) -> usize {
    requests.lock().unwrap().len()
}

fn last(requests: &Requests) -> RefetchRequest {
    requests.lock().unwrap().last().cloned().unwrap()
}

fn customers() -> Vec<Customer> {
    vec![
        Customer::new(1, "Ann", "active", "Leeds"),
        Customer::new(2, "Bo", "paused", "York"),
    ]
}

#[test]
fn test_mount_does_not_refetch() {
    let clock = ManualClock::new();
    let (table, requests) = mount(&clock);

    assert_eq!(count(&requests), 0);
    let intent = table.intent();
    assert_eq!(intent.page, 1);
    assert_eq!(intent.per_page, 10);
    assert!(table.latest_request().is_none());
}

#[test]
fn test_sort_change_resets_page() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    assert!(table.set_page(4));
    assert_eq!(last(&requests).intent.page, 4);

    assert!(table.set_sort(Some(ColumnSort::asc("name"))).unwrap());
    let request = last(&requests);
    assert_eq!(count(&requests), 2);
    assert_eq!(request.intent.page, 1);
    assert_eq!(request.intent.sort, Some(ColumnSort::asc("name")));
}

#[test]
fn test_filter_commit_resets_page() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);
    table.set_page(3);

    table.set_filter("name", "ann").unwrap();
    assert!(table.has_pending_filters());
    assert!(!table.tick());
    assert_eq!(table.page(), 3);

    clock.advance(Duration::from_millis(300));
    assert!(table.tick());

    let request = last(&requests);
    assert_eq!(request.intent.page, 1);
    assert_eq!(request.intent.filter("name"), Some(&FilterValue::from("ann")));
    assert!(!table.has_pending_filters());
}

#[test]
fn test_filter_edits_coalesce() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_filter("name", "a").unwrap();
    clock.advance(Duration::from_millis(100));
    table.set_filter("name", "an").unwrap();
    clock.advance(Duration::from_millis(100));
    table.set_filter("name", "ann").unwrap();
    assert_eq!(table.pending_filter("name"), Some(&FilterValue::from("ann")));

    clock.advance(Duration::from_millis(299));
    assert!(!table.tick());
    assert_eq!(count(&requests), 0);

    clock.advance(Duration::from_millis(1));
    assert!(table.tick());
    assert_eq!(count(&requests), 1);
    assert_eq!(
        last(&requests).intent.filter("name"),
        Some(&FilterValue::from("ann"))
    );
}

#[test]
fn test_cleared_filter_emits_null() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_filter("status", "active").unwrap();
    assert!(table.commit_filters());
    assert_eq!(
        last(&requests).intent.to_params().get("status"),
        Some(&Value::from("active"))
    );

    table.clear_filter("status").unwrap();
    assert!(table.commit_filters());

    let params = last(&requests).intent.to_params();
    assert_eq!(params.get("status"), Some(&Value::Null));
    assert_eq!(params.get("name"), Some(&Value::Null));
    assert!(!params.contains_key("city"));
}

#[test]
fn test_separated_filter_splits_into_tokens() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_filter("status", "active, paused").unwrap();
    table.commit_filters();

    assert_eq!(
        last(&requests).intent.filter("status"),
        Some(&FilterValue::from(vec!["active", "paused"]))
    );
}

#[test]
fn test_blank_filter_removes() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_filter("name", "bo").unwrap();
    table.commit_filters();
    table.set_filter("name", "").unwrap();
    table.commit_filters();

    assert_eq!(count(&requests), 2);
    assert_eq!(last(&requests).intent.filter("name"), None);
}

#[test]
fn test_filter_back_to_committed_value_is_silent() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_filter("name", "bo").unwrap();
    table.set_filter("name", "").unwrap();
    clock.advance(Duration::from_millis(300));

    assert!(!table.tick());
    assert_eq!(count(&requests), 0);
}

#[test]
fn test_stale_response_dropped() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_loading(true);
    table.set_loading(false);
    table.set_page(2);
    let first = last(&requests).seq;
    table.set_page(3);
    let second = last(&requests).seq;
    assert!(first < second);

    assert!(!table.is_latest(first));
    assert!(!table.apply_response(first, customers(), 9));
    assert!(table.rows().is_empty());

    assert!(table.apply_response(second, customers(), 4));
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.page_count(), Some(4));
}

#[test]
fn test_changes_while_loading_are_caught_up() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_loading(true);
    table.set_page(2);
    table.set_sort(Some(ColumnSort::desc("city"))).unwrap();
    assert_eq!(count(&requests), 0);

    table.set_loading(false);
    assert_eq!(count(&requests), 1);
    let request = last(&requests);
    assert_eq!(request.intent.page, 1);
    assert_eq!(request.intent.sort, Some(ColumnSort::desc("city")));
}

#[test]
fn test_batch_emits_once() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.batch(|t| {
        t.set_page_size(20).unwrap();
        t.set_sort(Some(ColumnSort::asc("name"))).unwrap();
        t.set_filter("status", "late").unwrap();
        t.commit_filters();
    });

    assert_eq!(count(&requests), 1);
    let intent = last(&requests).intent;
    assert_eq!(intent.per_page, 20);
    assert_eq!(intent.page, 1);
    assert_eq!(intent.filter("status"), Some(&FilterValue::from("late")));
}

#[test]
fn test_unwound_batch_still_allows_emission() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        table.batch(|t| {
            t.set_page_size(20).unwrap();
            panic!("batch aborted");
        })
    }));
    assert!(unwound.is_err());
    assert_eq!(count(&requests), 0);

    assert!(table.set_page(2));
    assert_eq!(count(&requests), 1);
    assert_eq!(last(&requests).intent.page, 2);
}

#[test]
fn test_filterable_column_cannot_use_reserved_name() {
    let columns = vec![
        ColumnDef::new("name", "Name").filterable(),
        ColumnDef::new("sort", "Sort code").filterable(),
    ];
    assert_eq!(
        TableController::<Customer>::builder(columns).build().err(),
        Some(TableError::ReservedColumn("sort".into()))
    );

    let display_only = vec![
        ColumnDef::new("name", "Name").filterable(),
        ColumnDef::new("page", "Page").sortable(),
    ];
    assert!(TableController::<Customer>::builder(display_only).build().is_ok());
}

#[test]
fn test_page_clamped_to_page_count() {
    let mut table = TableController::<Customer>::builder(columns())
        .page_count(5)
        .build()
        .unwrap();

    assert!(table.set_page(9));
    assert_eq!(table.page(), 5);
    assert!(!table.can_next_page());
    assert!(!table.next_page());
    assert!(table.previous_page());
    assert_eq!(table.page(), 4);
    assert!(table.first_page());
    assert!(!table.can_previous_page());
    assert!(table.last_page());
    assert_eq!(table.page(), 5);
}

#[test]
fn test_page_size_change() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);
    table.set_page(6);

    assert_eq!(table.set_page_size(0), Err(TableError::InvalidPageSize));
    assert!(table.set_page_size(50).unwrap());
    assert_eq!(table.page(), 1);
    assert_eq!(last(&requests).intent.per_page, 50);
    assert!(!table.set_page_size(50).unwrap());
}

#[test]
fn test_toggle_sort_cycles() {
    let clock = ManualClock::new();
    let (mut table, _requests) = mount(&clock);

    assert_eq!(table.toggle_sort("name").unwrap(), Some(SortDirection::Asc));
    assert_eq!(table.toggle_sort("name").unwrap(), Some(SortDirection::Desc));
    assert_eq!(table.toggle_sort("name").unwrap(), None);
    assert!(table.sorting().is_none());

    assert_eq!(
        table.toggle_sort("status"),
        Err(TableError::NotSortable("status".into()))
    );
}

#[test]
fn test_rejects_unknown_and_unfilterable_columns() {
    let clock = ManualClock::new();
    let (mut table, _requests) = mount(&clock);

    assert_eq!(
        table.set_filter("city", "York"),
        Err(TableError::NotFilterable("city".into()))
    );
    assert_eq!(
        table.set_filter("zip", "LS1"),
        Err(TableError::UnknownColumn("zip".into()))
    );
    assert_eq!(
        table.set_column_visibility("zip", false),
        Err(TableError::UnknownColumn("zip".into()))
    );
}

#[test]
fn test_build_validates_columns_and_initial_state() {
    let duplicate = TableController::<Customer>::builder(vec![
        ColumnDef::new("name", "Name"),
        ColumnDef::new("name", "Other"),
    ])
    .build();
    assert_eq!(
        duplicate.err(),
        Some(TableError::DuplicateColumn("name".into()))
    );

    let state = TableState::new(&columns(), &Default::default()).with_sort(ColumnSort::asc("status"));
    let invalid = TableController::<Customer>::builder(columns())
        .initial_state(state)
        .build();
    assert_eq!(invalid.err(), Some(TableError::NotSortable("status".into())));
}

#[test]
fn test_initial_state_is_respected() {
    let state = TableState::new(&columns(), &Default::default())
        .with_page(3)
        .with_page_size(25)
        .with_filter("status", "active");
    let table = TableController::<Customer>::builder(columns())
        .initial_state(state)
        .build()
        .unwrap();

    let intent = table.intent();
    assert_eq!(intent.page, 3);
    assert_eq!(intent.per_page, 25);
    assert_eq!(intent.filter("status"), Some(&FilterValue::from("active")));
}

#[test]
fn test_headers_and_rows_follow_layout() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);
    table.set_rows(customers());

    table.set_column_visibility("status", false).unwrap();
    table.move_column("city", 0).unwrap();
    table.set_column_size("name", 30).unwrap();
    table.set_sort(Some(ColumnSort::desc("name"))).unwrap();

    let headers = table.headers();
    let ids: Vec<&str> = headers.iter().map(|h| h.column.as_str()).collect();
    assert_eq!(ids, ["city", "name", "balance"]);
    assert_eq!(headers[1].size, Some(30));
    assert_eq!(headers[1].sort, Some(SortDirection::Desc));
    assert_eq!(headers[2].size, Some(12));

    let rows = table.row_views();
    assert_eq!(rows[0].cells, ["Leeds", "Ann", ""]);

    // Layout changes never refetch.
    assert_eq!(count(&requests), 1);
}

#[test]
fn test_selection_survives_paging() {
    let clock = ManualClock::new();
    let (mut table, _requests) = mount(&clock);
    table.set_rows(customers());

    assert_eq!(table.select_all_rows(), 2);
    assert!(table.toggle_row_selected("7"));
    table.set_page(2);
    table.set_rows(vec![Customer::new(7, "Cy", "active", "Hull")]);

    assert!(table.row_views()[0].selected);
    assert_eq!(table.selected_row_ids(), ["1", "2", "7"]);
    assert!(table.clear_selection());
    assert!(table.selected_row_ids().is_empty());
}

#[test]
fn test_unmount_discards_pending_filter() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    table.set_filter("name", "ann").unwrap();
    drop(table);
    clock.advance(Duration::from_secs(1));

    assert_eq!(count(&requests), 0);
}

#[test]
fn test_reload_issues_fresh_request() {
    let clock = ManualClock::new();
    let (mut table, requests) = mount(&clock);

    let first = table.reload();
    assert_eq!(last(&requests).intent, table.intent());
    assert!(table.is_latest(first));

    let second = table.reload();
    assert_eq!(count(&requests), 2);
    assert!(!table.apply_response(first, customers(), 1));
    assert!(table.apply_response(second, customers(), 1));
}
