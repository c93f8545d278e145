//! In-memory customers endpoint.
//!
//! Stands in for the server list endpoint: it honors the query intent the
//! table emits (filters, sort, paging) and answers after a simulated
//! round trip on a spawned task.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use deskkit::table::{
    Alignment, ColumnDef, FilterValue, QueryIntent, RefetchRequest, RequestSeq, SortDirection,
    TableRow,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const NAMES: [&str; 12] = [
    "Ada Byrne", "Bilal Khan", "Carmen Ortiz", "Dmitri Volkov", "Esi Mensah", "Farah Aziz",
    "Goran Petrov", "Hana Sato", "Ines Duarte", "Jonah Weiss", "Kemi Adeyemi", "Lars Olsen",
];
const CITIES: [&str; 5] = ["Leeds", "York", "Hull", "Bradford", "Sheffield"];
const PLANS: [&str; 3] = ["wash & fold", "dry clean", "linen service"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Paused,
    Closed,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 3] = [Self::Active, Self::Paused, Self::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub status: AccountStatus,
    pub plan: String,
    pub balance_cents: i64,
}

impl Customer {
    fn balance(&self) -> String {
        let sign = if self.balance_cents < 0 { "-" } else { "" };
        let cents = self.balance_cents.abs();
        format!("{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl TableRow for Customer {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "city" => Some(self.city.clone()),
            "status" => Some(self.status.to_string()),
            "plan" => Some(self.plan.clone()),
            "balance" => Some(self.balance()),
            _ => None,
        }
    }
}

/// Column definitions for the customers table.
pub fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id", "ID").size(48).align(Alignment::Right),
        ColumnDef::new("name", "Name").size(160).sortable().filterable(),
        ColumnDef::new("city", "City").size(104).sortable().filterable(),
        ColumnDef::new("status", "Status").size(72).filterable(),
        ColumnDef::new("plan", "Plan").size(120).filterable().hidden(),
        ColumnDef::new("balance", "Balance")
            .size(80)
            .align(Alignment::Right)
            .sortable(),
    ]
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<Customer>,
    pub page_count: usize,
    pub total: usize,
}

/// A finished fetch.
#[derive(Debug, Clone)]
pub struct Response {
    pub seq: RequestSeq,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerStore {
    customers: Vec<Customer>,
}

impl CustomerStore {
    /// A deterministic sample of `count` customers.
    pub fn sample(count: u32) -> Self {
        let customers = (1..=count)
            .map(|id| {
                let i = id as usize;
                Customer {
                    id,
                    name: NAMES[(i * 7) % NAMES.len()].to_string(),
                    city: CITIES[i % CITIES.len()].to_string(),
                    status: AccountStatus::ALL[(i / 4) % AccountStatus::ALL.len()],
                    plan: PLANS[(i / 3) % PLANS.len()].to_string(),
                    balance_cents: (i as i64 * 1733) % 9000 - 1500,
                }
            })
            .collect();
        Self { customers }
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Answer a list query.
    pub fn list(&self, intent: &QueryIntent) -> Page {
        let mut matching: Vec<&Customer> = self
            .customers
            .iter()
            .filter(|customer| {
                intent.filters.iter().all(|(column, value)| match value {
                    Some(value) => matches_filter(customer, column, value),
                    None => true,
                })
            })
            .collect();

        if let Some(sort) = &intent.sort {
            matching.sort_by(|a, b| {
                let ordering = compare(a, b, &sort.column);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matching.len();
        let per_page = intent.per_page.max(1);
        let page_count = total.div_ceil(per_page).max(1);
        let rows = matching
            .into_iter()
            .skip(intent.page.saturating_sub(1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Page {
            rows,
            page_count,
            total,
        }
    }
}

/// Case-insensitive substring match. Token sets match if any token does.
fn matches_filter(customer: &Customer, column: &str, value: &FilterValue) -> bool {
    let Some(cell) = customer.cell(column) else {
        return false;
    };
    let cell = cell.to_lowercase();
    value
        .values()
        .iter()
        .any(|token| cell.contains(&token.to_lowercase()))
}

fn compare(a: &Customer, b: &Customer, column: &str) -> Ordering {
    match column {
        "id" => a.id.cmp(&b.id),
        "balance" => a.balance_cents.cmp(&b.balance_cents),
        _ => a.cell(column).cmp(&b.cell(column)),
    }
}

/// Runs list queries against a store on spawned tasks.
#[derive(Debug, Clone)]
pub struct Fetcher {
    store: Arc<CustomerStore>,
    latency: Duration,
    responses: mpsc::UnboundedSender<Response>,
}

impl Fetcher {
    pub fn new(
        store: Arc<CustomerStore>,
        latency: Duration,
        responses: mpsc::UnboundedSender<Response>,
    ) -> Self {
        Self {
            store,
            latency,
            responses,
        }
    }

    /// Odd requests take twice as long, so quick successive changes
    /// answer out of order.
    pub fn latency_for(&self, seq: RequestSeq) -> Duration {
        if seq.get() % 2 == 1 {
            self.latency * 2
        } else {
            self.latency
        }
    }

    pub fn spawn(&self, request: RefetchRequest) -> JoinHandle<()> {
        let delay = self.latency_for(request.seq);
        let store = Arc::clone(&self.store);
        let responses = self.responses.clone();
        log::debug!("Fetching {} in {:?}: {}", request.seq, delay, request.intent.to_query_string());

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let page = store.list(&request.intent);
            log::debug!(
                "Fetched {}: {} of {} rows",
                request.seq,
                page.rows.len(),
                page.total
            );
            if responses
                .send(Response {
                    seq: request.seq,
                    page,
                })
                .is_err()
            {
                log::debug!("Response {} dropped, console closed", request.seq);
            }
        })
    }
}
