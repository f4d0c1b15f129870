//! Paginated resource viewer
//!
//! Fetches one page of a listing and turns it into a [`PageView`]: the table
//! rows in server order plus one pagination button per page. Every call
//! produces a complete view; callers replace the whole table body and the
//! whole pagination control with it.

use crate::client::{ApiClient, Session};
use crate::error::ClientResult;
use crate::generation::RequestGenerations;
use crate::models::{Page, Record};
use std::sync::Arc;

/// A listing endpoint and how its records map onto table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Name of the interactive control, used for request generations
    pub control: &'static str,
    /// API path of the paginated listing
    pub endpoint: &'static str,
    /// Record fields shown as columns, in order
    pub columns: &'static [&'static str],
    /// Plural noun for "Loaded N ..." messages
    pub noun: &'static str,
}

const CARD_COLUMNS: &[&str] = &["maskedNumber", "expireDate", "cardStatus", "balance"];
const ADMIN_CARD_COLUMNS: &[&str] = &["id", "userId", "maskedNumber", "expireDate", "cardStatus", "balance"];
const TRANSACTION_COLUMNS: &[&str] = &[
    "fromMaskedCard",
    "toMaskedCard",
    "amount",
    "timeStamp",
    "transactionStatus",
];

pub const USER_CARDS: TableSpec = TableSpec {
    control: "user-cards",
    endpoint: "/api/user/cards",
    columns: CARD_COLUMNS,
    noun: "cards",
};

pub const USER_TRANSACTIONS: TableSpec = TableSpec {
    control: "user-transactions",
    endpoint: "/api/user/transactions",
    columns: TRANSACTION_COLUMNS,
    noun: "transactions",
};

pub const ADMIN_CARDS: TableSpec = TableSpec {
    control: "admin-cards",
    endpoint: "/api/admin/cards",
    columns: ADMIN_CARD_COLUMNS,
    noun: "cards",
};

pub const ADMIN_EXPIRING_CARDS: TableSpec = TableSpec {
    control: "admin-expiring-cards",
    endpoint: "/api/admin/cards/expiring",
    columns: ADMIN_CARD_COLUMNS,
    noun: "cards",
};

pub const ADMIN_TRANSACTIONS: TableSpec = TableSpec {
    control: "admin-transactions",
    endpoint: "/api/admin/transactions",
    columns: TRANSACTION_COLUMNS,
    noun: "transactions",
};

/// One pagination button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    /// Zero-based page the button requests
    pub index: u32,
    /// One-based label
    pub label: String,
    /// Set on the button of the page being shown
    pub disabled: bool,
}

/// Buttons `1..=total_pages`, the one at `current` disabled
pub fn pagination_buttons(total_pages: u32, current: u32) -> Vec<PageButton> {
    (0..total_pages)
        .map(|index| PageButton {
            index,
            label: (index + 1).to_string(),
            disabled: index == current,
        })
        .collect()
}

/// Everything needed to redraw a table and its pagination control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Cell text per row, unescaped
    pub rows: Vec<Vec<String>>,
    pub buttons: Vec<PageButton>,
    pub current_page_index: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl PageView {
    /// Map a page onto the table's columns. Rows keep server order.
    pub fn build(spec: &TableSpec, page: &Page<Record>) -> Self {
        let rows = page
            .items
            .iter()
            .map(|record| spec.columns.iter().map(|column| record.display(column)).collect())
            .collect();

        if !page.is_consistent() {
            log::debug!(
                "{}: page index {} outside of {} pages",
                spec.control,
                page.current_page_index,
                page.total_pages
            );
        }

        Self {
            rows,
            buttons: pagination_buttons(page.total_pages, page.current_page_index),
            current_page_index: page.current_page_index,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
        }
    }

    /// "Loaded N cards"
    pub fn summary(&self, spec: &TableSpec) -> String {
        format!("Loaded {} {}", self.rows.len(), spec.noun)
    }
}

/// Result of a render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(PageView),
    /// A newer request for the same control started while this one was in flight
    Stale,
}

/// Fetches pages and builds views, discarding superseded responses
#[derive(Clone)]
pub struct ResourceViewer {
    client: ApiClient,
    generations: Arc<RequestGenerations>,
    page_size: u32,
}

impl ResourceViewer {
    pub fn new(client: ApiClient, generations: Arc<RequestGenerations>, page_size: u32) -> Self {
        Self { client, generations, page_size }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch `page_index` of the listing and build its view.
    ///
    /// The index is sent as given, even past the last page.
    pub async fn render_page(
        &self,
        session: &Session,
        spec: &TableSpec,
        page_index: u32,
        filters: &[(String, String)],
    ) -> ClientResult<RenderOutcome> {
        let key = session.control_key(spec.control);
        let generation = self.generations.begin(&key);

        let page = self
            .client
            .fetch_page(session, spec.endpoint, filters, page_index, self.page_size)
            .await;

        if !self.generations.finish(&key, generation) {
            log::debug!("{}: dropping stale response for page {}", spec.control, page_index);
            return Ok(RenderOutcome::Stale);
        }

        let page = page?;
        log::info!(
            "{}: total pages {}, {} {}",
            spec.control,
            page.total_pages,
            spec.noun,
            page.total_elements
        );
        Ok(RenderOutcome::Rendered(PageView::build(spec, &page)))
    }
}
