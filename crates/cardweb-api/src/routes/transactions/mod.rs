//! Transaction routes - user transactions and statements
//!
//! Features:
//! - Transactions table with pagination and optional filters
//! - CSV and PDF statement downloads
//!
//! Structure:
//! - api.rs: HTMX fragment and download endpoints
//! - page.rs: Transactions panel shown on the user page

pub mod api;
pub mod page;

use crate::render::TableLayout;
use cardweb_core::viewer::USER_TRANSACTIONS;

pub const TRANSACTION_HEADINGS: &[&str] = &["From", "To", "Amount", "Time", "Status"];

pub const TRANSACTIONS_LAYOUT: TableLayout = TableLayout {
    spec: &USER_TRANSACTIONS,
    list_url: "/transactions/list",
    container_id: "transactionsTable",
    body_id: "transactionsBody",
    pagination_id: "transactionsPagination",
    headings: TRANSACTION_HEADINGS,
};

pub use api::{export_statement, htmx_transactions_list};
