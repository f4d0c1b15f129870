//! Admin routes - card management and admin tables
//!
//! Features:
//! - Create, block, activate and delete cards
//! - All cards (optionally by status) and cards expiring by a date
//! - Transactions of a chosen user
//!
//! Structure:
//! - api.rs: HTMX fragment and action endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

use crate::render::TableLayout;
use crate::routes::transactions::TRANSACTION_HEADINGS;
use cardweb_core::viewer::{ADMIN_CARDS, ADMIN_EXPIRING_CARDS, ADMIN_TRANSACTIONS};

const CARD_HEADINGS: &[&str] = &["Id", "User", "Card number", "Expires", "Status", "Balance"];

pub const ADMIN_CARDS_LAYOUT: TableLayout = TableLayout {
    spec: &ADMIN_CARDS,
    list_url: "/admin/cards/list",
    container_id: "adminCardsTable",
    body_id: "adminCardsBody",
    pagination_id: "adminCardsPagination",
    headings: CARD_HEADINGS,
};

pub const EXPIRING_CARDS_LAYOUT: TableLayout = TableLayout {
    spec: &ADMIN_EXPIRING_CARDS,
    list_url: "/admin/cards/expiring/list",
    container_id: "expiringCardsTable",
    body_id: "expiringCardsBody",
    pagination_id: "expiringCardsPagination",
    headings: CARD_HEADINGS,
};

pub const ADMIN_TRANSACTIONS_LAYOUT: TableLayout = TableLayout {
    spec: &ADMIN_TRANSACTIONS,
    list_url: "/admin/transactions/list",
    container_id: "transactionsTable",
    body_id: "transactionsBody",
    pagination_id: "transactionsPagination",
    headings: TRANSACTION_HEADINGS,
};

pub use api::{
    htmx_admin_cards_list,
    htmx_admin_transactions_list,
    htmx_card_activate,
    htmx_card_block,
    htmx_card_create,
    htmx_card_delete,
    htmx_expiring_cards_list,
};

pub use page::page_admin;
