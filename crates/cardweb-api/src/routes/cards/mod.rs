//! Card routes - user cards table and card actions
//!
//! Features:
//! - Cards table with pagination
//! - Balance check, which also redraws the cards table
//! - Block request and transfer between own cards
//!
//! Structure:
//! - api.rs: HTMX fragment and action endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

use crate::render::TableLayout;
use cardweb_core::viewer::USER_CARDS;

pub const CARDS_LAYOUT: TableLayout = TableLayout {
    spec: &USER_CARDS,
    list_url: "/cards/list",
    container_id: "cardsTable",
    body_id: "cardsBody",
    pagination_id: "pagination",
    headings: &["Card number", "Expires", "Status", "Balance"],
};

pub use api::{htmx_card_balance, htmx_card_block_request, htmx_card_transfer, htmx_cards_list};

pub use page::page_cards;
