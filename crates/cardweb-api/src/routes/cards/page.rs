//! User cards page rendering

use super::CARDS_LAYOUT;
use crate::render::{initial_feedback, render_select, table_section};
use crate::routes::transactions::page::transactions_panel;
use crate::{page_response, session_from_headers, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use cardweb_core::dispatch::targets;
use cardweb_core::viewer::USER_CARDS;
use cardweb_core::{
    populate_selects, DefaultErrorLogger, InitSequence, Notification, PageView, RenderOutcome, SelectControl, SelectFeed,
    CARD_OPTIONS,
};

/// User page - Cards, balance, block request, transfer and statements
pub async fn page_cards(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let session = session_from_headers(&headers);
    let select_size = state.config.pagination.select_page_size;

    let mut from = SelectControl::new("fromCardSelect");
    let mut to = SelectControl::new("toCardSelect");
    let mut balance = SelectControl::new("balanceCardSelect");
    let mut block = SelectControl::new(targets::BLOCK_CARD_SELECT);
    let mut cards_view: Option<PageView> = None;

    let report = InitSequence::new()
        .then("card selects", async {
            let feed = SelectFeed::Listing { endpoint: USER_CARDS.endpoint, size: select_size };
            let selects = &mut [&mut from, &mut to, &mut balance, &mut block];
            populate_selects(&state.client, &session, selects, &CARD_OPTIONS, feed)
                .await
                .map(|_| ())
        })
        .then("cards table", async {
            state
                .viewer
                .render_page(&session, &USER_CARDS, 0, &[])
                .await
                .map(|outcome| {
                    if let RenderOutcome::Rendered(view) = outcome {
                        cards_view = Some(view);
                    }
                })
        })
        .run(&DefaultErrorLogger)
        .await;

    if !report.is_clean() {
        log::warn!("cards page: {} init tasks failed", report.failed.len());
    }
    let mut feedback = report.feedback;
    if let Some(view) = &cards_view {
        feedback.push_notification(Notification::info(view.summary(&USER_CARDS)));
    }

    let inner_content = format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <h2 class='text-2xl font-bold mb-4'>My cards</h2>
            {}
        </div>
        <div class='grid grid-cols-1 md:grid-cols-2 gap-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Balance</h3>
                <form hx-post='/cards/balance' hx-swap='none' class='flex gap-2'>
                    {}
                    <button class='px-3 py-1 rounded bg-indigo-600 text-white'>Check balance</button>
                </form>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Block card</h3>
                <form hx-post='/cards/block-request' hx-swap='none' class='flex gap-2 items-center'>
                    {}
                    <button id='{}' class='px-3 py-1 rounded bg-red-600 text-white disabled:opacity-50'>Request block</button>
                    <span id='{}' class='text-sm text-gray-600'></span>
                </form>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Transfer</h3>
            <form hx-post='/cards/transfer' hx-swap='none' class='flex flex-wrap gap-2'>
                {}
                {}
                <input id='{}' name='amount' type='number' step='0.01' min='0.01' placeholder='Amount' class='border rounded px-2 py-1'>
                <button class='px-3 py-1 rounded bg-indigo-600 text-white'>Transfer</button>
            </form>
        </div>
        {}
        {}"#,
        table_section(&CARDS_LAYOUT, cards_view.as_ref()),
        render_select(&balance, "cardId", ""),
        render_select(&block, "cardId", ""),
        targets::BLOCK_BUTTON,
        targets::BLOCK_STATUS,
        render_select(&from, "fromCardId", ""),
        render_select(&to, "toCardId", ""),
        targets::AMOUNT_INPUT,
        transactions_panel(),
        initial_feedback(&feedback)
    );

    Html(page_response("My cards", "/cards", &inner_content))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, get};
    use cardweb_core::{ApiResponse, ClientError};
    use serde_json::json;

    #[tokio::test]
    async fn test_page_loads_selects_then_table() {
        let (router, transport) = app(|_| {
            Ok(ApiResponse::json(
                200,
                &json!({
                    "content": [
                        {"id": 1, "maskedNumber": "**** 1111", "expireDate": "12/25", "cardStatus": "ACTIVE", "balance": 10},
                        {"id": 2, "maskedNumber": "**** 2222", "expireDate": "01/26", "cardStatus": "BLOCKED", "balance": 0}
                    ],
                    "totalPages": 1,
                    "totalElements": 2,
                    "number": 0
                }),
            ))
        });
        let (_, body) = get(router, "/cards").await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].param("size"), Some("100"));
        assert_eq!(sent[1].param("size"), Some("10"));

        for id in ["fromCardSelect", "toCardSelect", "balanceCardSelect", "blockCardSelect"] {
            assert!(body.contains(&format!("<select id='{}'", id)), "missing {}", id);
        }
        assert_eq!(body.matches("<option value='2'>**** 2222</option>").count(), 4);
        assert!(body.contains("<td class='px-4 py-2 text-sm'>BLOCKED</td>"));
        assert!(body.contains("Loaded 2 cards"));
    }

    #[tokio::test]
    async fn test_failed_selects_still_render_table() {
        let (router, transport) = app(|request| {
            if request.param("size") == Some("100") {
                Err(ClientError::transport("connection reset"))
            } else {
                Ok(ApiResponse::json(200, &json!({"content": [], "totalPages": 0, "totalElements": 0, "number": 0})))
            }
        });
        let (_, body) = get(router, "/cards").await;

        assert_eq!(transport.sent().len(), 2);
        assert!(body.contains("Network error: connection reset"));
        assert!(body.contains("Loaded 0 cards"));
    }
}
