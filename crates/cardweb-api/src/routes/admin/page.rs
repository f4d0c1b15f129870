//! Admin page rendering

use super::{ADMIN_CARDS_LAYOUT, ADMIN_TRANSACTIONS_LAYOUT, EXPIRING_CARDS_LAYOUT};
use crate::render::{initial_feedback, render_select, table_section};
use crate::{page_response, session_from_headers, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use cardweb_core::dispatch::targets;
use cardweb_core::viewer::ADMIN_CARDS;
use cardweb_core::{
    populate_selects, DefaultErrorLogger, InitSequence, Notification, PageView, RenderOutcome, SelectControl, SelectFeed,
    CARD_OPTIONS, USER_OPTIONS,
};

/// Admin page - Card management, card tables and user transactions
pub async fn page_admin(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let session = session_from_headers(&headers);
    let select_size = state.config.pagination.select_page_size;

    let mut block = SelectControl::new(targets::BLOCK_CARD_SELECT);
    let mut activate = SelectControl::new(targets::ACTIVATE_CARD_SELECT);
    let mut delete = SelectControl::new(targets::DELETE_CARD_SELECT);
    let mut transactions_user = SelectControl::new("transactionSelect");
    let mut create_user = SelectControl::new("createUserSelect");
    let mut cards_view: Option<PageView> = None;

    let report = InitSequence::new()
        .then("card selects", async {
            let feed = SelectFeed::Listing { endpoint: ADMIN_CARDS.endpoint, size: select_size };
            let selects = &mut [&mut block, &mut activate, &mut delete];
            populate_selects(&state.client, &session, selects, &CARD_OPTIONS, feed)
                .await
                .map(|_| ())
        })
        .then("user selects", async {
            let selects = &mut [&mut transactions_user, &mut create_user];
            populate_selects(&state.client, &session, selects, &USER_OPTIONS, SelectFeed::Users)
                .await
                .map(|_| ())
        })
        .then("cards table", async {
            state
                .viewer
                .render_page(&session, &ADMIN_CARDS, 0, &[])
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
        log::warn!("admin page: {} init tasks failed", report.failed.len());
    }
    let mut feedback = report.feedback;
    if let Some(view) = &cards_view {
        feedback.push_notification(Notification::info(view.summary(&ADMIN_CARDS)));
    }

    let transactions_attrs = format!(
        "hx-get='{}' hx-trigger='change' hx-target='#{}' hx-swap='innerHTML'",
        ADMIN_TRANSACTIONS_LAYOUT.list_url, ADMIN_TRANSACTIONS_LAYOUT.container_id
    );

    let inner_content = format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <h2 class='text-2xl font-bold mb-4'>Create card</h2>
            <form hx-post='/admin/cards' hx-swap='none' class='flex flex-wrap gap-2'>
                {}
                <input name='cardNumber' placeholder='Card number' class='border rounded px-2 py-1'>
                <input name='expireDate' type='date' class='border rounded px-2 py-1'>
                <select name='cardStatus' class='border rounded px-2 py-1'>
                    <option value='ACTIVE'>ACTIVE</option>
                    <option value='BLOCKED'>BLOCKED</option>
                    <option value='EXPIRED'>EXPIRED</option>
                </select>
                <input name='balance' type='number' step='0.01' min='0' placeholder='Balance' class='border rounded px-2 py-1'>
                <button class='px-3 py-1 rounded bg-indigo-600 text-white'>Create</button>
            </form>
        </div>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Block card</h3>
                <form hx-post='/admin/cards/block' hx-swap='none' class='flex flex-wrap gap-2 items-center'>
                    {}
                    <button id='{}' class='px-3 py-1 rounded bg-red-600 text-white disabled:opacity-50'>Block</button>
                    <span id='{}' class='text-sm text-gray-600'></span>
                </form>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Activate card</h3>
                <form hx-post='/admin/cards/activate' hx-swap='none' class='flex flex-wrap gap-2 items-center'>
                    {}
                    <button class='px-3 py-1 rounded bg-green-600 text-white'>Activate</button>
                    <span id='{}' class='text-sm text-gray-600'></span>
                </form>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Delete card</h3>
                <form hx-post='/admin/cards/delete' hx-swap='none' hx-confirm='Delete this card?' class='flex flex-wrap gap-2'>
                    {}
                    <button class='px-3 py-1 rounded bg-gray-800 text-white'>Delete</button>
                </form>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>All cards</h3>
                <form hx-get='{}' hx-target='#{}' hx-swap='innerHTML' class='flex gap-2'>
                    <select name='status' class='border rounded px-2 py-1'>
                        <option value=''>Any status</option>
                        <option value='ACTIVE'>ACTIVE</option>
                        <option value='BLOCKED'>BLOCKED</option>
                        <option value='EXPIRED'>EXPIRED</option>
                    </select>
                    <button class='px-3 py-1 rounded border'>Filter</button>
                </form>
            </div>
            {}
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Expiring cards</h3>
                <form hx-get='{}' hx-target='#{}' hx-swap='innerHTML' class='flex gap-2'>
                    <input name='date' type='date' class='border rounded px-2 py-1'>
                    <button class='px-3 py-1 rounded border'>Show</button>
                </form>
            </div>
            {}
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>User transactions</h3>
                {}
            </div>
            {}
        </div>
        {}"#,
        render_select(&create_user, "userId", ""),
        render_select(&block, "cardId", ""),
        targets::BLOCK_BUTTON,
        targets::BLOCK_STATUS,
        render_select(&activate, "cardId", ""),
        targets::CARD_STATUS,
        render_select(&delete, "cardId", ""),
        ADMIN_CARDS_LAYOUT.list_url,
        ADMIN_CARDS_LAYOUT.container_id,
        table_section(&ADMIN_CARDS_LAYOUT, cards_view.as_ref()),
        EXPIRING_CARDS_LAYOUT.list_url,
        EXPIRING_CARDS_LAYOUT.container_id,
        table_section(&EXPIRING_CARDS_LAYOUT, None),
        render_select(&transactions_user, "userId", &transactions_attrs),
        table_section(&ADMIN_TRANSACTIONS_LAYOUT, None),
        initial_feedback(&feedback)
    );

    Html(page_response("Admin", "/admin", &inner_content))
}
