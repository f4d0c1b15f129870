//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::cards: user page, cards table, balance, block request, transfer
//! - routes::transactions: user transactions table and statement downloads
//! - routes::admin: admin page, card management, admin tables

pub mod error;
pub mod render;
pub mod routes;

use axum::{
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use cardweb_config::Config;
use cardweb_core::{
    ActionDispatcher, ApiClient, RequestGenerations, ReqwestTransport, ResourceViewer, Session, Transport,
};
use std::sync::Arc;
use tokio::net::TcpListener;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub viewer: ResourceViewer,
    pub dispatcher: ActionDispatcher,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self::with_generations(config, transport, Arc::new(RequestGenerations::new()))
    }

    /// State whose table requests are tracked in `generations`
    pub fn with_generations(config: Config, transport: Arc<dyn Transport>, generations: Arc<RequestGenerations>) -> Self {
        let client = ApiClient::new(transport);
        let viewer = ResourceViewer::new(client.clone(), generations, config.pagination.page_size);
        let dispatcher = ActionDispatcher::new(client.clone());
        Self { client, viewer, dispatcher, config }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::admin::{
        htmx_admin_cards_list, htmx_admin_transactions_list, htmx_card_activate, htmx_card_block, htmx_card_create,
        htmx_card_delete, htmx_expiring_cards_list, page_admin,
    };
    use routes::cards::{htmx_card_balance, htmx_card_block_request, htmx_card_transfer, htmx_cards_list, page_cards};
    use routes::transactions::{export_statement, htmx_transactions_list};

    Router::new()
        .route("/api/health", get(health_check))
        // Pages
        .route("/", get(index_page))
        .route("/cards", get(page_cards))
        .route("/admin", get(page_admin))
        // HTMX table fragments
        .route("/cards/list", get(htmx_cards_list))
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/admin/cards/list", get(htmx_admin_cards_list))
        .route("/admin/cards/expiring/list", get(htmx_expiring_cards_list))
        .route("/admin/transactions/list", get(htmx_admin_transactions_list))
        // Actions
        .route("/cards/balance", post(htmx_card_balance))
        .route("/cards/block-request", post(htmx_card_block_request))
        .route("/cards/transfer", post(htmx_card_transfer))
        .route("/admin/cards", post(htmx_card_create))
        .route("/admin/cards/block", post(htmx_card_block))
        .route("/admin/cards/activate", post(htmx_card_activate))
        .route("/admin/cards/delete", post(htmx_card_delete))
        // Downloads
        .route("/transactions/export/:format", get(export_statement))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Session of the calling browser, taken from its cookies
pub fn session_from_headers(headers: &HeaderMap) -> Session {
    Session::from_cookie_header(
        headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok()),
    )
}

// ==================== Template Functions ====================

/// Toasts, DOM patches and statement downloads
const PAGE_SCRIPT: &str = r#"
function showToast(n) {
    const box = document.getElementById('toasts');
    if (!box) return;
    const div = document.createElement('div');
    div.className = 'toast toast-' + n.level;
    div.textContent = n.text;
    box.appendChild(div);
    setTimeout(() => div.remove(), 4000);
}

function applyPatch(p) {
    const el = document.getElementById(p.target);
    if (!el) return;
    switch (p.op) {
        case 'setText': el.textContent = p.text; break;
        case 'disable': el.disabled = true; break;
        case 'removeOption':
            Array.from(el.options || []).filter(o => o.value === p.value).forEach(o => o.remove());
            break;
        case 'setValue': el.value = p.value; break;
    }
}

function handleFeedback(fb) {
    (fb.domPatch || []).forEach(applyPatch);
    (fb.notify || []).forEach(showToast);
}

document.addEventListener('DOMContentLoaded', function () {
    document.body.addEventListener('notify', e => e.detail.value.forEach(showToast));
    document.body.addEventListener('domPatch', e => e.detail.value.forEach(applyPatch));
    const initial = document.getElementById('initialFeedback');
    if (initial) handleFeedback(JSON.parse(initial.textContent));
});

function downloadFilename(response) {
    const disposition = response.headers.get('Content-Disposition') || '';
    const match = disposition.match(/filename="([^"]+)"/);
    return match ? match[1] : null;
}

async function downloadStatement(format) {
    const spinner = document.getElementById('spinner');
    spinner.style.display = 'block';
    try {
        const response = await fetch('/transactions/export/' + format + '?page=0', { credentials: 'same-origin' });
        const trigger = response.headers.get('HX-Trigger');
        if (trigger) {
            handleFeedback(JSON.parse(trigger));
            return;
        }
        if (!response.ok) return;
        const blob = await response.blob();
        const url = window.URL.createObjectURL(blob);
        const a = document.createElement('a');
        a.href = url;
        a.download = downloadFilename(response) || ('transactions_' + new Date().toISOString() + '.' + format);
        document.body.appendChild(a);
        a.click();
        a.remove();
        window.URL.revokeObjectURL(url);
    } catch (error) {
        showToast({ level: 'error', text: 'Network error: ' + error.message });
    } finally {
        spinner.style.display = 'none';
    }
}
"#;

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Cardweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        #toasts {{ position: fixed; top: 1rem; right: 1rem; z-index: 50; }}
        .toast {{ margin-bottom: 0.5rem; padding: 0.5rem 1rem; border-radius: 0.5rem; color: white; }}
        .toast-info {{ background: #4f46e5; }}
        .toast-success {{ background: #16a34a; }}
        .toast-error {{ background: #dc2626; }}
        #spinner {{ display: none; }}
    </style>
    <script>{}</script>
</head>
<body class="bg-gray-50 text-gray-900">
    <div id="toasts"></div>
    {}
</body>
</html>"#,
        title, PAGE_SCRIPT, content
    )
}

/// Top navigation bar
pub fn nav_bar(current_path: &str) -> String {
    let links = [("/", "Home"), ("/cards", "My cards"), ("/admin", "Admin")];

    let mut nav = String::from("<nav class='bg-white border-b px-6 py-3 flex gap-4'><span class='font-bold text-indigo-600'>Cardweb</span>");
    for (path, label) in &links {
        let active_class = if *path == current_path { "text-indigo-600 font-medium" } else { "text-gray-600" };
        nav.push_str(&format!("<a href='{}' class='{}'>{}</a>", path, active_class, label));
    }
    nav.push_str("</nav>");
    nav
}

/// Full page: navigation bar around the content
pub fn page_response(title: &str, current_path: &str, inner_content: &str) -> String {
    base_html(
        title,
        &format!(
            "{}<main class='max-w-6xl mx-auto p-6 space-y-6'>{}</main>",
            nav_bar(current_path),
            inner_content
        ),
    )
}

/// Index page with navigation
async fn index_page() -> axum::response::Html<String> {
    let inner_content = r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <h2 class='text-2xl font-bold mb-4'>Bank cards</h2>
            <ul class='space-y-2'>
                <li><a class='text-indigo-600' href='/cards'>My cards, transfers and statements</a></li>
                <li><a class='text-indigo-600' href='/admin'>Card administration</a></li>
            </ul>
        </div>"#;
    axum::response::Html(page_response("Home", "/", inner_content))
}

/// Start the HTTP server
///
/// Builds the reqwest transport for the configured backend, binds the
/// listener and serves until Ctrl-C.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let transport = ReqwestTransport::new(config.backend_url(), config.backend.timeout())?;
    log::info!("Proxying bank cards API at {}", config.backend_url());

    let router = create_router(AppState::new(config, Arc::new(transport)));

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Cardweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Home)");
    log::info!("  - /cards (Cards, transfers, statements)");
    log::info!("  - /admin (Card administration)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
