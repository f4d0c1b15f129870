//! HTML fragments shared by the route modules
//!
//! Every table lives in a container div next to its pagination div. List
//! routes answer with a fresh table for the container and an out-of-band
//! pagination div, so both are always replaced together.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use cardweb_core::{Feedback, PageView, SelectControl, TableSpec};
use cardweb_utils::escape_html;

/// Where a table is drawn and which route redraws it
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub spec: &'static TableSpec,
    pub list_url: &'static str,
    pub container_id: &'static str,
    pub body_id: &'static str,
    pub pagination_id: &'static str,
    pub headings: &'static [&'static str],
}

const CELL_CLASS: &str = "px-4 py-2 text-sm";

/// Table with header and body rows, cell text escaped
pub fn render_table(layout: &TableLayout, view: Option<&PageView>) -> String {
    let headings: String = layout
        .headings
        .iter()
        .map(|h| format!("<th class='px-4 py-2 text-left text-sm font-medium text-gray-600'>{}</th>", h))
        .collect();

    let mut rows = String::new();
    for row in view.map(|v| v.rows.as_slice()).unwrap_or_default() {
        rows.push_str("<tr class='hover:bg-gray-50'>");
        for cell in row {
            rows.push_str(&format!("<td class='{}'>{}</td>", CELL_CLASS, escape_html(cell)));
        }
        rows.push_str("</tr>");
    }

    format!(
        r#"<table class='w-full'>
            <thead class='bg-gray-50'><tr>{}</tr></thead>
            <tbody id='{}' class='divide-y divide-gray-100'>{}</tbody>
        </table>"#,
        headings, layout.body_id, rows
    )
}

/// Pagination div with one button per page. `oob` marks it for an
/// out-of-band swap.
pub fn render_pagination(layout: &TableLayout, view: Option<&PageView>, filters: &[(String, String)], oob: bool) -> String {
    let mut buttons = String::new();
    for button in view.map(|v| v.buttons.as_slice()).unwrap_or_default() {
        let mut params = filters.to_vec();
        params.push(("page".to_string(), button.index.to_string()));
        let url = format!("{}?{}", layout.list_url, query_string(&params));
        buttons.push_str(&format!(
            r#"<button class='px-3 py-1 mr-1 rounded border text-sm disabled:bg-indigo-600 disabled:text-white' hx-get='{}' hx-target='#{}' hx-swap='innerHTML'{}>{}</button>"#,
            escape_html(&url),
            layout.container_id,
            if button.disabled { " disabled" } else { "" },
            button.label
        ));
    }

    format!(
        "<div id='{}' class='mt-3 flex flex-wrap'{}>{}</div>",
        layout.pagination_id,
        if oob { " hx-swap-oob='true'" } else { "" },
        buttons
    )
}

/// Table container content plus the out-of-band pagination
pub fn table_fragment(layout: &TableLayout, view: &PageView, filters: &[(String, String)]) -> String {
    format!(
        "{}{}",
        render_table(layout, Some(view)),
        render_pagination(layout, Some(view), filters, true)
    )
}

/// A whole table (container plus pagination) replaced out of band, for
/// responses whose main swap is suppressed
pub fn table_oob(layout: &TableLayout, view: &PageView) -> String {
    format!(
        "<div id='{}' hx-swap-oob='innerHTML'>{}</div>{}",
        layout.container_id,
        render_table(layout, Some(view)),
        render_pagination(layout, Some(view), &[], true)
    )
}

/// Table container and pagination as first rendered in a page
pub fn table_section(layout: &TableLayout, view: Option<&PageView>) -> String {
    format!(
        "<div id='{}' class='overflow-x-auto'>{}</div>{}",
        layout.container_id,
        render_table(layout, view),
        render_pagination(layout, view, &[], false)
    )
}

/// `<option>` elements, values and labels escaped
pub fn render_options(select: &SelectControl) -> String {
    select
        .options
        .iter()
        .map(|o| format!("<option value='{}'>{}</option>", escape_html(&o.value), escape_html(&o.label)))
        .collect()
}

/// A select with a "choose" placeholder followed by its options
pub fn render_select(select: &SelectControl, name: &str, attrs: &str) -> String {
    format!(
        "<select id='{}' name='{}' class='border rounded px-2 py-1' {}><option value=''>Select...</option>{}</select>",
        select.id,
        name,
        attrs,
        render_options(select)
    )
}

/// URL-encoded query string
pub fn query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// HTML response carrying `feedback` in the `HX-Trigger` header
pub fn feedback_response(status: StatusCode, body: String, feedback: &Feedback) -> Response {
    let mut response = (status, Html(body)).into_response();
    if let Some(trigger) = feedback.to_trigger_header() {
        match HeaderValue::from_str(&trigger) {
            Ok(value) => {
                response.headers_mut().insert("HX-Trigger", value);
            }
            Err(e) => log::warn!("cannot send feedback header: {}", e),
        }
    }
    response
}

/// Feedback gathered while building a full page, picked up by the page script
pub fn initial_feedback(feedback: &Feedback) -> String {
    let json = feedback.to_trigger_header().unwrap_or_else(|| "{}".to_string());
    format!(
        "<script type='application/json' id='initialFeedback'>{}</script>",
        json.replace("</", "<\\/")
    )
}
