//! Transactions panel rendering
//!
//! The user page embeds this panel; its table starts empty and fills on demand.

use super::TRANSACTIONS_LAYOUT;
use crate::render::table_section;

/// Transactions filter, table and statement downloads
pub fn transactions_panel() -> String {
    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Transactions</h3>
                <div class='flex items-center gap-2'>
                    <button class='px-3 py-1 rounded border' onclick="downloadStatement('csv')">Statement CSV</button>
                    <button class='px-3 py-1 rounded border' onclick="downloadStatement('pdf')">Statement PDF</button>
                    <span id='spinner' class='text-sm text-gray-500'>Preparing...</span>
                </div>
            </div>
            <form hx-get='{}' hx-target='#{}' hx-swap='innerHTML' class='flex flex-wrap gap-2 mb-4'>
                <select name='status' class='border rounded px-2 py-1'>
                    <option value=''>Any status</option>
                    <option value='SUCCESS'>SUCCESS</option>
                    <option value='PENDING'>PENDING</option>
                    <option value='FAILED'>FAILED</option>
                </select>
                <input name='minAmount' type='number' step='0.01' placeholder='Min amount' class='border rounded px-2 py-1'>
                <input name='maxAmount' type='number' step='0.01' placeholder='Max amount' class='border rounded px-2 py-1'>
                <input name='startDate' type='datetime-local' class='border rounded px-2 py-1'>
                <input name='endDate' type='datetime-local' class='border rounded px-2 py-1'>
                <button class='px-3 py-1 rounded bg-indigo-600 text-white'>View transactions</button>
            </form>
            {}
        </div>"#,
        TRANSACTIONS_LAYOUT.list_url,
        TRANSACTIONS_LAYOUT.container_id,
        table_section(&TRANSACTIONS_LAYOUT, None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_targets_transactions_table() {
        let html = transactions_panel();
        assert!(html.contains("hx-get='/transactions/list' hx-target='#transactionsTable'"));
        assert!(html.contains("<div id='transactionsTable'"));
        assert!(html.contains("id='transactionsPagination'"));
        assert!(html.contains("downloadStatement('pdf')"));
        assert!(html.contains("id='spinner'"));
    }
}
