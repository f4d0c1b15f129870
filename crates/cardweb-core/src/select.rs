//! Select controls filled from API listings

use crate::client::{ApiClient, Session};
use crate::error::ClientResult;
use crate::models::{Record, SelectOption};

/// Which record fields become option value and label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectSource {
    pub value_field: &'static str,
    pub label_field: &'static str,
}

/// Cards listed by masked number
pub const CARD_OPTIONS: SelectSource = SelectSource {
    value_field: "id",
    label_field: "maskedNumber",
};

/// Users listed by username
pub const USER_OPTIONS: SelectSource = SelectSource {
    value_field: "id",
    label_field: "username",
};

impl SelectSource {
    pub fn option(&self, record: &Record) -> SelectOption {
        SelectOption {
            value: record.display(self.value_field),
            label: record.display(self.label_field),
        }
    }
}

/// A select element and its options, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub id: String,
    pub options: Vec<SelectOption>,
}

impl SelectControl {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), options: Vec::new() }
    }

    /// Append one option per record. Existing options stay, so populating
    /// twice lists everything twice.
    pub fn populate(&mut self, source: &SelectSource, records: &[Record]) {
        self.options.extend(records.iter().map(|record| source.option(record)));
    }

    /// Drop every option carrying `value`; returns whether any was removed
    pub fn remove_option(&mut self, value: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|option| option.value != value);
        self.options.len() != before
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Where the records of a select come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectFeed {
    /// A paginated listing read as one large first page
    Listing { endpoint: &'static str, size: u32 },
    /// The admin users list
    Users,
}

/// Fetch every record of `feed` once and append it to `select`.
///
/// On failure the control is left untouched.
pub async fn populate_select(
    client: &ApiClient,
    session: &Session,
    select: &mut SelectControl,
    source: &SelectSource,
    feed: SelectFeed,
) -> ClientResult<usize> {
    populate_selects(client, session, &mut [select], source, feed).await
}

/// Like [`populate_select`], feeding several controls from a single fetch
pub async fn populate_selects(
    client: &ApiClient,
    session: &Session,
    selects: &mut [&mut SelectControl],
    source: &SelectSource,
    feed: SelectFeed,
) -> ClientResult<usize> {
    let records = match feed {
        SelectFeed::Listing { endpoint, size } => client.fetch_all(session, endpoint, size).await?,
        SelectFeed::Users => client.fetch_users(session).await?,
    };
    for select in selects.iter_mut() {
        select.populate(source, &records);
        log::debug!("{}: appended {} options", select.id, records.len());
    }
    Ok(records.len())
}
