//! Data models exchanged with the bank cards API

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;

/// One record of a listing (card, transaction or user).
///
/// The shape is whatever the server sends; nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Record(fields)
    }

    /// Raw field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Field as display text. Missing and null fields are empty.
    pub fn display(&self, name: &str) -> String {
        match self.0.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Record identifier as text
    pub fn id(&self) -> String {
        self.display("id")
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Record(fields),
            _ => Record::default(),
        }
    }
}

/// One slice of a larger ordered collection, as returned by the API's
/// page envelope (`content`, `number`, `totalPages`, `totalElements`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T = Record> {
    #[serde(rename = "content", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "number", default)]
    pub current_page_index: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page_index: 0,
            total_pages: 0,
            total_elements: 0,
        }
    }

    /// Whether the current index falls inside the page range.
    /// Pages failing this are still rendered as received.
    pub fn is_consistent(&self) -> bool {
        self.total_pages == 0 || self.current_page_index < self.total_pages
    }
}

/// An entry of a select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Card lifecycle states known to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Active,
    Blocked,
    Expired,
}

impl FromStr for CardStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(CardStatus::Active),
            "BLOCKED" => Ok(CardStatus::Blocked),
            "EXPIRED" => Ok(CardStatus::Expired),
            _ => Err(format!("Invalid card status: {}", s)),
        }
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::Active => write!(f, "ACTIVE"),
            CardStatus::Blocked => write!(f, "BLOCKED"),
            CardStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// Body of the admin "create card" request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub user_id: i64,
    pub card_number: String,
    pub expire_date: NaiveDate,
    pub card_status: CardStatus,
    #[serde(serialize_with = "decimal_as_number")]
    pub balance: Decimal,
}

/// Body of the transfer request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_card_id: i64,
    pub to_card_id: i64,
    #[serde(serialize_with = "decimal_as_number")]
    pub amount: Decimal,
}

/// Writes a decimal as a plain JSON number, `50` rather than `"50"` or `50.0`
fn decimal_as_number<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let number = serde_json::Number::from_str(&value.normalize().to_string())
        .map_err(serde::ser::Error::custom)?;
    number.serialize(serializer)
}

/// Optional transaction listing filters
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub min_amount: Option<String>,
    #[serde(default)]
    pub max_amount: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl TransactionFilter {
    /// Query parameters for the filled-in fields, in a fixed order
    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("status", &self.status),
            ("minAmount", &self.min_amount),
            ("maxAmount", &self.max_amount),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.to_string()))
        })
        .collect()
    }

    /// Reject filters the API would refuse anyway
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("minAmount", &self.min_amount), ("maxAmount", &self.max_amount)] {
            if let Some(raw) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                match Decimal::from_str(raw) {
                    Ok(amount) if amount > Decimal::ZERO => {}
                    _ => return Err(format!("{} must be a positive number", name)),
                }
            }
        }

        let start = self.start_date.as_deref().and_then(parse_local_datetime);
        let end = self.end_date.as_deref().and_then(parse_local_datetime);
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err("endDate must be after startDate".to_string());
            }
        }
        Ok(())
    }
}

/// Parses `datetime-local` input values, with or without seconds
fn parse_local_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Statement export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    /// API path serving this format
    pub fn endpoint(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "/api/user/transactions/export",
            ExportFormat::Pdf => "/api/user/transactions/exportPDF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Content type used when the server does not name one
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(format!("Invalid export format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_from_envelope() {
        let page: Page = serde_json::from_value(json!({
            "content": [{"id": 1, "maskedNumber": "**** 1234", "expireDate": "12/25", "cardStatus": "ACTIVE", "balance": 100}],
            "totalPages": 1,
            "totalElements": 1,
            "number": 0,
            "size": 10
        }))
        .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.current_page_index, 0);
        assert_eq!(page.items[0].display("maskedNumber"), "**** 1234");
        assert_eq!(page.items[0].display("balance"), "100");
        assert!(page.is_consistent());
    }

    #[test]
    fn test_page_missing_fields_default() {
        let page: Page = serde_json::from_value(json!({})).unwrap();
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_page_out_of_range_kept() {
        let page: Page = serde_json::from_value(json!({"content": [], "number": 4, "totalPages": 2})).unwrap();
        assert!(!page.is_consistent());
        assert_eq!(page.current_page_index, 4);
    }

    #[test]
    fn test_record_display() {
        let record = Record::from(json!({"id": 7, "name": "x", "none": null, "ok": true, "amount": 12.5}));
        assert_eq!(record.id(), "7");
        assert_eq!(record.display("name"), "x");
        assert_eq!(record.display("none"), "");
        assert_eq!(record.display("missing"), "");
        assert_eq!(record.display("ok"), "true");
        assert_eq!(record.display("amount"), "12.5");
    }

    #[test]
    fn test_transfer_request_body() {
        let request = TransferRequest {
            from_card_id: 1,
            to_card_id: 2,
            amount: Decimal::from_str("50.00").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"fromCardId": 1, "toCardId": 2, "amount": 50})
        );
    }

    #[test]
    fn test_new_card_body() {
        let card = NewCard {
            user_id: 3,
            card_number: "4000123412341234".to_string(),
            expire_date: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap(),
            card_status: CardStatus::Active,
            balance: Decimal::from_str("10.5").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "userId": 3,
                "cardNumber": "4000123412341234",
                "expireDate": "2027-12-31",
                "cardStatus": "ACTIVE",
                "balance": 10.5
            })
        );
    }

    #[test]
    fn test_card_status_parse() {
        assert_eq!("blocked".parse::<CardStatus>().unwrap(), CardStatus::Blocked);
        assert!("frozen".parse::<CardStatus>().is_err());
        assert_eq!(CardStatus::Expired.to_string(), "EXPIRED");
    }

    #[test]
    fn test_transaction_filter_query() {
        let filter = TransactionFilter {
            status: Some("SUCCESS".to_string()),
            min_amount: Some(" ".to_string()),
            max_amount: Some("100".to_string()),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("status".to_string(), "SUCCESS".to_string()),
                ("maxAmount".to_string(), "100".to_string()),
            ]
        );
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_transaction_filter_validation() {
        let filter = TransactionFilter {
            min_amount: Some("-5".to_string()),
            ..Default::default()
        };
        assert!(filter.validate().is_err());

        let filter = TransactionFilter {
            start_date: Some("2024-05-02T10:00".to_string()),
            end_date: Some("2024-05-01T10:00".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.validate().unwrap_err(), "endDate must be after startDate");
    }

    #[test]
    fn test_export_format() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!(ExportFormat::Csv.endpoint(), "/api/user/transactions/export");
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
    }
}
