pub mod client;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod init;
pub mod models;
pub mod select;
pub mod viewer;

pub use client::{ApiClient, ApiRequest, ApiResponse, Download, Method, ReqwestTransport, Session, Transport};
pub use dispatch::{selected_card, Action, ActionDispatcher, ActionOutcome, NO_CARD_SELECTED};
pub use error::{
    ClientError, ClientResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger, ErrorSeverity,
    DEFAULT_ERROR_MESSAGE,
};
pub use feedback::{DomPatch, Feedback, Notification, NotificationLevel};
pub use generation::{Generation, RequestGenerations};
pub use init::{InitReport, InitSequence};
pub use models::{CardStatus, ExportFormat, NewCard, Page, Record, SelectOption, TransactionFilter, TransferRequest};
pub use select::{populate_select, populate_selects, SelectControl, SelectFeed, SelectSource, CARD_OPTIONS, USER_OPTIONS};
pub use viewer::{PageButton, PageView, RenderOutcome, ResourceViewer, TableSpec};
