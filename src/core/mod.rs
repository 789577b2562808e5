pub mod export;
pub mod insert;
pub mod report;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    GroupedReport, InsertOutcome, Notification, ResultRow, SearchMode, Severity, UploadProgress,
    UploadSummary,
};
pub use crate::domain::ports::{
    ConfigProvider, FileUpload, Notifier, ProgressReporter, Storage, Transport, TransportRequest,
    TransportResponse,
};
pub use crate::utils::error::Result;
