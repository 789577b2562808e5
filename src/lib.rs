pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{FileConfig, Settings};

pub use adapters::{ConsoleNotifier, LocalStorage, ReqwestTransport, TerminalProgress};
pub use core::{
    export::{ExportFormat, ReportExport},
    insert::{InsertForm, InsertService},
    report::{format_report, group_by_address},
    search::SearchService,
};
pub use domain::model::{ResultRow, SearchMode};
pub use utils::error::{FinderError, Result};
