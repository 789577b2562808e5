use crate::core::export::{export_report, ExportFormat, ReportExport};
use crate::core::report::render_table;
use crate::core::{
    Notification, Notifier, Result, ResultRow, SearchMode, Storage, Transport, TransportRequest,
};
use crate::domain::model::SearchRecord;
use crate::utils::error::FinderError;

/// Search trigger plus the result set it owns.
///
/// The result set is replaced only by a successful search; failures leave the
/// previous results (and export state) untouched.
pub struct SearchService<T: Transport, N: Notifier> {
    transport: T,
    notifier: N,
    results: Vec<ResultRow>,
}

impl<T: Transport, N: Notifier> SearchService<T, N> {
    pub fn new(transport: T, notifier: N) -> Self {
        Self {
            transport,
            notifier,
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn export_enabled(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn render(&self) -> String {
        render_table(&self.results)
    }

    pub async fn search(&mut self, mode: SearchMode, query: &str) -> Result<&[ResultRow]> {
        match self.fetch(mode, query).await {
            Ok(rows) => {
                tracing::info!("🔎 {} search for `{}` returned {} rows", mode, query.trim(), rows.len());
                self.results = rows;
                Ok(&self.results)
            }
            Err(e) => {
                tracing::error!("❌ {} search for `{}` failed: {}", mode, query.trim(), e);
                self.notifier.notify(Notification::error(format!("Error: {}", e)));
                Err(e)
            }
        }
    }

    async fn fetch(&self, mode: SearchMode, query: &str) -> Result<Vec<ResultRow>> {
        let request = TransportRequest::get(mode.endpoint()).with_query(mode.query_param(), query.trim());

        tracing::debug!("Making search request to: {} ({:?})", request.path, request.query);
        let response = self.transport.send(request).await?;
        tracing::debug!("Search response status: {}", response.status);

        if !response.is_success() {
            let status = response.status;
            return Err(response.into_application_error(format!("unexpected status {}", status)));
        }

        let records: Vec<SearchRecord> = response.json()?;
        Ok(records.into_iter().map(ResultRow::from).collect())
    }

    /// Renders the current result set for export.
    pub fn prepare_export(&self, format: ExportFormat, filename: &str) -> Result<ReportExport> {
        if !self.export_enabled() {
            return Err(FinderError::ValidationError {
                message: "There are no search results to export".to_string(),
            });
        }
        ReportExport::from_rows(&self.results, format, filename)
    }

    pub async fn export<S: Storage>(
        &self,
        storage: &S,
        format: ExportFormat,
        filename: &str,
    ) -> Result<String> {
        let export = self.prepare_export(format, filename)?;
        export_report(storage, &export.text, &export.filename).await
    }
}
