use crate::core::{
    FileUpload, InsertOutcome, Notification, Notifier, ProgressReporter, Result, Transport,
    TransportRequest, TransportResponse, UploadSummary,
};
use crate::domain::model::NewTenant;
use crate::utils::error::FinderError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TENANT_ENDPOINT: &str = "/insert/_tenant";
pub const BATCH_ENDPOINT: &str = "/insert/_batch";
pub const BATCH_FIELD: &str = "file";

const TENANT_ADDED: &str = "Tenant information added.";
const REQUEST_NOT_SENT: &str = "Error - Could not send request.";
const UPLOAD_FAILED: &str = "Error - File upload failed.";

/// Input of one insert action: a single record, a CSV file, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertForm {
    pub name: String,
    pub address: String,
    pub file: Option<PathBuf>,
}

impl InsertForm {
    pub fn has_record(&self) -> bool {
        !self.name.is_empty() && !self.address.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadResult {
    pub outcome: InsertOutcome,
    pub summary: UploadSummary,
}

/// What each path of a submit did; `None` means the path was not triggered.
#[derive(Debug, Default)]
pub struct SubmitReport {
    pub tenant: Option<Result<InsertOutcome>>,
    pub upload: Option<Result<UploadResult>>,
}

impl SubmitReport {
    pub fn is_empty(&self) -> bool {
        self.tenant.is_none() && self.upload.is_none()
    }

    pub fn first_error(&self) -> Option<&FinderError> {
        let tenant = self.tenant.as_ref().and_then(|r| r.as_ref().err());
        let upload = self.upload.as_ref().and_then(|r| r.as_ref().err());
        tenant.or(upload)
    }

    /// Collapses the report into the first failure, tenant path first.
    pub fn into_result(self) -> Result<()> {
        if let Some(Err(e)) = self.tenant {
            return Err(e);
        }
        if let Some(Err(e)) = self.upload {
            return Err(e);
        }
        Ok(())
    }
}

pub struct InsertService<T: Transport, N: Notifier> {
    transport: T,
    notifier: N,
    progress: Arc<dyn ProgressReporter>,
}

impl<T: Transport, N: Notifier> InsertService<T, N> {
    pub fn new(transport: T, notifier: N, progress: Arc<dyn ProgressReporter>) -> Self {
        Self {
            transport,
            notifier,
            progress,
        }
    }

    /// Runs both paths of the form together. The file selection is always
    /// cleared; name and address are cleared once the server has answered.
    pub async fn submit(&self, form: &mut InsertForm) -> SubmitReport {
        let file = form.file.take();
        let record = form.has_record();
        let InsertForm { name, address, .. } = form;

        let tenant_path = async {
            if record {
                Some(self.submit_tenant(name, address).await)
            } else {
                None
            }
        };
        let upload_path = async {
            match file {
                Some(path) => Some(self.upload_file(&path).await),
                None => None,
            }
        };

        let (tenant, upload) = tokio::join!(tenant_path, upload_path);
        SubmitReport { tenant, upload }
    }

    pub async fn submit_tenant(&self, name: &mut String, address: &mut String) -> Result<InsertOutcome> {
        let body = serde_json::to_value(NewTenant {
            name: name.clone(),
            address: address.clone(),
        })?;

        tracing::debug!("Submitting tenant `{}` at `{}`", name, address);
        let response = match self.transport.send(TransportRequest::post_json(TENANT_ENDPOINT, body)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("❌ Tenant insert request failed: {}", e);
                self.notifier.notify(Notification::error(REQUEST_NOT_SENT));
                return Err(e);
            }
        };

        let result = match InsertOutcome::from_status(response.status) {
            InsertOutcome::Created => {
                tracing::info!("✅ Tenant `{}` added", name);
                self.notifier.notify(Notification::success(TENANT_ADDED));
                Ok(InsertOutcome::Created)
            }
            _ => {
                let reason = status_reason(&response);
                tracing::error!("❌ Tenant insert rejected: {} {}", response.status, reason);
                self.notifier.notify(Notification::error(format!("Error - {}", reason)));
                Err(response.into_application_error("tenant was not created"))
            }
        };

        name.clear();
        address.clear();
        result
    }

    pub async fn upload_file(&self, path: &Path) -> Result<UploadResult> {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("❌ Could not read {}: {}", path.display(), e);
                self.notifier
                    .notify(Notification::error(format!("Error - Could not read {}.", path.display())));
                return Err(e.into());
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        self.upload_bytes(file_name, content).await
    }

    pub async fn upload_bytes(&self, file_name: String, content: Vec<u8>) -> Result<UploadResult> {
        tracing::info!("📤 Uploading {} ({} bytes)", file_name, content.len());
        let upload = FileUpload::new(BATCH_FIELD, file_name, content);

        let sent = self
            .transport
            .upload(BATCH_ENDPOINT, upload, Arc::clone(&self.progress))
            .await;
        self.progress.reset();

        match sent {
            Ok(response) => self.classify_upload(response),
            Err(e) => {
                tracing::error!("❌ Upload request failed: {}", e);
                self.notifier.notify(Notification::error(REQUEST_NOT_SENT));
                Err(e)
            }
        }
    }

    fn classify_upload(&self, response: TransportResponse) -> Result<UploadResult> {
        let outcome = InsertOutcome::from_status(response.status);
        let summary = match outcome {
            InsertOutcome::Failure => {
                let status = response.status;
                Err(response.into_application_error(format!("upload rejected with status {}", status)))
            }
            _ => response.json::<UploadSummary>().and_then(|summary| match summary.message() {
                Some(message) => Ok((summary, message)),
                None => Err(response.into_application_error("entry counts out of range")),
            }),
        };

        match summary {
            Ok((summary, message)) => {
                let notification = match outcome {
                    InsertOutcome::PartialSuccess => Notification::warning(message),
                    _ => Notification::success(message),
                };
                tracing::info!(
                    "📥 Import finished: {} imported, {} failed",
                    summary.success,
                    summary.failed
                );
                self.notifier.notify(notification);
                Ok(UploadResult { outcome, summary })
            }
            Err(e) => {
                tracing::error!("❌ Upload failed: {}", e);
                self.notifier.notify(Notification::error(UPLOAD_FAILED));
                Err(e)
            }
        }
    }
}

fn status_reason(response: &TransportResponse) -> String {
    if response.status_text.is_empty() {
        response.status.to_string()
    } else {
        response.status_text.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{MockTransport, ProgressEvent, RecordingNotifier, RecordingProgress};
    use crate::core::{Severity, UploadProgress};
    use crate::domain::ports::HttpMethod;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn service(
        transport: &Arc<MockTransport>,
        notifier: &Arc<RecordingNotifier>,
        progress: &Arc<RecordingProgress>,
    ) -> InsertService<Arc<MockTransport>, Arc<RecordingNotifier>> {
        InsertService::new(transport.clone(), notifier.clone(), progress.clone())
    }

    fn form(name: &str, address: &str) -> InsertForm {
        InsertForm {
            name: name.to_string(),
            address: address.to_string(),
            file: None,
        }
    }

    #[tokio::test]
    async fn test_single_insert_created() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(201, "Created", r#"{"name": "Acme"}"#);
        let service = service(&transport, &notifier, &progress);
        let mut form = form("Acme", "1 Main St");

        let report = service.submit(&mut form).await;

        assert!(matches!(report.tenant, Some(Ok(InsertOutcome::Created))));
        assert!(report.upload.is_none());
        assert_eq!(form, InsertForm::default());

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "/insert/_tenant");
        assert_eq!(
            requests[0].json_body,
            Some(serde_json::json!({"name": "Acme", "address": "1 Main St"}))
        );
        assert_eq!(notifier.notifications(), vec![Notification::success("Tenant information added.")]);
    }

    #[tokio::test]
    async fn test_single_insert_rejected_still_clears_fields() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(400, "Bad Request", r#"{"error": "Could not normalize address"}"#);
        let service = service(&transport, &notifier, &progress);
        let mut form = form("Acme", "nowhere");

        let report = service.submit(&mut form).await;

        assert!(matches!(
            report.first_error(),
            Some(FinderError::ApplicationError { status: 400, .. })
        ));
        assert!(form.name.is_empty());
        assert!(form.address.is_empty());
        assert_eq!(notifier.notifications(), vec![Notification::error("Error - Bad Request")]);
    }

    #[tokio::test]
    async fn test_single_insert_transport_failure_keeps_fields() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond(Err(FinderError::transport("connection refused")));
        let service = service(&transport, &notifier, &progress);
        let mut form = form("Acme", "1 Main St");

        let report = service.submit(&mut form).await;

        assert!(matches!(report.tenant, Some(Err(FinderError::TransportError { .. }))));
        assert_eq!(form.name, "Acme");
        assert_eq!(
            notifier.notifications(),
            vec![Notification::error("Error - Could not send request.")]
        );
    }

    #[tokio::test]
    async fn test_incomplete_record_sends_nothing() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        let service = service(&transport, &notifier, &progress);
        let mut form = form("Acme", "");

        let report = service.submit(&mut form).await;

        assert!(report.is_empty());
        assert!(transport.requests().is_empty());
        assert!(notifier.notifications().is_empty());
        assert_eq!(form.name, "Acme");
    }

    #[tokio::test]
    async fn test_upload_partial_success_warns() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(206, "Partial Content", r#"{"success": 8, "failed": 2}"#);
        let service = service(&transport, &notifier, &progress);

        let result = service
            .upload_bytes("tenants.csv".to_string(), b"Acme,1 Main St\n".to_vec())
            .await
            .unwrap();

        assert_eq!(result.outcome, InsertOutcome::PartialSuccess);
        assert_eq!(result.summary.total(), Some(10));
        let notifications = notifier.notifications();
        assert_eq!(notifications[0].message, "Imported 8/10 entries.");
        assert_eq!(notifications[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_upload_created_succeeds() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(201, "Created", r#"{"success": 5, "failed": 0}"#);
        let service = service(&transport, &notifier, &progress);

        let result = service
            .upload_bytes("tenants.csv".to_string(), vec![b'x'; 64])
            .await
            .unwrap();

        assert_eq!(result.outcome, InsertOutcome::Created);
        assert_eq!(
            notifier.notifications(),
            vec![Notification::success("Imported 5/5 entries.")]
        );

        let uploads = transport.uploads();
        assert_eq!(uploads[0].0, "/insert/_batch");
        assert_eq!(uploads[0].1.field, "file");
        assert_eq!(uploads[0].1.file_name, "tenants.csv");
    }

    #[tokio::test]
    async fn test_upload_progress_is_reset_after_completion() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(500, "Internal Server Error", "");
        let service = service(&transport, &notifier, &progress);

        let err = service
            .upload_bytes("tenants.csv".to_string(), vec![b'x'; 100])
            .await
            .unwrap_err();

        assert!(matches!(err, FinderError::ApplicationError { status: 500, .. }));
        assert_eq!(
            progress.events(),
            vec![
                ProgressEvent::Update(UploadProgress::new(50, 100)),
                ProgressEvent::Update(UploadProgress::new(100, 100)),
                ProgressEvent::Reset,
            ]
        );
        assert_eq!(
            notifier.notifications(),
            vec![Notification::error("Error - File upload failed.")]
        );
    }

    #[tokio::test]
    async fn test_upload_malformed_body_is_failure() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(201, "Created", "<html></html>");
        let service = service(&transport, &notifier, &progress);

        let err = service
            .upload_bytes("tenants.csv".to_string(), vec![b'x'; 10])
            .await
            .unwrap_err();

        assert!(matches!(err, FinderError::ApplicationError { status: 201, .. }));
        assert_eq!(notifier.notifications()[0].message, "Error - File upload failed.");
        assert_eq!(progress.events().last(), Some(&ProgressEvent::Reset));
    }

    #[tokio::test]
    async fn test_upload_overflowing_counts_is_failure() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(206, "Partial Content", r#"{"success": 18446744073709551615, "failed": 1}"#);
        let service = service(&transport, &notifier, &progress);

        let err = service
            .upload_bytes("tenants.csv".to_string(), vec![b'x'; 10])
            .await
            .unwrap_err();

        assert!(matches!(err, FinderError::ApplicationError { status: 206, .. }));
        assert_eq!(
            notifier.notifications(),
            vec![Notification::error("Error - File upload failed.")]
        );
        assert_eq!(progress.events().last(), Some(&ProgressEvent::Reset));
    }

    #[tokio::test]
    async fn test_upload_transport_failure_resets_progress() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond(Err(FinderError::transport("connection reset")));
        let service = service(&transport, &notifier, &progress);

        let err = service
            .upload_bytes("tenants.csv".to_string(), vec![b'x'; 10])
            .await
            .unwrap_err();

        assert!(err.is_request_failure());
        assert_eq!(progress.events().last(), Some(&ProgressEvent::Reset));
        assert_eq!(notifier.notifications()[0].message, "Error - Could not send request.");
    }

    #[tokio::test]
    async fn test_submit_runs_both_paths_and_clears_file() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        transport.respond_with(201, "Created", "{}");
        transport.respond_with(201, "Created", r#"{"success": 2, "failed": 0}"#);
        let service = service(&transport, &notifier, &progress);

        let mut csv = NamedTempFile::new().unwrap();
        csv.write_all(b"Acme,1 Main St\nBeta,2 Oak Rd\n").unwrap();
        let mut form = InsertForm {
            name: "Gamma".to_string(),
            address: "3 Elm Ave".to_string(),
            file: Some(csv.path().to_path_buf()),
        };

        let report = service.submit(&mut form).await;

        assert!(report.first_error().is_none());
        assert!(report.tenant.is_some());
        assert!(report.upload.is_some());
        assert_eq!(form, InsertForm::default());
        assert_eq!(transport.uploads()[0].1.content, b"Acme,1 Main St\nBeta,2 Oak Rd\n");
        assert_eq!(notifier.notifications().len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_reported() {
        let (transport, notifier, progress) =
            (MockTransport::new(), RecordingNotifier::new(), RecordingProgress::new());
        let service = service(&transport, &notifier, &progress);
        let mut form = InsertForm {
            file: Some(PathBuf::from("/definitely/not/here.csv")),
            ..InsertForm::default()
        };

        let report = service.submit(&mut form).await;

        assert!(matches!(report.upload, Some(Err(FinderError::IoError(_)))));
        assert!(transport.uploads().is_empty());
        assert_eq!(
            notifier.notifications(),
            vec![Notification::error("Error - Could not read /definitely/not/here.csv.")]
        );
        assert!(form.file.is_none());
    }
}
