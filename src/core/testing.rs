//! In-memory ports shared by the service tests.

use crate::core::{
    FileUpload, Notification, Notifier, ProgressReporter, Result, Transport, TransportRequest,
    TransportResponse, UploadProgress,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    requests: Mutex<Vec<TransportRequest>>,
    uploads: Mutex<Vec<(String, FileUpload)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, response: Result<TransportResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn respond_with(&self, status: u16, status_text: &str, body: &str) {
        self.respond(Ok(TransportResponse::new(status, status_text, body)));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, FileUpload)> {
        self.uploads.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<TransportResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no response queued for mock transport")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        self.next_response()
    }

    async fn upload(
        &self,
        path: &str,
        upload: FileUpload,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<TransportResponse> {
        let total = upload.len();
        progress.update(UploadProgress::new(total / 2, total));
        progress.update(UploadProgress::new(total, total));
        self.uploads.lock().unwrap().push((path.to_string(), upload));
        self.next_response()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Update(UploadProgress),
    Reset,
}

#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn update(&self, progress: UploadProgress) {
        self.events.lock().unwrap().push(ProgressEvent::Update(progress));
    }

    fn reset(&self) {
        self.events.lock().unwrap().push(ProgressEvent::Reset);
    }
}
