// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod notifier;
pub mod progress;
pub mod storage;

pub use http::ReqwestTransport;
pub use notifier::ConsoleNotifier;
pub use progress::TerminalProgress;
pub use storage::LocalStorage;
