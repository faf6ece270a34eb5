pub mod archive;
pub mod hub;
pub mod language_packs;
pub mod resolver;

pub use hub::{HubError, HuggingFaceHub, ModelHub};
pub use language_packs::DEFAULT_LANGUAGE;
pub use resolver::{ModelResolveError, ModelResolver};

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;
