pub mod error;
pub mod explorer;
pub mod interact;
pub mod network;
pub mod performance;
pub mod pipeline;
pub mod result;
pub mod security;
pub mod seo;
pub mod session;
pub mod synthetic;

pub use error::{AuditError, SessionError};
pub use explorer::{CrawlConfig, Explorer};
pub use pipeline::AuditPipeline;
pub use result::{PageAudit, PageFailure, PageResult};
pub use session::{AccessibilityAuditor, PageSession};
