//! The write path: content policy, rate limiting, and the submission pipeline.

pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod validate;

pub use error::{classify_remote, PostError, RemoteFailure};
pub use pipeline::{PostPipeline, PostReceipt};
pub use rate_limit::RateLimiter;
pub use validate::{ContentPolicy, ContentViolation};
