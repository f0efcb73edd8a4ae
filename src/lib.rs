//! Billboard client library.
//!
//! Reads and writes a short-message billboard that lives in a smart
//! contract. Reads go through a GraphQL indexer with a direct chain
//! fallback; writes go through a validate/rate-limit/build/sign/submit/
//! confirm pipeline, fee-sponsored when a "gas station" service accepts
//! the transaction and self-paid otherwise.
//!
//! ```text
//!   feed (read)          posting (write)
//!   ─────────────        ─────────────────────────────────────
//!   indexer ──┐          validate → rate-limit → build  → sign
//!             ├─ feed                                      │
//!   chain  ───┘          confirm ← chain/sponsor ← submit ─┘
//! ```

// External services
pub mod chain;
pub mod indexer;
pub mod sponsor;

// Core flows
pub mod feed;
pub mod posting;
pub mod wallet;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::BillboardConfig;
pub use feed::{FeedService, Message};
pub use posting::{PostError, PostPipeline, PostReceipt};
pub use wallet::{WalletKind, WalletSession, WalletStatus};
