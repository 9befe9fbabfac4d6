//! REST transport for a multi-region messaging backend.
//!
//! # Data Flow
//! ```text
//! RegionConfig
//!     → RestConnector::connect → RestRegion (reqwest client per region)
//!
//! factory(&Arc<RestRegion>)
//!     → publish.rs  GET /publish/{pub}/{sub}/0/{channel}/0/{json}
//!     → time.rs     GET /time/0 (also the health check)
//!     → client.rs   response → Outcome { result, Status }
//! ```
//!
//! # Status Mapping
//! - Request/connect deadline elapsed → Timeout
//! - Connection refused/reset → NetworkIssues
//! - 400 → BadRequest, 403 → AccessDenied
//! - Undecodable success body → MalformedResponse
//! - Everything else → Unknown (with status code)

pub mod client;
pub mod publish;
pub mod time;

pub use client::{RestConnector, RestRegion};
pub use publish::{Publish, PublishResponse};
pub use time::{Time, TimeResponse};
