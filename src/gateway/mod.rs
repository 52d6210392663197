//! # Gateway Core
//!
//! Maps REST verbs and URL segments onto existence-checked operations
//! against the backing store.
//!
//! # Routes
//!
//! - `/{db}` - database (GET lists tables, POST creates)
//! - `/{db}/rest/{table}` - table (GET lists rows, POST creates)
//! - `/{db}/rest/{table}/{key}` - row (GET, PUT, POST, DELETE)
//! - `/{db}/query/{query}` - query (GET)
//! - `/{db}/syncgroup/...` - reserved, always 500

pub mod dispatch;
pub mod errors;
pub mod listing;
pub mod locator;
pub mod query;
pub mod resource;
pub mod router;

pub use errors::{GatewayError, GatewayResult};
pub use listing::Reply;
pub use locator::{locate, Action, Target};
pub use resource::{DatabaseRef, RowRef, TableRef};
pub use router::route;
