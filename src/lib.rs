//! boxcache: normalized client cache for inventory and distribution apps
//!
//! Query results are flattened into entities identified by business keys
//! (box labels, QR codes), paginated box lists accumulate page by page per
//! base, client-only fields live next to server data, and UI preferences
//! are observable cells.
//!
//! # Example
//!
//! ```
//! use boxcache::{ArgValue, Field, Operation, Session, Variables, WriteOptions};
//! use serde_json::json;
//!
//! let session = Session::default();
//! let op = Operation::query("BoxesForBase").select(
//!     Field::new("boxes")
//!         .arg("baseId", ArgValue::literal("5"))
//!         .select([
//!             Field::new("totalCount"),
//!             Field::new("elements").select([Field::new("labelIdentifier")]),
//!         ]),
//! );
//! let page = json!({"boxes": {
//!     "totalCount": 2,
//!     "elements": [{"__typename": "Box", "labelIdentifier": "L100"}],
//! }});
//! session
//!     .cache()
//!     .write_query(&op, &Variables::new(), &page, WriteOptions::default());
//!
//! let data = session.cache().read_query(&op, &Variables::new()).unwrap();
//! assert_eq!(data["boxes"]["elements"][0]["labelIdentifier"], json!("L100"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod session;
pub mod types;

pub use session::Session;
pub use types::*;
