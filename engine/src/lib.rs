//! # Back-office Engine
//!
//! The list-view engine behind the back-office admin screens.
//!
//! Every admin view (buyers, demands, offers, designations, blogs, price
//! lists, ...) runs the same pipeline over a collection of rows:
//! criteria filter, free-text search, sort, and pagination, with a
//! selection that survives page navigation and mutation handlers that keep
//! the collection, the selection and the notification queue consistent.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never touches files, network or clocks; remote
//!   collections are reached through the [`Backend`] trait and time is
//!   passed in explicitly
//! - **Deterministic**: the same rows, query and filters always produce the
//!   same page
//! - **Generic**: any type implementing [`Row`] can be listed; [`Record`]
//!   is the JSON-backed implementation used by the server
//!
//! ## Core Concepts
//!
//! ### Query State
//!
//! [`QueryState`] holds the page index, page size, sort and search text.
//! Updates are expressed as [`QueryPatch`]es; anything other than a page
//! change sends the view back to page 1.
//!
//! ### Pipeline
//!
//! [`pipeline::run`] derives a [`ListResult`] from rows, a query and
//! [`FilterCriteria`]. Nothing derived is ever stored.
//!
//! ### Selection
//!
//! [`Selection`] tracks selected rows by id across pages.
//!
//! ### Mutations
//!
//! [`ListController`] applies [`Mutation`]s either to a local array
//! (mock-data views) or through a [`Backend`] followed by a re-fetch
//! (remote views), emitting one [`Notification`] per mutation.
//!
//! ## Quick Start
//!
//! ```rust
//! use backoffice_engine::{
//!     ColumnDef, FieldType, ListController, QueryPatch, Record, ViewConfig,
//! };
//! use serde_json::json;
//!
//! // 1. Describe the view
//! let view = ViewConfig::new("designations", "/designations")
//!     .item_label("Designation")
//!     .searchable(["name", "department"])
//!     .column(ColumnDef::new("name", "Name", FieldType::String))
//!     .column(ColumnDef::new("department", "Department", FieldType::String));
//!
//! // 2. Load rows into a local controller
//! let rows = vec![
//!     Record::new(1, json!({"name": "Sales Manager", "department": "Sales"}), 1000),
//!     Record::new(2, json!({"name": "HR Executive", "department": "HR"}), 1000),
//! ];
//! let mut controller = ListController::local(view, rows);
//!
//! // 3. Search and read the current page
//! controller.set_query(QueryPatch::new().query("sales"));
//! let result = controller.result();
//! assert_eq!(result.total(), 1);
//! assert_eq!(result.page_data().len(), 1);
//! ```
//!
//! ## Export
//!
//! [`export::export_csv`] renders rows into a UTF-8 CSV document with a
//! byte order mark, ready to be served as `text/csv`.

pub mod controller;
pub mod debounce;
pub mod error;
pub mod export;
pub mod filter;
pub mod mutation;
pub mod notify;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod schema;
pub mod selection;
pub mod store;
pub mod value;
pub mod view;

// Re-export main types at crate root
pub use controller::{Drawer, ListController};
pub use debounce::SearchDebouncer;
pub use error::Error;
pub use filter::FilterCriteria;
pub use mutation::{Mutation, MutationKind, MutationState, MutationTracker};
pub use notify::{Notification, NotificationLevel};
pub use pipeline::ListResult;
pub use query::{QueryChange, QueryPatch, QueryState, Sort, SortOrder, DEFAULT_PAGE_SIZE};
pub use record::{Record, Row, RowId};
pub use schema::{CollectionSchema, FieldDef, FieldError, FieldType};
pub use selection::{PageSelection, Selection};
pub use store::{Backend, Collection, MemoryStore};
pub use view::{ColumnDef, FilterDef, FilterOption, ViewConfig};

/// Type aliases for clarity
pub type FieldName = String;
pub type ViewName = String;
pub type Timestamp = u64;
