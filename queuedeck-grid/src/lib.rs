//! Windowed tabular data engine for the queuedeck dashboard.
//!
//! Takes an in-memory record collection, applies multi-column filters and
//! multi-key sorts, computes per-column facet counts, and hands only the
//! visible slice of rows (a scroll window or a page) to the rendering side.
//!
//! ```
//! use queuedeck_grid::{Column, GridConfig, GridPipeline, SortDirection, Value};
//!
//! struct Msg { id: u32, state: &'static str }
//!
//! let columns = vec![
//!     Column::new("id", "ID", |m: &Msg| Value::from(m.id)).sortable(),
//!     Column::new("state", "State", |m: &Msg| Value::from(m.state)).multi_select(),
//! ];
//! let records = vec![
//!     Msg { id: 2, state: "active" },
//!     Msg { id: 1, state: "deadLettered" },
//! ];
//! let mut grid = GridPipeline::with_records(columns, GridConfig::new().paginated(10), records)?;
//! grid.set_sort("id", SortDirection::Asc, false);
//!
//! let page = grid.page().expect("paginated");
//! assert_eq!(page.rows[0].record.id, 1);
//! assert_eq!(grid.facets("state").unwrap().count(&Value::from("active")), 1);
//! # Ok::<(), queuedeck_grid::GridError>(())
//! ```

mod cells;
pub mod column;
pub mod config;
pub mod error;
pub mod facet;
pub mod filter;
pub mod frame;
pub mod pagination;
pub mod pipeline;
pub mod records;
pub mod row;
pub mod selection;
pub mod snapshot;
pub mod sort;
pub mod state;
pub mod value;
pub mod virtualizer;

pub use column::{Column, FilterVariant};
pub use config::{GridConfig, ViewMode};
pub use error::{GridError, GridWarning};
pub use facet::{Facet, Facets};
pub use pagination::{Page, PageInfo};
pub use pipeline::{GridPipeline, SubscriptionId};
pub use records::{GridRecord, QueueMessage, ServiceEntry, TrackingEntry};
pub use row::{Row, RowId};
pub use selection::{Selection, SelectionMode};
pub use snapshot::{GridSnapshot, VisibleWindow};
pub use state::{FilterState, FilterValue, SortDirection, SortKey, SortState};
pub use value::Value;
pub use virtualizer::{ScrollAlign, VirtualItem, VirtualRange, Virtualizer};
