//! Search-and-aggregation engine: fans each coordinate out across every
//! category, reduces results to minimum distances, and delivers rows in
//! input order.

pub mod aggregate;
pub mod batch;
pub mod delivery;

pub use aggregate::aggregate_coordinate;
pub use batch::{run_batch, BatchSummary, RowSink};
pub use delivery::OrderedDelivery;
