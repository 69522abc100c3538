//! Query modules for the NGI SDK.
//!
//! API-backed queries borrow the shared [`NgiClient`](crate::client::NgiClient)
//! through a `RefCell`; the history store borrows the DuckDB
//! [`Connection`](crate::connection::Connection).

pub mod forward;
pub mod history;
pub mod prices;

pub use forward::{
    align_contracts, compare_curves, month_difference, pad_to_match, prompt_month,
    ForwardCurveQuery,
};
pub use history::{DateRange, InsertSummary, PriceHistoryQuery, StoreStats, StoredLocation};
pub use prices::{check_season_year, DailyPriceQuery};
