//! Seasonal calendar normalization.
//!
//! Turns seasons of dated price observations into series aligned on a shared
//! `MM-DD` axis so different years can be overlaid:
//!
//! 1. [`calendar_keys`] -- the 365 canonical keys (no Feb 29)
//! 2. [`expand_flow_range`] -- the keys a priced flow range covers
//! 3. [`build_day_lookup`] -- one price per key for a season
//! 4. [`aggregate_range`] -- min/max/average per key across seasons
//! 5. [`assemble_seasonal_bundle`] -- aligned arrays, chart series and table rows
//!
//! Everything here is pure and synchronous.

pub mod assemble;
pub mod calendar;
pub mod flow;
pub mod lookup;
pub mod range;

pub use assemble::{assemble_seasonal_bundle, day_change};
pub use calendar::{calendar_keys, CalendarKey, CALENDAR_DAYS};
pub use flow::{expand_flow_range, parse_date, FlowDays};
pub use lookup::{build_day_lookup, DayLookup};
pub use range::{
    aggregate_range, band_from_pooled, band_from_years, BandKey, HistoricalBand, RangeBounds,
};
