// FortiRep - core/mod.rs
//
// Core report-computation layer: field parsing, classification,
// aggregation, and the monthly roll-up.
// Dependencies: chrono, regex, serde, util.
// Must NOT depend on: report, platform, app, or any I/O directly.

pub mod aggregate;
pub mod fields;
pub mod model;
pub mod module;
pub mod normalize;
pub mod period;
pub mod rollup;
