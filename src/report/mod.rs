// FortiRep - report/mod.rs
//
// Report artifact layer: HTML rendering, sidecar persistence, the
// versioned extraction adapter, and CSV export. Everything here writes
// to Write implementors or returns strings; file placement and naming
// belong to the app layer.
// Dependencies: core, util, serde_json, csv, scraper.
// Must NOT depend on: app, platform.

pub mod export;
pub mod extract;
pub mod html;
pub mod sidecar;
