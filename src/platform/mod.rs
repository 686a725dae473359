// FortiRep - platform/mod.rs
//
// Platform abstraction layer: config file location and loading.
// Dependencies: standard library, directories crate, toml, util.
// Must NOT depend on: core, app, report.

pub mod config;
