// FortiRep - app/mod.rs
//
// Application layer: pipeline orchestration, raw-log discovery, and the
// artifact inventory.
// Dependencies: core, report, platform, util.
// Must NOT depend on: the CLI surface in main.rs.

pub mod config;
pub mod generate;
pub mod inventory;
pub mod locate;
