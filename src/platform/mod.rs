// Logbook - platform/mod.rs
//
// Platform abstraction layer: directory resolution, device identity,
// configuration loading.
// Dependencies: standard library, directories crate.
// Must NOT depend on: core.

pub mod config;
pub mod device;
pub mod paths;
