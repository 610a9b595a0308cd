// SVG2Icon - platform/mod.rs
//
// Platform abstraction layer: data directories, config.toml, filesystem
// helpers and external process plumbing.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
pub mod tools;
