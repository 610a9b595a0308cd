// SVG2Icon - core/mod.rs
//
// Core domain layer: catalog, data model, rasterizer, containers, manifest.
// Must NOT depend on: app, platform, or spawn external processes.

pub mod catalog;
pub mod container;
pub mod manifest;
pub mod model;
pub mod raster;
pub mod validate;
