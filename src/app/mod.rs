// SVG2Icon - app/mod.rs
//
// Application layer: batch generation, container packaging, download bundles.
// Dependencies: core and platform layers.

pub mod download;
pub mod generator;
pub mod packager;
