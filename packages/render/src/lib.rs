#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static choropleth rendering and export.
//!
//! Turns a loaded dataset into standalone HTML pages: an SVG map per
//! month with viridis fills, hover tooltips, and a color bar, plus an
//! index page linking every export.

pub mod export;
pub mod html;
pub mod interactive;
pub mod palette;
pub mod svg;
