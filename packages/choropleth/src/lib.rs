#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Color-scale computation and renderable frame building.
//!
//! Everything here is a pure function over a loaded
//! [`Dataset`](epi_map_dataset::Dataset): [`scale::compute_scales`]
//! fixes one color domain per metric for the whole time range, and
//! [`frame::build_frame`] resolves one (month, metric) selection into a
//! per-district frame a renderer can draw directly.

pub mod format;
pub mod frame;
pub mod scale;
