//! lissajous - stereo sine generator with a live XY scope.

pub mod app;
pub mod args;
pub mod ui;
