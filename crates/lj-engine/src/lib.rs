//! Synthesis engine for the Lissajous generator.
//!
//! A bank of sine oscillators split into a left and a right group, a stereo
//! mixer, and a short capture table feeding the XY scope.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bank;
mod engine;
mod frame;
mod oscillator;
pub mod params;
mod sample_buffer;

pub use bank::{default_rows, Channel, ChannelBank, Group, GROUP_GAIN};
pub use engine::{Engine, BLOCK_FRAMES};
pub use frame::{Frame, Point};
pub use oscillator::SineOsc;
pub use params::ParamRow;
pub use sample_buffer::SampleBuffer;
