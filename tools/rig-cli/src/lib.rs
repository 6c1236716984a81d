//! Drivers behind the `rig` command.
//!
//! - [`press`] - lower the probe base into a contact plane and log forces
//! - [`stereo`] - orbit a stereo pair around a scene and write a dataset
//! - [`verify`] - hanging-mass check of the geometric force estimate
//! - [`report`] - summarize a recorded force log
//!
//! Each driver takes a [`config`] struct that loads from TOML.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod logging;
pub mod press;
pub mod report;
pub mod stereo;
pub mod verify;
