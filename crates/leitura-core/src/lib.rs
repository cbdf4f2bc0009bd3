//! Platform-independent core for the Leitura paced reader.
//!
//! Everything that touches a device (sensor, speaker, vibration motor,
//! storage, screen, input) is reached through a trait so the same state
//! machine runs on the host binary and under test.

#![no_std]

extern crate alloc;

pub mod app;
pub mod feedback;
pub mod input;
pub mod motion;
pub mod persistence;
pub mod render;
pub mod session;
pub mod text_policy;
