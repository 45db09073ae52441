//! Audio backend implementations
//!
//! Only compiled with the `audio` feature.

pub mod rodio_backend;

pub use rodio_backend::RodioCue;
