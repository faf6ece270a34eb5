//! Shared pieces of the `voxlive` and `voxlive-hub` binaries: argument
//! parsing, the Vosk-backed engine, the terminal dashboard, and the run loop.

pub mod app;
pub mod args;
pub mod dashboard;
pub mod engine;
