//! Core library for the voxlive microphone transcription demos.
//!
//! Provides audio device selection and capture, the transcript session that
//! turns recognizer output into a rolling sentence log, and model resolution
//! (local paths, built-in language packs, remote hub archives).

pub mod audio;
pub mod model;
pub mod transcribe;
