//! Generative model adapters.
//!
//! This module provides a reqwest implementation of the `NoteGenerator` port
//! against the Gemini `generateContent` API.

mod dto;
mod gemini_http_generator;

pub use gemini_http_generator::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiConfig, GeminiHttpGenerator,
};
