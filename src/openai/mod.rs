//! Minimal client for an OpenAI compatible API.
mod client;

pub use client::{Api, Message, Role, Sampling, completion, text_completion};
