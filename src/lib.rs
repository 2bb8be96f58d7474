//! Fanboard onboarding: bootstrap and headless CLI.
//!
//! The CLI replays presentation intents against the onboarding controller,
//! using the same wiring an embedding application would use.

pub mod bootstrap;
pub mod cli;
