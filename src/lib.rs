// Themescope: keyword-dictionary theme classification for Russian text.
//
// This is the library root. Each module corresponds to one stage of the
// theme-matching engine, plus the edge adapters (config, TCP server) that
// the binary wires together.

pub mod classifier;
pub mod config;
pub mod error;
pub mod keywords;
pub mod output;
pub mod scoring;
pub mod server;
pub mod store;
pub mod text;
