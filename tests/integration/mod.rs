//! Integration tests for disha-nav
//!
//! Drive the public API end to end: in-process position and destination
//! topics, the update coordinator, a recording speech sink and a fake
//! geocoder.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration -- --nocapture
//! ```
//!
//! Walk scenarios live in `tests/integration/scenarios/*.toml`.

mod guidance;
mod harness;
mod scenarios;
