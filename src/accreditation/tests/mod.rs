//! Scenario tests driving the engine through the public service facade and
//! router, the same way presentation code consumes it.

mod common;
mod registry;
