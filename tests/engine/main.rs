//! Integration tests for Layer 2: Engine
//!
//! Tests for the dependency graph, the scheduler, and event channels.

mod events;
mod graph;
