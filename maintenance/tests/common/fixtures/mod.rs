//! This module provides reusable test utilities:
//! - Test configuration builders
//! - Topologies and schedulers wired to in-memory storage
//! - Common test data

// Allow unused code in test fixtures - each test binary uses a subset
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod failing_topology;
pub mod test_config;
pub mod test_data;
pub mod test_scheduler;

// Re-export commonly used items
pub use failing_topology::FailingTopology;
pub use test_config::TestConfigBuilder;
pub use test_data::*;
pub use test_scheduler::*;
