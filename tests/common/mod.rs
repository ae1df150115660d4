//! Consolidated test utilities for git-tutor
//!
//! This module provides unified testing utilities for integration tests,
//! focused on driving real tutorial sessions against real repositories.

pub mod session;

pub use session::{setup_session, TestSession};
