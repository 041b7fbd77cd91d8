//! Use-case orchestration layer.
//!
//! # Responsibility
//! - Expose the entry points the interactive shell calls.
//! - Keep storage access behind the `RecordStore` contract.

pub mod work_log_service;
