//! Modules layer - clients for the external services the workflow delegates to

pub mod storage;
