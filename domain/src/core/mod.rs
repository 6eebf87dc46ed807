//! Core domain primitives shared by every bounded context

pub mod error;
