//! Core types for hfsel
//!
//! This module holds the foundation the rest of the crate builds on: the
//! strongly-typed error taxonomy shared by every pipeline stage.
//!
//! # Design Principles
//!
//! ## Error First Design
//! Every operation that can fail returns a [`Result`] with meaningful error
//! information. A fatal error anywhere in the pipeline aborts the run before
//! any output is emitted; there is no partial-result mode.
//!
//! ## Type Safety
//! Failure modes are statically typed ([`HfselError`]); pattern matching on
//! variants is how tests and the command builder distinguish external-tool
//! failures from configuration or schema problems.
//!
//! # Examples
//!
//! ```rust
//! use hfsel::core::HfselError;
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(HfselError::TenantsDirNotFound {
//!         path: "tenants".to_string(),
//!     }
//!     .into())
//! }
//!
//! assert!(example_operation().is_err());
//! ```

pub mod error;

pub use error::HfselError;
