//! Latest-version lookup across package registries
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Factory   │────▶│  Registry   │────▶│ HttpClient  │
//! │  (resolve)  │     │  (adapter)  │     │ (one GET)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`factory`]: Maps canonical names and aliases onto adapters
//! - [`registry`]: The adapter trait
//! - [`registries`]: One adapter per ecosystem (npm, crates.io, PyPI, ...)
//! - [`http`]: Shared fetch helper and status-to-error mapping
//! - [`error`]: Error type and its coarse classification
//! - [`types`]: The `PackageVersion` record

pub mod error;
pub mod factory;
pub mod http;
pub mod registries;
pub mod registry;
pub mod types;
