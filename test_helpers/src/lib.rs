//! Test helpers shared across crates in the `tuner` workspace.
//!
//! - [`env`] serialises process environment mutations behind RAII guards.
//! - [`figment`] runs closures inside a `figment::Jail` with `anyhow` errors.

pub mod env;
pub mod figment;
