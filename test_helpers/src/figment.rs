//! Running test bodies inside a `figment::Jail`.
//!
//! The jail gives each closure a scratch working directory and a private copy
//! of the environment. [`with_jail`] lets the closure use `anyhow` errors and
//! hands its value back to the caller.

use std::cell::RefCell;

use anyhow::{Result, anyhow};
use figment::Jail;

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down once the closure completes, including when it
/// returns an error.
///
/// # Errors
///
/// Returns the closure's error, or an error when the jail cannot be created.
///
/// # Examples
///
/// ```
/// use test_helpers::figment::with_jail;
///
/// let contents = with_jail(|jail| {
///     jail.create_file("settings.yaml", "port: 8080")?;
///     Ok(std::fs::read_to_string("settings.yaml")?)
/// })?;
/// assert_eq!(contents, "port: 8080");
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Jail) -> Result<T>,
{
    let output = RefCell::new(None);
    Jail::try_with(|jail| {
        output.replace(Some(f(jail)));
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output
        .into_inner()
        .ok_or_else(|| anyhow!("jail closure did not produce a result"))?
}
