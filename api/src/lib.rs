//! Access to the data-quality result table shared by every DQ Lens shell.
//!
//! Native targets read the table directly (see [`source`]); browser clients go
//! through the [`read_table`] server function.

mod model;
pub use model::SourceRow;

#[cfg(not(target_arch = "wasm32"))]
pub mod settings;
#[cfg(not(target_arch = "wasm32"))]
pub mod source;

use dioxus::prelude::*;

/// Read the configured result table. The table is loaded once per server process.
#[server]
pub async fn read_table() -> Result<Vec<SourceRow>, ServerFnError> {
    let rows = crate::source::load_configured_table()
        .map_err(|err| ServerFnError::ServerError(err.to_string()))?;
    Ok(rows.as_ref().clone())
}
