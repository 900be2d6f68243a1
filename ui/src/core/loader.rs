//! Fetches the raw result table for the current platform.
//!
//! Browser builds go through the `read_table` server function; native builds
//! (desktop, and the server itself while rendering) read the configured file
//! directly.

use api::SourceRow;
use dioxus::logger::tracing::debug;

pub async fn fetch_source_rows() -> Result<Vec<SourceRow>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        let rows = api::read_table().await.map_err(|err| err.to_string())?;
        debug!(rows = rows.len(), "received result table from server");
        Ok(rows)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let rows = api::source::load_configured_table().map_err(|err| err.to_string())?;
        debug!(rows = rows.len(), "read result table from disk");
        Ok(rows.as_ref().clone())
    }
}
