use dioxus::logger::tracing::info;
use dioxus::prelude::*;

use crate::core::{
    aggregate::summary_rows,
    pipeline::ExpandedRow,
    platform,
    session::Granularity,
};
use crate::t;

const SUMMARY_HEADER: [&str; 5] = ["TABLE", "COLUMN", "TEST_NAME", "CRITERIA", "OCCURRENCES"];
const DETAILED_HEADER: [&str; 7] = [
    "TABLE",
    "COLUMN",
    "TEST_NAME",
    "CRITERIA",
    "OFFENDERS",
    "OCCURRENCES",
    "TEST_QUERY",
];

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[component]
pub fn ResultsExportPanel(rows: Vec<ExpandedRow>, granularity: Granularity) -> Element {
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);
    let filename = granularity.export_filename();

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some((
            "results-card__meta".to_string(),
            t!("export-working"),
        )),
        ExportStatus::Done(message) => Some((
            "results-card__meta results-card__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "results-card__meta results-card__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let csv_handler = {
        let export_rows = rows.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working);
            let export_rows = export_rows.clone();
            platform::spawn_future(async move {
                match perform_csv_export(export_rows, granularity).await {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
                busy_signal.set(false);
            });
        }
    };

    rsx! {
        section { class: "results-card results-export",
            div { class: "results-card__header",
                h2 { {t!("export-title")} }
                span { class: "results-card__meta", "{filename}" }
            }

            if rows.is_empty() {
                p { class: "results-card__placeholder", {t!("export-empty")} }
            } else {
                div { class: "results-export__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: csv_handler,
                        {t!("export-download-csv")}
                    }
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}

async fn perform_csv_export(rows: Vec<ExpandedRow>, granularity: Granularity) -> Result<String, String> {
    let bytes = build_csv(&rows, granularity)?;
    let filename = granularity.export_filename();
    info!(
        %filename,
        bytes = bytes.len(),
        platform = ?platform::Platform::current(),
        "exporting offenders"
    );
    let delivery = download_bytes(&filename, "text/csv", bytes).await?;
    Ok(delivery_message(delivery))
}

/// Native exports report where the file landed; browser downloads only that they began.
fn delivery_message(delivery: Option<String>) -> String {
    match delivery {
        Some(path) => t!("export-saved", path = path),
        None => t!("export-started"),
    }
}

/// UTF-8 CSV of `rows` at the given granularity, header row first.
pub fn build_csv(rows: &[ExpandedRow], granularity: Granularity) -> Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    match granularity {
        Granularity::Summary => {
            writer
                .write_record(SUMMARY_HEADER)
                .map_err(|err| err.to_string())?;
            for row in summary_rows(rows) {
                writer
                    .write_record([
                        row.table,
                        row.column,
                        row.test_name,
                        row.criteria.csv_field(),
                        csv_number(row.occurrences),
                    ])
                    .map_err(|err| err.to_string())?;
            }
        }
        Granularity::Detailed => {
            writer
                .write_record(DETAILED_HEADER)
                .map_err(|err| err.to_string())?;
            for row in rows {
                writer
                    .write_record([
                        row.table.as_str(),
                        row.column.as_str(),
                        row.test_name.as_str(),
                        row.criteria.csv_field().as_str(),
                        row.offenders.as_str(),
                        csv_number(row.occurrences).as_str(),
                        row.test_query.as_str(),
                    ])
                    .map_err(|err| err.to_string())?;
            }
        }
    }

    writer.into_inner().map_err(|err| err.to_string())
}

/// Whole counts export without a fractional part; anything else keeps full precision.
fn csv_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = desktop_export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
        file.write_all(&bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "DQ Lens", "DQ Lens")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}
