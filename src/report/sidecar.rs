// FortiRep - report/sidecar.rs
//
// JSON sidecar persistence for daily summaries. The sidecar is the
// primary input to the monthly roll-up; HTML extraction is only the
// fallback for dailies whose sidecar has gone missing. The envelope
// carries an explicit version so a future summary shape change fails
// loudly instead of merging garbage.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::core::model::DailySummary;
use crate::util::constants;
use crate::util::error::{ExportError, ExtractError};

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    summary: &'a DailySummary,
}

/// Serialize a daily summary into its sidecar envelope.
pub fn write_sidecar<W: Write>(
    summary: &DailySummary,
    writer: W,
    sidecar_path: &Path,
) -> Result<(), ExportError> {
    let envelope = Envelope {
        version: constants::SIDECAR_VERSION,
        summary,
    };
    serde_json::to_writer_pretty(writer, &envelope).map_err(|e| ExportError::Json {
        path: sidecar_path.to_path_buf(),
        source: e,
    })
}

/// Parse a sidecar back into a daily summary, checking the envelope
/// version before touching the payload.
pub fn read_sidecar(sidecar_path: &Path, content: &str) -> Result<DailySummary, ExtractError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| ExtractError::SidecarJson {
            path: sidecar_path.to_path_buf(),
            source: e,
        })?;

    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0) as u32;
    if version != constants::SIDECAR_VERSION {
        return Err(ExtractError::SidecarVersion {
            path: sidecar_path.to_path_buf(),
            found: version,
            expected: constants::SIDECAR_VERSION,
        });
    }

    let payload = value
        .get("summary")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    serde_json::from_value(payload).map_err(|e| ExtractError::SidecarJson {
        path: sidecar_path.to_path_buf(),
        source: e,
    })
}

// =============================================================================
// Tests
// =============================================================================
