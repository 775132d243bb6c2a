//! JSON Output

use crate::report::FileResult;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

const INDENT: &[u8] = b"    ";

/// Generate the JSON document for a benchmark run.
///
/// Serializes the file results as one array, pretty-printed with four-space
/// indentation.
pub fn generate_json_report(results: &[FileResult]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    results.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
