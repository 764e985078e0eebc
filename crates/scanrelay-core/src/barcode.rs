use std::sync::LazyLock;

use regex::Regex;

/// A barcode is a standalone run of 11 to 13 decimal digits. A longer digit
/// run is some other identifier, not a barcode.
static BARCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{11,13})(?:[^0-9]|$)").unwrap());

/// First barcode-shaped digit run in `text`, if any. No checksum validation;
/// if several runs qualify, the first wins.
pub fn extract_barcode(text: &str) -> Option<&str> {
    BARCODE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
