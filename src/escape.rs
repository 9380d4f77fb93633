//! Internal module for JSON string escaping

/// Escape sequences for the control bytes `0x00`..=`0x1F`
///
/// The bytes with a short escape form defined by JSON (`\b`, `\t`, `\n`, `\f`,
/// `\r`) use it, all others use the `\u00xx` form with lowercase hex digits.
static CONTROL_ESCAPES: [&str; 32] = [
    "\\u0000", "\\u0001", "\\u0002", "\\u0003", "\\u0004", "\\u0005", "\\u0006", "\\u0007",
    "\\b", "\\t", "\\n", "\\u000b", "\\f", "\\r", "\\u000e", "\\u000f",
    "\\u0010", "\\u0011", "\\u0012", "\\u0013", "\\u0014", "\\u0015", "\\u0016", "\\u0017",
    "\\u0018", "\\u0019", "\\u001a", "\\u001b", "\\u001c", "\\u001d", "\\u001e", "\\u001f",
];

/// Returns the escape sequence for `byte`, or `None` if it can be emitted verbatim
///
/// Only `"`, `\` and the control bytes `0x00`..=`0x1F` need escaping. All other
/// bytes, including UTF-8 continuation bytes, are passed through unchanged.
fn escape_sequence(byte: u8) -> Option<&'static str> {
    match byte {
        b'"' => Some("\\\""),
        b'\\' => Some("\\\\"),
        0x00..=0x1F => Some(CONTROL_ESCAPES[byte as usize]),
        _ => None,
    }
}

/// Feeds the JSON string literal body for `value` (without surrounding quotes) to `out`
///
/// Maximal runs of bytes which need no escaping are forwarded as a single slice
/// instead of byte by byte, so the cost is proportional to the escape density
/// of the string, not to its length.
pub(crate) fn for_each_escaped_piece<E>(
    value: &str,
    mut out: impl FnMut(&[u8]) -> Result<(), E>,
) -> Result<(), E> {
    let bytes = value.as_bytes();
    let mut run_start = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        if let Some(escape) = escape_sequence(byte) {
            if index > run_start {
                out(&bytes[run_start..index])?;
            }
            out(escape.as_bytes())?;
            run_start = index + 1;
        }
    }
    if run_start < bytes.len() {
        out(&bytes[run_start..])?;
    }

    Ok(())
}
