// ABOUTME: Wire format between the console and the evaluation engine.
// ABOUTME: Two text fields, captured output and value, joined by one reserved separator.

use thiserror::Error;

/// Reserved character joining the two fields of an encoded result.
pub const SEPARATOR: char = '|';

/// Stand-in written by `encode` wherever a field contains the separator.
pub const SEPARATOR_SUBSTITUTE: char = '\u{a6}';

/// An encoded engine result split back into its two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResult {
    /// Text the evaluation printed as a side effect. May be empty.
    pub captured_output: String,
    /// Rendering of the final value, or of the error on failure.
    pub value: String,
}

/// The payload did not match the two-field encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("expected 2 fields separated by '|', found {found}")]
    PartCount { found: usize },
}

/// Join captured output and value into a single payload.
///
/// The separator may never occur inside a field, so any occurrence is replaced
/// by `SEPARATOR_SUBSTITUTE` before joining.
pub fn encode(captured_output: &str, value: &str) -> String {
    format!(
        "{}{}{}",
        escape_field(captured_output),
        SEPARATOR,
        escape_field(value)
    )
}

fn escape_field(field: &str) -> String {
    field.replace(SEPARATOR, &SEPARATOR_SUBSTITUTE.to_string())
}

/// Split a payload into captured output and value.
///
/// Strict: any payload that does not split into exactly two parts is rejected.
/// The value is returned as opaque text; line splitting is left to the caller.
pub fn decode(raw: &str) -> Result<DecodedResult, ProtocolError> {
    let parts: Vec<&str> = raw.split(SEPARATOR).collect();
    match parts.as_slice() {
        [captured_output, value] => Ok(DecodedResult {
            captured_output: captured_output.to_string(),
            value: value.to_string(),
        }),
        _ => Err(ProtocolError::PartCount { found: parts.len() }),
    }
}
