use std::io::Read;

use crate::{
    error::{MatshowError, MatshowResult},
    model::FrameSeq,
};

/// Strip the trailing comma some hand-written emitters leave before a
/// closing bracket: every literal `,]` becomes `]`.
///
/// The substitution is textual on purpose and happens before parsing.
/// `, ]` with interior whitespace is not repaired, and a `,]` inside a
/// string value would be rewritten along with everything else.
pub fn repair_trailing_commas(text: &str) -> String {
    text.replace(",]", "]")
}

/// Parse a frame sequence from JSON text, repairing trailing commas first.
pub fn parse_frames(text: &str) -> MatshowResult<FrameSeq> {
    let repaired = repair_trailing_commas(text);
    serde_json::from_str(&repaired)
        .map_err(|e| MatshowError::parse(format!("invalid frame JSON: {e}")))
}

/// Read everything `reader` has to offer and parse it as a frame sequence.
#[tracing::instrument(skip(reader))]
pub fn read_frames(mut reader: impl Read) -> MatshowResult<FrameSeq> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| MatshowError::parse(format!("read input: {e}")))?;
    parse_frames(&text)
}
