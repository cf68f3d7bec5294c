use crate::error::ExtractionError;

/// Iteration bound for the token scan. Each iteration consumes at most one
/// brace, so text whose object spans more braces than this fails rather
/// than scanning unboundedly.
const MAX_SCAN_ITERATIONS: u32 = 50;
/// Maximum tolerated nesting while the scan is still inside the object.
const MAX_BRACE_DEPTH: u32 = 25;

fn find_from(text: &str, from: usize, needle: char) -> Option<usize> {
    text[from..].find(needle).map(|offset| from + offset)
}

/// Isolate the first balanced top-level `{...}` in free-form model output.
///
/// Models wrap their JSON in prose ("Sure! Here is the object: ..."), so
/// extraction counts braces instead of tokenizing. Returns the slice from
/// the first `{` through its matching `}` inclusive.
///
/// Braces inside quoted JSON string values are counted as structure and
/// corrupt the balance. That blindness is part of the extraction contract —
/// downstream validation rejects the corrupted slice — and is pinned by
/// tests rather than fixed here.
pub fn extract_first_object(text: &str) -> Result<&str, ExtractionError> {
    let Some(start) = text.find('{') else {
        return Err(ExtractionError::InvalidJson);
    };
    let mut pos = start + 1;
    let mut balance: u32 = 1;

    for _ in 0..MAX_SCAN_ITERATIONS {
        let next_open = find_from(text, pos, '{');
        let next_close = find_from(text, pos, '}');

        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                balance += 1;
                pos = open + 1;
            }
            (_, Some(close)) => {
                balance -= 1;
                pos = close + 1;
            }
            (Some(_), None) => {
                // An opening brace with no `}` anywhere after it: the scan
                // cannot make progress and the iteration bound turns this
                // into SearchExhausted.
            }
            (None, None) => {
                return Err(ExtractionError::InvalidJson);
            }
        }

        if balance == 0 {
            return Ok(&text[start..pos]);
        }
        if balance > MAX_BRACE_DEPTH {
            return Err(ExtractionError::DepthExceeded(MAX_BRACE_DEPTH));
        }
    }

    Err(ExtractionError::SearchExhausted(MAX_SCAN_ITERATIONS))
}
