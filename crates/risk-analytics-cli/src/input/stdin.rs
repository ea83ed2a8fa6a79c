use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a book piped on stdin.
///
/// `Ok(None)` when stdin is a terminal or carries only whitespace, so the
/// caller can report which input is missing.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut piped)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;
    if piped.trim().is_empty() {
        return Ok(None);
    }

    let book = serde_json::from_str(&piped).map_err(|e| format!("Failed to parse stdin: {}", e))?;
    Ok(Some(book))
}
