//! Tweet-body escaping codec.
//!
//! Stored bodies must not contain the literal characters `<` and `>`; the
//! calling layer escapes them before the write and readers reverse the
//! transform on every returned row. The stored tokens are fixed by the
//! wire format and cannot change without rewriting existing rows.

/// Stored stand-in for `<`.
pub const ESCAPED_LT: &str = "i16";

/// Stored stand-in for `>`.
pub const ESCAPED_GT: &str = "i12";

/// Escapes a tweet body for storage.
///
/// Applied by the calling layer, not the writer, so the writer stores
/// exactly the bytes it is handed.
pub fn escape_body(body: &str) -> String {
    body.replace('<', ESCAPED_LT).replace('>', ESCAPED_GT)
}

/// Reverses [`escape_body`]. Applied by readers to every returned row.
pub fn unescape_body(body: &str) -> String {
    body.replace(ESCAPED_LT, "<").replace(ESCAPED_GT, ">")
}
