#[inline]
#[must_use]
pub(crate) fn is_break(c: u8) -> bool {
    c == b'\r' || c == b'\n'
}

#[inline]
#[must_use]
pub(crate) fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

#[inline]
#[must_use]
pub(crate) fn is_flow(c: u8) -> bool {
    matches!(c, b',' | b'[' | b']' | b'{' | b'}')
}

/// Ends a bare scalar. End of input is a delimiter as well.
#[inline]
#[must_use]
pub(crate) fn is_delimiter(c: Option<u8>) -> bool {
    match c {
        None => true,
        Some(c) => is_blank(c) || is_break(c) || is_flow(c),
    }
}

#[inline]
#[must_use]
pub(crate) fn is_anchor_char(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'-')
}

#[inline]
#[must_use]
pub(crate) fn is_number_start(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'.' | b'-' | b'+')
}

#[inline]
#[must_use]
pub(crate) fn is_number_char(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'.' | b'e' | b'E' | b'-' | b'+' | b'_')
}

#[inline]
#[must_use]
pub(crate) fn as_hex(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u32),
        b'a'..=b'f' => Some((c - b'a') as u32 + 10),
        b'A'..=b'F' => Some((c - b'A') as u32 + 10),
        _ => None,
    }
}
