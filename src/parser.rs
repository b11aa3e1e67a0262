//! Wire-format plumbing: the page header and the one-character tag dispatch
//! that routes each record to its variant parser.
//!
//! Records are whitespace-tokenized single lines with a fixed token count
//! per tag. All offsets are byte offsets into the input buffer; a parse
//! failure reports the offset of the failing record and consumes nothing.

use crate::error::SchemCoreError;
use crate::object::{net, pin, Object};

/// On-disk format revision written into the page header.
pub const FORMAT_REVISION: u32 = 2;

/// Release version written into the page header (date-style).
pub const RELEASE_VERSION: u32 = 20250901;

pub(crate) fn format_header() -> String {
    format!("v {RELEASE_VERSION} {FORMAT_REVISION}\n")
}

/// Parses the `v <release> <revision>` header line and returns the offset
/// just past it.
pub(crate) fn parse_header(buf: &str) -> Result<usize, SchemCoreError> {
    let malformed = SchemCoreError::Deserialization {
        what: "header",
        offset: 0,
    };
    let Some(line_end) = buf.find('\n') else {
        return Err(malformed);
    };
    let fields: Vec<&str> = buf[..line_end].split_whitespace().collect();
    let valid = fields.len() == 3
        && fields[0] == "v"
        && fields[1].parse::<u32>().is_ok()
        && fields[2].parse::<u32>().is_ok();
    if !valid {
        return Err(malformed);
    }
    Ok(line_end + 1)
}

/// Parses one object record starting at `offset`, dispatching on the tag
/// character. Returns the object and the offset just past the record.
pub(crate) fn parse_object(buf: &str, offset: usize) -> Result<(Object, usize), SchemCoreError> {
    match buf[offset..].chars().next() {
        Some('N') => net::from_record(buf, offset),
        Some('P') => pin::from_record(buf, offset),
        _ => Err(SchemCoreError::Deserialization {
            what: "object",
            offset,
        }),
    }
}

/// Splits off the record line starting at `offset`; returns the line and
/// the offset just past its terminating newline (or the end of the buffer).
pub(crate) fn record_line(buf: &str, offset: usize) -> (&str, usize) {
    match buf[offset..].find('\n') {
        Some(rel) => (&buf[offset..offset + rel], offset + rel + 1),
        None => (&buf[offset..], buf.len()),
    }
}

/// Tokenizes a record and checks its tag and fixed token count.
pub(crate) fn record_fields<'a>(
    line: &'a str,
    tag: &str,
    expected: usize,
    what: &'static str,
    offset: usize,
) -> Result<Vec<&'a str>, SchemCoreError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected || fields[0] != tag {
        return Err(SchemCoreError::Deserialization { what, offset });
    }
    Ok(fields)
}

pub(crate) fn record_int(
    field: &str,
    what: &'static str,
    offset: usize,
) -> Result<i32, SchemCoreError> {
    field
        .parse()
        .map_err(|_| SchemCoreError::Deserialization { what, offset })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = format_header();
        assert_eq!(parse_header(&header).unwrap(), header.len());
    }

    #[test]
    fn header_accepts_any_version_numbers() {
        assert_eq!(parse_header("v 1 2\nrest").unwrap(), 6);
    }

    #[test]
    fn header_rejects_garbage() {
        for bad in ["", "v 1 2", "w 1 2\n", "v one 2\n", "v 1\n", "v 1 2 3\n"] {
            let err = parse_header(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    SchemCoreError::Deserialization {
                        what: "header",
                        offset: 0
                    }
                ),
                "expected header error for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn record_line_handles_missing_newline() {
        assert_eq!(record_line("N 1 2\nP 3", 0), ("N 1 2", 6));
        assert_eq!(record_line("N 1 2\nP 3", 6), ("P 3", 9));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = parse_object("Q 1 2\n", 0).unwrap_err();
        assert!(matches!(
            err,
            SchemCoreError::Deserialization {
                what: "object",
                offset: 0
            }
        ));
    }
}
