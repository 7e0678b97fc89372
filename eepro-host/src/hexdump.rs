//! Hex dump rendering for mismatch reports

use std::fmt::Write;

/// Bytes per dump line
pub const BYTES_PER_LINE: usize = 8;

/// Render `bytes` as hex dump lines
///
/// Each line holds eight bytes prefixed with the offset of the first one,
/// with an extra gap after the fourth:
///
/// ```text
/// 0x0000:    30 31 32 33  34 35 36 37
/// ```
pub fn format_hex(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(index, chunk)| {
            let mut line = format!("0x{:04X}:    ", index * BYTES_PER_LINE);
            for (i, byte) in chunk.iter().enumerate() {
                if i == BYTES_PER_LINE / 2 {
                    line.push(' ');
                }
                let _ = write!(line, "{:02X} ", byte);
            }
            line.truncate(line.trim_end().len());
            line
        })
        .collect()
}

/// Line-by-line diff of two hex dumps
///
/// Only differing lines are listed, `-` for `expected` and `+` for
/// `actual`. Returns an empty string when the dumps agree.
pub fn diff(expected_label: &str, expected: &[u8], actual_label: &str, actual: &[u8]) -> String {
    let left = format_hex(expected);
    let right = format_hex(actual);

    let mut out = String::new();
    for i in 0..left.len().max(right.len()) {
        let (l, r) = (left.get(i), right.get(i));
        if l == r {
            continue;
        }
        if out.is_empty() {
            let _ = writeln!(out, "--- {}", expected_label);
            let _ = writeln!(out, "+++ {}", actual_label);
        }
        if let Some(line) = l {
            let _ = writeln!(out, "-{}", line);
        }
        if let Some(line) = r {
            let _ = writeln!(out, "+{}", line);
        }
    }
    out
}
