//! Delimiter sniffing for CSV-like files.
//!
//! The first delimiter that yields a rectangular table wins; the table is
//! then written back as canonical comma-separated text so downstream
//! chunking never sees the original syntax.

use tracing::debug;

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

pub fn canonicalize(bytes: &[u8]) -> String {
    for delimiter in DELIMITERS {
        let Some(rows) = parse_table(bytes, delimiter) else { continue };
        match write_table(&rows) {
            Some(text) => {
                debug!(delimiter = %char::from(delimiter), rows = rows.len(), "parsed table");
                return text;
            }
            None => continue,
        }
    }
    String::new()
}

fn parse_table(bytes: &[u8], delimiter: u8) -> Option<Vec<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(false)
        .from_reader(bytes);
    let rows = reader.records().collect::<Result<Vec<_>, _>>().ok()?;
    if rows.is_empty() { None } else { Some(rows) }
}

fn write_table(rows: &[csv::StringRecord]) -> Option<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).ok()?;
    }
    let bytes = writer.into_inner().ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_table_round_trips() {
        let out = canonicalize(b"name,qty\napple,3\npear,5\n");
        assert_eq!(out, "name,qty\napple,3\npear,5\n");
    }

    #[test]
    fn semicolon_table_is_rewritten_with_commas() {
        let out = canonicalize(b"name;price\n\"apple, red\";3,5\npear;4,0\n");
        assert_eq!(out, "name,price\n\"apple, red\",\"3,5\"\npear,\"4,0\"\n");
    }

    #[test]
    fn tab_table() {
        let out = canonicalize(b"a\tb\n1\t2\n");
        // A comma-free TSV parses as a one-column comma table first.
        assert_eq!(out, "a\tb\n1\t2\n");
    }

    #[test]
    fn ragged_comma_rows_fall_through_to_next_delimiter() {
        // No semicolons at all: every row is a single field under ';'.
        let out = canonicalize(b"x|y\n1,5|2\n3|4,0,1\n");
        assert_eq!(out, "x|y\n\"1,5|2\"\n\"3|4,0,1\"\n");
    }

    #[test]
    fn invalid_utf8_yields_nothing() {
        assert_eq!(canonicalize(b"a,b\n\xff,\xfe\n"), "");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(canonicalize(b""), "");
    }
}
