// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::event::Event;

/// Output columns, in order.
pub const HEADERS: [&str; 12] = [
    "game_id",
    "period",
    "time",
    "score",
    "team_id",
    "players",
    "opp_players",
    "player_id",
    "event",
    "event_value",
    "event_detail",
    "possession",
];

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // doubled quote
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Split off a header row and map column names to positions.
pub struct Table {
    columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn parse(text: &str, sep: char) -> Self {
        let mut rows = parse_rows(text, sep);
        let columns = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0).into_iter().map(|c| c.trim().to_ascii_lowercase()).collect()
        };
        Self { columns, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// One event as output cells. Absent values are empty cells.
pub fn event_row(ev: &Event) -> Vec<String> {
    fn opt<T: ToString>(v: &Option<T>) -> String {
        v.as_ref().map(ToString::to_string).unwrap_or_default()
    }
    vec![
        ev.game_id.clone(),
        opt(&ev.period),
        ev.clock.to_string(),
        opt(&ev.score),
        opt(&ev.team_id),
        opt(&ev.players),
        opt(&ev.opp_players),
        opt(&ev.primary_actor),
        ev.kind.to_string(),
        opt(&ev.value),
        opt(&ev.detail),
        (ev.possession_flag as u8).to_string(),
    ]
}

/// Write events (and optionally the header row) to any writer.
pub fn write_events<W: Write>(mut w: W, events: &[Event], include_headers: bool, sep: char) -> io::Result<()> {
    if include_headers {
        write_row(&mut w, &HEADERS[..], sep)?;
    }
    for ev in events {
        write_row(&mut w, &event_row(ev), sep)?;
    }
    Ok(())
}

/// Events as one JSON object per line.
pub fn write_events_jsonl<W: Write>(mut w: W, events: &[Event]) -> io::Result<()> {
    for ev in events {
        serde_json::to_writer(&mut w, ev)?;
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Clock, Detail, EventKind, Period, Score};

    #[test]
    fn quoted_fields_survive() {
        let rows = parse_rows("a,\"b, c\",\"say \"\"hi\"\"\"\r\nx,y,z\n", ',');
        assert_eq!(rows, vec![vec!["a", "b, c", "say \"hi\""], vec!["x", "y", "z"]]);

        let mut buf = Vec::new();
        write_row(&mut buf, &rows[0], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,\"b, c\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let t = Table::parse("Game_ID\tsequence_index\traw_text\ng1\t1\tStart of 1st quarter\n", '\t');
        assert_eq!(t.column("game_id"), Some(0));
        assert_eq!(t.column("raw_text"), Some(2));
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn event_cells_follow_header_order() {
        let mut ev = Event::new("g1", Clock::parse("11:48.0").unwrap(), EventKind::Turnover);
        ev.period = Some(Period::Quarter(1));
        ev.score = Some(Score { home: 2, away: 0 });
        ev.detail = Some(Detail::Text(s!("bad pass")));
        ev.value = Some(1);
        ev.possession_flag = true;

        let row = event_row(&ev);
        assert_eq!(row.len(), HEADERS.len());
        assert_eq!(row[1], "1st");
        assert_eq!(row[2], "11:48");
        assert_eq!(row[3], "2-0");
        assert_eq!(row[7], "");
        assert_eq!(row[8], "Turnover");
        assert_eq!(row[11], "1");
    }
}
