//! JSON-lines reading of events and writing of per-event summaries.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::data::event::Event;
use crate::error::{FrameError, Result};

/// Reads one `Event` per non-blank line.
///
/// Malformed JSON aborts the read. Events whose columns are misaligned are
/// skipped with a warning.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FrameError::io(path, e))?;
    read_events_from(BufReader::new(file), path)
}

pub fn read_events_from<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Event>> {
    let mut events = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FrameError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(&line)
            .map_err(|source| FrameError::Json { line: number + 1, source })?;

        if let Err(e) = event.validate() {
            warn!("skipping event {} at line {}: {}", event.event, number + 1, e);
            continue;
        }
        events.push(event);
    }

    debug!("read {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Writes each record as one JSON line.
pub fn write_json_lines<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FrameError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_json_lines_to(&mut writer, records, path)?;
    writer.flush().map_err(|e| FrameError::io(path, e))
}

pub fn write_json_lines_to<W: Write, T: Serialize>(writer: &mut W, records: &[T], path: &Path) -> Result<()> {
    for (number, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut *writer, record)
            .map_err(|source| FrameError::Json { line: number + 1, source })?;
        writer.write_all(b"\n").map_err(|e| FrameError::io(path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_skips_blank_and_misaligned() {
        let input = concat!(
            r#"{"event": 1}"#, "\n",
            "\n",
            r#"{"event": 2, "electrons": {"pt": [7.0]}}"#, "\n",
            r#"{"event": 3}"#, "\n",
        );
        let events = read_events_from(Cursor::new(input), Path::new("mem")).unwrap();
        assert_eq!(events.iter().map(|e| e.event).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_bad_json_reports_line() {
        let input = "{\"event\": 1}\n{not json}\n";
        match read_events_from(Cursor::new(input), Path::new("mem")) {
            Err(FrameError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_write_json_lines_to() {
        let mut buffer = Vec::new();
        write_json_lines_to(&mut buffer, &[1, 2, 3], Path::new("mem")).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "1\n2\n3\n");
    }
}
