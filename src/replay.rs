/* snaptr - translates Rudderstack/Segment events into Snap Pixel commands
 * Copyright (C) 2023 Withings
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>. */

//! Replays event dumps: one JSON event or batch per line

use crate::events::any::EventOrBatch;
use crate::events::rejections::explain_rejection_inline;
use crate::forwarder::Forwarder;
use crate::sinks::PixelSink;

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// What came out of a replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Lines parsed and forwarded
    pub accepted: u64,
    /// Lines which are not valid events
    pub rejected: u64,
    /// Lines with at least one call the sink refused
    pub failed: u64,
}

/// Opens a dump: standard input for None or `-`, gunzipped if it ends in `.gz`
pub fn open_input(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match path {
        None => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(p) if p.as_os_str() == "-" => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(p) => {
            let file = File::open(p)?;
            match p.extension().map(|e| e == "gz").unwrap_or(false) {
                true => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
                false => Ok(Box::new(BufReader::new(file))),
            }
        }
    }
}

/// Forwards every line of a dump, logging the ones which cannot be used
///
/// Only read errors stop the replay. Bad lines, undecodable ones included,
/// and sink errors are logged and counted.
pub fn replay<R: BufRead, S: PixelSink>(reader: R, forwarder: &mut Forwarder<S>) -> io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let line = match String::from_utf8(bytes?) {
            Ok(l) => l,
            Err(e) => {
                log::warn!("line {}: rejected: {}", index + 1, e);
                summary.rejected += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let payload: EventOrBatch = match serde_json::from_str(&line) {
            Ok(p) => p,
            Err(_) => {
                log::warn!("line {}: rejected: {}", index + 1, explain_rejection_inline(&line));
                summary.rejected += 1;
                continue;
            }
        };

        summary.accepted += 1;
        if let Err(e) = forwarder.forward_all(payload) {
            log::warn!("line {}: {}", index + 1, e);
            summary.failed += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::VendorCall;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use indoc::indoc;
    use std::io::Write;

    const DUMP: &str = indoc! {r#"
        {"type": "identify", "traits": {"email": "someone@example.com"}}

        {"type": "page"}
        not even json
        {"type": "track"}
        {"batch": [{"type": "track", "event": "Product Added", "properties": {"product_id": "A"}}, {"type": "screen"}]}
    "#};

    #[test]
    fn replays_and_counts() {
        let mut forwarder = Forwarder::new("1", Vec::<VendorCall>::new());
        let summary = replay(DUMP.as_bytes(), &mut forwarder).unwrap();

        assert_eq!(summary, ReplaySummary { accepted: 3, rejected: 2, failed: 0 });
        let commands: Vec<String> = forwarder.sink().iter().map(|c| c.to_string()).collect();
        assert_eq!(commands, vec!("init 1", "track PAGE_VIEW", "track ADD_TO_CART"));
        assert_eq!(forwarder.stats().skipped, 1);
    }

    #[test]
    fn undecodable_lines_are_rejected() {
        let mut dump: Vec<u8> = b"{\"type\": \"page\"}\r\n".to_vec();
        dump.extend_from_slice(b"{\"type\": \"track\", \"event\": \"\xff\xfe\"}\n");
        dump.extend_from_slice(b"{\"type\": \"page\"}\n");

        let mut forwarder = Forwarder::new("1", Vec::<VendorCall>::new());
        let summary = replay(dump.as_slice(), &mut forwarder).unwrap();

        assert_eq!(summary, ReplaySummary { accepted: 2, rejected: 1, failed: 0 });
        assert_eq!(forwarder.stats().page_views, 2);
    }

    #[test]
    fn reads_gzipped_dumps() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("events.jsonl.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(DUMP.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let mut forwarder = Forwarder::new("1", Vec::<VendorCall>::new());
        let summary = replay(open_input(Some(path.as_path())).unwrap(), &mut forwarder).unwrap();
        assert_eq!(summary.accepted, 3);
    }

    #[test]
    fn missing_dump_is_an_error() {
        assert!(open_input(Some(Path::new("/nonexistent/events.jsonl"))).is_err());
    }
}
