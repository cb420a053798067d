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

use crate::sinks::{PixelSink, SinkResult, SinkError};
use crate::pixel::VendorCall;
use crate::config::Settings;

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;

/// Writes each call as a JSON line: the argument list of the pixel function
pub struct JsonLines<W: Write> {
    writer: W,
    name: String,
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W, name: impl Into<String>) -> Self {
        Self { writer, name: name.into() }
    }

    /// Gives the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLines<Box<dyn Write>> {
    /// Builds the sink from its settings: `path` (appended to) or standard output
    pub fn from_settings(settings: &Settings) -> Result<Self, SinkError> {
        match settings.get("path") {
            Some(serde_yaml::Value::String(path)) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| SinkError::Initialisation(format!("{}: {}", path, e)))?;
                Ok(Self::new(Box::new(file), format!("jsonl:{}", path)))
            },
            Some(_) => Err(SinkError::Initialisation("jsonl: path should be a string".into())),
            None => Ok(Self::new(Box::new(std::io::stdout()), "jsonl:stdout")),
        }
    }
}

impl<W: Write> Display for JsonLines<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str(&self.name)
    }
}

impl<W: Write> PixelSink for JsonLines<W> {
    fn send(&mut self, call: &VendorCall) -> SinkResult {
        let line = serde_json::to_string(call).map_err(|e| SinkError::Output(e.to_string()))?;
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| SinkError::Output(format!("{}: {}", self.name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel;
    use crate::events::properties::Properties;

    #[test]
    fn writes_one_line_per_call() {
        let mut sink = JsonLines::new(Vec::<u8>::new(), "memory");
        sink.send(&pixel::initialize(&Properties::new(), "123")).unwrap();
        sink.send(&pixel::page()).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[\"init\",\"123\"]\n[\"track\",\"PAGE_VIEW\",{}]\n");
    }

    #[test]
    fn appends_to_a_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("calls.jsonl");
        let mut settings = Settings::new();
        settings.insert("path".into(), serde_yaml::Value::String(path.to_string_lossy().into_owned()));

        let mut sink = JsonLines::from_settings(&settings).unwrap();
        assert!(sink.to_string().starts_with("jsonl:"));
        sink.send(&pixel::page()).unwrap();
        drop(sink);

        let mut sink = JsonLines::from_settings(&settings).unwrap();
        sink.send(&pixel::page()).unwrap();
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn rejects_odd_paths() {
        let mut settings = Settings::new();
        settings.insert("path".into(), serde_yaml::Value::Bool(true));
        assert!(JsonLines::from_settings(&settings).is_err());
    }
}
