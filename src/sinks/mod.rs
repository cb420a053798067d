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

//! Sinks: whatever stands in for the pixel's global function

pub mod blackhole;
pub mod jsonl;
pub mod queue;

use crate::pixel::VendorCall;
use crate::sinks::blackhole::Blackhole;
use crate::sinks::jsonl::JsonLines;
use crate::config;

use std::fmt::Display;
use thiserror::Error;

/// Enum used by all sinks to report errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// Error while building the sink from its settings
    #[error("failed to initialise sink: {0}")]
    Initialisation(String),

    /// The call could not be handed over
    #[error("failed to output call: {0}")]
    Output(String),
}

/// Convenience type: result of a send
pub type SinkResult = Result<(), SinkError>;

/// The PixelSink trait: receives every call meant for the pixel, in order
pub trait PixelSink {
    fn send(&mut self, call: &VendorCall) -> SinkResult;
}

/// Records calls, mostly useful to inspect what would have been sent
impl PixelSink for Vec<VendorCall> {
    fn send(&mut self, call: &VendorCall) -> SinkResult {
        self.push(call.clone());
        Ok(())
    }
}

/// A sink which can be named in logs
pub trait NamedSink: PixelSink + Display {}
impl<T: PixelSink + Display> NamedSink for T {}

/// Sends every call to several sinks
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn NamedSink>>,
}

impl Fanout {
    pub fn new(sinks: Vec<Box<dyn NamedSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl PixelSink for Fanout {
    /// Sends to all sinks, even after a failure: the first error is returned
    fn send(&mut self, call: &VendorCall) -> SinkResult {
        let mut result: SinkResult = Ok(());
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.send(call) {
                log::warn!("sink error: {}: {}", sink, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

impl Display for Fanout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let names: Vec<String> = self.sinks.iter().map(|s| s.to_string()).collect();
        write!(f, "fanout[{}]", names.join(", "))
    }
}

/// Provides the configured sinks, ready to use
pub fn init_sinks(sink_configs: &[config::Sink]) -> Result<Fanout, SinkError> {
    let mut sinks: Vec<Box<dyn NamedSink>> = vec!();
    for sink_config in sink_configs.iter() {
        match sink_config.sink_type.as_str() {
            "blackhole" => sinks.push(Box::new(Blackhole::new(&sink_config.settings)?)),
            "jsonl" => sinks.push(Box::new(JsonLines::from_settings(&sink_config.settings)?)),
            other => return Err(SinkError::Initialisation(format!("unknown sink type: {}", other)))
        }
    }
    Ok(Fanout::new(sinks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel;
    use crate::config::Settings;

    /// Fails every time
    struct Broken;

    impl PixelSink for Broken {
        fn send(&mut self, _call: &VendorCall) -> SinkResult {
            Err(SinkError::Output("broken pipe".into()))
        }
    }

    impl Display for Broken {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
            f.write_str("broken")
        }
    }

    #[test]
    fn vec_records_calls() {
        let mut calls: Vec<VendorCall> = vec!();
        calls.send(&pixel::page()).unwrap();
        assert_eq!(calls, vec!(pixel::page()));
    }

    #[test]
    fn fanout_reports_first_error_and_keeps_going() {
        let sinks: Vec<Box<dyn NamedSink>> = vec!(Box::new(Broken), Box::new(Blackhole {}));
        let mut fanout = Fanout::new(sinks);
        assert_eq!(fanout.send(&pixel::page()), Err(SinkError::Output("broken pipe".into())));
        assert_eq!(fanout.to_string(), "fanout[broken, blackhole]");
    }

    #[test]
    fn unknown_sink_type() {
        let configs = vec!(config::Sink { sink_type: "carrier-pigeon".into(), settings: Settings::new() });
        match init_sinks(&configs) {
            Err(SinkError::Initialisation(message)) => assert!(message.contains("carrier-pigeon")),
            _ => panic!("expected an initialisation error"),
        }
    }

    #[test]
    fn configured_sinks() {
        let configs = vec!(
            config::Sink { sink_type: "blackhole".into(), settings: Settings::new() },
            config::Sink { sink_type: "jsonl".into(), settings: Settings::new() },
        );
        let fanout = init_sinks(&configs).unwrap();
        assert_eq!(fanout.len(), 2);
    }
}
