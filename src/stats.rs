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

use crate::pixel::{StandardEvent, VendorCall};

use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// What happened to an event on its way to the pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsEvent {
    EventReceived,

    IdentifyAbsorbed,
    UnsupportedSkipped,
    SinkFailure,
}

/// Basic forwarding statistics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForwarderStats {
    pub events_received: u64,
    pub up_since: DateTime<Utc>,
    pub inits: u64,
    pub page_views: u64,
    pub standard_tracks: u64,
    pub custom_tracks: u64,
    pub identifies: u64,
    pub skipped: u64,
    pub sink_failures: u64,
}

impl ForwarderStats {
    pub fn new() -> Self {
        Self {
            events_received: 0,
            up_since: Utc::now(),
            inits: 0,
            page_views: 0,
            standard_tracks: 0,
            custom_tracks: 0,
            identifies: 0,
            skipped: 0,
            sink_failures: 0,
        }
    }

    /// Counts an event
    pub fn record(&mut self, event: StatsEvent) {
        match event {
            StatsEvent::EventReceived => self.events_received += 1,
            StatsEvent::IdentifyAbsorbed => self.identifies += 1,
            StatsEvent::UnsupportedSkipped => self.skipped += 1,
            StatsEvent::SinkFailure => self.sink_failures += 1,
        }
    }

    /// Counts a call successfully handed to the sink
    pub fn record_call(&mut self, call: &VendorCall) {
        match call {
            VendorCall::Init { .. } => self.inits += 1,
            VendorCall::Track { event: StandardEvent::PageView, .. } => self.page_views += 1,
            VendorCall::Track { .. } => self.standard_tracks += 1,
            VendorCall::TrackCustom { .. } => self.custom_tracks += 1,
        }
    }

    /// Total number of calls sent
    pub fn calls(&self) -> u64 {
        self.inits + self.page_views + self.standard_tracks + self.custom_tracks
    }
}

impl Default for ForwarderStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::properties::Properties;
    use crate::pixel;

    #[test]
    fn counts_calls_by_kind() {
        let mut stats = ForwarderStats::new();
        stats.record_call(&pixel::initialize(&Properties::new(), "1"));
        stats.record_call(&pixel::page());
        stats.record_call(&pixel::track("Order Completed", &Properties::new()));
        stats.record_call(&pixel::track("Signed Up", &Properties::new()));
        stats.record_call(&pixel::track("Signed Up", &Properties::new()));

        assert_eq!((stats.inits, stats.page_views, stats.standard_tracks, stats.custom_tracks), (1, 1, 1, 2));
        assert_eq!(stats.calls(), 5);
    }

    #[test]
    fn counts_events() {
        let mut stats = ForwarderStats::default();
        stats.record(StatsEvent::EventReceived);
        stats.record(StatsEvent::EventReceived);
        stats.record(StatsEvent::UnsupportedSkipped);
        assert_eq!(stats.events_received, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.calls(), 0);
    }
}
