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

/// Does nothing, needs nothing
pub struct Blackhole {}

impl Blackhole {
    /// Returns pretty much nothing
    pub fn new(_settings: &Settings) -> Result<Self, SinkError> {
        Ok(Blackhole {})
    }
}

impl Display for Blackhole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str("blackhole")
    }
}

impl PixelSink for Blackhole {
    /// Does nothing, successfully
    fn send(&mut self, _call: &VendorCall) -> SinkResult {
        Ok(())
    }
}
