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

//! The Snap Pixel side: vendor calls and the rules producing them

pub mod ecommerce;
pub mod identity;
pub mod mapper;
pub mod revenue;

pub use mapper::{dispatch, initialize, page, track};
pub use revenue::format_revenue;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};
use std::fmt::Display;

/// Standard events understood by the pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardEvent {
    PageView,
    ViewContent,
    AddToCart,
    Purchase,
}

impl StandardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardEvent::PageView => "PAGE_VIEW",
            StandardEvent::ViewContent => "VIEW_CONTENT",
            StandardEvent::AddToCart => "ADD_TO_CART",
            StandardEvent::Purchase => "PURCHASE",
        }
    }
}

impl Display for StandardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str(self.as_str())
    }
}

/// A call to the pixel's global function
///
/// Serialises to the argument list of that function, for instance
/// `["track", "PAGE_VIEW", {}]`.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorCall {
    /// One-time setup: `snaptr('init', pixelId[, options])`
    Init {
        pixel_id: String,
        user_email: Option<String>,
    },
    /// A standard event: `snaptr('track', EVENT, properties)`
    Track {
        event: StandardEvent,
        properties: Map<String, Value>,
    },
    /// Anything else, name passed through: `snaptr('trackCustom', name, properties)`
    TrackCustom {
        event: String,
        properties: Map<String, Value>,
    },
}

impl VendorCall {
    /// The command string, first argument of every call
    pub fn command(&self) -> &'static str {
        match self {
            VendorCall::Init { .. } => "init",
            VendorCall::Track { .. } => "track",
            VendorCall::TrackCustom { .. } => "trackCustom",
        }
    }

    /// The event name (pixel id for init)
    pub fn event_name(&self) -> &str {
        match self {
            VendorCall::Init { pixel_id, .. } => pixel_id,
            VendorCall::Track { event, .. } => event.as_str(),
            VendorCall::TrackCustom { event, .. } => event,
        }
    }

    /// The property map, if the call carries one
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        match self {
            VendorCall::Init { .. } => None,
            VendorCall::Track { properties, .. } | VendorCall::TrackCustom { properties, .. } => Some(properties),
        }
    }

    /// The full argument list, as a JSON array
    pub fn arguments(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for VendorCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VendorCall::Init { pixel_id, user_email } => {
                let mut seq = serializer.serialize_seq(Some(if user_email.is_some() { 3 } else { 2 }))?;
                seq.serialize_element(self.command())?;
                seq.serialize_element(pixel_id)?;
                if let Some(email) = user_email {
                    let mut options = Map::new();
                    options.insert("user_email".into(), Value::String(email.clone()));
                    seq.serialize_element(&options)?;
                }
                seq.end()
            },
            VendorCall::Track { properties, .. } | VendorCall::TrackCustom { properties, .. } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(self.command())?;
                seq.serialize_element(self.event_name())?;
                seq.serialize_element(properties)?;
                seq.end()
            },
        }
    }
}

impl Display for VendorCall {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{} {}", self.command(), self.event_name())
    }
}
