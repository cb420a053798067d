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

use crate::events::any::AnyEvent;
use crate::events::properties::Properties;
use crate::pixel::ecommerce::EcommerceEvent;
use crate::pixel::revenue::format_revenue;
use crate::pixel::{StandardEvent, VendorCall};

use serde_json::{Map, Value};

/// Keys folded into the single `price` of a custom event
const MONETARY_KEYS: [&str; 3] = ["price", "value", "revenue"];

/// The one-time init call, with the user's email if the traits have one
pub fn initialize(traits: &Properties, pixel_id: &str) -> VendorCall {
    VendorCall::Init {
        pixel_id: pixel_id.to_string(),
        user_email: traits.get("email")
            .and_then(|v| v.as_str())
            .filter(|e| !e.is_empty())
            .map(String::from),
    }
}

/// A page view, whatever the page
pub fn page() -> VendorCall {
    VendorCall::Track { event: StandardEvent::PageView, properties: Map::new() }
}

/// Maps a track event: e-commerce events to standard events, the rest to custom events
pub fn track(event: &str, properties: &Properties) -> VendorCall {
    match EcommerceEvent::from_name(event) {
        Some(ecommerce) => ecommerce.to_call(properties),
        None => track_custom(event, properties),
    }
}

/// Passes the event through, folding price, value and revenue into a formatted price
///
/// When more than one of those keys is present, the last one in payload
/// order sets the price.
fn track_custom(event: &str, properties: &Properties) -> VendorCall {
    let mut payload = Map::new();
    for (key, value) in properties.iter() {
        if MONETARY_KEYS.contains(&key.as_str()) {
            payload.insert("price".into(), Value::String(format_revenue(Some(value))));
        } else {
            payload.insert(key.clone(), value.clone());
        }
    }
    VendorCall::TrackCustom { event: event.to_string(), properties: payload }
}

/// Maps any event to its pixel call, if it has one
///
/// Identify events only feed the traits used by initialize(), and the
/// other event types have no pixel counterpart.
pub fn dispatch(event: &AnyEvent) -> Option<VendorCall> {
    match event {
        AnyEvent::Page(_) => Some(page()),
        AnyEvent::Track(t) => Some(track(&t.event, &t.properties)),
        AnyEvent::Identify(_) | AnyEvent::Unsupported => None,
    }
}
