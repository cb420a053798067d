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

use crate::events::common::CommonFields;
use crate::events::identify::Identify;
use crate::events::page::Page;
use crate::events::track::Track;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Convenience enum: can accept any event
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum AnyEvent {
    #[serde(rename = "identify")]
    Identify(Identify),
    #[serde(rename = "page")]
    Page(Page),
    #[serde(rename = "track")]
    Track(Track),
    /// alias, group, screen... the pixel has no use for them
    #[serde(other)]
    Unsupported,
}

impl AnyEvent {
    /// Common fields of the event, if it is one we know
    pub fn common(&self) -> Option<&CommonFields> {
        match self {
            AnyEvent::Identify(identify) => Some(&identify.common),
            AnyEvent::Page(page) => Some(&page.common),
            AnyEvent::Track(track) => Some(&track.common),
            AnyEvent::Unsupported => None,
        }
    }

    /// Short name of the event type, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnyEvent::Identify(_) => "identify",
            AnyEvent::Page(_) => "page",
            AnyEvent::Track(_) => "track",
            AnyEvent::Unsupported => "unsupported",
        }
    }
}

/// A batch event, as sent to /v1/batch
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch: Vec<AnyEvent>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Convenience enum: accepts any event or a batch of events
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum EventOrBatch {
    Event(AnyEvent),
    Batch(Batch),
}

impl EventOrBatch {
    /// Flattens into the events to process, in order
    pub fn into_events(self) -> Vec<AnyEvent> {
        match self {
            EventOrBatch::Event(event) => vec!(event),
            EventOrBatch::Batch(batch) => batch.batch,
        }
    }
}
