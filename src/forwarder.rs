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

use crate::events::any::{AnyEvent, EventOrBatch};
use crate::events::properties::Properties;
use crate::pixel::{self, VendorCall};
use crate::sinks::{PixelSink, SinkResult};
use crate::stats::{ForwarderStats, StatsEvent};

use log;

/// What the host knows about the current visitor
#[derive(Debug, Clone, Default)]
struct Session {
    anonymous_id: Option<String>,
    traits: Properties,
    initialized: bool,
}

/// Feeds events to the pixel, initialising it once per session
///
/// The pixel wants a single init call before anything else, carrying the
/// user's email when known. Traits come from identify events and from the
/// traits the SDK attaches to every event's context. A new anonymous id
/// means a new visitor: the session is reset and the next call re-inits.
pub struct Forwarder<S: PixelSink> {
    pixel_id: String,
    sink: S,
    session: Session,
    stats: ForwarderStats,
}

impl<S: PixelSink> Forwarder<S> {
    pub fn new(pixel_id: impl Into<String>, sink: S) -> Self {
        Self {
            pixel_id: pixel_id.into(),
            sink,
            session: Session::default(),
            stats: ForwarderStats::new(),
        }
    }

    /// Processes a single event
    ///
    /// If the init call fails the event is not sent, and the session stays
    /// uninitialised so that the next event tries again.
    pub fn forward(&mut self, event: &AnyEvent) -> SinkResult {
        self.stats.record(StatsEvent::EventReceived);
        self.follow_visitor(event);

        match event {
            AnyEvent::Identify(identify) => {
                self.session.traits.merge(&identify.common.context.traits);
                self.session.traits.merge(&identify.traits);
                self.stats.record(StatsEvent::IdentifyAbsorbed);
                log::debug!("identify: {} trait(s) known", self.session.traits.len());
                Ok(())
            },

            AnyEvent::Unsupported => {
                self.stats.record(StatsEvent::UnsupportedSkipped);
                log::debug!("skipping event without pixel counterpart");
                Ok(())
            },

            AnyEvent::Page(_) | AnyEvent::Track(_) => {
                if !self.session.initialized {
                    let init = pixel::initialize(&self.init_traits(event), &self.pixel_id);
                    self.send(&init)?;
                    self.session.initialized = true;
                }
                match pixel::dispatch(event) {
                    Some(call) => self.send(&call),
                    None => Ok(()),
                }
            },
        }
    }

    /// Processes an event or every event of a batch, in order
    ///
    /// Keeps going after a sink error; the first one is returned.
    pub fn forward_all(&mut self, payload: EventOrBatch) -> SinkResult {
        let mut result: SinkResult = Ok(());
        for event in payload.into_events() {
            if let Err(e) = self.forward(&event) {
                log::warn!("failed to forward {} event: {}", event.kind(), e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Forgets the current visitor: traits, id and init
    pub fn reset(&mut self) {
        self.session = Session::default();
    }

    pub fn is_initialized(&self) -> bool {
        self.session.initialized
    }

    pub fn stats(&self) -> &ForwarderStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Resets the session when the event comes from another visitor
    fn follow_visitor(&mut self, event: &AnyEvent) {
        let incoming = match event.common().and_then(|c| c.anonymous_id.as_ref()) {
            Some(id) => id,
            None => return,
        };

        match self.session.anonymous_id.clone() {
            Some(current) if &current == incoming => {},
            Some(current) => {
                log::info!("new visitor ({} -> {}), resetting session", current, incoming);
                self.reset();
                self.session.anonymous_id = Some(incoming.clone());
            },
            None => self.session.anonymous_id = Some(incoming.clone()),
        }
    }

    /// Context traits of the event, overridden by what identify events said
    fn init_traits(&self, event: &AnyEvent) -> Properties {
        let mut traits = event.common()
            .map(|c| c.context.traits.clone())
            .unwrap_or_default();
        traits.merge(&self.session.traits);
        traits
    }

    fn send(&mut self, call: &VendorCall) -> SinkResult {
        match self.sink.send(call) {
            Ok(()) => {
                log::debug!(event = call.event_name(); "sent {}", call);
                self.stats.record_call(call);
                Ok(())
            },
            Err(e) => {
                self.stats.record(StatsEvent::SinkFailure);
                Err(e)
            },
        }
    }
}
