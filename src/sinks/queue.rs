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

use crate::sinks::{PixelSink, SinkResult};
use crate::pixel::VendorCall;

use std::collections::VecDeque;
use std::fmt::Display;

/// The pixel's command queue: holds calls until the pixel script has loaded
///
/// Until mark_loaded() is called, calls are queued in order. Loading
/// replays the queue into the inner sink, after which calls go straight
/// through.
pub struct CommandQueue<S: PixelSink> {
    inner: S,
    pending: VecDeque<VendorCall>,
    loaded: bool,
}

impl<S: PixelSink> CommandQueue<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Calls waiting for the script, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &VendorCall> {
        self.pending.iter()
    }

    /// The script is ready: replays queued calls in order
    ///
    /// On error the failed call and the ones after it stay queued, and the
    /// queue stays unloaded until mark_loaded() succeeds.
    pub fn mark_loaded(&mut self) -> SinkResult {
        while let Some(call) = self.pending.front() {
            self.inner.send(call)?;
            self.pending.pop_front();
        }
        log::debug!("pixel loaded, command queue drained");
        self.loaded = true;
        Ok(())
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: PixelSink> PixelSink for CommandQueue<S> {
    fn send(&mut self, call: &VendorCall) -> SinkResult {
        match self.loaded {
            true => self.inner.send(call),
            false => {
                self.pending.push_back(call.clone());
                Ok(())
            }
        }
    }
}

impl<S: PixelSink + Display> Display for CommandQueue<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "queue:{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::properties::Properties;
    use crate::pixel;
    use crate::sinks::SinkError;

    #[test]
    fn holds_calls_until_loaded() {
        let mut queue = CommandQueue::new(Vec::<VendorCall>::new());
        queue.send(&pixel::initialize(&Properties::new(), "123")).unwrap();
        queue.send(&pixel::page()).unwrap();

        assert!(!queue.is_loaded());
        assert!(queue.inner().is_empty());
        assert_eq!(queue.pending().count(), 2);

        queue.mark_loaded().unwrap();
        queue.send(&pixel::track("event", &Properties::new())).unwrap();

        let commands: Vec<&str> = queue.inner().iter().map(|c| c.command()).collect();
        assert_eq!(commands, vec!("init", "track", "trackCustom"));
        assert_eq!(queue.pending().count(), 0);
    }

    /// Accepts a given number of calls, fails afterwards
    struct Flaky {
        accepted: Vec<VendorCall>,
        capacity: usize,
    }

    impl PixelSink for Flaky {
        fn send(&mut self, call: &VendorCall) -> SinkResult {
            if self.accepted.len() >= self.capacity {
                return Err(SinkError::Output("full".into()));
            }
            self.accepted.push(call.clone());
            Ok(())
        }
    }

    #[test]
    fn failed_replay_keeps_the_rest_queued() {
        let mut queue = CommandQueue::new(Flaky { accepted: vec!(), capacity: 1 });
        queue.send(&pixel::initialize(&Properties::new(), "123")).unwrap();
        queue.send(&pixel::page()).unwrap();

        assert!(queue.mark_loaded().is_err());
        assert!(!queue.is_loaded());
        assert_eq!(queue.pending().collect::<Vec<_>>(), vec!(&pixel::page()));
        assert_eq!(queue.into_inner().accepted.len(), 1);
    }
}
