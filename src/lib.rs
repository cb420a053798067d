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

//! snaptr: maps Rudderstack/Segment events onto Snap Pixel calls
//!
//! The mapping lives in [`pixel`] and is pure: an event in, a
//! [`pixel::VendorCall`] out. [`forwarder::Forwarder`] adds the session
//! handling the pixel expects (one init per visitor) and hands calls to a
//! [`sinks::PixelSink`].

pub mod config;
pub mod events;
pub mod forwarder;
pub mod logging;
pub mod pixel;
pub mod replay;
pub mod sinks;
pub mod stats;
