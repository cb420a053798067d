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

//! Property bags (event properties, user traits) and the lookup rules used on them

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// An ordered JSON object, as found in `properties` or `traits`
///
/// Key order is the order of the payload, which matters when several keys
/// collapse into one on the way out.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Looks a property up: exact key first, then any key with the same normalised form
    ///
    /// This is how the analytics SDK facades read properties, so `product_id`,
    /// `productId` and `productID` all answer to the same name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }

        let wanted = normalise_key(key);
        self.0.iter()
            .find(|(k, _)| normalise_key(k) == wanted)
            .map(|(_, v)| v)
    }

    /// Looks a property up under this exact key only
    pub fn get_exact(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks a property up and returns it as a non-empty string, if it has one
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(present_string)
    }

    /// Returns the objects of a list property, or None if the property is not a list
    ///
    /// Elements which are not objects have no readable fields and are dropped.
    pub fn get_objects(&self, key: &str) -> Option<Vec<Properties>> {
        self.get(key)
            .and_then(|v| v.as_array())
            .map(|items| items.iter()
                 .filter_map(|item| item.as_object())
                 .map(|object| Properties(object.clone()))
                 .collect())
    }

    /// Copies every key of another bag into this one, overwriting existing keys
    pub fn merge(&mut self, other: &Properties) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl<'de> Deserialize<'de> for Properties {
    /// Accepts an object or null (treated as empty)
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Properties(map.unwrap_or_default()))
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(map: Map<String, Value>) -> Self {
        Properties(map)
    }
}

impl FromIterator<(String, Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Properties(iter.into_iter().collect())
    }
}

/// Strips everything but ASCII letters and digits, lowercases the rest
fn normalise_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Renders a number the way a browser would print it (no trailing `.0` on integers)
pub fn number_to_string(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

/// Returns a value as a string if it is "present": a non-empty string or a non-zero number
///
/// Null, false, zero and empty strings count as absent. Other truthy
/// values (true, lists, objects) are rendered as JSON.
pub fn present_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64().map(|f| f == 0.0 || f.is_nan()).unwrap_or(false) => None,
        Value::Number(n) => Some(number_to_string(n)),
        other => Some(other.to_string()),
    }
}
