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

use serde::{de, Serialize, Deserialize};
use std::fs::File;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde_yaml;
use log;

/// Configuration defaults
pub mod defaults {
    use super::{Settings, Sink};

    pub fn logging_level() -> log::LevelFilter { log::LevelFilter::Info }

    /// A single JSON lines sink on standard output
    pub fn sinks() -> Vec<Sink> {
        vec!(Sink { sink_type: String::from("jsonl"), settings: Settings::new() })
    }
}

/// Pixel block
#[derive(Serialize, Deserialize, Debug)]
pub struct Pixel {
    /// The Snap Pixel ID, given as a string or a number
    #[serde(deserialize_with = "parse_pixel_id")]
    pub pixel_id: String,
}

/// Logging block
#[derive(Serialize, Deserialize, Debug)]
pub struct Logging {
    #[serde(default = "defaults::logging_level")]
    pub level: log::LevelFilter,
}

impl Default for Logging {
    /// Builds a default logging block in case none is provided
    fn default() -> Self {
        Self {
            level: defaults::logging_level(),
        }
    }
}

/// Convenience type: arbitrary key-value settings (for sinks)
pub type Settings = HashMap<String, serde_yaml::Value>;

/// A single sink block
#[derive(Serialize, Deserialize, Debug)]
pub struct Sink {
    /// The sink type
    #[serde(rename = "type")]
    pub sink_type: String,
    /// Some key-value settings specific to this sink
    #[serde(flatten)]
    pub settings: Settings,
}

/// The overall configuration file
#[derive(Serialize, Deserialize, Debug)]
pub struct Configuration {
    /// A pixel block
    pub pixel: Pixel,
    /// A logging block
    #[serde(default)]
    pub logging: Logging,
    /// And some sinks
    #[serde(default = "defaults::sinks")]
    pub sinks: Vec<Sink>,
}

/// Accepts the pixel ID as a string or as a number, YAML being YAML
fn parse_pixel_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: de::Deserializer<'de>,
{
    let v: serde_yaml::Value = de::Deserialize::deserialize(deserializer)?;
    let pixel_id = match v {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        _ => return Err(de::Error::custom("the pixel ID should be a string or a number")),
    };

    match pixel_id.trim().is_empty() {
        true => Err(de::Error::custom("the pixel ID cannot be empty")),
        false => Ok(pixel_id.trim().to_string()),
    }
}

/// Parses a configuration string
pub fn parse_configuration(content: &str) -> Result<Configuration, String> {
    serde_yaml::from_str(content).map_err(|e| e.to_string())
}

/// Parse a configuration file given a path
fn parse_configuration_file(path: &Path) -> Result<Configuration, String> {
    let path_str = path.to_string_lossy();
    let file = File::open(path).map_err(|e| format!("{}: {}", path_str, e))?;
    let configuration = serde_yaml::from_reader(file).map_err(|e| format!("{}: {}", path_str, e))?;
    Ok(configuration)
}

/// Locates and parses the configuration file
pub fn get_configuration(cmd_arg: Option<&Path>) -> Result<Configuration, String> {
    let given_location = cmd_arg
        .map(PathBuf::from)
        .or(std::env::var("SNAPTR_CONFIG").map(PathBuf::from).ok());

    /* If a path was given on the command line, ignore all other options */
    if let Some(path) = given_location {
        return parse_configuration_file(path.as_path());
    }

    /* Otherwise, try and guess */
    let xdg_dirs = ProjectDirs::from("com", "withings", "snaptr");
    let inferred_locations = [
        Some(PathBuf::from("/etc/withings/snaptr.yml")),
        Some(PathBuf::from("/etc/withings/snaptr.yaml")),
        xdg_dirs.as_ref().map(|dirs| PathBuf::from(dirs.config_dir()).join("snaptr.yml")),
        xdg_dirs.as_ref().map(|dirs| PathBuf::from(dirs.config_dir()).join("snaptr.yaml")),
        std::env::current_dir().map(|p| p.join("snaptr.yml")).ok(),
        std::env::current_dir().map(|p| p.join("snaptr.yaml")).ok(),
    ];

    let configuration = inferred_locations.iter()
        .flatten()
        .filter(|p| p.as_path().is_file())
        .map(|p| {
            log::debug!("trying configuration file: {}", p.display());
            parse_configuration_file(p)
        })
        .flatten()
        .next();

    configuration.ok_or(String::from("no valid configuration file found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    #[test]
    fn minimal_configuration() {
        let configuration = parse_configuration(indoc! {"
            pixel:
              pixel_id: abc-123
        "}).unwrap();

        assert_eq!(configuration.pixel.pixel_id, "abc-123");
        assert_eq!(configuration.logging.level, log::LevelFilter::Info);
        assert_eq!(configuration.sinks.len(), 1);
        assert_eq!(configuration.sinks[0].sink_type, "jsonl");
    }

    #[test]
    fn numeric_pixel_id() {
        let configuration = parse_configuration(indoc! {"
            pixel:
              pixel_id: 123123123
        "}).unwrap();
        assert_eq!(configuration.pixel.pixel_id, "123123123");
    }

    #[test]
    fn empty_pixel_id_is_refused() {
        assert!(parse_configuration("pixel: {pixel_id: ''}").is_err());
        assert!(parse_configuration("pixel: {pixel_id: [1]}").is_err());
        assert!(parse_configuration("logging: {level: debug}").is_err());
    }

    #[test]
    fn full_configuration() {
        let configuration = parse_configuration(indoc! {"
            pixel:
              pixel_id: '123123123'
            logging:
              level: debug
            sinks:
              - type: jsonl
                path: /var/log/snaptr/calls.jsonl
              - type: blackhole
        "}).unwrap();

        assert_eq!(configuration.logging.level, log::LevelFilter::Debug);
        assert_eq!(configuration.sinks.len(), 2);
        assert_eq!(
            configuration.sinks[0].settings.get("path"),
            Some(&serde_yaml::Value::String("/var/log/snaptr/calls.jsonl".into()))
        );
        assert!(configuration.sinks[1].settings.is_empty());
    }

    #[test]
    fn configuration_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pixel:\n  pixel_id: 42").unwrap();

        let configuration = get_configuration(Some(file.path())).unwrap();
        assert_eq!(configuration.pixel.pixel_id, "42");
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let error = get_configuration(Some(Path::new("/nonexistent/snaptr.yml"))).unwrap_err();
        assert!(error.starts_with("/nonexistent/snaptr.yml: "));
    }
}
