//! # linksim-types::scenario
//!
//! Strongly-typed scenario files for the CLI driver. A scenario names the
//! protocol under study, the two endpoints with their channel options, the
//! payloads each side submits, and optional deterministic corruptions used
//! to reproduce textbook failure cases.

use crate::config::{LinkConfig, ProtocolKind};
use crate::errors::ConfigError;
use crate::seq::SeqNum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One endpoint's entry in a scenario file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub id: String,
    #[serde(flatten)]
    pub link: LinkConfig,
    /// Payloads this endpoint submits to its peer, in order.
    #[serde(default)]
    pub payloads: Vec<String>,
}

/// A one-shot forced corruption: the first DATA frame with `seq` sent by
/// `endpoint` is flagged corrupt regardless of the channel's error rate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForcedCorruption {
    pub endpoint: String,
    pub seq: SeqNum,
}

/// A complete, self-contained simulation run description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub protocol: ProtocolKind,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Stop the run once the virtual clock passes this many seconds.
    #[serde(default)]
    pub stop_after_secs: Option<f64>,
    pub endpoints: Vec<EndpointSpec>,
    #[serde(default)]
    pub corruptions: Vec<ForcedCorruption>,
}

impl Scenario {
    /// Reads and parses a scenario file; the format is keyed on the file
    /// extension (`.toml` by default, `.yaml`/`.yml` for YAML).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|s| s.to_str());
        Self::parse(&content, extension)
    }

    /// Parses a scenario from TOML or YAML text.
    pub fn parse(content: &str, extension: Option<&str>) -> Result<Self, ConfigError> {
        match extension {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
            _ => Ok(toml::from_str(content)?),
        }
    }

    /// Checks internal consistency before the run is wired up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |message: String| ConfigError::Validation {
            name: self.name.clone(),
            message,
        };

        if self.endpoints.len() != 2 {
            return Err(fail(format!(
                "exactly two endpoints are required, found {}",
                self.endpoints.len()
            )));
        }
        if self.endpoints[0].id == self.endpoints[1].id {
            return Err(fail(format!("duplicate endpoint id {:?}", self.endpoints[0].id)));
        }
        for ep in &self.endpoints {
            ep.link.validate(self.protocol)?;
        }
        if !self.protocol.is_bidirectional() {
            if let Some(ep) = self.endpoints.get(1) {
                if !ep.payloads.is_empty() {
                    return Err(fail(format!(
                        "protocol {} is unidirectional; endpoint {:?} cannot submit payloads",
                        self.protocol, ep.id
                    )));
                }
            }
        }
        for c in &self.corruptions {
            if !self.endpoints.iter().any(|ep| ep.id == c.endpoint) {
                return Err(fail(format!(
                    "corruption references unknown endpoint {:?}",
                    c.endpoint
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(protocol: ProtocolKind) -> Scenario {
        Scenario {
            name: "t".into(),
            protocol,
            seed: Some(7),
            stop_after_secs: None,
            endpoints: vec![
                EndpointSpec {
                    id: "A".into(),
                    link: LinkConfig::new(0.0, 0.5).with_window(4),
                    payloads: vec!["0".into()],
                },
                EndpointSpec {
                    id: "B".into(),
                    link: LinkConfig::new(0.0, 0.5).with_window(4),
                    payloads: vec![],
                },
            ],
            corruptions: vec![],
        }
    }

    #[test]
    fn parses_toml() {
        let text = r#"
            name = "par-demo"
            protocol = "par"

            [[endpoints]]
            id = "A"
            error_rate = 0.1
            transmission_delay = 0.5
            payloads = ["hello", "world"]

            [[endpoints]]
            id = "B"
            error_rate = 0.1
            transmission_delay = 0.5
        "#;
        let sc = Scenario::parse(text, Some("toml")).unwrap();
        assert_eq!(sc.protocol, ProtocolKind::Par);
        sc.validate().unwrap();
    }

    #[test]
    fn rejects_payloads_on_unidirectional_receiver() {
        let mut sc = basic(ProtocolKind::Par);
        sc.endpoints[1].payloads.push("x".into());
        assert!(sc.validate().is_err());
    }

    #[test]
    fn rejects_unknown_corruption_target() {
        let mut sc = basic(ProtocolKind::GoBackN);
        sc.corruptions.push(ForcedCorruption {
            endpoint: "C".into(),
            seq: 2,
        });
        assert!(sc.validate().is_err());
    }
}
