use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::Path;

use mandi_builtin_negotiators::coach;
use mandi_builtin_negotiators::Haggler;
use mandi_negotiator_component::static_lib::{create_static_counterpart, BoxedCounterpart};
use mandi_negotiator_component::CounterpartFactory;

use crate::room::ReplyDelay;
use crate::session::SessionConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum LoadMode {
    BuiltIn,
    StaticLib { library: String },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CounterpartConfig {
    pub name: String,
    pub load_mode: LoadMode,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl Default for CounterpartConfig {
    fn default() -> Self {
        CounterpartConfig {
            name: "Haggler".to_string(),
            load_mode: LoadMode::BuiltIn,
            params: serde_yaml::Value::Null,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NegotiationConfig {
    pub session: SessionConfig,
    pub reply_delay: ReplyDelay,
    pub coach: coach::Config,
    /// Fixed seed makes market prices and reply phrasing reproducible.
    pub seed: Option<u64>,
    pub counterpart: CounterpartConfig,
}

impl NegotiationConfig {
    pub fn from_yaml(content: &str) -> anyhow::Result<NegotiationConfig> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<NegotiationConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read negotiation config {}. {}", path.display(), e)
        })?;
        Self::from_yaml(&content)
    }
}

pub fn create_counterpart(config: CounterpartConfig) -> anyhow::Result<BoxedCounterpart> {
    let name = config.name;
    let counterpart = match config.load_mode {
        LoadMode::BuiltIn => create_builtin(&name, config.params)?,
        LoadMode::StaticLib { library } => {
            create_static_counterpart(&format!("{}::{}", library, name), config.params)?
        }
    };

    log::info!("Created counterpart '{}'.", name);
    Ok(counterpart)
}

pub fn create_builtin(name: &str, config: serde_yaml::Value) -> anyhow::Result<BoxedCounterpart> {
    let counterpart = match name {
        "Haggler" => Box::new(Haggler::new(name, config)?) as BoxedCounterpart,
        _ => bail!("BuiltIn counterpart {} doesn't exist.", name),
    };
    Ok(counterpart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandi_builtin_negotiators::haggler;
    use mandi_market_utils::Language;
    use std::time::Duration;

    #[test]
    fn test_negotiation_config() {
        let config = NegotiationConfig {
            seed: Some(17),
            counterpart: CounterpartConfig {
                name: "Haggler".to_string(),
                load_mode: LoadMode::BuiltIn,
                params: serde_yaml::to_value(haggler::Config {
                    concession: 0.5,
                    ..Default::default()
                })
                .unwrap(),
            },
            ..Default::default()
        };

        let serialized = serde_yaml::to_string(&config).unwrap();
        println!("{}", serialized);

        let deserialized = NegotiationConfig::from_yaml(&serialized).unwrap();
        assert_eq!(deserialized, config);
        create_counterpart(deserialized.counterpart).unwrap();
    }

    #[test]
    fn test_config_defaults() {
        let config = NegotiationConfig::from_yaml(
            r#"
session:
  language: hi
reply_delay:
  min: 200ms
  max: 1s
"#,
        )
        .unwrap();

        assert_eq!(config.session.language, Language::Hi);
        assert_eq!(config.session.quantity, 50);
        assert_eq!(config.session.max_offer, 10_000);
        assert_eq!(config.reply_delay.min, Duration::from_millis(200));
        assert_eq!(config.reply_delay.max, Duration::from_secs(1));
        assert_eq!(config.coach, coach::Config::default());
        assert_eq!(config.counterpart, CounterpartConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(create_builtin("Stubborn", serde_yaml::Value::Null).is_err());
        assert!(create_counterpart(CounterpartConfig {
            name: "Stubborn".to_string(),
            load_mode: LoadMode::StaticLib {
                library: "nowhere".to_string()
            },
            params: serde_yaml::Value::Null,
        })
        .is_err());
    }
}
