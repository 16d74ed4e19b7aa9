use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_DATA_PATH: &str = "data/salon.json";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_NOTIFY_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub salon_name: String,
    pub currency: String,
    pub notify_interval: Duration,
    /// Services inserted when the services collection is empty.
    pub seed_services: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            salon_name: "Salon Desk".to_string(),
            currency: "GHS".to_string(),
            notify_interval: DEFAULT_NOTIFY_INTERVAL,
            seed_services: Vec::new(),
        }
    }
}

impl Config {
    /// Reads settings from the environment; anything missing or unparsable
    /// keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_path = lookup("APP_DATA_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let salon_name = lookup("SALON_NAME")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.salon_name);
        let currency = lookup("CURRENCY")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.currency);
        let notify_interval = lookup("NOTIFY_INTERVAL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.notify_interval);
        let seed_services = lookup("SEED_SERVICES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.seed_services);

        Self {
            data_path,
            port,
            salon_name,
            currency,
            notify_interval,
            seed_services,
        }
    }
}
