use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Fill a missing data file with the sample directory.
    pub seed: bool,
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", DEFAULT_PORT),
            data_path: env::var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
            seed: try_load("APP_SEED", true),
            log_filter: env::var("APP_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            seed: true,
            log_filter: "info".to_string(),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("invalid {key} value {raw:?}: {e}, using default {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert!(config.seed);
    }

    #[test]
    fn unparsable_value_falls_back() {
        // SAFETY: only this test touches the variable.
        unsafe { env::set_var("DOWNTOWN_TEST_PORT", "not-a-port") };
        assert_eq!(try_load("DOWNTOWN_TEST_PORT", 9000u16), 9000);
        unsafe { env::set_var("DOWNTOWN_TEST_PORT", " 9100 ") };
        assert_eq!(try_load("DOWNTOWN_TEST_PORT", 9000u16), 9100);
        unsafe { env::remove_var("DOWNTOWN_TEST_PORT") };
    }
}
