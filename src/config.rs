//! Startup configuration from the environment.

use std::num::ParseIntError;
use std::time::Duration;

use jiff::SignedDuration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid value for {name}: {source}")]
    Parse {
        name: &'static str,
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port to listen on, bound to localhost.
    pub port: u16,
    /// How long the simulated verifier takes to answer.
    pub submit_delay: Duration,
    /// Form instances idle for longer than this are dropped.
    pub idle_timeout: SignedDuration,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let port = parse(&lookup, "SIGN_IN_PORT")?.unwrap_or(8000);
        let submit_delay = parse(&lookup, "SIGN_IN_SUBMIT_DELAY_MS")?.unwrap_or(1500);
        let idle_timeout = parse(&lookup, "SIGN_IN_IDLE_TIMEOUT_SECS")?.unwrap_or(30 * 60);

        Ok(Self {
            port,
            submit_delay: Duration::from_millis(submit_delay),
            idle_timeout: SignedDuration::from_secs(idle_timeout),
        })
    }
}

fn parse<T>(lookup: impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<T>, Error>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    lookup(name)
        .map(|value| value.parse::<T>())
        .transpose()
        .map_err(|source| Error::Parse { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.submit_delay, Duration::from_millis(1500));
        assert_eq!(config.idle_timeout, SignedDuration::from_secs(1800));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|name| match name {
            "SIGN_IN_PORT" => Some("9001".into()),
            "SIGN_IN_SUBMIT_DELAY_MS" => Some("0".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.submit_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(|name| (name == "SIGN_IN_PORT").then(|| "http".into()))
            .unwrap_err();
        assert!(err.to_string().contains("SIGN_IN_PORT"), "{err}");
    }
}
