use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub address: String,
    pub port: u16,
    pub request_timeout_ms: u64,
    pub poll_period_ms: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            address: "192.168.4.1".to_string(),
            port: 80,
            request_timeout_ms: 10_000,
            poll_period_ms: 2_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Outbound {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            retry_backoff_ms: 500,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub network: Network,
    pub outbound: Outbound,
}

impl Config {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.network.address, self.network.port)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = Config::default();
        assert_eq!(config.base_url(), "http://192.168.4.1:80");
    }

    #[test]
    fn test_default_cadence_and_retry() {
        let config = Config::default();
        assert_eq!(config.network.poll_period_ms, 2_000);
        assert_eq!(config.outbound.retry_attempts, 0);
    }
}
