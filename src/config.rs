use std::path::PathBuf;

/// Display caps for the temporal (events) arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalCaps {
    pub upcoming: usize,
    pub ongoing: usize,
    pub past: usize,
}

impl Default for TemporalCaps {
    fn default() -> Self {
        Self {
            upcoming: 6,
            ongoing: 3,
            past: 9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    /// When set, documents are fetched over HTTP relative to this URL.
    pub base_url: Option<String>,
    pub out_dir: PathBuf,
    pub subscribers_db: String,
    pub caps: TemporalCaps,
    pub featured_cap: usize,
    pub fetch_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = TemporalCaps::default();
        Self {
            data_dir: PathBuf::from(std::env::var("ROBOSITE_DATA_DIR").unwrap_or_else(|_| "data".to_string())),
            base_url: std::env::var("ROBOSITE_BASE_URL").ok().filter(|v| !v.trim().is_empty()),
            out_dir: PathBuf::from(std::env::var("ROBOSITE_OUT_DIR").unwrap_or_else(|_| "out/site".to_string())),
            subscribers_db: std::env::var("ROBOSITE_DB").unwrap_or_else(|_| "robosite.sqlite".to_string()),
            caps: TemporalCaps {
                upcoming: std::env::var("UPCOMING_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.upcoming),
                ongoing: std::env::var("ONGOING_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.ongoing),
                past: std::env::var("PAST_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.past),
            },
            featured_cap: std::env::var("FEATURED_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(3),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let caps = TemporalCaps::default();
        Self {
            data_dir: PathBuf::from("data"),
            base_url: None,
            out_dir: PathBuf::from("out/site"),
            subscribers_db: "robosite.sqlite".to_string(),
            caps,
            featured_cap: 3,
            fetch_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_caps() {
        let cfg = Config::default();
        assert_eq!(cfg.caps.upcoming, 6);
        assert_eq!(cfg.caps.ongoing, 3);
        assert_eq!(cfg.caps.past, 9);
        assert_eq!(cfg.featured_cap, 3);
        assert!(cfg.base_url.is_none());
    }
}
