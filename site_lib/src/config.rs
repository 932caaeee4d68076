//! Environment-driven settings: upstream hosts and per-call deadlines.

use std::time::Duration;

pub const ENV_API_BASE: &str = "NEXT_PUBLIC_API_BASE";
pub const ENV_SITE_URL: &str = "NEXT_PUBLIC_SITE_URL";
pub const ENV_BACKEND_URL: &str = "NEXT_PUBLIC_BACKEND_URL";
pub const ENV_CONTACT_SUBMIT_URL: &str = "NEXT_PUBLIC_CONTACT_SUBMIT_URL";

/// Host assumed when a request carries no `Host` header.
const DEFAULT_HOST: &str = "localhost:3000";

/// Last-resort contact endpoint, tried after every configured one.
const LOCAL_CONTACT_SUBMIT_URL: &str = "http://localhost:8000/api/contact/submit/";

/// Deadline for each kind of upstream call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTimeouts {
    pub categories: Duration,
    pub blogs: Duration,
    pub homepage: Duration,
    pub contact: Duration,
    pub site_config: Duration,
}

impl Default for FetchTimeouts {
    fn default() -> Self {
        Self {
            categories: Duration::from_millis(3000),
            blogs: Duration::from_millis(5000),
            homepage: Duration::from_millis(10000),
            contact: Duration::from_millis(6000),
            site_config: Duration::from_millis(4000),
        }
    }
}

impl FetchTimeouts {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            categories: env_millis(lookup, "SITE_TIMEOUT_CATEGORIES_MS", defaults.categories),
            blogs: env_millis(lookup, "SITE_TIMEOUT_BLOGS_MS", defaults.blogs),
            homepage: env_millis(lookup, "SITE_TIMEOUT_HOMEPAGE_MS", defaults.homepage),
            contact: env_millis(lookup, "SITE_TIMEOUT_CONTACT_MS", defaults.contact),
            site_config: env_millis(lookup, "SITE_TIMEOUT_SITE_CONFIG_MS", defaults.site_config),
        }
    }
}

/// Where the content API lives and how long to wait for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_base: Option<String>,
    pub site_url: Option<String>,
    pub backend_url: Option<String>,
    pub contact_submit_url: Option<String>,
    pub timeouts: FetchTimeouts,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let base = |key: &str| get(key).map(|v| v.trim_end_matches('/').to_string());
        Self {
            api_base: base(ENV_API_BASE),
            site_url: base(ENV_SITE_URL),
            backend_url: base(ENV_BACKEND_URL),
            // Full endpoint URL; its trailing slash is significant.
            contact_submit_url: get(ENV_CONTACT_SUBMIT_URL),
            timeouts: FetchTimeouts::from_lookup(&lookup),
        }
    }

    /// Overrides the configured API base (e.g. from a CLI flag).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        let trimmed = api_base.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.api_base = Some(trimmed.to_string());
        }
        self
    }

    /// Upstream base URL: the configured API base, else the site URL, else
    /// `http://<host>` from the inbound request's `Host` header.
    pub fn resolve_api_base(&self, host: Option<&str>) -> String {
        if let Some(base) = self.api_base.as_ref().or(self.site_url.as_ref()) {
            return base.clone();
        }
        let host = host.map(str::trim).filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HOST);
        format!("http://{}", host)
    }

    /// Contact submit endpoints, in the order they should be tried.
    pub fn contact_submit_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        if let Some(direct) = &self.contact_submit_url {
            urls.push(direct.clone());
        }
        if let Some(base) = &self.api_base {
            urls.push(format!("{}/api/contact/submit/", base));
        }
        if let Some(base) = &self.backend_url {
            urls.push(format!("{}/api/contact/submit/", base));
        }
        urls.push(LOCAL_CONTACT_SUBMIT_URL.to_string());
        urls
    }
}

fn env_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    lookup(key)
        .and_then(|val| val.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn api_base_wins_over_host() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_API_BASE, "https://cms.example.com/")]));
        assert_eq!(
            settings.resolve_api_base(Some("www.example.com")),
            "https://cms.example.com"
        );
    }

    #[test]
    fn site_url_is_second_choice() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_SITE_URL, "https://www.example.com")]));
        assert_eq!(settings.resolve_api_base(None), "https://www.example.com");
    }

    #[test]
    fn host_header_is_used_when_unconfigured() {
        let settings = Settings::from_lookup(lookup_from(&[(ENV_API_BASE, "   ")]));
        assert_eq!(settings.resolve_api_base(Some("10.0.0.5:3000")), "http://10.0.0.5:3000");
        assert_eq!(settings.resolve_api_base(None), "http://localhost:3000");
    }

    #[test]
    fn timeouts_fall_back_on_bad_values() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("SITE_TIMEOUT_BLOGS_MS", "2500"),
            ("SITE_TIMEOUT_CATEGORIES_MS", "soon"),
            ("SITE_TIMEOUT_CONTACT_MS", "0"),
        ]));
        assert_eq!(settings.timeouts.blogs, Duration::from_millis(2500));
        assert_eq!(settings.timeouts.categories, Duration::from_millis(3000));
        assert_eq!(settings.timeouts.contact, Duration::from_millis(6000));
    }

    #[test]
    fn contact_urls_are_ordered() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_CONTACT_SUBMIT_URL, "https://forms.example.com/submit"),
            (ENV_API_BASE, "https://cms.example.com"),
            (ENV_BACKEND_URL, "https://backend.example.com"),
        ]));
        assert_eq!(
            settings.contact_submit_urls(),
            vec![
                "https://forms.example.com/submit".to_string(),
                "https://cms.example.com/api/contact/submit/".to_string(),
                "https://backend.example.com/api/contact/submit/".to_string(),
                "http://localhost:8000/api/contact/submit/".to_string(),
            ]
        );
    }

    #[test]
    fn cli_override_replaces_env_base() {
        let settings = Settings::default().with_api_base("http://127.0.0.1:9000/");
        assert_eq!(settings.resolve_api_base(None), "http://127.0.0.1:9000");
    }
}
