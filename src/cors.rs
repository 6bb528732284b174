//! Origin policy for browser callers. The allow-list is fixed at
//! construction; local-development origins are accepted by rule and never
//! added to the list.

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "https://affiti.aloi.com.br"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGINS.iter().map(|o| (*o).to_string()))
    }
}

impl OriginPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { allowed: allowed.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    /// Requests without an origin (non-browser clients) are allowed.
    #[must_use]
    pub fn allows(&self, origin: Option<&str>) -> bool {
        let Some(origin) = origin else {
            return true;
        };
        if self.allowed.iter().any(|o| o == origin) {
            return true;
        }
        let ok = is_local_dev(origin);
        if !ok {
            log::debug!("origin rejected: {origin}");
        }
        ok
    }
}

/// `http(s)://localhost` or `http(s)://127.0.0.1`, with an optional port and
/// nothing after it.
fn is_local_dev(origin: &str) -> bool {
    let Some(rest) = origin.strip_prefix("http://").or_else(|| origin.strip_prefix("https://")) else {
        return false;
    };
    let (host, port) = match rest.split_once(':') {
        Some((h, p)) => (h, Some(p)),
        None => (rest, None),
    };
    if host != "localhost" && host != "127.0.0.1" {
        return false;
    }
    port.is_none_or(|p| !p.is_empty() && p.len() <= 5 && p.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_and_missing_origin() {
        let p = OriginPolicy::default();
        assert!(p.allows(None));
        assert!(p.allows(Some("https://affiti.aloi.com.br")));
        assert!(!p.allows(Some("https://evil.example")));
    }

    #[test]
    fn local_dev_rule() {
        let p = OriginPolicy::new(Vec::<String>::new());
        assert!(p.allows(Some("http://localhost")));
        assert!(p.allows(Some("http://localhost:5173")));
        assert!(p.allows(Some("https://127.0.0.1:8443")));
        assert!(!p.allows(Some("http://localhost.evil.com")));
        assert!(!p.allows(Some("http://evil.com/localhost")));
        assert!(!p.allows(Some("http://localhost:80/x")));
        assert!(!p.allows(Some("http://localhost:")));
        assert!(!p.allows(Some("ftp://localhost")));
    }

    #[test]
    fn local_origins_do_not_grow_the_list() {
        let p = OriginPolicy::default();
        assert!(p.allows(Some("http://localhost:4000")));
        assert_eq!(p.allowed_origins().len(), DEFAULT_ALLOWED_ORIGINS.len());
    }
}
