// src/core/net.rs
// HTTP GET over reqwest's blocking client. Everything that talks to the network
// goes through `Fetch`, so crawls and downloads can run against canned pages in tests.

use std::{fs::File, io::BufWriter, io::Write, path::Path, time::Duration};

use reqwest::{Url, blocking::Client};

use crate::config::options::NetOptions;
use crate::error::{Error, Result};

pub trait Fetch: Send + Sync {
    /// GET `url` and return the body as text. Non-2xx is an error.
    fn get_text(&self, url: &str) -> Result<String>;

    /// GET `url` straight into `out_path`, truncating it. Returns bytes written.
    fn get_to_file(&self, url: &str, out_path: &Path) -> Result<u64> {
        let body = self.get_text(url)?;
        std::fs::write(out_path, &body).map_err(|e| Error::io(out_path, e))?;
        Ok(body.len() as u64)
    }
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Client for page-sized requests.
    pub fn for_pages(opts: &NetOptions) -> Result<Self> {
        Self::with_timeout(&opts.user_agent, opts.page_timeout())
    }

    /// Client for the large survey downloads.
    pub fn for_downloads(opts: &NetOptions) -> Result<Self> {
        Self::with_timeout(&opts.user_agent, opts.download_timeout())
    }

    fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Http { url: s!("<client>"), source })?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|source| Error::Http { url: s!(url), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status { url: s!(url), status: status.as_u16() });
        }
        Ok(resp)
    }
}

impl Fetch for HttpClient {
    fn get_text(&self, url: &str) -> Result<String> {
        logd!("GET {url}");
        self.get(url)?
            .text()
            .map_err(|source| Error::Http { url: s!(url), source })
    }

    fn get_to_file(&self, url: &str, out_path: &Path) -> Result<u64> {
        logd!("GET {url} -> {}", out_path.display());
        let mut resp = self.get(url)?;
        let file = File::create(out_path).map_err(|e| Error::io(out_path, e))?;
        let mut out = BufWriter::new(file);
        let n = resp
            .copy_to(&mut out)
            .map_err(|source| Error::Http { url: s!(url), source })?;
        out.flush().map_err(|e| Error::io(out_path, e))?;
        Ok(n)
    }
}

/// Host part of `url`, lowercased. `None` for unparsable or host-less URLs.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(|h| h.to_ascii_lowercase())
}

/// True when `url`'s host is one of `domains` or a subdomain of one.
/// An empty domain list allows everything.
pub fn is_allowed(url: &str, domains: &[String]) -> bool {
    if domains.is_empty() {
        return true;
    }
    let Some(host) = host_of(url) else { return false };
    domains.iter().any(|d| {
        let d = d.to_ascii_lowercase();
        host == d || host.ends_with(&format!(".{d}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_domains_include_subdomains() {
        let domains = vec![s!("reeflifesurvey.com")];
        assert!(is_allowed("https://reeflifesurvey.com/species/x/", &domains));
        assert!(is_allowed("https://images.reeflifesurvey.com/a.jpg", &domains));
        assert!(!is_allowed("https://example.com/species/x/", &domains));
        assert!(!is_allowed("https://notreeflifesurvey.com/", &domains));
        assert!(!is_allowed("not a url", &domains));
    }

    #[test]
    fn empty_domain_list_allows_everything() {
        assert!(is_allowed("https://example.com/", &[]));
    }
}
