// src/scrape/frontier.rs
use std::collections::{HashSet, VecDeque};

use crate::core::net;
use crate::specs::sitemap::LinkKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub kind: LinkKind,
}

/// FIFO of pending requests. A URL is queued at most once per seeding, and only
/// if its host is allowed. `reseed` throws everything away and starts over.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Request>,
    seen: HashSet<String>,
    allowed_domains: Vec<String>,
}

impl Frontier {
    pub fn new(allowed_domains: &[String]) -> Self {
        Self { allowed_domains: allowed_domains.to_vec(), ..Self::default() }
    }

    /// Queue `url`. Returns false when it was filtered or already seen.
    pub fn push(&mut self, url: &str, kind: LinkKind) -> bool {
        if !net::is_allowed(url, &self.allowed_domains) {
            logd!("Off-domain link skipped: {url}");
            return false;
        }
        if !self.seen.insert(s!(url)) {
            return false;
        }
        self.queue.push_back(Request { url: s!(url), kind });
        true
    }

    pub fn pop(&mut self) -> Option<Request> {
        self.queue.pop_front()
    }

    /// Clear the queue and the seen-set, then queue `seeds` as sitemaps.
    pub fn reseed(&mut self, seeds: &[String]) {
        self.queue.clear();
        self.seen.clear();
        for url in seeds {
            self.push(url, LinkKind::Sitemap);
        }
    }

    pub fn len(&self) -> usize { self.queue.len() }
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }
    pub fn seen(&self) -> usize { self.seen.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> Vec<String> { vec![s!("reeflifesurvey.com")] }

    #[test]
    fn dedupes_and_filters_domains() {
        let mut f = Frontier::new(&domains());
        assert!(f.push("https://reeflifesurvey.com/species/a/", LinkKind::Species));
        assert!(!f.push("https://reeflifesurvey.com/species/a/", LinkKind::Species));
        assert!(!f.push("https://elsewhere.org/species/b/", LinkKind::Species));
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn pops_in_insertion_order() {
        let mut f = Frontier::new(&[]);
        f.push("https://x/1.xml", LinkKind::Sitemap);
        f.push("https://x/species/a/", LinkKind::Species);
        assert_eq!(f.pop().map(|r| r.url), Some(s!("https://x/1.xml")));
        assert_eq!(f.pop().map(|r| r.kind), Some(LinkKind::Species));
        assert!(f.pop().is_none());
    }

    #[test]
    fn reseed_forgets_history() {
        let mut f = Frontier::new(&[]);
        f.push("https://x/species/a/", LinkKind::Species);
        let _ = f.pop();
        f.reseed(&[s!("https://x/sitemap.xml")]);
        assert_eq!(f.seen(), 1);
        assert!(f.push("https://x/species/a/", LinkKind::Species));
        assert_eq!(f.pop().map(|r| r.kind), Some(LinkKind::Sitemap));
    }
}
