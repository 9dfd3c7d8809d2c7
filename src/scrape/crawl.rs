// src/scrape/crawl.rs
use std::{
    thread,
    time::Duration,
    sync::{mpsc, Arc, atomic::{AtomicBool, AtomicUsize, Ordering}},
};

use crate::{
    config::options::CrawlOptions,
    core::Fetch,
    data::ScrapedSpecies,
    error::Result,
    progress::Progress,
    specs::{sitemap::{self, LinkKind}, species_page::SpeciesPageSpec},
};

use super::frontier::Frontier;

type FetchOk = ScrapedSpecies;
type FetchErr = (String, String); // (url, message)

/// Two-phase crawl of the species sitemaps.
///
/// Phase 1 drains sitemaps from the frontier on the calling thread. Phase 2 hands
/// the discovered species pages to a pool of workers and streams the parsed
/// records back through [`Crawl`].
pub struct Crawler<F: Fetch + 'static> {
    fetcher: Arc<F>,
    spec: Arc<SpeciesPageSpec>,
    opts: CrawlOptions,
}

impl<F: Fetch + 'static> Crawler<F> {
    pub fn new(fetcher: Arc<F>, opts: CrawlOptions) -> Result<Self> {
        Ok(Self { fetcher, spec: Arc::new(SpeciesPageSpec::new()?), opts })
    }

    /// Walk every sitemap reachable from the seeds and return the species pages
    /// found, in discovery order, capped at `max_pages`. Failed sitemaps are skipped.
    pub fn discover(&self, mut progress: Option<&mut (dyn Progress + '_)>) -> Result<Vec<String>> {
        let mut frontier = Frontier::new(&self.opts.allowed_domains);
        frontier.reseed(&self.opts.start_urls);

        let mut pages = Vec::new();
        while let Some(req) = frontier.pop() {
            match req.kind {
                LinkKind::Species => pages.push(req.url),
                LinkKind::Sitemap => {
                    let body = match self.fetcher.get_text(&req.url) {
                        Ok(body) => body,
                        Err(e) => {
                            loge!("Sitemap {}: {e}", req.url);
                            if let Some(p) = progress.as_deref_mut() {
                                p.item_failed(&req.url);
                            }
                            continue;
                        }
                    };
                    let links = sitemap::parse_sitemap(&body, &self.opts.skip_prefixes)?;
                    logd!("Sitemap {} lists {} links", req.url, links.len());
                    for link in links {
                        frontier.push(&link.url, link.kind);
                    }
                }
            }
        }

        if let Some(max) = self.opts.max_pages {
            if pages.len() > max {
                logf!("Limiting crawl to {max} of {} species pages", pages.len());
                pages.truncate(max);
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Found {} species pages", pages.len()));
        }
        Ok(pages)
    }

    /// Discover pages, start the workers, and return the lazy record stream.
    pub fn crawl<'p>(&self, mut progress: Option<&'p mut dyn Progress>) -> Result<Crawl<'p>> {
        let pages = self.discover(progress.as_deref_mut())?;
        if let Some(p) = progress.as_deref_mut() {
            p.begin(pages.len());
        }
        Ok(self.spawn(pages, progress))
    }

    fn spawn<'p>(&self, pages: Vec<String>, progress: Option<&'p mut dyn Progress>) -> Crawl<'p> {
        let pages = Arc::new(pages);
        let counter = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let (res_tx, res_rx) = mpsc::channel::<std::result::Result<FetchOk, FetchErr>>();

        let workers = self.opts.workers.min(pages.len()).max(1);
        let pause = self.opts.request_pause_ms;
        let jitter_ms = self.opts.jitter_ms;

        for _ in 0..workers {
            let pages = Arc::clone(&pages);
            let idx = Arc::clone(&counter);
            let stop = Arc::clone(&stop);
            let fetcher = Arc::clone(&self.fetcher);
            let spec = Arc::clone(&self.spec);
            let tx = res_tx.clone();

            thread::spawn(move || {
                loop {
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                    let i = idx.fetch_add(1, Ordering::Relaxed);
                    if i >= pages.len() {
                        break;
                    }
                    let url = &pages[i];
                    let result = match fetcher.get_text(url) {
                        Ok(body) => Ok(spec.parse(url, &body)),
                        Err(e) => Err((url.clone(), e.to_string())),
                    };
                    if tx.send(result).is_err() {
                        break; // receiver dropped
                    }
                    let jitter = if jitter_ms == 0 { 0 } else { i as u64 % jitter_ms };
                    thread::sleep(Duration::from_millis(pause + jitter)); // be polite
                }
            });
        }
        drop(res_tx); // the Crawl is the sole receiver now

        Crawl { rx: res_rx, stop, progress, finished: false }
    }
}

/// Lazy, finite stream of scraped species. Not restartable: once exhausted it
/// stays exhausted. Dropping it early tells the workers to stop.
pub struct Crawl<'p> {
    rx: mpsc::Receiver<std::result::Result<FetchOk, FetchErr>>,
    stop: Arc<AtomicBool>,
    progress: Option<&'p mut dyn Progress>,
    finished: bool,
}

impl Iterator for Crawl<'_> {
    type Item = ScrapedSpecies;

    fn next(&mut self) -> Option<ScrapedSpecies> {
        if self.finished {
            return None;
        }
        loop {
            match self.rx.recv() {
                Ok(Ok(item)) => {
                    if let Some(p) = self.progress.as_deref_mut() {
                        p.item_done(&item.id);
                    }
                    return Some(item);
                }
                Ok(Err((url, msg))) => {
                    loge!("Species page {url}: {msg}");
                    if let Some(p) = self.progress.as_deref_mut() {
                        p.item_failed(&url);
                    }
                }
                Err(_) => {
                    // every worker has hung up
                    self.finished = true;
                    if let Some(p) = self.progress.as_deref_mut() {
                        p.finish();
                    }
                    return None;
                }
            }
        }
    }
}

impl Drop for Crawl<'_> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
