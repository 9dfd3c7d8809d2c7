// src/merge/mod.rs
//! Joining scraped pages, the reference feed and survey rows into the API documents.
//!
//! Pure: no I/O, no clock, no randomness. The caller reads inputs (`store`) and
//! writes outputs (`runner`).

pub mod classify;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::config::consts::SUMMARY_PROGRAM;
use crate::core::sanitize::{slugify, unique_slug};
use crate::data::*;

pub use classify::classify;

/// A field where the crawl and the reference feed disagree. The reference value
/// is the one written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldConflict {
    pub species_id: String,
    pub field: &'static str,
    pub scraped: String,
    pub reference: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub conflicts: Vec<FieldConflict>,
    /// Reference slugs no crawled page joins to, by id or by name.
    pub missing_from_crawl: Vec<String>,
    /// Survey species names found neither in the reference nor in the crawl.
    pub unmatched: Vec<String>,
}

/// Who owns a survey species name. The reference feed is looked up by
/// scientific name; each reference entry is joined to its crawled page by id,
/// falling back to the page name.
struct Lookup<'a> {
    reference: HashMap<String, &'a ReferenceSpecies>,
    /// Crawled pages by lowercased name, for names the reference lacks.
    scraped: HashMap<String, &'a ScrapedSpecies>,
    /// Reference slug → crawled page.
    joined: HashMap<&'a str, &'a ScrapedSpecies>,
    /// Ids owned by the reference or the crawl. Fallback slugs never take them.
    reserved: BTreeSet<&'a str>,
}

impl<'a> Lookup<'a> {
    fn new(scraped: &'a [ScrapedSpecies], reference: &'a [ReferenceSpecies]) -> Self {
        let mut by_ref = HashMap::new();
        for r in reference {
            by_ref.entry(r.scientific_name.trim().to_lowercase()).or_insert(r);
        }
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();
        for s in scraped {
            if !s.name.trim().is_empty() {
                by_name.entry(s.name.trim().to_lowercase()).or_insert(s);
            }
            if !s.id.is_empty() {
                by_id.entry(s.id.as_str()).or_insert(s);
            }
        }

        let mut joined = HashMap::new();
        for r in reference {
            let hit = by_id
                .get(r.slug.as_str())
                .or_else(|| by_name.get(&r.scientific_name.trim().to_lowercase()))
                .copied();
            if let Some(s) = hit {
                joined.entry(r.slug.as_str()).or_insert(s);
            }
        }

        let reserved = reference
            .iter()
            .map(|r| r.slug.as_str())
            .chain(by_id.keys().copied())
            .filter(|id| !id.is_empty())
            .collect();

        Self { reference: by_ref, scraped: by_name, joined, reserved }
    }

    /// Crawled page and reference entry for a survey species name.
    fn find(&self, name: &str) -> (Option<&'a ScrapedSpecies>, Option<&'a ReferenceSpecies>) {
        let key = name.trim().to_lowercase();
        match self.reference.get(&key).copied() {
            Some(r) => (self.joined.get(r.slug.as_str()).copied(), Some(r)),
            None => (self.scraped.get(&key).copied(), None),
        }
    }
}

/// Merge everything into the four API documents.
///
/// Species ids: reference slug, else crawled page id, else a slug of the name.
/// Slugs of unmatched names that land on a taken id get `-2`, `-3`, … in name order.
pub fn merge(
    scraped: &[ScrapedSpecies],
    reference: &[ReferenceSpecies],
    rows: &[SurveyRow],
) -> (ApiDocuments, MergeReport) {
    let mut rows: Vec<&SurveyRow> = rows.iter().filter(|r| r.species().is_some()).collect();
    rows.sort_by(|a, b| cmp_survey_ids(&a.survey_id, &b.survey_id).then_with(|| a.species().cmp(&b.species())));

    let lookup = Lookup::new(scraped, reference);
    let mut report = MergeReport::default();

    let ids = resolve_ids(&rows, &lookup, &mut report);
    let species = build_species(&rows, &ids, &lookup, &mut report);
    let sites = build_sites(&rows);
    let surveys = build_surveys(&rows, &ids);
    let summary = build_summary(&rows);

    let mut missing: Vec<String> = reference
        .iter()
        .filter(|r| !lookup.joined.contains_key(r.slug.as_str()))
        .map(|r| r.slug.clone())
        .collect();
    missing.sort();
    missing.dedup();
    if !missing.is_empty() {
        logw!("{} reference species were not found by the crawl", missing.len());
        for slug in &missing {
            logd!("Not crawled: {slug}");
        }
    }
    report.missing_from_crawl = missing;

    logf!(
        "Merged {} species, {} sites, {} surveys ({} conflicts)",
        species.len(),
        sites.len(),
        surveys.len(),
        report.conflicts.len()
    );
    (ApiDocuments { species, sites, surveys, summary }, report)
}

/// Survey species name → species id.
fn resolve_ids(rows: &[&SurveyRow], lookup: &Lookup<'_>, report: &mut MergeReport) -> HashMap<String, String> {
    let names: BTreeSet<&str> = rows.iter().filter_map(|r| r.species()).collect();

    let mut seen: HashMap<String, usize> = lookup.reserved.iter().map(|id| (s!(*id), 1)).collect();
    let mut claimed = HashSet::new();
    let mut ids = HashMap::with_capacity(names.len());
    let mut unmatched = Vec::new();

    for name in names {
        let stem = match lookup.find(name) {
            (_, Some(r)) => r.slug.as_str(),
            (Some(s), None) => s.id.as_str(),
            (None, None) => {
                unmatched.push(name);
                continue;
            }
        };
        let id = if claimed.insert(stem) { s!(stem) } else { unique_slug(stem, &mut seen) };
        if id != stem {
            logw!("Species id `{stem}` already taken; `{name}` gets `{id}`");
        }
        ids.insert(s!(name), id);
    }

    for name in unmatched {
        report.unmatched.push(s!(name));
        let stem = slugify(name);
        let id = unique_slug(&stem, &mut seen);
        if id != stem {
            logw!("Species id `{stem}` already taken; `{name}` gets `{id}`");
        }
        ids.insert(s!(name), id);
    }
    if !report.unmatched.is_empty() {
        logd!("{} survey species have no page or reference entry", report.unmatched.len());
    }
    ids
}

/// A present reference value always wins. A crawled value that differs from it
/// is reported.
fn pick<T: PartialEq>(
    report: &mut MergeReport,
    species_id: &str,
    field: &'static str,
    scraped: Option<T>,
    reference: Option<T>,
    show: impl Fn(&T) -> String,
) -> Option<T> {
    match (scraped, reference) {
        (Some(s), Some(r)) => {
            if s != r {
                let conflict = FieldConflict {
                    species_id: s!(species_id),
                    field,
                    scraped: show(&s),
                    reference: show(&r),
                };
                logw!(
                    "{species_id}: {field} differs (crawl: {:?}, reference: {:?}); using reference",
                    conflict.scraped,
                    conflict.reference
                );
                report.conflicts.push(conflict);
            }
            Some(r)
        }
        (s, r) => r.or(s),
    }
}

/// Empty crawled values count as absent.
fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s!(s)) }
}

fn build_species(
    rows: &[&SurveyRow],
    ids: &HashMap<String, String>,
    lookup: &Lookup<'_>,
    report: &mut MergeReport,
) -> SpeciesDoc {
    // name → (first row, max data type)
    let mut per_name: BTreeMap<&str, (&SurveyRow, DataType)> = BTreeMap::new();
    for row in rows {
        let Some(name) = row.species() else { continue };
        let dt = classify(row);
        per_name
            .entry(name)
            .and_modify(|(_, max)| *max = (*max).max(dt))
            .or_insert((*row, dt));
    }

    let mut doc = SpeciesDoc::new();
    for (name, (first, data_type)) in per_name {
        let Some(id) = ids.get(name) else { continue };
        let (scraped, reference) = lookup.find(name);

        // joined by name: the page slug should match the reference slug
        if let (Some(s), Some(r)) = (scraped, reference) {
            let _ = pick(report, id, "id", Some(s.id.clone()), Some(r.slug.clone()), String::clone);
        }

        let common_name = pick(
            report,
            id,
            "common_name",
            scraped.and_then(|s| non_empty(&s.common_name)),
            reference.and_then(|r| r.common_name.as_deref().map(|v| s!(v.trim()))),
            String::clone,
        )
        .unwrap_or_default();

        let url = pick(
            report,
            id,
            "url",
            scraped.and_then(|s| non_empty(&s.url)),
            reference.and_then(|r| r.url.as_deref().map(|v| s!(v.trim()))),
            String::clone,
        );

        let image_urls = pick(
            report,
            id,
            "image_urls",
            scraped.map(|s| s.image_urls.clone()).filter(|v| !v.is_empty()),
            reference.and_then(|r| r.image_urls.clone()),
            |v: &Vec<String>| v.join(", "),
        )
        .unwrap_or_default();

        doc.insert(
            id.clone(),
            SpeciesRecord {
                scientific_name: s!(name),
                common_name,
                url,
                data_type,
                image_urls,
                class: first.class_name.clone(),
                family: first.family.clone(),
            },
        );
    }
    doc
}

fn build_sites(rows: &[&SurveyRow]) -> SitesDoc {
    let mut doc = SitesDoc::new();
    let mut surveys_per_site: HashMap<&str, HashSet<&str>> = HashMap::new();

    for row in rows {
        surveys_per_site.entry(row.site_code.as_str()).or_default().insert(row.survey_id.as_str());
        doc.entry(row.site_code.clone()).or_insert_with(|| SiteRecord {
            site_name: row.site_name.clone(),
            country: row.country.clone(),
            realm: row.realm.clone(),
            ecoregion: row.ecoregion.clone(),
            location: row.location.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
            num_surveys: 0,
        });
    }
    for (code, site) in doc.iter_mut() {
        site.num_surveys = surveys_per_site.get(code.as_str()).map_or(0, HashSet::len);
    }
    doc
}

fn to_count(total: f64) -> u64 {
    if total.is_finite() && total > 0.0 { total.round() as u64 } else { 0 }
}

fn build_surveys(rows: &[&SurveyRow], ids: &HashMap<String, String>) -> SurveysDoc {
    let mut totals: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    let mut doc = SurveysDoc::new();

    for row in rows {
        let Some(id) = row.species().and_then(|n| ids.get(n)) else { continue };
        *totals.entry(row.survey_id.as_str()).or_default().entry(id.as_str()).or_insert(0.0) += row.total;
        doc.entry(row.survey_id.clone()).or_insert_with(|| SurveyRecord {
            site_code: row.site_code.clone(),
            survey_date: row.survey_date.clone().filter(|d| !d.trim().is_empty()),
            program: row.program.clone(),
            species: BTreeMap::new(),
        });
    }
    for (survey_id, per_species) in totals {
        if let Some(record) = doc.get_mut(survey_id) {
            record.species = per_species.into_iter().map(|(id, t)| (s!(id), to_count(t))).collect();
        }
    }
    doc
}

/// Names that do not stand for one identified species.
fn is_countable_species(name: &str) -> bool {
    if name.starts_with("Unidentified") {
        return false;
    }
    !(name.split_whitespace().count() == 2 && name.ends_with("spp."))
}

fn build_summary(rows: &[&SurveyRow]) -> Summary {
    let core: Vec<&&SurveyRow> = rows.iter().filter(|r| r.program == SUMMARY_PROGRAM).collect();

    let animals: f64 = core.iter().map(|r| r.total).sum();
    let species: HashSet<&str> = core.iter().filter_map(|r| r.species()).filter(|n| is_countable_species(n)).collect();
    let surveys: HashSet<&str> = core.iter().map(|r| r.survey_id.as_str()).collect();
    let countries: HashSet<&str> = core.iter().map(|r| r.country.as_str()).collect();

    Summary {
        animals_observed: to_count(animals),
        reef_dwelling_species: species.len(),
        surveys_completed: surveys.len(),
        countries_surveyed: countries.len(),
    }
}
