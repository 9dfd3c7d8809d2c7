// tests/merge_properties.rs
use std::collections::BTreeSet;
use std::fs;

use rand::{rngs::StdRng, Rng, SeedableRng};

use rls_data::config::options::MergeOptions;
use rls_data::data::{ReferenceSpecies, ScrapedSpecies, SurveyRow};
use rls_data::file::to_json_bytes;
use rls_data::merge::merge;
use rls_data::runner;

const GENERA: &[&str] = &["Labroides", "Eviota", "Octopus", "Haliotis", "Trachinops", "Pictilabrus"];
const EPITHETS: &[&str] = &["dimidiatus", "tetricus", "rubra", "laticlavius", "taeniatus", "spp."];
const CLASSES: &[(&str, &str)] = &[
    ("Actinopterygii", "Labridae"),
    ("Actinopterygii", "Gobiidae"),
    ("Actinopterygii", "Plesiopidae"),
    ("Cephalopoda", "Octopodidae"),
    ("Gastropoda", "Haliotidae"),
];

/// Synthetic survey rows plus matching crawl and reference data.
fn fixture(seed: u64, n_rows: usize) -> (Vec<ScrapedSpecies>, Vec<ReferenceSpecies>, Vec<SurveyRow>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut names = BTreeSet::new();
    let mut rows = Vec::with_capacity(n_rows);

    // A survey happens at one site under one programme; a species has one
    // class and family. Everything else is random.
    for _ in 0..n_rows {
        let g = rng.random_range(0..GENERA.len());
        let e = rng.random_range(0..EPITHETS.len());
        let name = format!("{} {}", GENERA[g], EPITHETS[e]);
        let (class, family) = CLASSES[(g * 7 + e) % CLASSES.len()];
        let survey = rng.random_range(0..40);
        let site = survey % 12;
        let species_name = if rng.random_bool(0.05) { None } else { Some(name.clone()) };
        if species_name.is_some() {
            names.insert(name);
        }
        rows.push(SurveyRow {
            survey_id: format!("{}", 1000 + survey),
            country: format!("Country {}", site % 3),
            ecoregion: "Eco".into(),
            realm: "Realm".into(),
            location: "Loc".into(),
            site_code: format!("S{site:02}"),
            site_name: format!("Site {site}"),
            program: if survey % 5 == 0 { "ATRC".into() } else { "RLS".into() },
            class_name: class.into(),
            family: family.into(),
            species_name,
            latitude: -40.0 + site as f64,
            longitude: 140.0 + site as f64,
            total: f64::from(rng.random_range(0..50u32)),
            survey_date: None,
        });
    }

    let mut scraped = Vec::new();
    let mut reference = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let slug = name.to_lowercase().replace(' ', "-").replace('.', "");
        if i % 3 != 0 {
            scraped.push(ScrapedSpecies {
                id: slug.clone(),
                name: name.clone(),
                common_name: format!("Common {i}"),
                url: format!("https://reeflifesurvey.com/species/{slug}/"),
                image_urls: vec![format!("{slug}.jpg")],
            });
        }
        if i % 2 == 0 {
            reference.push(ReferenceSpecies {
                slug: format!("ref-{slug}"),
                scientific_name: name.clone(),
                common_name: Some(format!("Reference {i}")),
                url: None,
                image_urls: None,
            });
        }
    }
    (scraped, reference, rows)
}

#[test]
fn merge_is_deterministic() {
    let (scraped, reference, rows) = fixture(11, 400);
    let (a, _) = merge(&scraped, &reference, &rows);

    let mut shuffled = rows.clone();
    shuffled.reverse();
    let (b, _) = merge(&scraped, &reference, &shuffled);

    let p = std::path::Path::new("x.json");
    assert_eq!(to_json_bytes(&a.species, p).unwrap(), to_json_bytes(&b.species, p).unwrap());
    assert_eq!(to_json_bytes(&a.sites, p).unwrap(), to_json_bytes(&b.sites, p).unwrap());
    assert_eq!(to_json_bytes(&a.surveys, p).unwrap(), to_json_bytes(&b.surveys, p).unwrap());
    assert_eq!(a.summary, b.summary);
}

#[test]
fn surveys_only_reference_known_species_and_sites() {
    for seed in [1, 2, 3, 42] {
        let (scraped, reference, rows) = fixture(seed, 300);
        let (docs, _) = merge(&scraped, &reference, &rows);

        for (survey_id, survey) in &docs.surveys {
            assert!(docs.sites.contains_key(&survey.site_code), "seed {seed}: survey {survey_id} has unknown site");
            for id in survey.species.keys() {
                assert!(docs.species.contains_key(id), "seed {seed}: survey {survey_id} has unknown species {id}");
            }
        }
        // every species written was observed somewhere
        let observed: BTreeSet<&String> = docs.surveys.values().flat_map(|s| s.species.keys()).collect();
        assert_eq!(observed.len(), docs.species.len(), "seed {seed}");
    }
}

#[test]
fn reference_wins_and_conflict_is_reported() {
    let (scraped, reference, rows) = fixture(5, 300);
    let (docs, report) = merge(&scraped, &reference, &rows);

    for r in &reference {
        let Some(rec) = docs.species.get(&r.slug) else { continue };
        assert_eq!(Some(&rec.common_name), r.common_name.as_ref());
    }
    let crawled_and_referenced = scraped
        .iter()
        .filter(|s| reference.iter().any(|r| r.scientific_name == s.name))
        .filter(|s| docs.species.values().any(|rec| rec.scientific_name == s.name))
        .count();
    let common_name_conflicts = report.conflicts.iter().filter(|c| c.field == "common_name").count();
    assert_eq!(common_name_conflicts, crawled_and_referenced);
    assert!(report
        .conflicts
        .iter()
        .filter(|c| c.field == "common_name")
        .all(|c| c.reference.starts_with("Reference ")));

    // pages were joined by name, so every page slug disagrees with its reference slug
    let id_conflicts: Vec<_> = report.conflicts.iter().filter(|c| c.field == "id").collect();
    assert_eq!(id_conflicts.len(), crawled_and_referenced);
    assert!(id_conflicts.iter().all(|c| c.reference == format!("ref-{}", c.scraped)));
    assert!(report.missing_from_crawl.iter().all(|slug| {
        let r = reference.iter().find(|r| &r.slug == slug).unwrap();
        !scraped.iter().any(|s| s.name == r.scientific_name)
    }));
}

#[test]
fn malformed_survey_row_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let survey = tmp.path().join("survey");
    fs::create_dir_all(&survey).unwrap();
    fs::write(tmp.path().join("crawl.json"), "[]").unwrap();
    fs::write(
        survey.join("m1.csv"),
        "survey_id,country,ecoregion,realm,location,site_code,site_name,program,class,family,species_name,latitude,longitude,total\n\
         1,Australia,E,R,L,S1,Site,RLS,Actinopterygii,Labridae,Labroides dimidiatus,-42.0,147.0,3\n\
         2,Australia,E,R,L,S1,Site,RLS,Actinopterygii,Labridae,Labroides dimidiatus,not-a-number,147.0,3\n",
    )
    .unwrap();
    let out = tmp.path().join("api");
    let opts = MergeOptions { min_crawl_items: 0, min_survey_rows: 0, expected_survey_files: 1 };

    let err = runner::create_api_jsons(&tmp.path().join("crawl.json"), &survey, &out, None, &opts).unwrap_err();
    assert!(matches!(err, rls_data::Error::Csv { .. }), "{err}");
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}
