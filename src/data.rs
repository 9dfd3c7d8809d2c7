// src/data.rs
//
// Record types flowing through the pipeline.
//
// - Inputs:  ScrapedSpecies (crawl file), ReferenceSpecies (reference feed),
//            SurveyRow (one row of a WFS survey CSV).
// - Outputs: SpeciesRecord / SiteRecord / SurveyRecord / Summary, gathered in
//            ApiDocuments. Every output map is a BTreeMap so serialization order
//            is stable and two runs over the same inputs are byte-identical.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

/// One species page as seen by the crawler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedSpecies {
    /// Page slug, e.g. `labroides-dimidiatus`. Older crawl files call it `id_`.
    #[serde(alias = "id_")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// One entry of the species reference feed. `slug` and `scientific_name` are
/// required; a feed without them has changed shape and must not be used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSpecies {
    pub slug: String,
    pub scientific_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

/// One row of a survey CSV. Unlisted columns are ignored; a listed column that
/// is missing, or a coordinate/total that does not parse, rejects the file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SurveyRow {
    pub survey_id: String,
    pub country: String,
    pub ecoregion: String,
    pub realm: String,
    pub location: String,
    pub site_code: String,
    pub site_name: String,
    pub program: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub family: String,
    pub species_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub total: f64,
    #[serde(default)]
    pub survey_date: Option<String>,
}

impl SurveyRow {
    /// Species name, if the row names one.
    pub fn species(&self) -> Option<&str> {
        self.species_name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Survey ids are numeric in practice: those compare as integers and sort
/// ahead of any id that does not parse, which compares as a string.
pub fn cmp_survey_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Survey method(s) a species is recorded under. Ordered so that the
/// per-species value is the maximum over its rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    M1,
    M2,
    Both,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub scientific_name: String,
    pub common_name: String,
    pub url: Option<String>,
    pub data_type: DataType,
    pub image_urls: Vec<String>,
    pub class: String,
    pub family: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub site_name: String,
    pub country: String,
    pub realm: String,
    pub ecoregion: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub num_surveys: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub site_code: String,
    pub survey_date: Option<String>,
    pub program: String,
    /// species id → animals counted
    pub species: BTreeMap<String, u64>,
}

/// Headline numbers for the front-end homepage (core programme only).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "animalsobserved")]
    pub animals_observed: u64,
    #[serde(rename = "reefdwellingspecies")]
    pub reef_dwelling_species: usize,
    #[serde(rename = "surveycompleted")]
    pub surveys_completed: usize,
    #[serde(rename = "countriessurveyed")]
    pub countries_surveyed: usize,
}

pub type SpeciesDoc = BTreeMap<String, SpeciesRecord>;
pub type SitesDoc = BTreeMap<String, SiteRecord>;
pub type SurveysDoc = BTreeMap<String, SurveyRecord>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiDocuments {
    pub species: SpeciesDoc,
    pub sites: SitesDoc,
    pub surveys: SurveysDoc,
    pub summary: Summary,
}
