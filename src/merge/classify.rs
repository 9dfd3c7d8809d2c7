// src/merge/classify.rs
//! Survey method classification.
//!
//! Method 1 counts conspicuous vertebrates along the transect; Method 2 searches
//! for cryptic fishes and invertebrates. Some taxa are recorded under both.

use crate::data::{DataType, SurveyRow};

/// Classes recorded under Method 1.
pub const M1_CLASSES: &[&str] = &[
    "Actinopterygii",
    "Actinopteri",
    "Elasmobranchii",
    "Reptilia",
    "Mammalia",
    "Aves",
];

/// Invertebrate classes that are counted under both methods.
pub const M1_INVERT_CLASSES: &[&str] = &["Cephalopoda"];

/// Fish families searched for under Method 2 as well as counted under Method 1.
pub const CRYPTIC_FAMILIES: &[&str] = &[
    "Agonidae",
    "Antennariidae",
    "Aploactinidae",
    "Apogonidae",
    "Ariidae",
    "Aulostomidae",
    "Batrachoididae",
    "Blenniidae",
    "Bothidae",
    "Bythitidae",
    "Callionymidae",
    "Caracanthidae",
    "Carapidae",
    "Centriscidae",
    "Chaenopsidae",
    "Chironemidae",
    "Cirrhitidae",
    "Clinidae",
    "Congridae",
    "Congrogadidae",
    "Cottidae",
    "Creediidae",
    "Dasyatidae",
    "Diodontidae",
    "Ephippidae",
    "Fistulariidae",
    "Gnathanacanthidae",
    "Gobiesocidae",
    "Gobiidae",
    "Grammatidae",
    "Holocentridae",
    "Hemiscylliidae",
    "Heterodontidae",
    "Labrisomidae",
    "Leptoscopidae",
    "Liparidae",
    "Lotidae",
    "Microdesmidae",
    "Monocentridae",
    "Moridae",
    "Muraenidae",
    "Ophichthidae",
    "Ophidiidae",
    "Opistognathidae",
    "Orectolobidae",
    "Paralichthyidae",
    "Parascylliidae",
    "Pataecidae",
    "Pegasidae",
    "Pempheridae",
    "Pholidae",
    "Pinguipedidae",
    "Platycephalidae",
    "Pleuronectidae",
    "Plesiopidae",
    "Plotosidae",
    "Pseudochromidae",
    "Rajidae",
    "Rhinobatidae",
    "Scorpaenidae",
    "Scyliorhinidae",
    "Serranidae",
    "Solegnathidae",
    "Soleidae",
    "Solenostomidae",
    "Stichaeidae",
    "Synanceiidae",
    "Syngnathidae",
    "Synodontidae",
    "Tetrarogidae",
    "Torpedinidae",
    "Trachichthyidae",
    "Tripterygiidae",
    "Uranoscopidae",
    "Urolophidae",
    "Zeidae",
];

/// Genera within cryptic families that are conspicuous enough to stay Method 1.
/// Matched as a prefix of the species name.
pub const M2_GENERA_EXCLUSIONS: &[&str] = &[
    "Trachinops",
    "Anthias",
    "Caesioperca",
    "Lepidoperca",
    "Acanthistius",
    "Cephalopholis",
    "Epinephelides",
    "Epinephelus",
    "Hypoplectrodes",
    "Plectropomus",
    "Pseudanthias",
    "Serranus",
    "Variola",
    "Myripristis",
    "Neoniphon",
    "Sargocentron",
    "Pempheris",
];

fn in_list(list: &[&str], value: &str) -> bool {
    list.iter().any(|x| *x == value)
}

/// Method classification of one survey row.
pub fn classify(row: &SurveyRow) -> DataType {
    let species = row.species().unwrap_or("");

    let cryptic = in_list(CRYPTIC_FAMILIES, &row.family)
        && !M2_GENERA_EXCLUSIONS.iter().any(|g| species.starts_with(g));
    if cryptic || in_list(M1_INVERT_CLASSES, &row.class_name) {
        return DataType::Both;
    }
    if in_list(M1_CLASSES, &row.class_name) {
        DataType::M1
    } else {
        DataType::M2
    }
}
