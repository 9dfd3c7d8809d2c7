// src/maps/mod.rs
//! Static map images: one per map area that has sites, one per observed species.

pub mod area;
pub mod land;
pub mod render;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::config::{consts::SPECIES_MAPS_SUBDIR, options::MapOptions};
use crate::data::{SitesDoc, SpeciesDoc, SurveysDoc};
use crate::error::Result;
use crate::file;
use crate::progress::Progress;

use area::{area_for, MapArea};
use land::Polygon;
use render::Canvas;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapReport {
    /// Area name → sites drawn on that area's map.
    pub region_sites: BTreeMap<String, usize>,
    /// Area name → species maps drawn in that area.
    pub species_areas: BTreeMap<String, usize>,
    pub written: Vec<PathBuf>,
}

/// Background (ocean + land) per area, rendered once and cloned per map.
struct Backgrounds<'a> {
    land: &'a [Polygon],
    opts: &'a MapOptions,
    cache: HashMap<&'static str, Canvas<'static>>,
}

impl<'a> Backgrounds<'a> {
    fn get(&mut self, area: &'static MapArea) -> Canvas<'static> {
        self.cache
            .entry(area.name)
            .or_insert_with(|| Canvas::new(area, self.land, self.opts))
            .clone()
    }
}

/// Render region maps into `dst` and, unless disabled, species maps into
/// `dst/species/`. Existing images are overwritten.
pub fn create_static_maps(
    sites: &SitesDoc,
    species: &SpeciesDoc,
    surveys: &SurveysDoc,
    dst: &Path,
    opts: &MapOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<MapReport> {
    file::ensure_directory(dst)?;

    let land = match &opts.land_path {
        Some(path) => land::load_land(path)?,
        None => Vec::new(),
    };
    let mut bg = Backgrounds { land: &land, opts, cache: HashMap::new() };
    let mut report = MapReport::default();

    // Region maps: every site lands on the first area that holds it.
    let mut by_area: BTreeMap<usize, (&'static MapArea, Vec<(f64, f64)>)> = BTreeMap::new();
    for site in sites.values() {
        let a = area_for(&[(site.longitude, site.latitude)]);
        let order = area::AREAS.iter().position(|x| x.name == a.name).unwrap_or(area::AREAS.len());
        by_area.entry(order).or_insert_with(|| (a, Vec::new())).1.push((site.longitude, site.latitude));
    }
    for (a, points) in by_area.values() {
        let path = dst.join(format!("{}.png", a.slug()));
        draw(&mut bg, a, points, &path, opts)?;
        report.region_sites.insert(s!(a.name), points.len());
        report.written.push(path);
    }
    logf!("Wrote {} region maps", report.region_sites.len());

    if !opts.species_maps {
        return Ok(report);
    }

    // species id → site codes it was seen at
    let mut species_sites: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for survey in surveys.values() {
        for id in survey.species.keys() {
            species_sites.entry(id.as_str()).or_default().insert(survey.site_code.as_str());
        }
    }
    let todo: Vec<(&str, Vec<(f64, f64)>)> = species
        .keys()
        .filter_map(|id| {
            let codes = species_sites.get(id.as_str())?;
            let points: Vec<(f64, f64)> = codes
                .iter()
                .filter_map(|code| sites.get(*code))
                .map(|s| (s.longitude, s.latitude))
                .collect();
            (!points.is_empty()).then_some((id.as_str(), points))
        })
        .collect();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(todo.len());
    }
    if !todo.is_empty() {
        let species_dir = dst.join(SPECIES_MAPS_SUBDIR);
        file::ensure_directory(&species_dir)?;
        for (id, points) in &todo {
            let a = area_for(points);
            let path = species_dir.join(format!("{id}.png"));
            draw(&mut bg, a, points, &path, opts)?;
            *report.species_areas.entry(s!(a.name)).or_insert(0) += 1;
            report.written.push(path);
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(id);
            }
        }
    }
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    logf!("Species map areas: {:?}", report.species_areas);
    Ok(report)
}

fn draw(bg: &mut Backgrounds<'_>, a: &'static MapArea, points: &[(f64, f64)], path: &Path, opts: &MapOptions) -> Result<()> {
    let mut canvas = bg.get(a);
    for &(lon, lat) in points {
        canvas.marker(lon, lat, opts.marker_radius, opts.marker_rgb);
    }
    canvas.save(path)?;
    logd!("Wrote {}", path.display());
    Ok(())
}
