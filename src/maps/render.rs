// src/maps/render.rs
//! Equirectangular rasteriser: ocean background, optional land, site markers.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::config::options::MapOptions;
use crate::error::{Error, Result};

use super::area::MapArea;
use super::land::Polygon;

#[derive(Clone)]
pub struct Canvas<'a> {
    area: &'a MapArea,
    img: RgbImage,
}

/// Image height for `width`, keeping the area's aspect ratio.
pub fn height_for(area: &MapArea, width: u32) -> u32 {
    let h = (f64::from(width) * area.lat_span() / area.lon_span()).round();
    (h as u32).max(1)
}

impl<'a> Canvas<'a> {
    /// Ocean-filled canvas with `land` painted on top.
    pub fn new(area: &'a MapArea, land: &[Polygon], opts: &MapOptions) -> Self {
        let width = opts.width.max(1);
        let height = height_for(area, width);
        let mut canvas = Self { area, img: RgbImage::from_pixel(width, height, Rgb(opts.ocean_rgb)) };
        for poly in land {
            canvas.fill_polygon(poly, Rgb(opts.land_rgb));
        }
        canvas
    }

    pub fn width(&self) -> u32 { self.img.width() }
    pub fn height(&self) -> u32 { self.img.height() }

    /// Pixel-space position of a projected longitude / latitude.
    fn to_px(&self, plon: f64, lat: f64) -> (f64, f64) {
        let a = self.area;
        let x = (plon - a.min_lon) / a.lon_span() * f64::from(self.width());
        let y = (a.max_lat - lat) / a.lat_span() * f64::from(self.height());
        (x, y)
    }

    /// Filled disc at a site.
    pub fn marker(&mut self, lon: f64, lat: f64, radius: u32, color: [u8; 3]) {
        let (cx, cy) = self.to_px(self.area.project_lon(lon), lat);
        let (cx, cy) = (cx.floor() as i64, cy.floor() as i64);
        let r = i64::from(radius);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put(cx + dx, cy + dy, Rgb(color));
                }
            }
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height()) {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Even-odd scanline fill. Rings are unwrapped across the antimeridian and
    /// drawn one turn left and right as well, so land survives any central longitude.
    fn fill_polygon(&mut self, poly: &Polygon, color: Rgb<u8>) {
        let c = self.area.central_lon;
        let unwrapped: Vec<Vec<(f64, f64)>> = poly.iter().map(|r| unwrap_ring(r)).collect();

        for shift in [-360.0, 0.0, 360.0] {
            let edges: Vec<((f64, f64), (f64, f64))> = unwrapped
                .iter()
                .flat_map(|ring| {
                    let px: Vec<(f64, f64)> = ring.iter().map(|&(lon, lat)| self.to_px(lon - c + shift, lat)).collect();
                    closed_edges(px)
                })
                .collect();
            self.fill_edges(&edges, color);
        }
    }

    fn fill_edges(&mut self, edges: &[((f64, f64), (f64, f64))], color: Rgb<u8>) {
        if edges.is_empty() {
            return;
        }
        let w = i64::from(self.width());
        let mut xs: Vec<f64> = Vec::new();
        for y in 0..self.height() {
            let yc = f64::from(y) + 0.5;
            xs.clear();
            for &((x0, y0), (x1, y1)) in edges {
                if (y0 <= yc) != (y1 <= yc) {
                    xs.push(x0 + (yc - y0) * (x1 - x0) / (y1 - y0));
                }
            }
            xs.sort_by(f64::total_cmp);
            for pair in xs.chunks_exact(2) {
                let start = ((pair[0] - 0.5).ceil() as i64).max(0);
                let end = ((pair[1] - 0.5).ceil() as i64).min(w);
                for x in start..end {
                    self.img.put_pixel(x as u32, y, color);
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.img
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| Error::Image { path: path.to_path_buf(), source })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.img.get_pixel(x, y).0
    }
}

/// Remove ±360° jumps between consecutive vertices.
fn unwrap_ring(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;
    for &(lon, lat) in ring {
        if let Some(p) = prev {
            let d = lon - p;
            if d > 180.0 {
                offset -= 360.0;
            } else if d < -180.0 {
                offset += 360.0;
            }
        }
        prev = Some(lon);
        out.push((lon + offset, lat));
    }
    out
}

fn closed_edges(pts: Vec<(f64, f64)>) -> Vec<((f64, f64), (f64, f64))> {
    let n = pts.len();
    if n < 3 {
        return Vec::new();
    }
    (0..n).map(|i| (pts[i], pts[(i + 1) % n])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::area::{AREAS, WORLD};

    fn opts() -> MapOptions {
        MapOptions::default()
    }

    #[test]
    fn height_follows_aspect() {
        assert_eq!(height_for(&WORLD, 400), 200);
        assert_eq!(Canvas::new(&AREAS[0], &[], &opts()).height(), 300);
    }

    #[test]
    fn land_square_is_filled_and_ocean_elsewhere() {
        let square = vec![vec![(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0), (-10.0, -10.0)]];
        let world = MapArea { central_lon: 0.0, ..WORLD };
        let c = Canvas::new(&world, &[square], &opts());
        assert_eq!(c.pixel(200, 100), opts().land_rgb);
        assert_eq!(c.pixel(10, 10), opts().ocean_rgb);
    }

    #[test]
    fn antimeridian_land_shows_on_pacific_view() {
        // Fiji-ish block spanning 175E..-175W
        let block = vec![vec![(175.0, -20.0), (-175.0, -20.0), (-175.0, -10.0), (175.0, -10.0), (175.0, -20.0)]];
        let c = Canvas::new(&WORLD, &[block], &opts()); // central 180: block is around x = 200
        let (x, y) = c.to_px(WORLD.project_lon(180.0), -15.0);
        assert_eq!(c.pixel(x as u32, y as u32), opts().land_rgb);
    }

    #[test]
    fn marker_paints_its_center() {
        let mut c = Canvas::new(&AREAS[0], &[], &opts());
        c.marker(147.3, -42.9, 3, opts().marker_rgb);
        let (x, y) = c.to_px(147.3, -42.9);
        assert_eq!(c.pixel(x.floor() as u32, y.floor() as u32), opts().marker_rgb);
    }
}
