use std::path::Path;

use anyhow::Context;
use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;
use village_layout::geometry::distance_to_segment;
use village_layout::prelude::*;

/// Installs a console subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Output image settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// Empty border around the layout, in pixels.
    pub margin: u32,
    pub background: [u8; 3],
    pub draw_entries: bool,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            margin: 24,
            background: [214, 222, 190],
            draw_entries: true,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }
}

/// Fill color per building type.
pub fn building_color(building_type: BuildingType) -> [u8; 3] {
    match building_type {
        BuildingType::House => [176, 120, 86],
        BuildingType::Inn => [200, 60, 50],
        BuildingType::Blacksmith => [70, 70, 80],
        BuildingType::Farm => [222, 184, 96],
        BuildingType::Mill => [160, 140, 110],
        BuildingType::Woodworker => [130, 90, 50],
        BuildingType::Fisher => [70, 120, 170],
        BuildingType::Market => [230, 150, 40],
        BuildingType::Chapel => [235, 235, 235],
        BuildingType::Stable => [150, 100, 70],
        BuildingType::Well => [60, 140, 200],
        BuildingType::Granary => [200, 170, 80],
        BuildingType::Shrine => [180, 120, 200],
        BuildingType::Alchemist => [90, 170, 110],
        BuildingType::Herbalist => [110, 160, 60],
        BuildingType::WizardTower => [100, 60, 170],
    }
}

fn road_color(road: &VillageRoad) -> [u8; 3] {
    match (road.class, road.rural) {
        (_, true) => [196, 176, 140],
        (RoadClass::Main, false) => [150, 120, 90],
        (RoadClass::Side, false) => [170, 140, 105],
        (RoadClass::Path, false) => [190, 165, 125],
    }
}

/// Maps layout coordinates to pixels with a uniform scale and y pointing up.
struct View {
    min: Vec2,
    max: Vec2,
    scale: f32,
    offset: Vec2,
    height: f32,
}

impl View {
    fn fit(layout: &VillageLayout, config: &RenderConfig) -> Self {
        let (min, max) = layout.extent();
        let span = (max - min).max(Vec2::ONE);
        let margin = config.margin as f32;
        let avail = Vec2::new(
            config.image_size.0 as f32 - 2.0 * margin,
            config.image_size.1 as f32 - 2.0 * margin,
        )
        .max(Vec2::ONE);
        let scale = (avail.x / span.x).min(avail.y / span.y);
        let offset = Vec2::splat(margin) + (avail - span * scale) * 0.5;
        Self {
            min,
            max,
            scale,
            offset,
            height: config.image_size.1 as f32,
        }
    }

    fn to_px(&self, p: Vec2) -> Vec2 {
        let local = (p - self.min) * self.scale + self.offset;
        Vec2::new(local.x, self.height - local.y)
    }
}

struct Canvas {
    img: RgbImage,
}

impl Canvas {
    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    fn pixel_span(&self, lo: Vec2, hi: Vec2) -> (i64, i64, i64, i64) {
        let x0 = lo.x.floor().max(0.0) as i64;
        let y0 = lo.y.floor().max(0.0) as i64;
        let x1 = (hi.x.ceil() as i64).min(self.img.width() as i64 - 1);
        let y1 = (hi.y.ceil() as i64).min(self.img.height() as i64 - 1);
        (x0, y0, x1, y1)
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: [u8; 3]) {
        let poly = Polygon::new(points.to_vec());
        let Some((lo, hi)) = poly.bounding_box() else {
            return;
        };
        let (x0, y0, x1, y1) = self.pixel_span(lo, hi);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if poly.contains(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn stroke(&mut self, points: &[Vec2], closed: bool, width: f32, color: [u8; 3]) {
        let half = (width * 0.5).max(0.5);
        let n = points.len();
        let segments = if closed { n } else { n.saturating_sub(1) };
        for i in 0..segments {
            let (a, b) = (points[i], points[(i + 1) % n]);
            let (x0, y0, x1, y1) =
                self.pixel_span(a.min(b) - Vec2::splat(half), a.max(b) + Vec2::splat(half));
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    if distance_to_segment(p, a, b) <= half {
                        self.put(x, y, color);
                    }
                }
            }
        }
    }

    fn dot(&mut self, center: Vec2, radius: f32, color: [u8; 3]) {
        self.stroke(&[center, center], false, radius * 2.0, color);
    }
}

/// Renders roads, buildings, the wall and its gates to a PNG at `out`.
pub fn render_layout_to_png(
    layout: &VillageLayout,
    config: &RenderConfig,
    out: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let view = View::fit(layout, config);
    let mut canvas = Canvas {
        img: RgbImage::from_pixel(w, h, Rgb(config.background)),
    };
    let px = |pts: &[Vec2]| pts.iter().map(|p| view.to_px(*p)).collect::<Vec<_>>();

    canvas.stroke(&px(&layout.bounds.vertices), true, 1.0, [190, 200, 170]);

    let mut roads: Vec<&VillageRoad> = layout.roads.iter().collect();
    // Paths first so wider roads paint over their junctions.
    roads.sort_by(|a, b| b.class.cmp(&a.class));
    for road in roads {
        canvas.stroke(&px(&road.path), false, road.width * view.scale, road_color(road));
    }

    for building in &layout.buildings {
        let outline = px(&building.footprint.vertices);
        canvas.fill_polygon(&outline, building_color(building.building_type));
        canvas.stroke(&outline, true, 1.0, [40, 30, 20]);
        if config.draw_entries {
            canvas.dot(view.to_px(building.entry), 1.5, [250, 250, 250]);
        }
    }

    if let Some(wall) = layout.wall() {
        canvas.stroke(&px(&wall.perimeter.vertices), true, 2.0 * view.scale, [90, 90, 95]);
        for gate in &wall.gates {
            canvas.dot(view.to_px(gate.position), gate.width * 0.5 * view.scale, [230, 200, 60]);
        }
    }

    let out = out.as_ref();
    canvas
        .img
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(
        "Rendered {} building(s), {} road(s) to {} ({:.0}x{:.0} units).",
        layout.buildings.len(),
        layout.roads.len(),
        out.display(),
        view.max.x - view.min.x,
        view.max.y - view.min.y,
    );
    Ok(())
}
