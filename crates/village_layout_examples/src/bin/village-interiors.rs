use glam::UVec2;
use village_layout::prelude::*;
use village_layout_examples::{init_tracing, render_layout_to_png, RenderConfig};

/// Splits the footprint into a front hall and a back room; wealthy households get a third room.
fn two_room_plan(request: &InteriorRequest) -> Option<InteriorPlan> {
    let tiles = request.footprint_tiles;
    if tiles.y < 2 {
        return None;
    }
    let front = tiles.y / 2;
    let mut rooms = vec![
        InteriorRoom {
            name: "hall".into(),
            origin: UVec2::ZERO,
            size: UVec2::new(tiles.x, front),
        },
        InteriorRoom {
            name: "back".into(),
            origin: UVec2::new(0, front),
            size: UVec2::new(tiles.x, tiles.y - front),
        },
    ];
    if request.social_class == SocialClass::Wealthy && tiles.x >= 4 {
        let half = tiles.x / 2;
        rooms[1].size.x = half;
        rooms.push(InteriorRoom {
            name: "study".into(),
            origin: UVec2::new(half, front),
            size: UVec2::new(tiles.x - half, tiles.y - front),
        });
    }
    Some(InteriorPlan {
        footprint_tiles: tiles,
        social_class: request.social_class,
        seed: request.seed,
        rooms,
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let options = VillageOptions::new(Size::Tiny, Setting::Forest).with_procedural_buildings(true);
    let mut generator = VillageGenerator::try_new(options)?.with_interior_planner(two_room_plan);
    let layout = generator.generate("thornbury")?;

    for building in &layout.buildings {
        let rooms = building.interior.as_ref().map_or(0, |plan| plan.rooms.len());
        println!("{:<20} {:<12} {} room(s)", building.id, building.building_type, rooms);
    }

    let config = RenderConfig::new((800, 800)).with_background([226, 230, 204]);
    render_layout_to_png(&layout, &config, "village-interiors.png")?;
    Ok(())
}
