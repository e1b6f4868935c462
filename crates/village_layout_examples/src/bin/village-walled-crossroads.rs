use village_layout::prelude::*;
use village_layout_examples::{init_tracing, render_layout_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let options = VillageOptions::new(Size::Medium, Setting::Crossroads).with_walls(true);
    let mut generator = VillageGenerator::try_new(options)?;

    let mut dropped = Vec::new();
    let mut sink = FnSink::new(|event| {
        if let VillageEvent::PlacementExhausted { building_type, .. } = event {
            dropped.push(building_type);
        }
    });
    let layout = generator.generate_with_events(42u64, &mut sink)?;

    let wall = layout.wall().map_or(0, |w| w.gates.len());
    println!(
        "{} village + {} rural buildings, {} gate(s), dropped: {:?}",
        layout.stats.placed_buildings, layout.stats.rural_buildings, wall, dropped
    );

    let config = RenderConfig::new((1200, 1200)).with_margin(32);
    render_layout_to_png(&layout, &config, "village-walled-crossroads.png")?;
    Ok(())
}
