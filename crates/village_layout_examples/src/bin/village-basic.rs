use village_layout::prelude::*;
use village_layout_examples::{init_tracing, render_layout_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let seed: Seed = std::env::args()
        .nth(1)
        .map(Seed::from)
        .unwrap_or(Seed::Number(1));
    let options = VillageOptions::new(Size::Small, Setting::Farming);
    let layout = generate(seed, &options)?;

    render_layout_to_png(&layout, &RenderConfig::new((1000, 1000)), "village-basic.png")?;
    Ok(())
}
