#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{building_color, init_tracing, render_layout_to_png, RenderConfig};
