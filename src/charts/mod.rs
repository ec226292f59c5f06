pub mod render;

pub use render::{render_all, ChartError};
