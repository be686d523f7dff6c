pub mod canvas_surface;

pub use canvas_surface::{CanvasSurface, CanvasSurfaceFactory, PlotScale};
