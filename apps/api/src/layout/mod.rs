// Card layout estimation: glyph metrics, wrapping, card geometry and the
// measurement surface built on them.
// Layout passes are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod surface;
pub mod typography;
pub mod wrap;

pub use surface::MetricSurface;
