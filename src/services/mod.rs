pub mod media_probe;

pub use media_probe::MediaProbe;
