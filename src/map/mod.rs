pub mod layers;
pub mod state;
pub mod surface;

pub use state::{InMemoryMap, MapView};
pub use surface::{LayerChange, MapSurface, Marker};
