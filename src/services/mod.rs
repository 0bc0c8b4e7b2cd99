pub mod nominatim;
pub mod overpass;
pub mod traits;

pub use nominatim::NominatimGeocoder;
pub use overpass::{OverpassPoiFinder, tag_expression};
pub use traits::{GeoPoint, GeocodeError, Geocoder, Poi, PoiError, PoiFinder};
