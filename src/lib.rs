pub mod config;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod intent;
pub mod map;
pub mod services;
pub mod session;
pub mod speech;

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::{CommandDispatcher, DispatchSettings};
use crate::history::{CommandStore, SqliteCommandStore};
use crate::intent::IntentClassifier;
use crate::map::MapSurface;
use crate::services::{NominatimGeocoder, OverpassPoiFinder};
use crate::session::{Presenter, SessionContext};

/// Wire the production collaborators from `config`.
///
/// A store that fails to open is reported and left out; the session keeps
/// working without history.
pub fn build_context(
    config: &Config,
    map: Option<Arc<dyn MapSurface>>,
    presenter: Arc<dyn Presenter>,
) -> error::Result<SessionContext> {
    let geocoder = Arc::new(NominatimGeocoder::new(&config.services)?);
    let poi_finder = Arc::new(OverpassPoiFinder::new(&config.services)?);
    let dispatcher = CommandDispatcher::new(
        map,
        geocoder,
        poi_finder,
        DispatchSettings::from(config),
    );

    let store: Option<Arc<dyn CommandStore>> =
        match SqliteCommandStore::open(&config.storage.database_path) {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::warn!(
                    "command history disabled, could not open {}: {}",
                    config.storage.database_path,
                    e
                );
                None
            }
        };

    Ok(SessionContext {
        classifier: IntentClassifier::new(),
        dispatcher,
        store,
        presenter,
    })
}
