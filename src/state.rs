use std::sync::Arc;

use tokio::sync::Mutex;

use crate::app::geolocation::Geolocator;
use crate::app::App;
use crate::config::Config;
use crate::error::AppError;
use crate::outbox::{Outbox, UiCommand};
use crate::storage::{FileStore, KeyValueStore};

pub type Store = Box<dyn KeyValueStore + Send>;
pub type WorkoutApp = App<Store, Outbox, Outbox>;

#[derive(Clone)]
pub struct AppState {
    app: Arc<Mutex<WorkoutApp>>,
    outbox: Outbox,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = FileStore::new(config.data_dir.clone());
        Self::with_store(config, Box::new(store))
    }

    pub fn with_store(config: Config, store: Store) -> Self {
        let outbox = Outbox::new();
        let app = App::new(store, outbox.clone(), outbox.clone(), config.map);

        Self {
            app: Arc::new(Mutex::new(app)),
            outbox,
        }
    }

    pub async fn initialize<G: Geolocator>(&self, geolocator: &G) -> Result<(), AppError> {
        let mut app = self.app.lock().await;
        let result = app.initialize(geolocator).await;
        // Nothing is attached yet; pages pick up state through a redraw.
        self.outbox.drain();
        result
    }

    // Holding the lock until the drain keeps commands from concurrent requests apart.
    pub async fn dispatch<T>(
        &self,
        op: impl FnOnce(&mut WorkoutApp) -> Result<T, AppError>,
    ) -> (Result<T, AppError>, Vec<UiCommand>) {
        let mut app = self.app.lock().await;
        self.outbox.drain();
        let result = op(&mut *app);
        (result, self.outbox.drain())
    }

    pub async fn read<T>(&self, op: impl FnOnce(&WorkoutApp) -> T) -> T {
        let app = self.app.lock().await;
        op(&*app)
    }
}
