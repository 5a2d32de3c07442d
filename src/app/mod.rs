pub mod geolocation;
pub mod surface;

use chrono::Utc;

use crate::config::MapSettings;
use crate::error::AppError;
use crate::render;
use crate::storage::{self, KeyValueStore, WORKOUTS_KEY};
use crate::types::form::{FormFields, FormInput};
use crate::types::workout::{Coords, Kind, Metric, Workout, WorkoutId};
use geolocation::Geolocator;
use surface::{MapView, PanOptions, PopupOptions, WorkoutView};

/// Owns the workout list and mediates between map events, the form, the
/// rendered list and persistence. Changes reach the map and view as targeted
/// updates; only [`App::redraw`] replays everything.
pub struct App<S, M, V> {
    store: S,
    map: M,
    view: V,
    settings: MapSettings,
    workouts: Vec<Workout>,
    pending: Option<Coords>,
    // Edit mode
    editing: Option<WorkoutId>,
    center: Option<Coords>,
}

impl<S, M, V> App<S, M, V>
where
    S: KeyValueStore,
    M: MapView,
    V: WorkoutView,
{
    pub fn new(store: S, map: M, view: V, settings: MapSettings) -> Self {
        Self {
            store,
            map,
            view,
            settings,
            workouts: Vec::new(),
            pending: None,
            editing: None,
            center: None,
        }
    }

    pub async fn initialize<G: Geolocator>(&mut self, geolocator: &G) -> Result<(), AppError> {
        self.load()?;

        match geolocator.current_position().await {
            Ok(center) => self.map_ready(center),
            Err(err) => tracing::debug!(error = %err, "geolocation failed, map not shown"),
        }
        Ok(())
    }

    pub fn load(&mut self) -> Result<usize, AppError> {
        let loaded = storage::load_workouts(&self.store)?;

        for stale in std::mem::replace(&mut self.workouts, loaded) {
            self.view.remove_item(stale.id());
            if self.center.is_some() {
                self.map.remove_marker(stale.id());
            }
        }

        for workout in &self.workouts {
            self.view.render_item(workout);
            if self.center.is_some() {
                place_marker(&mut self.map, workout);
            }
        }

        tracing::info!("Loaded {} workouts from storage", self.workouts.len());
        Ok(self.workouts.len())
    }

    pub fn map_ready(&mut self, center: Coords) {
        if self.center.is_some() {
            self.center = Some(center);
            self.map
                .set_view(center, self.settings.zoom, PanOptions::default());
            return;
        }

        self.map.render(center, self.settings.zoom);
        self.map
            .add_tile_layer(&self.settings.tile_url, &self.settings.attribution);
        self.center = Some(center);

        for workout in &self.workouts {
            place_marker(&mut self.map, workout);
        }

        tracing::info!(
            lat = center.lat,
            lng = center.lng,
            markers = self.workouts.len(),
            "map ready"
        );
    }

    pub fn map_clicked(&mut self, coords: Coords) -> Result<(), AppError> {
        if self.center.is_none() {
            return Err(AppError::MapNotReady);
        }

        tracing::debug!(lat = coords.lat, lng = coords.lng, "map clicked");
        self.pending = Some(coords);
        self.editing = None;
        self.view.show_form();
        self.view.focus_distance();
        Ok(())
    }

    pub fn kind_changed(&mut self, kind: Kind) {
        self.view.show_kind_fields(kind);
    }

    /// Invalid input raises an alert and leaves the list, the form and edit
    /// mode untouched.
    pub fn submit(&mut self, fields: &FormFields) -> Result<WorkoutId, AppError> {
        let validated = FormInput::from_fields(fields)
            .and_then(|input| input.validate().map(|metric| (input, metric)));
        let (input, metric) = match validated {
            Ok(validated) => validated,
            Err(err) => {
                tracing::warn!(error = %err, "rejected workout form");
                self.view.alert(&err.to_string());
                return Err(err.into());
            }
        };

        let id = match self.editing.take() {
            Some(id) => self.apply_edit(&id, input.distance, input.duration, metric)?,
            None => self.append(input.distance, input.duration, metric)?,
        };

        self.pending = None;
        self.view.hide_form();
        self.persist()?;
        Ok(id)
    }

    fn append(&mut self, distance: f64, duration: f64, metric: Metric) -> Result<WorkoutId, AppError> {
        let coords = self.pending.ok_or(AppError::NoLocation)?;

        let mut id = WorkoutId::generate();
        while self.position(&id).is_some() {
            id = WorkoutId::generate();
        }

        let workout = Workout::with_id(id.clone(), coords, distance, duration, metric, Utc::now());
        if self.center.is_some() {
            place_marker(&mut self.map, &workout);
        }
        self.view.render_item(&workout);

        tracing::info!(id = %id, kind = workout.kind().as_str(), "workout added");
        self.workouts.push(workout);
        Ok(id)
    }

    fn apply_edit(
        &mut self,
        id: &WorkoutId,
        distance: f64,
        duration: f64,
        metric: Metric,
    ) -> Result<WorkoutId, AppError> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let workout = &mut self.workouts[index];
        let previous = workout.kind();
        workout.update(distance, duration, metric);

        self.view.replace_item(workout);
        if self.center.is_some() {
            self.map.remove_marker(id);
            place_marker(&mut self.map, workout);
        }

        tracing::info!(
            id = %id,
            from = previous.as_str(),
            to = workout.kind().as_str(),
            "workout updated"
        );
        Ok(id.clone())
    }

    pub fn edit(&mut self, id: &WorkoutId) -> Result<(), AppError> {
        let input = FormInput::from(
            self.get(id)
                .ok_or_else(|| AppError::NotFound(id.to_string()))?,
        );

        self.editing = Some(id.clone());
        self.view.fill_form(&input);
        self.view.show_kind_fields(input.kind);
        self.view.show_form();
        self.view.focus_distance();
        tracing::debug!(id = %id, "editing workout");
        Ok(())
    }

    pub fn delete(&mut self, id: &WorkoutId) -> Result<Workout, AppError> {
        let index = self
            .position(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let removed = self.workouts.remove(index);
        self.view.remove_item(id);
        if self.center.is_some() {
            self.map.remove_marker(id);
        }
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
            self.view.hide_form();
        }

        self.persist()?;
        tracing::info!(id = %id, remaining = self.workouts.len(), "workout deleted");
        Ok(removed)
    }

    pub fn focus(&mut self, id: &WorkoutId) -> Result<(), AppError> {
        if self.center.is_none() {
            return Err(AppError::MapNotReady);
        }

        let workout = self
            .workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        workout.click();

        let coords = workout.coords();
        self.center = Some(coords);
        self.map
            .set_view(coords, self.settings.zoom, PanOptions::default());
        Ok(())
    }

    pub fn persist(&mut self) -> Result<(), AppError> {
        storage::save_workouts(&mut self.store, &self.workouts)?;
        tracing::debug!("Persisted {} workouts", self.workouts.len());
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), AppError> {
        self.store.remove(WORKOUTS_KEY)?;

        for workout in self.workouts.drain(..) {
            self.view.remove_item(workout.id());
            if self.center.is_some() {
                self.map.remove_marker(workout.id());
            }
        }
        self.pending = None;
        self.editing = None;
        self.view.hide_form();

        tracing::info!("workouts reset");
        Ok(())
    }

    pub fn redraw(&mut self) {
        if let Some(center) = self.center {
            self.map.render(center, self.settings.zoom);
            self.map
                .add_tile_layer(&self.settings.tile_url, &self.settings.attribution);
            for workout in &self.workouts {
                place_marker(&mut self.map, workout);
            }
        }

        for workout in &self.workouts {
            self.view.render_item(workout);
        }

        let editing = self
            .editing
            .as_ref()
            .and_then(|id| self.workouts.iter().find(|w| w.id() == id));
        if let Some(workout) = editing {
            let input = FormInput::from(workout);
            self.view.fill_form(&input);
            self.view.show_kind_fields(input.kind);
            self.view.show_form();
        } else if self.pending.is_some() {
            self.view.show_form();
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn get(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }

    pub fn editing(&self) -> Option<&WorkoutId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn pending(&self) -> Option<Coords> {
        self.pending
    }

    pub fn is_map_ready(&self) -> bool {
        self.center.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

fn place_marker<M: MapView>(map: &mut M, workout: &Workout) {
    let popup = PopupOptions::for_kind(workout.kind());
    map.add_marker(
        workout.id(),
        workout.coords(),
        &popup,
        &render::popup_content(workout),
    );
}
