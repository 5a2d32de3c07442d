use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::app::surface::{MapView, PanOptions, PopupOptions, WorkoutView};
use crate::render;
use crate::types::form::FormInput;
use crate::types::workout::{Coords, Kind, Workout, WorkoutId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum UiCommand {
    RenderMap {
        center: Coords,
        zoom: u8,
    },
    AddTileLayer {
        url_template: String,
        attribution: String,
    },
    AddMarker {
        id: WorkoutId,
        coords: Coords,
        popup: PopupOptions,
        content: String,
    },
    RemoveMarker {
        id: WorkoutId,
    },
    SetView {
        center: Coords,
        zoom: u8,
        pan: PanOptions,
    },
    ShowForm,
    FillForm {
        input: FormInput,
    },
    FocusDistance,
    HideForm,
    ShowKindFields {
        kind: Kind,
    },
    RenderItem {
        id: WorkoutId,
        html: String,
    },
    ReplaceItem {
        id: WorkoutId,
        html: String,
    },
    RemoveItem {
        id: WorkoutId,
    },
    Alert {
        message: String,
    },
}

// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    commands: Arc<Mutex<Vec<UiCommand>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, command: UiCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }

    pub fn drain(&self) -> Vec<UiCommand> {
        std::mem::take(
            &mut *self
                .commands
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl MapView for Outbox {
    fn render(&mut self, center: Coords, zoom: u8) {
        self.push(UiCommand::RenderMap { center, zoom });
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.push(UiCommand::AddTileLayer {
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        });
    }

    fn add_marker(&mut self, id: &WorkoutId, coords: Coords, popup: &PopupOptions, content: &str) {
        self.push(UiCommand::AddMarker {
            id: id.clone(),
            coords,
            popup: popup.clone(),
            content: content.to_string(),
        });
    }

    fn remove_marker(&mut self, id: &WorkoutId) {
        self.push(UiCommand::RemoveMarker { id: id.clone() });
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        self.push(UiCommand::SetView { center, zoom, pan });
    }
}

impl WorkoutView for Outbox {
    fn show_form(&mut self) {
        self.push(UiCommand::ShowForm);
    }

    fn fill_form(&mut self, input: &FormInput) {
        self.push(UiCommand::FillForm { input: *input });
    }

    fn focus_distance(&mut self) {
        self.push(UiCommand::FocusDistance);
    }

    fn hide_form(&mut self) {
        self.push(UiCommand::HideForm);
    }

    fn show_kind_fields(&mut self, kind: Kind) {
        self.push(UiCommand::ShowKindFields { kind });
    }

    fn render_item(&mut self, workout: &Workout) {
        self.push(UiCommand::RenderItem {
            id: workout.id().clone(),
            html: render::list_item(workout),
        });
    }

    fn replace_item(&mut self, workout: &Workout) {
        self.push(UiCommand::ReplaceItem {
            id: workout.id().clone(),
            html: render::list_item(workout),
        });
    }

    fn remove_item(&mut self, id: &WorkoutId) {
        self.push(UiCommand::RemoveItem { id: id.clone() });
    }

    fn alert(&mut self, message: &str) {
        self.push(UiCommand::Alert {
            message: message.to_string(),
        });
    }
}
