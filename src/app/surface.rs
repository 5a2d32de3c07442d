use serde::Serialize;

use crate::types::form::FormInput;
use crate::types::workout::{Coords, Kind, Workout, WorkoutId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub auto_close: bool,
    pub close_on_click: bool,
    pub max_width: u32,
    pub min_width: u32,
    pub class_name: String,
}

impl PopupOptions {
    pub fn for_kind(kind: Kind) -> Self {
        Self {
            auto_close: false,
            close_on_click: false,
            max_width: 250,
            min_width: 100,
            class_name: format!("{}-popup", kind.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_secs: f64,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            animate: true,
            duration_secs: 1.0,
        }
    }
}

pub trait MapView {
    fn render(&mut self, center: Coords, zoom: u8);
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn add_marker(&mut self, id: &WorkoutId, coords: Coords, popup: &PopupOptions, content: &str);
    fn remove_marker(&mut self, id: &WorkoutId);
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions);
}

pub trait WorkoutView {
    fn show_form(&mut self);
    fn fill_form(&mut self, input: &FormInput);
    fn focus_distance(&mut self);
    fn hide_form(&mut self);
    fn show_kind_fields(&mut self, kind: Kind);
    fn render_item(&mut self, workout: &Workout);
    fn replace_item(&mut self, workout: &Workout);
    fn remove_item(&mut self, id: &WorkoutId);
    fn alert(&mut self, message: &str);
}
