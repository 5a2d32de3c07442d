use std::path::PathBuf;

use crate::types::workout::Coords;

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, Clone)]
pub struct MapSettings {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: 13,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    // Stand-in for browser geolocation
    pub home: Option<Coords>,
    pub map: MapSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            home: None,
            map: MapSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let data_dir = std::env::var("MAPTY_DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let home = std::env::var("MAPTY_HOME")
            .ok()
            .and_then(|s| parse_coords(&s));

        let zoom = std::env::var("MAP_ZOOM")
            .ok()
            .and_then(|s| s.parse::<u8>().ok())
            .filter(|z| *z <= 20)
            .unwrap_or(defaults.map.zoom);

        let tile_url = std::env::var("MAP_TILE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.map.tile_url);

        Self {
            port,
            data_dir,
            home,
            map: MapSettings {
                zoom,
                tile_url,
                attribution: defaults.map.attribution,
            },
        }
    }
}

pub fn parse_coords(s: &str) -> Option<Coords> {
    let (lat, lng) = s.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(Coords::new(lat, lng))
}
