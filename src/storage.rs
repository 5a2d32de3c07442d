use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::StorageError;
use crate::types::workout::Workout;

pub const WORKOUTS_KEY: &str = "workouts";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Atomic replace: write a sibling temp file, then rename over the key.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Never fails on bad data: a blob that is not a JSON array counts as empty,
/// and entries that fail to decode or validate, or repeat an id, are skipped.
pub fn load_workouts<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Workout>, StorageError> {
    let Some(blob) = store.get(WORKOUTS_KEY)? else {
        return Ok(Vec::new());
    };

    let entries = match serde_json::from_str::<Value>(&blob) {
        Ok(Value::Array(entries)) => entries,
        Ok(Value::Null) => return Ok(Vec::new()),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "persisted workouts are not a list, ignoring");
            return Ok(Vec::new());
        }
        Err(err) => {
            tracing::warn!(error = %err, "persisted workouts are not valid JSON, ignoring");
            return Ok(Vec::new());
        }
    };

    let total = entries.len();
    let mut seen = HashSet::new();
    let mut workouts = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        let workout = match serde_json::from_value::<Workout>(entry) {
            Ok(workout) => workout.restore(),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed persisted workout");
                continue;
            }
        };
        if !workout.is_valid() {
            tracing::warn!(index, id = %workout.id(), "skipping persisted workout with invalid inputs");
            continue;
        }
        if !seen.insert(workout.id().clone()) {
            tracing::warn!(index, id = %workout.id(), "skipping duplicate persisted workout");
            continue;
        }
        workouts.push(workout);
    }

    tracing::debug!("Loaded {} of {} persisted workouts", workouts.len(), total);
    Ok(workouts)
}

pub fn save_workouts<S: KeyValueStore + ?Sized>(
    store: &mut S,
    workouts: &[Workout],
) -> Result<(), StorageError> {
    let blob = serde_json::to_string(workouts)?;
    store.set(WORKOUTS_KEY, &blob)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
