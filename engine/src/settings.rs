use crate::error::{ThemeError, ThemeResult};
use crate::host::{SettingsStore, ThemeEvent};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

/// Fan-out of theme events to any number of receivers
#[derive(Default)]
pub struct Subscribers {
    senders: Mutex<Vec<Sender<ThemeEvent>>>,
}

impl Subscribers {
    pub fn subscribe(&self) -> Receiver<ThemeEvent> {
        let (tx, rx) = mpsc::channel();
        match self.senders.lock() {
            Ok(mut senders) => senders.push(tx),
            Err(e) => log::error!("Failed to register theme subscriber: {e}"),
        }
        rx
    }

    /// Send to every live receiver, dropping the ones that hung up
    pub fn emit(&self, event: ThemeEvent) {
        match self.senders.lock() {
            Ok(mut senders) => senders.retain(|tx| tx.send(event.clone()).is_ok()),
            Err(e) => log::error!("Failed to emit theme event {event:?}: {e}"),
        }
    }
}

/// Settings kept for the lifetime of the process
#[derive(Default)]
pub struct MemorySettings {
    current: Mutex<Option<String>>,
    subscribers: Subscribers,
}

impl MemorySettings {
    pub fn new(current: Option<String>) -> Self {
        Self {
            current: Mutex::new(current),
            subscribers: Subscribers::default(),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn current_theme(&self) -> Option<String> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn set_current_theme(&self, name: &str) -> ThemeResult<()> {
        {
            let mut current = self
                .current
                .lock()
                .map_err(|e| ThemeError::Settings(format!("settings lock poisoned: {e}")))?;
            *current = Some(name.to_string());
        }
        self.subscribers.emit(ThemeEvent::Selected(name.to_string()));
        Ok(())
    }

    fn emit(&self, event: ThemeEvent) {
        self.subscribers.emit(event);
    }

    fn subscribe(&self) -> Receiver<ThemeEvent> {
        self.subscribers.subscribe()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSettings {
    #[serde(default)]
    current_theme: Option<String>,
}

/// Settings persisted as JSON.
///
/// A missing or unparsable file reads as "nothing selected".
pub struct JsonSettings {
    path: PathBuf,
    memory: MemorySettings,
}

impl JsonSettings {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let persisted = Self::read(&path);
        Self {
            memory: MemorySettings::new(persisted.current_theme),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> PersistedSettings {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No settings at {}: {e}", path.display());
                return PersistedSettings::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings file {}: {e}", path.display());
            PersistedSettings::default()
        })
    }

    fn write(&self, name: &str) -> ThemeResult<()> {
        let persisted = PersistedSettings {
            current_theme: Some(name.to_string()),
        };
        let content = serde_json::to_string_pretty(&persisted)
            .map_err(|e| ThemeError::Settings(format!("Failed to encode settings: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ThemeError::io(parent, e))?;
        }
        std::fs::write(&self.path, content).map_err(|e| ThemeError::io(&self.path, e))
    }
}

impl SettingsStore for JsonSettings {
    fn current_theme(&self) -> Option<String> {
        self.memory.current_theme()
    }

    fn set_current_theme(&self, name: &str) -> ThemeResult<()> {
        self.write(name)?;
        self.memory.set_current_theme(name)
    }

    fn emit(&self, event: ThemeEvent) {
        self.memory.emit(event);
    }

    fn subscribe(&self) -> Receiver<ThemeEvent> {
        self.memory.subscribe()
    }
}
