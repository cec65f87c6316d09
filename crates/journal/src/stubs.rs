// Archivo: stubs.rs
// Propósito: repositorio en memoria para la sesión local y para pruebas.
// No es durable: los datos se pierden al terminar el proceso.
use crate::domain::{JournalEntry, PersistResult, StreamMeta};
use crate::errors::{JournalError, Result};
use crate::repository::JournalRepository;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

// Minimal in-memory repository (not durable)
pub struct InMemoryJournalRepository {
    /// Metadatos de streams indexados por id.
    streams: Mutex<HashMap<Uuid, StreamMeta>>,
    /// Registros por stream, en orden de cursor.
    entries: Mutex<HashMap<Uuid, Vec<JournalEntry>>>,
}

impl InMemoryJournalRepository {
    /// Crea una nueva instancia del repositorio en memoria.
    pub fn new() -> Self {
        Self { streams: Mutex::new(HashMap::new()),
               entries: Mutex::new(HashMap::new()) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `JournalError::Storage`.
    fn lock<'a, T>(&'a self, m: &'a Mutex<T>) -> std::result::Result<MutexGuard<'a, T>, JournalError> {
        m.lock().map_err(|e| JournalError::Storage(format!("mutex poisoned: {:?}", e)))
    }
}

impl Default for InMemoryJournalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalRepository for InMemoryJournalRepository {
    fn create_stream(&self, stream_id: Uuid, name: Option<String>) -> Result<StreamMeta> {
        let mut streams = self.lock(&self.streams)?;
        if streams.contains_key(&stream_id) {
            return Err(JournalError::Conflict(format!("stream {} ya existe", stream_id)));
        }
        let meta = StreamMeta { id: stream_id,
                                name,
                                created_at: Utc::now(),
                                current_cursor: 0,
                                current_version: 0 };
        streams.insert(stream_id, meta.clone());
        Ok(meta)
    }

    /// Retorna `NotFound` si el stream no existe.
    fn get_stream_meta(&self, stream_id: &Uuid) -> Result<StreamMeta> {
        let streams = self.lock(&self.streams)?;
        streams.get(stream_id)
               .cloned()
               .ok_or(JournalError::NotFound(format!("stream {}", stream_id)))
    }

    fn stream_exists(&self, stream_id: &Uuid) -> Result<bool> {
        let streams = self.lock(&self.streams)?;
        Ok(streams.contains_key(stream_id))
    }

    /// Persiste un `JournalEntry` aplicando control optimista por
    /// `expected_version` y deduplicación por `command_id` cuando está
    /// presente.
    fn persist_entry(&self, entry: &JournalEntry, expected_version: i64) -> Result<PersistResult> {
        let mut streams = self.lock(&self.streams)?;
        let mut entries = self.lock(&self.entries)?;
        let meta = streams.get_mut(&entry.stream_id)
                          .ok_or(JournalError::NotFound(format!("stream {}", entry.stream_id)))?;

        // Idempotency: a retried command returns the current version.
        if let Some(cmd_id) = entry.command_id {
            if let Some(existing) = entries.get(&entry.stream_id) {
                if existing.iter().any(|e| e.command_id == Some(cmd_id)) {
                    return Ok(PersistResult::Ok { new_version: meta.current_version });
                }
            }
        }

        if meta.current_version != expected_version {
            return Ok(PersistResult::Conflict);
        }

        if entry.cursor <= meta.current_cursor {
            return Err(JournalError::Conflict(format!("cursor {} no es mayor que el actual {}",
                                                      entry.cursor, meta.current_cursor)));
        }

        entries.entry(entry.stream_id).or_default().push(entry.clone());
        meta.current_version = meta.current_version.saturating_add(1);
        meta.current_cursor = entry.cursor;

        Ok(PersistResult::Ok { new_version: meta.current_version })
    }

    fn read_entries(&self, stream_id: &Uuid, from_cursor: i64) -> Result<Vec<JournalEntry>> {
        let entries = self.lock(&self.entries)?;
        Ok(entries.get(stream_id)
                  .map(|list| list.iter().filter(|e| e.cursor > from_cursor).cloned().collect())
                  .unwrap_or_default())
    }

    fn count_entries(&self, stream_id: &Uuid) -> Result<i64> {
        if !self.stream_exists(stream_id)? {
            return Ok(-1);
        }
        let entries = self.lock(&self.entries)?;
        Ok(entries.get(stream_id).map(|v| v.len() as i64).unwrap_or(0))
    }
}
