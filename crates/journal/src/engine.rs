// Archivo: engine.rs
// Propósito: `JournalEngine`, helpers ergonómicos sobre `JournalRepository`
// para abrir streams, anexar eventos (tipados o JSON) y leerlos.
use crate::domain::{JournalEntry, PersistResult, StreamMeta};
use crate::errors::Result;
use crate::repository::JournalRepository;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Motor del journal.
///
/// Calcula el próximo cursor a partir de `StreamMeta` y delega la
/// persistencia en el repositorio inyectado. Los conflictos de versión se
/// devuelven como `PersistResult::Conflict`, no como error.
pub struct JournalEngine<R>
    where R: JournalRepository + ?Sized
{
    repo: Arc<R>,
}

impl<R> Clone for JournalEngine<R> where R: JournalRepository + ?Sized
{
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone() }
    }
}

impl<R> JournalEngine<R> where R: JournalRepository + ?Sized
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Abre el stream: lo crea si no existe y devuelve sus metadatos.
    pub fn open_stream(&self, stream_id: Uuid, name: Option<String>) -> Result<StreamMeta> {
        if self.repo.stream_exists(&stream_id)? {
            return self.repo.get_stream_meta(&stream_id);
        }
        log::debug!("journal: creando stream {}", stream_id);
        self.repo.create_stream(stream_id, name)
    }

    /// Crea y persiste un `JournalEntry`.
    ///
    /// - `expected_version`: `None` toma la versión actual del stream.
    /// - `command_id`: opcional, para idempotencia.
    pub fn append(&self,
                  stream_id: Uuid,
                  key: &str,
                  payload: serde_json::Value,
                  command_id: Option<Uuid>,
                  expected_version: Option<i64>)
                  -> Result<PersistResult> {
        let meta = self.repo.get_stream_meta(&stream_id)?;
        let entry = JournalEntry { id: Uuid::new_v4(),
                                   stream_id,
                                   cursor: meta.current_cursor + 1,
                                   key: key.to_string(),
                                   payload,
                                   command_id,
                                   created_at: Utc::now() };
        let result = self.repo
                         .persist_entry(&entry, expected_version.unwrap_or(meta.current_version))?;
        if result == PersistResult::Conflict {
            log::warn!("journal: conflicto de versión en stream {} ({})", stream_id, key);
        }
        Ok(result)
    }

    /// Serializa `event` y lo anexa. Los parámetros son los de `append`.
    pub fn append_typed<T: Serialize>(&self,
                                      stream_id: Uuid,
                                      key: &str,
                                      event: &T,
                                      command_id: Option<Uuid>,
                                      expected_version: Option<i64>)
                                      -> Result<PersistResult> {
        let payload = serde_json::to_value(event)?;
        self.append(stream_id, key, payload, command_id, expected_version)
    }

    /// Versión actual del stream, para pasarla luego como `expected_version`.
    pub fn version(&self, stream_id: &Uuid) -> Result<i64> {
        Ok(self.repo.get_stream_meta(stream_id)?.current_version)
    }

    /// Todos los registros del stream en orden.
    pub fn entries(&self, stream_id: &Uuid) -> Result<Vec<JournalEntry>> {
        self.repo.read_entries(stream_id, 0)
    }

    /// Último payload con la `key` dada, deserializado en `T`.
    pub fn last_typed<T: DeserializeOwned>(&self, stream_id: &Uuid, key: &str) -> Result<Option<T>> {
        let entries = self.repo.read_entries(stream_id, 0)?;
        match entries.iter().rev().find(|e| e.key == key) {
            Some(e) => Ok(Some(serde_json::from_value(e.payload.clone())?)),
            None => Ok(None),
        }
    }

    pub fn count(&self, stream_id: &Uuid) -> Result<i64> {
        self.repo.count_entries(stream_id)
    }
}
