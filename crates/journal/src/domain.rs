// Archivo: domain.rs
// Propósito: tipos del journal de prácticas: el registro persistido
// (`JournalEntry`), los metadatos del stream (`StreamMeta`) y el resultado
// de persistir (`PersistResult`).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Registro autocontenido de un evento de una práctica.
///
/// - `stream_id`: práctica a la que pertenece el evento.
/// - `cursor`: posición dentro del stream (1, 2, 3, ...).
/// - `key`: tipo de evento (por ejemplo `practice_confirmed`).
/// - `command_id`: opcional, para idempotencia de reintentos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub stream_id: Uuid,
    pub cursor: i64,
    pub key: String,
    pub payload: JsonValue,
    pub command_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Metadatos ligeros de un stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamMeta {
    pub id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Cursor del último registro persistido (0 si no hay registros).
    pub current_cursor: i64,
    /// Versión para locking optimista; aumenta en cada registro nuevo.
    pub current_version: i64,
}

/// Resultado de persistir un registro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistResult {
    Ok { new_version: i64 },
    Conflict,
}
