// Archivo: repository.rs
// Propósito: contrato `JournalRepository` que deben cumplir las
// implementaciones de almacenamiento del journal.
use crate::domain::{JournalEntry, PersistResult, StreamMeta};
use crate::errors::Result;
use uuid::Uuid;

/// Contrato mínimo del repositorio del journal.
///
/// Cada stream es un historial de sólo-anexar: los registros no se
/// modifican ni se eliminan una vez persistidos.
pub trait JournalRepository: Send + Sync {
    /// Crea un stream con el id indicado. Falla con `Conflict` si ya existe.
    fn create_stream(&self, stream_id: Uuid, name: Option<String>) -> Result<StreamMeta>;

    /// Obtiene los metadatos del stream.
    fn get_stream_meta(&self, stream_id: &Uuid) -> Result<StreamMeta>;

    /// Verifica si existe el stream.
    fn stream_exists(&self, stream_id: &Uuid) -> Result<bool>;

    /// Persiste un registro. `expected_version` controla la concurrencia
    /// (optimistic): si no coincide se devuelve `PersistResult::Conflict`.
    /// Un `command_id` ya visto no duplica el registro.
    fn persist_entry(&self, entry: &JournalEntry, expected_version: i64) -> Result<PersistResult>;

    /// Lee registros a partir de un cursor (exclusive), ordenados.
    fn read_entries(&self, stream_id: &Uuid, from_cursor: i64) -> Result<Vec<JournalEntry>>;

    /// Cuenta los registros de un stream. Devuelve -1 si el stream no
    /// existe, 0 si existe pero está vacío.
    fn count_entries(&self, stream_id: &Uuid) -> Result<i64>;
}
