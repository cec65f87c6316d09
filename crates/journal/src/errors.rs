// Archivo: errors.rs
// Propósito: errores del journal y el alias Result<T> usado por sus APIs.
use thiserror::Error;
/// Errores del journal.
///
/// - `NotFound`: stream no encontrado.
/// - `Conflict`: cursor no monótono o stream duplicado.
/// - `Storage`: error al acceder al almacenamiento.
/// - `Serialization`: payload que no se pudo (de)serializar.
#[derive(Error, Debug)]
pub enum JournalError {
  #[error("No encontrado: {0}")]
  NotFound(String),
  #[error("Conflicto: {0}")]
  Conflict(String),
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  #[error("Error de serialización: {0}")]
  Serialization(#[from] serde_json::Error),
}
/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, JournalError>;
