// errors.rs
use crate::PracticeStatus;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  ValidationError(String),
  #[error("Formato inválido en '{field}': {reason}")]
  InvalidFormat { field: String, reason: String },
  #[error("Transición inválida: {from} -> {to}")]
  InvalidTransition { from: PracticeStatus, to: PracticeStatus },
  #[error("Operación '{action}' no permitida en estado {status}")]
  InvalidState { status: PracticeStatus, action: String },
  #[error("El texto de '{field}' supera {max} caracteres ({len})")]
  TextTooLong { field: String, max: usize, len: usize },
  #[error("No encontrado: {0}")]
  NotFound(String),
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  #[error("Error de serialización: {0}")]
  SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
  fn from(e: serde_json::Error) -> Self {
    Self::SerializationError(e.to_string())
  }
}
