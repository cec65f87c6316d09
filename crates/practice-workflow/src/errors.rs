use practice_domain::{Category, DomainError, PracticeStatus, PracticeType};
use thiserror::Error;

// Errores del motor de inscripción y ciclo de vida.
//
// Se distinguen dos familias: errores de lógica del llamador
// (`InvalidTransition`, `InvalidState`) y errores esperables de la
// interacción con el alumno (categoría, pasos bloqueados, formulario).
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Categoría fuera del conjunto permitido para el tipo de práctica.
  #[error("La categoría '{category}' no está permitida para '{practice_type}'")]
  InvalidCategory { practice_type: PracticeType, category: Category },

  /// Intento de avanzar sin cumplir la condición del paso actual.
  #[error("No se puede avanzar desde el paso {step}: {reason}")]
  StepBlocked { step: u8, reason: String },

  /// Operación que no corresponde al paso actual del asistente.
  #[error("La operación '{operation}' no aplica en el paso {step}")]
  NotApplicable { operation: &'static str, step: u8 },

  /// Faltan campos obligatorios al enviar el formulario.
  #[error("Formulario incompleto, faltan: {}", .missing.join(", "))]
  IncompleteForm { missing: Vec<String> },

  #[error("Formato inválido en '{field}': {reason}")]
  InvalidFormat { field: String, reason: String },

  #[error("El texto de '{field}' supera {max} caracteres ({len})")]
  TextTooLong { field: String, max: usize, len: usize },

  /// Cambio de estado no permitido por el ciclo de vida.
  #[error("Transición inválida: {from} -> {to}")]
  InvalidTransition { from: PracticeStatus, to: PracticeStatus },

  /// Operación no permitida en el estado actual (por ejemplo bitácoras fuera
  /// de `en_proceso`).
  #[error("Operación '{action}' no permitida en estado {status}")]
  InvalidState { status: PracticeStatus, action: String },

  /// Errores del dominio que no tienen una variante propia aquí.
  #[error("Error de dominio: {0}")]
  Domain(DomainError),

  /// Errores originados por el journal.
  #[error("Error de journal: {0}")]
  Journal(#[from] journal::JournalError),

  #[error("Error de configuración: {0}")]
  Config(String),

  #[error("Error de serialización: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl WorkflowError {
  /// `true` para errores que indican un uso incorrecto del ciclo de vida por
  /// parte del llamador.
  pub fn is_logic_error(&self) -> bool {
    matches!(self, WorkflowError::InvalidTransition { .. } | WorkflowError::InvalidState { .. })
  }

  /// `true` para errores de validación que se muestran al alumno.
  pub fn is_validation_error(&self) -> bool {
    matches!(self,
             WorkflowError::InvalidCategory { .. }
             | WorkflowError::StepBlocked { .. }
             | WorkflowError::IncompleteForm { .. }
             | WorkflowError::InvalidFormat { .. }
             | WorkflowError::TextTooLong { .. })
  }
}

impl From<DomainError> for WorkflowError {
  fn from(e: DomainError) -> Self {
    match e {
      DomainError::InvalidTransition { from, to } => WorkflowError::InvalidTransition { from, to },
      DomainError::InvalidState { status, action } => WorkflowError::InvalidState { status, action },
      DomainError::InvalidFormat { field, reason } => WorkflowError::InvalidFormat { field, reason },
      DomainError::TextTooLong { field, max, len } => WorkflowError::TextTooLong { field, max, len },
      other => WorkflowError::Domain(other),
    }
  }
}
