// config.rs
//
// Configuración del motor. Cada opción decide entre el comportamiento del
// portal y una versión más estricta.
use crate::errors::WorkflowError;
use practice_domain::PracticeMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_VALIDATION: &str = "PRACTICAS_VALIDATION";
pub const ENV_LOG_TEXT: &str = "PRACTICAS_LOG_TEXT";
pub const ENV_PROGRESS: &str = "PRACTICAS_PROGRESS";
pub const ENV_TOTAL_HOURS: &str = "PRACTICAS_TOTAL_HOURS";

/// Validación al enviar la inscripción.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
  /// Campos obligatorios y formato de RUT, e-mail, teléfono y fechas.
  Strict,
  /// Acepta cualquier contenido, incluso vacío (comportamiento del portal).
  Permissive,
}

/// Qué hacer con actividades de bitácora más largas que el máximo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLimitPolicy {
  Truncate,
  Reject,
}

/// Cómo se calcula el progreso en horas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
  /// Suma de las jornadas registradas en bitácoras.
  Logged,
  /// Constantes por estado, como las mostraba el portal.
  Placeholder,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
  pub validation: ValidationMode,
  pub log_text: TextLimitPolicy,
  pub progress: ProgressMode,
  /// Modo usado cuando el formulario no indica uno.
  pub default_mode: PracticeMode,
}

impl Default for WorkflowConfig {
  fn default() -> Self {
    WorkflowConfig { validation: ValidationMode::Strict,
                     log_text: TextLimitPolicy::Truncate,
                     progress: ProgressMode::Logged,
                     default_mode: PracticeMode::Hours324 }
  }
}

impl WorkflowConfig {
  /// Carga `.env` si existe y lee las variables `PRACTICAS_*`. Las variables
  /// ausentes toman el valor por defecto.
  pub fn from_env() -> Result<Self, WorkflowError> {
    if let Err(e) = dotenvy::dotenv() {
      if !e.not_found() {
        return Err(WorkflowError::Config(format!("no se pudo leer .env: {}", e)));
      }
    }
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Igual que `from_env` pero con una función de búsqueda arbitraria.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, WorkflowError>
    where F: Fn(&str) -> Option<String>
  {
    let mut cfg = WorkflowConfig::default();
    if let Some(v) = lookup(ENV_VALIDATION) {
      cfg.validation = v.parse()?;
    }
    if let Some(v) = lookup(ENV_LOG_TEXT) {
      cfg.log_text = v.parse()?;
    }
    if let Some(v) = lookup(ENV_PROGRESS) {
      cfg.progress = v.parse()?;
    }
    if let Some(v) = lookup(ENV_TOTAL_HOURS) {
      cfg.default_mode = v.parse::<PracticeMode>()
                          .map_err(|e| WorkflowError::Config(format!("{}: {}", ENV_TOTAL_HOURS, e)))?;
    }
    Ok(cfg)
  }
}

fn unknown(var: &str, value: &str) -> WorkflowError {
  WorkflowError::Config(format!("{}: valor desconocido '{}'", var, value))
}

impl FromStr for ValidationMode {
  type Err = WorkflowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "strict" => Ok(ValidationMode::Strict),
      "permissive" => Ok(ValidationMode::Permissive),
      _ => Err(unknown(ENV_VALIDATION, s)),
    }
  }
}

impl FromStr for TextLimitPolicy {
  type Err = WorkflowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "truncate" => Ok(TextLimitPolicy::Truncate),
      "reject" => Ok(TextLimitPolicy::Reject),
      _ => Err(unknown(ENV_LOG_TEXT, s)),
    }
  }
}

impl FromStr for ProgressMode {
  type Err = WorkflowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "logged" => Ok(ProgressMode::Logged),
      "placeholder" => Ok(ProgressMode::Placeholder),
      _ => Err(unknown(ENV_PROGRESS, s)),
    }
  }
}
