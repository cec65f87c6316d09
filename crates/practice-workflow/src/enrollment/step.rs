use serde::{Deserialize, Serialize};
use std::fmt;

/// Pasos del asistente de inscripción, en orden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
  Type = 1,
  Category = 2,
  Requirements = 3,
  Data = 4,
}

impl WizardStep {
  pub const ALL: [WizardStep; 4] = [WizardStep::Type, WizardStep::Category, WizardStep::Requirements, WizardStep::Data];

  /// Número de paso (1..=4).
  pub fn number(&self) -> u8 {
    *self as u8
  }

  /// Nombre mostrado en la barra de pasos.
  pub fn name(&self) -> &'static str {
    match self {
      WizardStep::Type => "Tipo",
      WizardStep::Category => "Categoría",
      WizardStep::Requirements => "Requisitos",
      WizardStep::Data => "Datos",
    }
  }

  pub fn next(&self) -> Option<WizardStep> {
    match self {
      WizardStep::Type => Some(WizardStep::Category),
      WizardStep::Category => Some(WizardStep::Requirements),
      WizardStep::Requirements => Some(WizardStep::Data),
      WizardStep::Data => None,
    }
  }

  pub fn previous(&self) -> Option<WizardStep> {
    match self {
      WizardStep::Type => None,
      WizardStep::Category => Some(WizardStep::Type),
      WizardStep::Requirements => Some(WizardStep::Category),
      WizardStep::Data => Some(WizardStep::Requirements),
    }
  }
}

impl Default for WizardStep {
  fn default() -> Self {
    WizardStep::Type
  }
}

impl fmt::Display for WizardStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}. {}", self.number(), self.name())
  }
}
