use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estado de una práctica. El orden de las variantes es el orden del ciclo
/// de vida: sólo se avanza de un estado al siguiente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeStatus {
  NoIniciada,
  EnEspera,
  EnProceso,
  Completada,
}

impl PracticeStatus {
  pub const ALL: [PracticeStatus; 4] = [PracticeStatus::NoIniciada,
                                        PracticeStatus::EnEspera,
                                        PracticeStatus::EnProceso,
                                        PracticeStatus::Completada];

  /// Valor crudo usado por el portal (`"en_proceso"`, ...).
  pub fn as_str(&self) -> &'static str {
    match self {
      PracticeStatus::NoIniciada => "no_iniciada",
      PracticeStatus::EnEspera => "en_espera",
      PracticeStatus::EnProceso => "en_proceso",
      PracticeStatus::Completada => "completada",
    }
  }

  /// Único estado alcanzable desde `self`, o `None` si es terminal.
  pub fn successor(&self) -> Option<PracticeStatus> {
    match self {
      PracticeStatus::NoIniciada => Some(PracticeStatus::EnEspera),
      PracticeStatus::EnEspera => Some(PracticeStatus::EnProceso),
      PracticeStatus::EnProceso => Some(PracticeStatus::Completada),
      PracticeStatus::Completada => None,
    }
  }

  pub fn can_transition_to(&self, next: PracticeStatus) -> bool {
    self.successor() == Some(next)
  }

  pub fn is_terminal(&self) -> bool {
    self.successor().is_none()
  }

  /// Sólo una práctica en proceso admite bitácoras.
  pub fn accepts_log_entries(&self) -> bool {
    *self == PracticeStatus::EnProceso
  }
}

impl Default for PracticeStatus {
  fn default() -> Self {
    PracticeStatus::NoIniciada
  }
}

impl fmt::Display for PracticeStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for PracticeStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PracticeStatus::ALL.iter()
                       .copied()
                       .find(|st| st.as_str() == s.trim().to_lowercase())
                       .ok_or_else(|| format!("estado desconocido: {}", s))
  }
}
