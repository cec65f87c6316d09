use chrono::NaiveDate;
use practice_domain::{Category, LogEntry, PracticeStatus, PracticeType};
use serde::{Deserialize, Serialize};

/// Eventos del ciclo de vida que se anexan al journal de cada práctica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PracticeEvent {
  Enrolled {
    practice_type: PracticeType,
    category: Option<Category>,
    requested_start_date: Option<NaiveDate>,
  },
  Confirmed {
    start_date: NaiveDate,
    /// `true` si vinieron datos confirmados por el supervisor.
    with_details: bool,
  },
  LogEntryAdded {
    entry: LogEntry,
  },
  Completed {
    end_date: NaiveDate,
  },
}

impl PracticeEvent {
  /// Key con que se guarda en el journal.
  pub fn key(&self) -> &'static str {
    match self {
      PracticeEvent::Enrolled { .. } => "practice_enrolled",
      PracticeEvent::Confirmed { .. } => "practice_confirmed",
      PracticeEvent::LogEntryAdded { .. } => "log_entry_added",
      PracticeEvent::Completed { .. } => "practice_completed",
    }
  }

  /// Estado de la práctica después del evento.
  pub fn resulting_status(&self) -> PracticeStatus {
    match self {
      PracticeEvent::Enrolled { .. } => PracticeStatus::EnEspera,
      PracticeEvent::Confirmed { .. } | PracticeEvent::LogEntryAdded { .. } => PracticeStatus::EnProceso,
      PracticeEvent::Completed { .. } => PracticeStatus::Completada,
    }
  }
}
