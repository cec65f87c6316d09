// record.rs
use crate::{Category, CompanyInfo, ConfirmationDetails, DomainError, LogBook, LogEntry, PracticeMode, PracticeStatus,
            PracticeType, SupervisorInfo};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Datos complementarios declarados por el alumno en el paso "Datos".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentDetails {
  pub career: Option<String>,
  pub campus: Option<String>,
  /// Fecha de inicio indicada en el formulario. La fecha de inicio efectiva
  /// se fija al confirmar la práctica.
  pub requested_start_date: Option<NaiveDate>,
  /// "Fecha de término" declarada al convalidar; no es la fecha de término
  /// del ciclo de vida.
  pub declared_end_date: Option<NaiveDate>,
  /// Resumen de las tareas realizadas (convalidación).
  pub task_summary: Option<String>,
  pub special_consideration: Option<String>,
}

/// Todo lo necesario para construir una práctica a partir del formulario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentData {
  pub practice_type: PracticeType,
  pub category: Option<Category>,
  pub mode: PracticeMode,
  pub company: CompanyInfo,
  pub supervisor: SupervisorInfo,
  pub details: EnrollmentDetails,
}

/// Práctica de un alumno. Sólo cambia de estado mediante `transition_to` (o
/// sus atajos), que además fija las fechas del ciclo de vida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipRecord {
  id: Uuid,
  practice_type: PracticeType,
  status: PracticeStatus,
  category: Option<Category>,
  mode: PracticeMode,
  start_date: Option<NaiveDate>,
  end_date: Option<NaiveDate>,
  company: CompanyInfo,
  supervisor: SupervisorInfo,
  details: EnrollmentDetails,
  logbook: LogBook,
  created_at: DateTime<Utc>,
}

impl InternshipRecord {
  /// Crea la práctica en estado `NoIniciada`.
  pub fn new(data: EnrollmentData) -> Self {
    Self { id: Uuid::new_v4(),
           practice_type: data.practice_type,
           status: PracticeStatus::NoIniciada,
           category: data.category,
           mode: data.mode,
           start_date: None,
           end_date: None,
           company: data.company,
           supervisor: data.supervisor,
           details: data.details,
           logbook: LogBook::default(),
           created_at: Utc::now() }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn practice_type(&self) -> PracticeType {
    self.practice_type
  }

  pub fn status(&self) -> PracticeStatus {
    self.status
  }

  pub fn category(&self) -> Option<Category> {
    self.category
  }

  pub fn mode(&self) -> PracticeMode {
    self.mode
  }

  pub fn total_hours(&self) -> u32 {
    self.mode.hours()
  }

  pub fn start_date(&self) -> Option<NaiveDate> {
    self.start_date
  }

  pub fn end_date(&self) -> Option<NaiveDate> {
    self.end_date
  }

  pub fn company(&self) -> &CompanyInfo {
    &self.company
  }

  pub fn supervisor(&self) -> &SupervisorInfo {
    &self.supervisor
  }

  pub fn details(&self) -> &EnrollmentDetails {
    &self.details
  }

  pub fn logbook(&self) -> &LogBook {
    &self.logbook
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  /// Aplica una transición de estado. Si la transición no es válida el
  /// registro queda intacto.
  ///
  /// Efectos:
  /// - `EnEspera`: ninguno; la fecha de inicio aún no se fija.
  /// - `EnProceso`: `start_date = today` y se descartan bitácoras previas.
  /// - `Completada`: `end_date = today`.
  pub fn transition_to(&mut self, next: PracticeStatus, today: NaiveDate) -> Result<(), DomainError> {
    if !self.status.can_transition_to(next) {
      return Err(DomainError::InvalidTransition { from: self.status, to: next });
    }
    if self.status == PracticeStatus::NoIniciada && self.category.is_none() {
      return Err(DomainError::ValidationError("la categoría debe definirse antes de inscribir la práctica".into()));
    }
    match next {
      PracticeStatus::EnProceso => {
        self.start_date = Some(today);
        self.logbook.clear();
      }
      PracticeStatus::Completada => self.end_date = Some(today),
      PracticeStatus::NoIniciada | PracticeStatus::EnEspera => {}
    }
    log::debug!("práctica {}: {} -> {}", self.id, self.status, next);
    self.status = next;
    Ok(())
  }

  /// `NoIniciada -> EnEspera`. Esta transición no fija fechas.
  pub fn submit(&mut self) -> Result<(), DomainError> {
    self.transition_to(PracticeStatus::EnEspera, Utc::now().date_naive())
  }

  /// `EnEspera -> EnProceso`, incorporando los datos confirmados si vienen.
  pub fn confirm(&mut self, today: NaiveDate, confirmed: Option<&ConfirmationDetails>) -> Result<(), DomainError> {
    self.transition_to(PracticeStatus::EnProceso, today)?;
    if let Some(details) = confirmed {
      self.company.merge(&details.company);
      self.supervisor.merge(&details.supervisor);
    }
    Ok(())
  }

  /// `EnProceso -> Completada`.
  pub fn complete(&mut self, today: NaiveDate) -> Result<(), DomainError> {
    self.transition_to(PracticeStatus::Completada, today)
  }

  /// Agrega una bitácora. Sólo se permite con la práctica en proceso y con
  /// actividades dentro del largo máximo.
  pub fn add_log_entry(&mut self, entry: LogEntry) -> Result<(), DomainError> {
    if !self.status.accepts_log_entries() {
      return Err(DomainError::InvalidState { status: self.status, action: "agregar bitácora".into() });
    }
    entry.check_lengths()?;
    self.logbook.push(entry);
    Ok(())
  }

  /// Verifica los invariantes del registro.
  pub fn check_invariants(&self) -> Result<(), DomainError> {
    if self.end_date.is_some() != (self.status == PracticeStatus::Completada) {
      return Err(DomainError::ValidationError(format!("end_date inconsistente con el estado {}", self.status)));
    }
    if self.status != PracticeStatus::NoIniciada && self.category.is_none() {
      return Err(DomainError::ValidationError(format!("estado {} sin categoría", self.status)));
    }
    if self.start_date.is_some() != (self.status >= PracticeStatus::EnProceso) {
      return Err(DomainError::ValidationError(format!("start_date inconsistente con el estado {}", self.status)));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::TimeRange;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
  }

  fn data(category: Option<Category>) -> EnrollmentData {
    EnrollmentData { practice_type: PracticeType::Start,
                     category,
                     mode: PracticeMode::Hours324,
                     company: CompanyInfo::default(),
                     supervisor: SupervisorInfo::default(),
                     details: EnrollmentDetails::default() }
  }

  #[test]
  fn category_is_required_to_leave_not_started() {
    let mut rec = InternshipRecord::new(data(None));
    let err = rec.submit().unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));
    assert_eq!(rec.status(), PracticeStatus::NoIniciada);
  }

  #[test]
  fn dates_follow_the_lifecycle() -> Result<(), DomainError> {
    let mut rec = InternshipRecord::new(data(Some(Category::Research)));
    rec.submit()?;
    assert_eq!(rec.start_date(), None);
    rec.check_invariants()?;
    rec.confirm(day(2), None)?;
    assert_eq!(rec.start_date(), Some(day(2)));
    assert_eq!(rec.end_date(), None);
    rec.complete(day(30))?;
    assert_eq!(rec.end_date(), Some(day(30)));
    rec.check_invariants()?;
    Ok(())
  }

  #[test]
  fn skipping_a_state_is_rejected_and_leaves_record_intact() {
    let mut rec = InternshipRecord::new(data(Some(Category::Company)));
    rec.submit().unwrap();
    let before = rec.clone();
    let err = rec.complete(day(2)).unwrap_err();
    assert_eq!(err,
               DomainError::InvalidTransition { from: PracticeStatus::EnEspera, to: PracticeStatus::Completada });
    assert_eq!(rec, before);
  }

  #[test]
  fn confirmation_merges_only_provided_fields() -> Result<(), DomainError> {
    let mut d = data(Some(Category::Company));
    d.company.name = Some("TS Latam SpA".into());
    d.supervisor.email = Some("alumno@ejemplo.com".into());
    let mut rec = InternshipRecord::new(d);
    rec.submit()?;
    let confirmed = ConfirmationDetails { company: CompanyInfo { address: Some("Av. España 1680".into()), ..Default::default() },
                                          supervisor: SupervisorInfo { email: Some("jefe@tslatam.cl".into()),
                                                                       ..Default::default() } };
    rec.confirm(day(2), Some(&confirmed))?;
    assert_eq!(rec.company().name.as_deref(), Some("TS Latam SpA"));
    assert_eq!(rec.company().address.as_deref(), Some("Av. España 1680"));
    assert_eq!(rec.supervisor().email.as_deref(), Some("jefe@tslatam.cl"));
    Ok(())
  }

  #[test]
  fn log_entries_only_while_in_progress() -> Result<(), DomainError> {
    let mut rec = InternshipRecord::new(data(Some(Category::Company)));
    let entry = LogEntry::new(day(3), TimeRange::default(), "Setup", "");
    assert!(matches!(rec.add_log_entry(entry.clone()), Err(DomainError::InvalidState { .. })));
    rec.submit()?;
    rec.confirm(day(2), None)?;
    rec.add_log_entry(entry.clone())?;
    assert_eq!(rec.logbook().latest(), Some(&entry));
    rec.complete(day(4))?;
    assert!(matches!(rec.add_log_entry(entry), Err(DomainError::InvalidState { .. })));
    assert_eq!(rec.logbook().len(), 1);
    Ok(())
  }

  #[test]
  fn stored_record_with_reversed_log_times_is_refused() -> Result<(), DomainError> {
    let mut rec = InternshipRecord::new(data(Some(Category::Company)));
    rec.submit()?;
    rec.confirm(day(2), None)?;
    rec.add_log_entry(LogEntry::new(day(3), TimeRange::parse("09:00", "18:00")?, "Setup", ""))?;

    let mut json = serde_json::to_value(&rec).unwrap();
    json["logbook"]["entries"][0]["time_range"] = serde_json::json!({"from": "18:00:00", "to": "09:00:00"});
    assert!(serde_json::from_value::<InternshipRecord>(json).is_err());
    Ok(())
  }
}
