// lifecycle.rs
//
// `PracticeTracker`: máquina de estados de la práctica de un alumno.
//
//   (sin práctica) -> en_espera -> en_proceso -> completada
//
// Cada operación carga la práctica, aplica el cambio sobre una copia, guarda
// la copia y luego anota el evento en el journal con un `command_id` propio y
// la versión del stream leída al inicio. Si el journal rechaza el evento se
// restaura la práctica anterior, de modo que ni el repositorio ni el journal
// registran un cambio a medias.
use crate::clock::{Clock, SystemClock};
use crate::config::{TextLimitPolicy, WorkflowConfig};
use crate::enrollment::EnrollmentWizard;
use crate::errors::WorkflowError;
use crate::events::PracticeEvent;
use crate::projection::{self, PracticeSummary};
use chrono::NaiveDate;
use journal::{InMemoryJournalRepository, JournalEngine, JournalEntry, JournalError, JournalRepository, PersistResult};
use practice_domain::{ConfirmationDetails, DomainError, InMemoryPracticeRepository, InternshipRecord, LogEntry,
                      PracticeRepository, PracticeStatus};
use std::sync::Arc;
use uuid::Uuid;

pub struct PracticeTracker {
  /// Práctica en seguimiento; `None` equivale a `no_iniciada`.
  record_id: Option<Uuid>,
  practices: Arc<dyn PracticeRepository>,
  journal: JournalEngine<dyn JournalRepository>,
  clock: Arc<dyn Clock>,
  config: WorkflowConfig,
}

impl PracticeTracker {
  pub fn new(practices: Arc<dyn PracticeRepository>,
             journal_repo: Arc<dyn JournalRepository>,
             clock: Arc<dyn Clock>,
             config: WorkflowConfig)
             -> Self {
    Self { record_id: None,
           practices,
           journal: JournalEngine::new(journal_repo),
           clock,
           config }
  }

  /// Tracker con repositorios en memoria y el reloj del sistema.
  pub fn in_memory(config: WorkflowConfig) -> Self {
    Self::new(Arc::new(InMemoryPracticeRepository::new()),
              Arc::new(InMemoryJournalRepository::new()),
              Arc::new(SystemClock),
              config)
  }

  /// Retoma el seguimiento de una práctica ya inscrita. Falla con
  /// `NotFound` si la práctica no está guardada o si su journal no tiene el
  /// evento de inscripción.
  pub fn resume(practices: Arc<dyn PracticeRepository>,
                journal_repo: Arc<dyn JournalRepository>,
                clock: Arc<dyn Clock>,
                config: WorkflowConfig,
                record_id: Uuid)
                -> Result<Self, WorkflowError> {
    let mut tracker = Self::new(practices, journal_repo, clock, config);
    let rec = tracker.load(record_id)?;
    let enrolled: Option<PracticeEvent> = tracker.journal.last_typed(&record_id, "practice_enrolled")?;
    if enrolled.is_none() {
      return Err(DomainError::NotFound(format!("inscripción de la práctica {}", record_id)).into());
    }
    tracker.record_id = Some(record_id);
    log::info!("práctica {} retomada ({})", record_id, rec.status());
    Ok(tracker)
  }

  pub fn config(&self) -> &WorkflowConfig {
    &self.config
  }

  pub fn record_id(&self) -> Option<Uuid> {
    self.record_id
  }

  /// Copia de la práctica actual, si existe.
  pub fn record(&self) -> Result<Option<InternshipRecord>, WorkflowError> {
    match self.record_id {
      Some(id) => {
        let rec = self.practices
                      .get_record(&id)?
                      .ok_or_else(|| DomainError::NotFound(format!("práctica {}", id)))?;
        Ok(Some(rec))
      }
      None => Ok(None),
    }
  }

  pub fn status(&self) -> Result<PracticeStatus, WorkflowError> {
    Ok(self.record()?.map(|r| r.status()).unwrap_or(PracticeStatus::NoIniciada))
  }

  /// Registra una práctica recién enviada desde el asistente. Acepta un
  /// registro `no_iniciada` (lo envía) o ya `en_espera`.
  pub fn enroll(&mut self, mut record: InternshipRecord) -> Result<Uuid, WorkflowError> {
    let current = self.status()?;
    if current != PracticeStatus::NoIniciada {
      return Err(WorkflowError::InvalidTransition { from: current, to: PracticeStatus::EnEspera });
    }
    if record.status() == PracticeStatus::NoIniciada {
      record.submit()?;
    } else if record.status() != PracticeStatus::EnEspera {
      return Err(WorkflowError::InvalidTransition { from: record.status(), to: PracticeStatus::EnEspera });
    }

    let id = record.id();
    let event = PracticeEvent::Enrolled { practice_type: record.practice_type(),
                                          category: record.category(),
                                          requested_start_date: record.details().requested_start_date };
    let version = self.journal
                      .open_stream(id, Some(format!("práctica {}", record.practice_type())))?
                      .current_version;
    self.practices.save_record(record)?;
    self.record_event(id, &event, version, None)?;
    self.record_id = Some(id);
    log::info!("práctica {} inscrita (en_espera)", id);
    Ok(id)
  }

  /// Envía el asistente y registra la práctica resultante.
  pub fn submit_enrollment(&mut self, wizard: &mut EnrollmentWizard) -> Result<Uuid, WorkflowError> {
    let current = self.status()?;
    if current != PracticeStatus::NoIniciada {
      return Err(WorkflowError::InvalidTransition { from: current, to: PracticeStatus::EnEspera });
    }
    let record = wizard.submit()?;
    self.enroll(record)
  }

  /// `en_espera -> en_proceso` (acción "SKIP" del portal).
  pub fn confirm(&mut self) -> Result<InternshipRecord, WorkflowError> {
    self.confirm_with(None)
  }

  /// Confirma la práctica incorporando los datos validados por el
  /// supervisor o la institución.
  pub fn confirm_with(&mut self, details: Option<ConfirmationDetails>) -> Result<InternshipRecord, WorkflowError> {
    let today = self.clock.today();
    self.mutate(PracticeStatus::EnProceso, |rec| {
          rec.confirm(today, details.as_ref())?;
          Ok(PracticeEvent::Confirmed { start_date: today, with_details: details.is_some() })
        })
  }

  /// `en_proceso -> completada` ("TERMINAR PRÁCTICA").
  pub fn complete(&mut self) -> Result<InternshipRecord, WorkflowError> {
    let today = self.clock.today();
    self.mutate(PracticeStatus::Completada, |rec| {
          rec.complete(today)?;
          Ok(PracticeEvent::Completed { end_date: today })
        })
  }

  /// Agrega una bitácora. Sólo con la práctica `en_proceso`; el largo de las
  /// actividades se maneja según `TextLimitPolicy`.
  pub fn add_log_entry(&mut self, entry: LogEntry) -> Result<InternshipRecord, WorkflowError> {
    let Some(id) = self.record_id else {
      return Err(WorkflowError::InvalidState { status: PracticeStatus::NoIniciada,
                                               action: "agregar bitácora".into() });
    };
    let mut rec = self.load(id)?;
    let before = rec.clone();
    let version = self.journal.version(&id)?;
    let entry = match self.config.log_text {
      TextLimitPolicy::Truncate => entry.truncated(),
      TextLimitPolicy::Reject => entry,
    };
    if let Err(e) = rec.add_log_entry(entry.clone()) {
      log::warn!("bitácora rechazada para {}: {}", id, e);
      return Err(e.into());
    }
    self.practices.save_record(rec.clone())?;
    self.record_event(id, &PracticeEvent::LogEntryAdded { entry }, version, Some(before))?;
    Ok(rec)
  }

  pub fn latest_log_entry(&self) -> Result<Option<LogEntry>, WorkflowError> {
    Ok(self.record()?.and_then(|r| r.logbook().latest().cloned()))
  }

  /// Eventos anotados para la práctica actual.
  pub fn journal_entries(&self) -> Result<Vec<JournalEntry>, WorkflowError> {
    match self.record_id {
      Some(id) => Ok(self.journal.entries(&id)?),
      None => Ok(Vec::new()),
    }
  }

  /// Vista resumida lista para mostrar.
  pub fn summary(&self) -> Result<PracticeSummary, WorkflowError> {
    let record = self.record()?;
    Ok(projection::summarize(record.as_ref(), self.config.progress))
  }

  pub fn today(&self) -> NaiveDate {
    self.clock.today()
  }

  fn load(&self, id: Uuid) -> Result<InternshipRecord, WorkflowError> {
    Ok(self.practices
           .get_record(&id)?
           .ok_or_else(|| DomainError::NotFound(format!("práctica {}", id)))?)
  }

  fn mutate<F>(&mut self, target: PracticeStatus, apply: F) -> Result<InternshipRecord, WorkflowError>
    where F: FnOnce(&mut InternshipRecord) -> Result<PracticeEvent, WorkflowError>
  {
    let Some(id) = self.record_id else {
      log::warn!("transición a {} sin práctica inscrita", target);
      return Err(WorkflowError::InvalidTransition { from: PracticeStatus::NoIniciada, to: target });
    };
    let mut rec = self.load(id)?;
    let before = rec.clone();
    let from = before.status();
    let version = self.journal.version(&id)?;
    let event = match apply(&mut rec) {
      Ok(ev) => ev,
      Err(e) => {
        log::warn!("transición {} -> {} rechazada para {}: {}", from, target, id, e);
        return Err(e);
      }
    };
    self.practices.save_record(rec.clone())?;
    self.record_event(id, &event, version, Some(before))?;
    log::info!("práctica {}: {} -> {}", id, from, rec.status());
    Ok(rec)
  }

  /// Anota `event` en el journal. Si no se puede, deja la práctica como
  /// estaba: `previous` se vuelve a guardar o, si es `None`, la práctica se
  /// elimina.
  fn record_event(&self,
                  id: Uuid,
                  event: &PracticeEvent,
                  expected_version: i64,
                  previous: Option<InternshipRecord>)
                  -> Result<(), WorkflowError> {
    let command_id = Uuid::new_v4();
    let err: WorkflowError =
      match self.journal.append_typed(id, event.key(), event, Some(command_id), Some(expected_version)) {
        Ok(PersistResult::Ok { .. }) => return Ok(()),
        Ok(PersistResult::Conflict) => {
          JournalError::Conflict(format!("no se pudo anotar {} para la práctica {}", event.key(), id)).into()
        }
        Err(e) => e.into(),
      };
    log::warn!("evento {} de {} no anotado, se restaura la práctica: {}", event.key(), id, err);
    let restored = match previous {
      Some(rec) => self.practices.save_record(rec).map(|_| ()),
      None => self.practices.remove_record(&id).map(|_| ()),
    };
    if let Err(e) = restored {
      log::error!("no se pudo restaurar la práctica {}: {}", id, e);
    }
    Err(err)
  }
}
