use chrono::NaiveDate;
use journal::{InMemoryJournalRepository, JournalEntry, JournalError, JournalRepository, PersistResult, StreamMeta};
use practice_domain::{Category, ConfirmationDetails, DomainError, InMemoryPracticeRepository, InternshipRecord,
                      LogEntry, PracticeRepository, PracticeStatus, PracticeType, SupervisorInfo, TimeRange,
                      MAX_ACTIVITY_CHARS};
use practice_workflow::config::TextLimitPolicy;
use practice_workflow::projection;
use practice_workflow::{DraftField, EnrollmentWizard, FixedClock, PracticeEvent, PracticeTracker, WorkflowConfig,
                        WorkflowError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Repositorio de prácticas cuyo `save_record` falla mientras `fail_saves`
/// esté activo.
#[derive(Default)]
struct FlakyPractices {
  inner: InMemoryPracticeRepository,
  fail_saves: AtomicBool,
}

impl PracticeRepository for FlakyPractices {
  fn save_record(&self, record: InternshipRecord) -> Result<Uuid, DomainError> {
    if self.fail_saves.load(Ordering::SeqCst) {
      return Err(DomainError::Storage("disco lleno".into()));
    }
    self.inner.save_record(record)
  }

  fn get_record(&self, id: &Uuid) -> Result<Option<InternshipRecord>, DomainError> {
    self.inner.get_record(id)
  }

  fn list_records(&self) -> Result<Vec<InternshipRecord>, DomainError> {
    self.inner.list_records()
  }

  fn remove_record(&self, id: &Uuid) -> Result<Option<InternshipRecord>, DomainError> {
    self.inner.remove_record(id)
  }
}

/// Journal cuyo `persist_entry` falla mientras `fail_writes` esté activo.
#[derive(Default)]
struct FlakyJournal {
  inner: InMemoryJournalRepository,
  fail_writes: AtomicBool,
}

impl JournalRepository for FlakyJournal {
  fn create_stream(&self, stream_id: Uuid, name: Option<String>) -> Result<StreamMeta, JournalError> {
    self.inner.create_stream(stream_id, name)
  }

  fn get_stream_meta(&self, stream_id: &Uuid) -> Result<StreamMeta, JournalError> {
    self.inner.get_stream_meta(stream_id)
  }

  fn stream_exists(&self, stream_id: &Uuid) -> Result<bool, JournalError> {
    self.inner.stream_exists(stream_id)
  }

  fn persist_entry(&self, entry: &JournalEntry, expected_version: i64) -> Result<PersistResult, JournalError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(JournalError::Storage("journal no disponible".into()));
    }
    self.inner.persist_entry(entry, expected_version)
  }

  fn read_entries(&self, stream_id: &Uuid, from_cursor: i64) -> Result<Vec<JournalEntry>, JournalError> {
    self.inner.read_entries(stream_id, from_cursor)
  }

  fn count_entries(&self, stream_id: &Uuid) -> Result<i64, JournalError> {
    self.inner.count_entries(stream_id)
  }
}

fn flaky_tracker() -> (PracticeTracker, Arc<FlakyPractices>, Arc<FlakyJournal>) {
  let practices = Arc::new(FlakyPractices::default());
  let journal = Arc::new(FlakyJournal::default());
  let tracker = PracticeTracker::new(practices.clone(),
                                     journal.clone(),
                                     Arc::new(FixedClock::new(date(2025, 5, 2))),
                                     WorkflowConfig::default());
  (tracker, practices, journal)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).expect("fecha válida")
}

fn tracker_with(config: WorkflowConfig, today: NaiveDate) -> (PracticeTracker, Arc<FixedClock>) {
  let clock = Arc::new(FixedClock::new(today));
  let tracker = PracticeTracker::new(Arc::new(InMemoryPracticeRepository::new()),
                                     Arc::new(InMemoryJournalRepository::new()),
                                     clock.clone(),
                                     config);
  (tracker, clock)
}

fn filled_wizard(config: WorkflowConfig) -> EnrollmentWizard {
  let mut wizard = EnrollmentWizard::new(config);
  wizard.select_type(PracticeType::Start).expect("tipo");
  wizard.select_category(Category::Company).expect("categoría");
  wizard.acknowledge_requirements(true);
  wizard.next_step().expect("datos");
  wizard.update_draft_field(DraftField::CompanyName, "Acme SpA");
  wizard.update_draft_field(DraftField::CompanyTaxId, "12.345.678-5");
  wizard.update_draft_field(DraftField::SupervisorFirstName, "Ana");
  wizard.update_draft_field(DraftField::SupervisorEmail, "ana@acme.cl");
  wizard.update_draft_field(DraftField::SupervisorPhone, "+56912345678");
  wizard.update_draft_field(DraftField::StartDate, "2025-05-01");
  wizard
}

fn in_progress_tracker(config: WorkflowConfig) -> (PracticeTracker, Arc<FixedClock>) {
  let (mut tracker, clock) = tracker_with(config.clone(), date(2025, 5, 2));
  let mut wizard = filled_wizard(config);
  tracker.submit_enrollment(&mut wizard).expect("inscripción");
  tracker.confirm().expect("confirmación");
  (tracker, clock)
}

fn setup_entry() -> LogEntry {
  LogEntry::new(date(2025, 5, 23), TimeRange::parse("09:00", "18:30").expect("rango"), "Setup", "")
}

#[test]
fn tracker_without_record_reports_not_started() {
  let (mut tracker, _) = tracker_with(WorkflowConfig::default(), date(2025, 5, 2));
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::NoIniciada);
  assert_eq!(tracker.summary().expect("resumen").status_label, "No iniciada");

  let err = tracker.confirm().expect_err("sin práctica");
  assert!(matches!(err,
                   WorkflowError::InvalidTransition { from: PracticeStatus::NoIniciada, to: PracticeStatus::EnProceso }));
  assert!(err.is_logic_error());

  let err = tracker.add_log_entry(setup_entry()).expect_err("sin práctica");
  assert!(matches!(err, WorkflowError::InvalidState { status: PracticeStatus::NoIniciada, .. }));
  assert!(tracker.journal_entries().expect("journal").is_empty());
}

#[test]
fn confirmation_sets_start_date_from_clock() {
  let (mut tracker, clock) = tracker_with(WorkflowConfig::default(), date(2025, 5, 2));
  let mut wizard = filled_wizard(WorkflowConfig::default());
  tracker.submit_enrollment(&mut wizard).expect("inscripción");
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::EnEspera);

  clock.advance_days(3);
  let rec = tracker.confirm().expect("confirmación");
  assert_eq!(rec.status(), PracticeStatus::EnProceso);
  assert_eq!(rec.start_date(), Some(date(2025, 5, 5)));
  assert_eq!(rec.end_date(), None);
  rec.check_invariants().expect("invariantes");
}

#[test]
fn log_entry_in_progress_becomes_latest() {
  let (mut tracker, _) = in_progress_tracker(WorkflowConfig::default());

  tracker.add_log_entry(setup_entry()).expect("bitácora");
  assert_eq!(tracker.latest_log_entry().expect("consulta"), Some(setup_entry()));

  let record = tracker.record().expect("consulta");
  assert_eq!(projection::status_label(record.as_ref()), "En Proceso");
  assert_eq!(record.map(|r| r.logbook().len()), Some(1));
}

#[test]
fn completion_sets_end_date_and_closes_logbook() {
  let (mut tracker, clock) = in_progress_tracker(WorkflowConfig::default());
  tracker.add_log_entry(setup_entry()).expect("bitácora");

  clock.set(date(2025, 8, 29));
  let rec = tracker.complete().expect("terminar práctica");
  assert_eq!(rec.status(), PracticeStatus::Completada);
  assert_eq!(rec.end_date(), Some(date(2025, 8, 29)));

  let err = tracker.add_log_entry(setup_entry()).expect_err("práctica completada");
  assert!(matches!(err, WorkflowError::InvalidState { status: PracticeStatus::Completada, .. }));
  assert_eq!(tracker.record().expect("consulta").map(|r| r.logbook().len()), Some(1));
}

#[test]
fn status_never_moves_backwards() {
  let (mut tracker, _) = tracker_with(WorkflowConfig::default(), date(2025, 5, 2));
  let mut wizard = filled_wizard(WorkflowConfig::default());
  tracker.submit_enrollment(&mut wizard).expect("inscripción");

  let err = tracker.complete().expect_err("no se puede saltar en_proceso");
  assert!(matches!(err,
                   WorkflowError::InvalidTransition { from: PracticeStatus::EnEspera, to: PracticeStatus::Completada }));
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::EnEspera);

  tracker.confirm().expect("confirmación");
  assert!(matches!(tracker.confirm(), Err(WorkflowError::InvalidTransition { .. })));
  tracker.complete().expect("terminar");
  assert!(matches!(tracker.complete(), Err(WorkflowError::InvalidTransition { .. })));
  assert!(matches!(tracker.confirm(), Err(WorkflowError::InvalidTransition { .. })));
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::Completada);

  let mut another = filled_wizard(WorkflowConfig::default());
  assert!(matches!(tracker.submit_enrollment(&mut another), Err(WorkflowError::InvalidTransition { .. })));
}

#[test]
fn log_entry_while_waiting_leaves_store_intact() {
  let (mut tracker, _) = tracker_with(WorkflowConfig::default(), date(2025, 5, 2));
  let mut wizard = filled_wizard(WorkflowConfig::default());
  tracker.submit_enrollment(&mut wizard).expect("inscripción");
  let before = tracker.record().expect("consulta");

  let err = tracker.add_log_entry(setup_entry()).expect_err("en espera");
  assert!(matches!(err, WorkflowError::InvalidState { status: PracticeStatus::EnEspera, .. }));
  assert_eq!(tracker.record().expect("consulta"), before);
  assert_eq!(tracker.journal_entries().expect("journal").len(), 1);
}

#[test]
fn every_change_is_journaled_in_order() {
  let (mut tracker, _) = in_progress_tracker(WorkflowConfig::default());
  tracker.add_log_entry(setup_entry()).expect("bitácora");
  tracker.complete().expect("terminar");
  let _ = tracker.confirm();

  let entries = tracker.journal_entries().expect("journal");
  let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
  assert_eq!(keys, vec!["practice_enrolled", "practice_confirmed", "log_entry_added", "practice_completed"]);
  assert!(entries.windows(2).all(|w| w[0].cursor < w[1].cursor));

  let statuses: Vec<PracticeStatus> =
    entries.iter()
           .map(|e| serde_json::from_value::<PracticeEvent>(e.payload.clone()).expect("evento").resulting_status())
           .collect();
  assert_eq!(statuses,
             vec![PracticeStatus::EnEspera, PracticeStatus::EnProceso, PracticeStatus::EnProceso, PracticeStatus::Completada]);

  let lines = projection::activity_lines(&entries);
  assert_eq!(lines.len(), 4);
  assert_eq!(lines[1].message, "Sistema: La práctica fue confirmada por tu Supervisor (Estado: En proceso)");
}

#[test]
fn long_activity_is_truncated_by_default() {
  let (mut tracker, _) = in_progress_tracker(WorkflowConfig::default());
  let entry = LogEntry::new(date(2025, 5, 23), TimeRange::default(), "a".repeat(300), "b".repeat(10));

  tracker.add_log_entry(entry).expect("bitácora");
  let latest = tracker.latest_log_entry().expect("consulta").expect("hay bitácora");
  assert_eq!(latest.developed_activity.chars().count(), MAX_ACTIVITY_CHARS);
  assert_eq!(latest.pending_activity, "b".repeat(10));
}

#[test]
fn long_activity_is_rejected_when_configured() {
  let config = WorkflowConfig { log_text: TextLimitPolicy::Reject, ..WorkflowConfig::default() };
  let (mut tracker, _) = in_progress_tracker(config);
  let entry = LogEntry::new(date(2025, 5, 23), TimeRange::default(), "a".repeat(300), "");

  match tracker.add_log_entry(entry) {
    Err(WorkflowError::TextTooLong { max, len, .. }) => {
      assert_eq!(max, MAX_ACTIVITY_CHARS);
      assert_eq!(len, 300);
    }
    other => panic!("se esperaba TextTooLong, llegó {:?}", other.map(|r| r.status())),
  }
  assert_eq!(tracker.latest_log_entry().expect("consulta"), None);
  assert_eq!(tracker.journal_entries().expect("journal").len(), 2);
}

#[test]
fn confirmation_details_fill_company_and_supervisor() {
  let (mut tracker, _) = tracker_with(WorkflowConfig::default(), date(2025, 5, 2));
  let mut wizard = filled_wizard(WorkflowConfig::default());
  tracker.submit_enrollment(&mut wizard).expect("inscripción");

  let details = ConfirmationDetails { supervisor: SupervisorInfo { name: Some("Ana Rojas".into()),
                                                                   email: None,
                                                                   phone: Some("+56 9 8765 4321".into()) },
                                      ..ConfirmationDetails::default() };
  let rec = tracker.confirm_with(Some(details)).expect("confirmación");
  assert_eq!(rec.supervisor().name.as_deref(), Some("Ana Rojas"));
  assert_eq!(rec.supervisor().email.as_deref(), Some("ana@acme.cl"));
  assert_eq!(rec.supervisor().phone.as_deref(), Some("+56 9 8765 4321"));
  assert_eq!(rec.company().name.as_deref(), Some("Acme SpA"));
}

#[test]
fn enroll_accepts_records_built_elsewhere() -> Result<(), WorkflowError> {
  let (mut tracker, _) = tracker_with(WorkflowConfig::default(), date(2025, 5, 2));
  let mut wizard = filled_wizard(WorkflowConfig::default());
  let record: InternshipRecord = wizard.submit()?;
  let id = tracker.enroll(record)?;

  assert_eq!(tracker.record_id(), Some(id));
  assert_eq!(tracker.status()?, PracticeStatus::EnEspera);
  Ok(())
}

#[test]
fn failed_save_leaves_journal_untouched() {
  let (mut tracker, practices, _) = flaky_tracker();
  let mut wizard = filled_wizard(WorkflowConfig::default());
  tracker.submit_enrollment(&mut wizard).expect("inscripción");

  practices.fail_saves.store(true, Ordering::SeqCst);
  let err = tracker.confirm().expect_err("guardado fallido");
  assert!(matches!(err, WorkflowError::Domain(DomainError::Storage(_))));
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::EnEspera);
  let keys: Vec<String> = tracker.journal_entries().expect("journal").into_iter().map(|e| e.key).collect();
  assert_eq!(keys, vec!["practice_enrolled"]);

  practices.fail_saves.store(false, Ordering::SeqCst);
  tracker.confirm().expect("confirmación tras reintento");
  assert_eq!(tracker.journal_entries().expect("journal").len(), 2);
}

#[test]
fn rejected_journal_write_restores_previous_record() {
  let (mut tracker, _, journal) = flaky_tracker();
  let mut wizard = filled_wizard(WorkflowConfig::default());
  tracker.submit_enrollment(&mut wizard).expect("inscripción");

  journal.fail_writes.store(true, Ordering::SeqCst);
  let err = tracker.confirm().expect_err("journal caído");
  assert!(matches!(err, WorkflowError::Journal(JournalError::Storage(_))));
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::EnEspera);
  assert_eq!(tracker.record().expect("consulta").and_then(|r| r.start_date()), None);

  journal.fail_writes.store(false, Ordering::SeqCst);
  tracker.confirm().expect("confirmación");
  journal.fail_writes.store(true, Ordering::SeqCst);
  assert!(tracker.add_log_entry(setup_entry()).is_err());
  assert_eq!(tracker.latest_log_entry().expect("consulta"), None);
  assert_eq!(tracker.journal_entries().expect("journal").len(), 2);
}

#[test]
fn enrollment_rejected_by_journal_is_not_kept() {
  let (mut tracker, practices, journal) = flaky_tracker();
  journal.fail_writes.store(true, Ordering::SeqCst);
  let mut wizard = filled_wizard(WorkflowConfig::default());

  assert!(tracker.submit_enrollment(&mut wizard).is_err());
  assert_eq!(tracker.record_id(), None);
  assert_eq!(tracker.status().expect("estado"), PracticeStatus::NoIniciada);
  assert!(practices.list_records().expect("listado").is_empty());
}

#[test]
fn each_operation_uses_its_own_command_id() {
  let (mut tracker, _) = in_progress_tracker(WorkflowConfig::default());
  tracker.add_log_entry(setup_entry()).expect("bitácora");
  tracker.add_log_entry(setup_entry()).expect("misma bitácora otra vez");

  let entries = tracker.journal_entries().expect("journal");
  assert_eq!(entries.len(), 4);
  let ids: HashSet<Uuid> = entries.iter().filter_map(|e| e.command_id).collect();
  assert_eq!(ids.len(), entries.len());
}

#[test]
fn resumed_tracker_continues_the_lifecycle() -> Result<(), WorkflowError> {
  let practices: Arc<dyn PracticeRepository> = Arc::new(InMemoryPracticeRepository::new());
  let journal: Arc<dyn JournalRepository> = Arc::new(InMemoryJournalRepository::new());
  let clock = Arc::new(FixedClock::new(date(2025, 5, 2)));

  let mut first = PracticeTracker::new(practices.clone(), journal.clone(), clock.clone(), WorkflowConfig::default());
  let id = first.submit_enrollment(&mut filled_wizard(WorkflowConfig::default()))?;
  first.confirm()?;

  let mut resumed = PracticeTracker::resume(practices, journal, clock, WorkflowConfig::default(), id)?;
  assert_eq!(resumed.record_id(), Some(id));
  assert_eq!(resumed.status()?, PracticeStatus::EnProceso);
  assert!(matches!(resumed.confirm(), Err(WorkflowError::InvalidTransition { .. })));
  resumed.complete()?;
  assert_eq!(first.status()?, PracticeStatus::Completada);
  assert_eq!(resumed.journal_entries()?.len(), 3);
  Ok(())
}

#[test]
fn resume_requires_an_enrolled_practice() {
  let practices: Arc<dyn PracticeRepository> = Arc::new(InMemoryPracticeRepository::new());
  let journal: Arc<dyn JournalRepository> = Arc::new(InMemoryJournalRepository::new());
  let clock = Arc::new(FixedClock::new(date(2025, 5, 2)));

  let unknown = PracticeTracker::resume(practices.clone(),
                                        journal.clone(),
                                        clock.clone(),
                                        WorkflowConfig::default(),
                                        Uuid::new_v4());
  assert!(matches!(unknown, Err(WorkflowError::Domain(DomainError::NotFound(_)))));

  // Guardada pero sin inscripción en el journal.
  let record = filled_wizard(WorkflowConfig::default()).submit().expect("submit");
  let id = practices.save_record(record).expect("guardar");
  let orphan = PracticeTracker::resume(practices, journal, clock, WorkflowConfig::default(), id);
  assert!(matches!(orphan, Err(WorkflowError::Domain(DomainError::NotFound(_)))));
}
