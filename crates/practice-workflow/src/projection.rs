// projection.rs
//
// Funciones puras que traducen una práctica a los textos que muestra el
// portal. No modifican nada.
use crate::config::ProgressMode;
use crate::events::PracticeEvent;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use journal::JournalEntry;
use practice_domain::{Category, CompanyInfo, InternshipRecord, LogEntry, PracticeMode, PracticeStatus, SupervisorInfo};
use serde::Serialize;

/// Horas que el portal mostraba para una práctica en proceso.
pub const PLACEHOLDER_IN_PROGRESS_HOURS: u32 = 226;

const WEEKDAYS: [&str; 7] = ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"];
const MONTHS: [&str; 12] = ["enero",
                            "febrero",
                            "marzo",
                            "abril",
                            "mayo",
                            "junio",
                            "julio",
                            "agosto",
                            "septiembre",
                            "octubre",
                            "noviembre",
                            "diciembre"];

pub fn label_for_status(status: PracticeStatus) -> &'static str {
  match status {
    PracticeStatus::NoIniciada => "No iniciada",
    PracticeStatus::EnEspera => "En Espera",
    PracticeStatus::EnProceso => "En Proceso",
    PracticeStatus::Completada => "Completada",
  }
}

/// Etiqueta de la tarjeta "Práctica Industrial". Sin práctica: "No iniciada".
pub fn status_label(record: Option<&InternshipRecord>) -> &'static str {
  label_for_status(record.map(|r| r.status()).unwrap_or_default())
}

/// Estado dentro de la vista de detalle.
pub fn detail_status_label(status: PracticeStatus) -> &'static str {
  if status == PracticeStatus::Completada {
    "Aprobado"
  } else {
    "En Proceso"
  }
}

/// Horas de avance a mostrar.
pub fn progress_hours(record: &InternshipRecord, mode: ProgressMode) -> u32 {
  let total = record.total_hours();
  match mode {
    ProgressMode::Logged => {
      let hours = record.logbook().total_minutes().max(0) / 60;
      u32::try_from(hours).unwrap_or(u32::MAX).min(total)
    }
    ProgressMode::Placeholder => match record.status() {
      PracticeStatus::NoIniciada | PracticeStatus::EnEspera => 0,
      PracticeStatus::EnProceso => PLACEHOLDER_IN_PROGRESS_HOURS.min(total),
      PracticeStatus::Completada => total,
    },
  }
}

/// "trabajo_social" -> "Trabajo Social".
pub fn category_label(category: Category) -> String {
  title_case(&category.as_str().replace('_', " "))
}

pub fn mode_label(mode: PracticeMode) -> String {
  format!("{} horas", mode.hours())
}

/// Mensaje del recuadro "Información".
pub fn info_message(status: PracticeStatus) -> &'static str {
  match status {
    PracticeStatus::NoIniciada => "AÚN NO HAS INSCRITO TU PRÁCTICA.",
    PracticeStatus::EnEspera => "TU PRÁCTICA ESTÁ ESPERANDO LA CONFIRMACIÓN DE TU SUPERVISOR.",
    PracticeStatus::EnProceso => "TU PRÁCTICA ESTÁ EN PROCESO. INGRESA TU BITÁCORA DIARIA.",
    PracticeStatus::Completada => "TU PRÁCTICA HA SIDO APROBADA EXITOSAMENTE.",
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailTab {
  Informacion,
  Bitacoras,
  Informe,
  Evaluacion,
  Logs,
  Solicitudes,
}

impl DetailTab {
  pub fn label(&self) -> &'static str {
    match self {
      DetailTab::Informacion => "INFORMACIÓN",
      DetailTab::Bitacoras => "BITÁCORAS",
      DetailTab::Informe => "INFORME",
      DetailTab::Evaluacion => "EVALUACIÓN",
      DetailTab::Logs => "LOGS",
      DetailTab::Solicitudes => "SOLICITUDES",
    }
  }
}

/// Pestañas visibles; informe y evaluación sólo con la práctica completada.
pub fn available_tabs(status: PracticeStatus) -> Vec<DetailTab> {
  let mut tabs = vec![DetailTab::Informacion, DetailTab::Bitacoras];
  if status == PracticeStatus::Completada {
    tabs.push(DetailTab::Informe);
    tabs.push(DetailTab::Evaluacion);
  }
  tabs.push(DetailTab::Logs);
  tabs.push(DetailTab::Solicitudes);
  tabs
}

/// "viernes, 23 de mayo de 2025".
pub fn format_display_date(date: NaiveDate) -> String {
  format!("{}, {} de {} de {}",
          WEEKDAYS[date.weekday().num_days_from_monday() as usize],
          date.day(),
          MONTHS[date.month0() as usize],
          date.year())
}

/// Línea de la pestaña LOGS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLine {
  pub message: String,
  /// "domingo, 28 de mayo de 2025 - 17:48", en hora local.
  pub timestamp: String,
}

/// Traduce los eventos del journal a los mensajes del sistema. Las entradas
/// que no son eventos de práctica se omiten.
pub fn activity_lines(entries: &[JournalEntry]) -> Vec<ActivityLine> {
  entries.iter()
         .filter_map(|e| {
           let event: PracticeEvent = serde_json::from_value(e.payload.clone()).ok()?;
           Some(ActivityLine { message: activity_message(&event),
                               timestamp: format_timestamp(e.created_at) })
         })
         .collect()
}

fn activity_message(event: &PracticeEvent) -> String {
  match event {
    PracticeEvent::Enrolled { .. } => {
      "Sistema: La práctica fue ingresada correctamente (Estado: Esperando confirmación del supervisor)".to_string()
    }
    PracticeEvent::Confirmed { .. } => {
      "Sistema: La práctica fue confirmada por tu Supervisor (Estado: En proceso)".to_string()
    }
    PracticeEvent::LogEntryAdded { entry } => {
      format!("Sistema: Bitácora registrada para el {} ({})",
              format_display_date(entry.date),
              entry.time_range.display())
    }
    PracticeEvent::Completed { .. } => "Sistema: La práctica fue finalizada (Estado: Completada)".to_string(),
  }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
  let local = at.with_timezone(&Local);
  format!("{} - {}", format_display_date(local.date_naive()), local.format("%H:%M"))
}

fn title_case(s: &str) -> String {
  s.split_whitespace()
   .map(|w| {
     let mut chars = w.chars();
     match chars.next() {
       Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
       None => String::new(),
     }
   })
   .collect::<Vec<_>>()
   .join(" ")
}

/// Todo lo que muestra la vista de detalle, listo para serializar.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeSummary {
  pub status: PracticeStatus,
  pub status_label: &'static str,
  pub detail_status_label: &'static str,
  pub category_label: Option<String>,
  pub mode_label: Option<String>,
  pub progress_hours: u32,
  pub total_hours: Option<u32>,
  pub start_date: Option<String>,
  pub end_date: Option<String>,
  pub company: Option<CompanyInfo>,
  pub supervisor: Option<SupervisorInfo>,
  pub info_message: &'static str,
  pub tabs: Vec<DetailTab>,
  pub latest_log_entry: Option<LogEntry>,
  pub log_entry_count: usize,
}

pub fn summarize(record: Option<&InternshipRecord>, mode: ProgressMode) -> PracticeSummary {
  let status = record.map(|r| r.status()).unwrap_or_default();
  PracticeSummary { status,
                    status_label: label_for_status(status),
                    detail_status_label: detail_status_label(status),
                    category_label: record.and_then(|r| r.category()).map(category_label),
                    mode_label: record.map(|r| mode_label(r.mode())),
                    progress_hours: record.map(|r| progress_hours(r, mode)).unwrap_or(0),
                    total_hours: record.map(|r| r.total_hours()),
                    start_date: record.and_then(|r| r.start_date()).map(format_display_date),
                    end_date: record.and_then(|r| r.end_date()).map(format_display_date),
                    company: record.map(|r| r.company().clone()),
                    supervisor: record.map(|r| r.supervisor().clone()),
                    info_message: info_message(status),
                    tabs: available_tabs(status),
                    latest_log_entry: record.and_then(|r| r.logbook().latest().cloned()),
                    log_entry_count: record.map(|r| r.logbook().len()).unwrap_or(0) }
}
