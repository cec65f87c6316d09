// draft.rs
//
// Campos del paso "Datos". Los valores se guardan tal como los escribe el
// alumno y se interpretan recién al enviar el formulario.
use crate::config::{ValidationMode, WorkflowConfig};
use crate::errors::WorkflowError;
use chrono::NaiveDate;
use practice_domain::validators::{is_blank, normalize_rut, truncate_chars, validate_email, validate_phone};
use practice_domain::{Category, CompanyInfo, EnrollmentData, EnrollmentDetails, PracticeMode, PracticeType,
                      SupervisorInfo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
  CompanyName,
  CompanyAddress,
  CompanyTaxId,
  SupervisorFirstName,
  SupervisorLastName,
  SupervisorEmail,
  SupervisorPhone,
  PracticeMode,
  Career,
  Campus,
  StartDate,
  EndDate,
  TaskSummary,
  SpecialConsideration,
}

impl DraftField {
  pub const ALL: [DraftField; 14] = [DraftField::CompanyName,
                                     DraftField::CompanyAddress,
                                     DraftField::CompanyTaxId,
                                     DraftField::SupervisorFirstName,
                                     DraftField::SupervisorLastName,
                                     DraftField::SupervisorEmail,
                                     DraftField::SupervisorPhone,
                                     DraftField::PracticeMode,
                                     DraftField::Career,
                                     DraftField::Campus,
                                     DraftField::StartDate,
                                     DraftField::EndDate,
                                     DraftField::TaskSummary,
                                     DraftField::SpecialConsideration];

  /// Campos que deben venir con contenido en modo estricto.
  pub const REQUIRED: [DraftField; 6] = [DraftField::CompanyName,
                                         DraftField::CompanyTaxId,
                                         DraftField::SupervisorFirstName,
                                         DraftField::SupervisorEmail,
                                         DraftField::SupervisorPhone,
                                         DraftField::StartDate];

  pub fn key(&self) -> &'static str {
    match self {
      DraftField::CompanyName => "company_name",
      DraftField::CompanyAddress => "company_address",
      DraftField::CompanyTaxId => "company_tax_id",
      DraftField::SupervisorFirstName => "supervisor_first_name",
      DraftField::SupervisorLastName => "supervisor_last_name",
      DraftField::SupervisorEmail => "supervisor_email",
      DraftField::SupervisorPhone => "supervisor_phone",
      DraftField::PracticeMode => "practice_mode",
      DraftField::Career => "career",
      DraftField::Campus => "campus",
      DraftField::StartDate => "start_date",
      DraftField::EndDate => "end_date",
      DraftField::TaskSummary => "task_summary",
      DraftField::SpecialConsideration => "special_consideration",
    }
  }

  /// `maxLength` de los inputs del formulario.
  pub fn max_chars(&self) -> Option<usize> {
    match self {
      DraftField::SupervisorFirstName | DraftField::SupervisorLastName => Some(25),
      DraftField::SupervisorEmail => Some(50),
      _ => None,
    }
  }
}

impl fmt::Display for DraftField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.key())
  }
}

impl FromStr for DraftField {
  type Err = WorkflowError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let needle = s.trim().to_lowercase();
    DraftField::ALL.iter()
                   .copied()
                   .find(|f| f.key() == needle)
                   .ok_or_else(|| WorkflowError::InvalidFormat { field: s.to_string(),
                                                                 reason: "campo desconocido".into() })
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
  pub company_name: Option<String>,
  pub company_address: Option<String>,
  pub company_tax_id: Option<String>,
  pub supervisor_first_name: Option<String>,
  pub supervisor_last_name: Option<String>,
  pub supervisor_email: Option<String>,
  pub supervisor_phone: Option<String>,
  pub practice_mode: Option<String>,
  pub career: Option<String>,
  pub campus: Option<String>,
  pub start_date: Option<String>,
  pub end_date: Option<String>,
  pub task_summary: Option<String>,
  pub special_consideration: Option<String>,
}

impl DraftRecord {
  fn slot(&mut self, field: DraftField) -> &mut Option<String> {
    match field {
      DraftField::CompanyName => &mut self.company_name,
      DraftField::CompanyAddress => &mut self.company_address,
      DraftField::CompanyTaxId => &mut self.company_tax_id,
      DraftField::SupervisorFirstName => &mut self.supervisor_first_name,
      DraftField::SupervisorLastName => &mut self.supervisor_last_name,
      DraftField::SupervisorEmail => &mut self.supervisor_email,
      DraftField::SupervisorPhone => &mut self.supervisor_phone,
      DraftField::PracticeMode => &mut self.practice_mode,
      DraftField::Career => &mut self.career,
      DraftField::Campus => &mut self.campus,
      DraftField::StartDate => &mut self.start_date,
      DraftField::EndDate => &mut self.end_date,
      DraftField::TaskSummary => &mut self.task_summary,
      DraftField::SpecialConsideration => &mut self.special_consideration,
    }
  }

  pub fn get(&self, field: DraftField) -> Option<&str> {
    let value = match field {
      DraftField::CompanyName => &self.company_name,
      DraftField::CompanyAddress => &self.company_address,
      DraftField::CompanyTaxId => &self.company_tax_id,
      DraftField::SupervisorFirstName => &self.supervisor_first_name,
      DraftField::SupervisorLastName => &self.supervisor_last_name,
      DraftField::SupervisorEmail => &self.supervisor_email,
      DraftField::SupervisorPhone => &self.supervisor_phone,
      DraftField::PracticeMode => &self.practice_mode,
      DraftField::Career => &self.career,
      DraftField::Campus => &self.campus,
      DraftField::StartDate => &self.start_date,
      DraftField::EndDate => &self.end_date,
      DraftField::TaskSummary => &self.task_summary,
      DraftField::SpecialConsideration => &self.special_consideration,
    };
    value.as_deref()
  }

  /// Guarda el valor sin validar; sólo se recorta al `maxLength` del input.
  pub fn set(&mut self, field: DraftField, value: &str) {
    let value = match field.max_chars() {
      Some(max) => truncate_chars(value, max),
      None => value.to_string(),
    };
    *self.slot(field) = Some(value);
  }

  /// Campos obligatorios sin contenido, en el orden del formulario.
  pub fn missing_required(&self) -> Vec<DraftField> {
    DraftField::REQUIRED.iter().copied().filter(|f| is_blank(self.get(*f))).collect()
  }

  /// Construye los datos de inscripción según el modo de validación.
  pub fn to_enrollment_data(&self,
                            practice_type: PracticeType,
                            category: Category,
                            config: &WorkflowConfig)
                            -> Result<EnrollmentData, WorkflowError> {
    let strict = config.validation == ValidationMode::Strict;
    if strict {
      let missing = self.missing_required();
      if !missing.is_empty() {
        return Err(WorkflowError::IncompleteForm { missing: missing.iter().map(|f| f.key().to_string()).collect() });
      }
    }

    let tax_id = match self.get(DraftField::CompanyTaxId).filter(|v| !v.trim().is_empty()) {
      Some(raw) if strict => Some(normalize_rut(raw)?),
      other => other.map(str::to_string),
    };
    if strict {
      if let Some(email) = self.get(DraftField::SupervisorEmail) {
        validate_email(email)?;
      }
      if let Some(phone) = self.get(DraftField::SupervisorPhone) {
        validate_phone(phone)?;
      }
    }

    let start = self.parse_date(DraftField::StartDate, strict)?;
    let end = self.parse_date(DraftField::EndDate, strict)?;
    if let (true, Some(s), Some(e)) = (strict, start, end) {
      if e < s {
        return Err(WorkflowError::InvalidFormat { field: DraftField::EndDate.key().into(),
                                                  reason: "la fecha de término es anterior a la de inicio".into() });
      }
    }

    let mode = match self.get(DraftField::PracticeMode).filter(|v| !v.trim().is_empty()) {
      None => config.default_mode,
      Some(raw) => match raw.parse::<PracticeMode>() {
        Ok(mode) => mode,
        Err(e) if strict => return Err(e.into()),
        Err(_) => {
          log::warn!("modo de práctica '{}' no reconocido; se usa {}", raw, config.default_mode.hours());
          config.default_mode
        }
      },
    };

    Ok(EnrollmentData { practice_type,
                        category: Some(category),
                        mode,
                        company: CompanyInfo { name: self.text(DraftField::CompanyName),
                                               address: self.text(DraftField::CompanyAddress),
                                               tax_id },
                        supervisor: SupervisorInfo { name: self.supervisor_name(),
                                                     email: self.text(DraftField::SupervisorEmail),
                                                     phone: self.text(DraftField::SupervisorPhone) },
                        details: EnrollmentDetails { career: self.text(DraftField::Career),
                                                     campus: self.text(DraftField::Campus),
                                                     requested_start_date: start,
                                                     declared_end_date: end,
                                                     task_summary: self.text(DraftField::TaskSummary),
                                                     special_consideration:
                                                       self.text(DraftField::SpecialConsideration) } })
  }

  fn text(&self, field: DraftField) -> Option<String> {
    self.get(field).map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
  }

  fn supervisor_name(&self) -> Option<String> {
    let parts: Vec<String> = [DraftField::SupervisorFirstName, DraftField::SupervisorLastName].iter()
                                                                                              .filter_map(|f| self.text(*f))
                                                                                              .collect();
    if parts.is_empty() {
      None
    } else {
      Some(parts.join(" "))
    }
  }

  /// En modo permisivo una fecha ilegible se descarta en vez de fallar.
  fn parse_date(&self, field: DraftField, strict: bool) -> Result<Option<NaiveDate>, WorkflowError> {
    let Some(raw) = self.text(field) else {
      return Ok(None);
    };
    match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
      Ok(d) => Ok(Some(d)),
      Err(e) if strict => Err(WorkflowError::InvalidFormat { field: field.key().into(),
                                                             reason: format!("'{}': {}", raw, e) }),
      Err(_) => {
        log::warn!("fecha '{}' en {} ignorada", raw, field);
        Ok(None)
      }
    }
  }
}
