// log_entry.rs
//
// Bitácoras diarias. `LogBook` es un historial de sólo-anexar; `latest()`
// entrega la última bitácora ingresada.
use crate::validators::{char_len, truncate_chars};
use crate::DomainError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Largo máximo (en caracteres) de las actividades de una bitácora.
pub const MAX_ACTIVITY_CHARS: usize = 250;

const TIME_FORMAT: &str = "%H:%M";

/// Rango horario "desde las / hasta las" de una jornada. Sólo se construye
/// con `to >= from`, también al deserializar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeRangeFields", into = "TimeRangeFields")]
pub struct TimeRange {
  from: NaiveTime,
  to: NaiveTime,
}

#[derive(Serialize, Deserialize)]
struct TimeRangeFields {
  from: NaiveTime,
  to: NaiveTime,
}

impl TryFrom<TimeRangeFields> for TimeRange {
  type Error = DomainError;

  fn try_from(raw: TimeRangeFields) -> Result<Self, Self::Error> {
    TimeRange::new(raw.from, raw.to)
  }
}

impl From<TimeRange> for TimeRangeFields {
  fn from(range: TimeRange) -> Self {
    TimeRangeFields { from: range.from, to: range.to }
  }
}

impl TimeRange {
  pub fn new(from: NaiveTime, to: NaiveTime) -> Result<Self, DomainError> {
    if to < from {
      return Err(DomainError::InvalidFormat { field: "time_range".into(),
                                              reason: format!("{} es anterior a {}",
                                                              to.format(TIME_FORMAT),
                                                              from.format(TIME_FORMAT)) });
    }
    Ok(Self { from, to })
  }

  /// Parsea horas en formato `HH:MM`.
  pub fn parse(from: &str, to: &str) -> Result<Self, DomainError> {
    Self::new(parse_time("from", from)?, parse_time("to", to)?)
  }

  pub fn start(&self) -> NaiveTime {
    self.from
  }

  pub fn end(&self) -> NaiveTime {
    self.to
  }

  pub fn minutes(&self) -> i64 {
    (self.to - self.from).num_minutes()
  }

  /// `"09:00 a 18:30"`, como se muestra en el portal.
  pub fn display(&self) -> String {
    format!("{} a {}", self.from.format(TIME_FORMAT), self.to.format(TIME_FORMAT))
  }
}

impl Default for TimeRange {
  /// Jornada por defecto del formulario: 08:00 a 17:00.
  fn default() -> Self {
    Self { from: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
           to: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN) }
  }
}

fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, DomainError> {
  NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|e| DomainError::InvalidFormat { field: field.to_string(),
                                                                                              reason: format!("'{}': {}", raw, e) })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
  pub date: NaiveDate,
  pub time_range: TimeRange,
  pub developed_activity: String,
  pub pending_activity: String,
}

impl LogEntry {
  pub fn new(date: NaiveDate,
             time_range: TimeRange,
             developed_activity: impl Into<String>,
             pending_activity: impl Into<String>)
             -> Self {
    Self { date,
           time_range,
           developed_activity: developed_activity.into(),
           pending_activity: pending_activity.into() }
  }

  /// Recorta ambas actividades a `MAX_ACTIVITY_CHARS`.
  pub fn truncated(mut self) -> Self {
    self.developed_activity = truncate_chars(&self.developed_activity, MAX_ACTIVITY_CHARS);
    self.pending_activity = truncate_chars(&self.pending_activity, MAX_ACTIVITY_CHARS);
    self
  }

  /// Falla con `TextTooLong` si alguna actividad supera el máximo.
  pub fn check_lengths(&self) -> Result<(), DomainError> {
    for (field, text) in [("developed_activity", &self.developed_activity),
                          ("pending_activity", &self.pending_activity)]
    {
      let len = char_len(text);
      if len > MAX_ACTIVITY_CHARS {
        return Err(DomainError::TextTooLong { field: field.into(), max: MAX_ACTIVITY_CHARS, len });
      }
    }
    Ok(())
  }
}

/// Historial de bitácoras de una práctica.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBook {
  entries: Vec<LogEntry>,
}

impl LogBook {
  pub fn latest(&self) -> Option<&LogEntry> {
    self.entries.last()
  }

  pub fn entries(&self) -> &[LogEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn total_minutes(&self) -> i64 {
    self.entries.iter().map(|e| e.time_range.minutes()).sum()
  }

  pub(crate) fn push(&mut self, entry: LogEntry) {
    self.entries.push(entry);
  }

  pub(crate) fn clear(&mut self) {
    self.entries.clear();
  }
}
