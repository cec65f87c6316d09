use chrono::{Duration, Local, NaiveDate};
use std::sync::Mutex;

/// Fuente de la fecha actual para las transiciones que fijan fechas.
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// Fecha local del sistema.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    Local::now().date_naive()
  }
}

/// Reloj controlable para pruebas y demos.
#[derive(Debug)]
pub struct FixedClock {
  date: Mutex<NaiveDate>,
}

impl FixedClock {
  pub fn new(date: NaiveDate) -> Self {
    Self { date: Mutex::new(date) }
  }

  pub fn set(&self, date: NaiveDate) {
    *self.date.lock().unwrap_or_else(|e| e.into_inner()) = date;
  }

  pub fn advance_days(&self, days: i64) {
    let mut d = self.date.lock().unwrap_or_else(|e| e.into_inner());
    *d += Duration::days(days);
  }
}

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate {
    *self.date.lock().unwrap_or_else(|e| e.into_inner())
  }
}
