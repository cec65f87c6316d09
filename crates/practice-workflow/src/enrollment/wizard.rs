// wizard.rs
//
// Asistente lineal de inscripción: Tipo -> Categoría -> Requisitos -> Datos.
// El estado vive sólo mientras dura el asistente; `submit` lo convierte en
// una práctica `en_espera` y lo reinicia.
use crate::config::WorkflowConfig;
use crate::enrollment::draft::{DraftField, DraftRecord};
use crate::enrollment::step::WizardStep;
use crate::errors::WorkflowError;
use practice_domain::{Category, InternshipRecord, PracticeType};
use serde::Serialize;

/// Resultado de retroceder un paso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardNav {
  /// El asistente quedó en este paso.
  Moved(WizardStep),
  /// Se retrocedió desde el primer paso: volver a "Mis Prácticas".
  ExitToOverview,
}

/// Vista serializable del asistente para la capa de presentación.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
  pub step: WizardStep,
  pub step_number: u8,
  pub step_names: Vec<&'static str>,
  pub completed_steps: Vec<WizardStep>,
  pub practice_type: Option<PracticeType>,
  pub category: Option<Category>,
  pub allowed_categories: Vec<Category>,
  pub requirements_acknowledged: bool,
  pub draft: DraftRecord,
}

#[derive(Debug, Clone)]
pub struct EnrollmentWizard {
  step: WizardStep,
  practice_type: Option<PracticeType>,
  category: Option<Category>,
  requirements_acknowledged: bool,
  draft: DraftRecord,
  config: WorkflowConfig,
}

impl EnrollmentWizard {
  pub fn new(config: WorkflowConfig) -> Self {
    Self { step: WizardStep::Type,
           practice_type: None,
           category: None,
           requirements_acknowledged: false,
           draft: DraftRecord::default(),
           config }
  }

  pub fn step(&self) -> WizardStep {
    self.step
  }

  pub fn practice_type(&self) -> Option<PracticeType> {
    self.practice_type
  }

  pub fn category(&self) -> Option<Category> {
    self.category
  }

  pub fn requirements_acknowledged(&self) -> bool {
    self.requirements_acknowledged
  }

  pub fn draft(&self) -> &DraftRecord {
    &self.draft
  }

  /// Paso 1: elige el tipo y avanza a "Categoría". Cambiar el tipo descarta
  /// una categoría elegida antes.
  pub fn select_type(&mut self, practice_type: PracticeType) -> Result<WizardStep, WorkflowError> {
    self.expect_step(WizardStep::Type, "select_type")?;
    if self.practice_type != Some(practice_type) {
      self.category = None;
    }
    self.practice_type = Some(practice_type);
    self.step = WizardStep::Category;
    log::debug!("inscripción: tipo {} elegido", practice_type);
    Ok(self.step)
  }

  /// Paso 2: elige la categoría y avanza a "Requisitos". Una categoría fuera
  /// del conjunto del tipo elegido deja el paso sin cambios.
  pub fn select_category(&mut self, category: Category) -> Result<WizardStep, WorkflowError> {
    self.expect_step(WizardStep::Category, "select_category")?;
    let practice_type = self.practice_type.ok_or_else(|| self.blocked("falta el tipo de práctica"))?;
    if !practice_type.allows(category) {
      log::warn!("inscripción: categoría {} rechazada para {}", category, practice_type);
      return Err(WorkflowError::InvalidCategory { practice_type, category });
    }
    self.category = Some(category);
    self.step = WizardStep::Requirements;
    log::debug!("inscripción: categoría {} elegida", category);
    Ok(self.step)
  }

  pub fn acknowledge_requirements(&mut self, acknowledged: bool) {
    self.requirements_acknowledged = acknowledged;
  }

  /// Avanza un paso si la condición del paso actual se cumple. En el último
  /// paso no aplica: se usa `submit`.
  pub fn next_step(&mut self) -> Result<WizardStep, WorkflowError> {
    match self.step {
      WizardStep::Type if self.practice_type.is_none() => return Err(self.blocked("elige un tipo de práctica")),
      WizardStep::Category if self.category.is_none() => return Err(self.blocked("elige una categoría")),
      WizardStep::Requirements if !self.requirements_acknowledged => {
        return Err(self.blocked("debes aceptar los requisitos"))
      }
      _ => {}
    }
    let next = self.step
                   .next()
                   .ok_or(WorkflowError::NotApplicable { operation: "next_step", step: self.step.number() })?;
    self.step = next;
    Ok(next)
  }

  /// Retrocede un paso. Desde el primero indica salir a la vista general.
  pub fn previous_step(&mut self) -> WizardNav {
    match self.step.previous() {
      Some(prev) => {
        self.step = prev;
        WizardNav::Moved(prev)
      }
      None => WizardNav::ExitToOverview,
    }
  }

  /// Actualiza un campo del paso "Datos" sin validarlo.
  pub fn update_draft_field(&mut self, field: DraftField, value: &str) {
    self.draft.set(field, value);
  }

  /// Envía la inscripción. Devuelve la práctica en estado `en_espera` y
  /// reinicia el asistente. Si falla, el asistente queda como estaba.
  pub fn submit(&mut self) -> Result<InternshipRecord, WorkflowError> {
    self.expect_step(WizardStep::Data, "submit")?;
    let practice_type = self.practice_type.ok_or_else(|| self.blocked("falta el tipo de práctica"))?;
    let category = self.category.ok_or_else(|| self.blocked("falta la categoría"))?;

    let data = self.draft.to_enrollment_data(practice_type, category, &self.config)?;
    let mut record = InternshipRecord::new(data);
    record.submit()?;

    log::info!("inscripción enviada: práctica {} ({}, {})", record.id(), practice_type, category);
    self.reset();
    Ok(record)
  }

  /// Descarta todo lo ingresado.
  pub fn cancel(&mut self) {
    log::debug!("inscripción cancelada en el paso {}", self.step);
    self.reset();
  }

  pub fn snapshot(&self) -> WizardSnapshot {
    WizardSnapshot { step: self.step,
                     step_number: self.step.number(),
                     step_names: WizardStep::ALL.iter().map(|s| s.name()).collect(),
                     completed_steps: WizardStep::ALL.iter().copied().filter(|s| *s < self.step).collect(),
                     practice_type: self.practice_type,
                     category: self.category,
                     allowed_categories: self.practice_type
                                             .map(|t| t.allowed_categories().to_vec())
                                             .unwrap_or_default(),
                     requirements_acknowledged: self.requirements_acknowledged,
                     draft: self.draft.clone() }
  }

  fn reset(&mut self) {
    let config = self.config.clone();
    *self = EnrollmentWizard::new(config);
  }

  fn expect_step(&self, expected: WizardStep, operation: &'static str) -> Result<(), WorkflowError> {
    if self.step == expected {
      Ok(())
    } else {
      Err(WorkflowError::NotApplicable { operation, step: self.step.number() })
    }
  }

  fn blocked(&self, reason: &str) -> WorkflowError {
    WorkflowError::StepBlocked { step: self.step.number(), reason: reason.to_string() }
  }
}

impl Default for EnrollmentWizard {
  fn default() -> Self {
    Self::new(WorkflowConfig::default())
  }
}
