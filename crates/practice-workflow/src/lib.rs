//! practice-workflow: inscripción y ciclo de vida de prácticas
//!
//! Asistente de inscripción en cuatro pasos (`EnrollmentWizard`), máquina de
//! estados de la práctica (`PracticeTracker`) que anota cada cambio en el
//! journal, proyecciones para la vista y las marcas de los recorridos
//! guiados. Usa `practice_domain` para las entidades y `journal` para el
//! historial.

pub mod clock;
pub mod config;
pub mod enrollment;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod onboarding;
pub mod projection;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::WorkflowConfig;
pub use enrollment::{DraftField, EnrollmentWizard, WizardNav, WizardStep};
pub use errors::WorkflowError;
pub use events::PracticeEvent;
pub use lifecycle::PracticeTracker;
pub use projection::PracticeSummary;
