pub mod draft;
pub mod step;
pub mod wizard;

pub use draft::{DraftField, DraftRecord};
pub use step::WizardStep;
pub use wizard::{EnrollmentWizard, WizardNav, WizardSnapshot};
