mod contact;
mod errors;
mod log_entry;
mod practice_repository;
mod practice_type;
mod record;
mod status;
pub mod validators;

pub use contact::{CompanyInfo, ConfirmationDetails, SupervisorInfo};
pub use errors::DomainError;
pub use log_entry::{LogBook, LogEntry, TimeRange, MAX_ACTIVITY_CHARS};
pub use practice_repository::{InMemoryPracticeRepository, PracticeRepository};
pub use practice_type::{Category, PracticeMode, PracticeType};
pub use record::{EnrollmentData, EnrollmentDetails, InternshipRecord};
pub use status::PracticeStatus;
