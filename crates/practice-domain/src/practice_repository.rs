use crate::DomainError;
use crate::InternshipRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Operaciones de persistencia de prácticas.
pub trait PracticeRepository: Send + Sync {
    /// Guarda (inserta o reemplaza) una práctica y devuelve su `Uuid`.
    fn save_record(&self, record: InternshipRecord) -> Result<Uuid, DomainError>;

    /// Recupera una práctica por su `Uuid`.
    fn get_record(&self, id: &Uuid) -> Result<Option<InternshipRecord>, DomainError>;

    /// Lista todas las prácticas (útil para pruebas).
    fn list_records(&self) -> Result<Vec<InternshipRecord>, DomainError>;

    /// Elimina una práctica y la devuelve si existía.
    fn remove_record(&self, id: &Uuid) -> Result<Option<InternshipRecord>, DomainError>;
}

/// Implementación en memoria para tests y para la sesión local.
pub struct InMemoryPracticeRepository {
    records: Arc<Mutex<HashMap<Uuid, InternshipRecord>>>,
}

impl InMemoryPracticeRepository {
    pub fn new() -> Self {
        Self { records: Arc::new(Mutex::new(HashMap::new())) }
    }

    // Helper to map poisoned mutex errors into DomainError
    fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<std::sync::MutexGuard<'a, T>, DomainError> {
        m.lock()
         .map_err(|e| DomainError::Storage(format!("Mutex '{}' poisoned: {}", name, e)))
    }
}

impl PracticeRepository for InMemoryPracticeRepository {
    fn save_record(&self, record: InternshipRecord) -> Result<Uuid, DomainError> {
        let id = record.id();
        let mut records = self.lock_map(&self.records, "records")?;
        records.insert(id, record);
        Ok(id)
    }

    fn get_record(&self, id: &Uuid) -> Result<Option<InternshipRecord>, DomainError> {
        let records = self.lock_map(&self.records, "records")?;
        Ok(records.get(id).cloned())
    }

    fn list_records(&self) -> Result<Vec<InternshipRecord>, DomainError> {
        let records = self.lock_map(&self.records, "records")?;
        let mut all: Vec<InternshipRecord> = records.values().cloned().collect();
        all.sort_by_key(|r| r.created_at());
        Ok(all)
    }

    fn remove_record(&self, id: &Uuid) -> Result<Option<InternshipRecord>, DomainError> {
        let mut records = self.lock_map(&self.records, "records")?;
        Ok(records.remove(id))
    }
}

impl Default for InMemoryPracticeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, CompanyInfo, EnrollmentData, EnrollmentDetails, PracticeMode, PracticeType, SupervisorInfo};

    fn record() -> InternshipRecord {
        InternshipRecord::new(EnrollmentData { practice_type: PracticeType::Validate,
                                               category: Some(Category::SocialWork),
                                               mode: PracticeMode::Hours162,
                                               company: CompanyInfo::default(),
                                               supervisor: SupervisorInfo::default(),
                                               details: EnrollmentDetails::default() })
    }

    #[test]
    fn save_and_get_record() -> Result<(), DomainError> {
        let repo = InMemoryPracticeRepository::new();
        let rec = record();
        let id = repo.save_record(rec.clone())?;
        let loaded = repo.get_record(&id)?;
        assert_eq!(loaded, Some(rec));
        assert!(repo.get_record(&Uuid::new_v4())?.is_none());
        Ok(())
    }

    #[test]
    fn save_replaces_existing_record() -> Result<(), DomainError> {
        let repo = InMemoryPracticeRepository::new();
        let mut rec = record();
        repo.save_record(rec.clone())?;
        rec.submit()?;
        repo.save_record(rec.clone())?;
        let all = repo.list_records()?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status(), crate::PracticeStatus::EnEspera);
        Ok(())
    }

    #[test]
    fn remove_record_returns_previous_copy() -> Result<(), DomainError> {
        let repo = InMemoryPracticeRepository::new();
        let rec = record();
        let id = repo.save_record(rec.clone())?;
        assert_eq!(repo.remove_record(&id)?, Some(rec));
        assert!(repo.get_record(&id)?.is_none());
        assert_eq!(repo.remove_record(&id)?, None);
        Ok(())
    }
}
