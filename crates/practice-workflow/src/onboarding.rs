// onboarding.rs
//
// Marcas de los recorridos guiados. Son el único estado que sobrevive a una
// recarga, por eso viven en un almacén clave-valor externo.
use crate::errors::WorkflowError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SEEN: &str = "true";

/// Almacén clave-valor (equivalente a `localStorage`).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, WorkflowError>;
    fn set(&self, key: &str, value: &str) -> Result<(), WorkflowError>;
    fn remove(&self, key: &str) -> Result<(), WorkflowError>;
}

#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_map(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, WorkflowError> {
        self.inner
            .lock()
            .map_err(|e| WorkflowError::Config(format!("almacén clave-valor bloqueado: {}", e)))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, WorkflowError> {
        Ok(self.lock_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WorkflowError> {
        self.lock_map()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), WorkflowError> {
        self.lock_map()?.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tour {
    PracticeDetails,
    Enrollment,
}

impl Tour {
    pub const ALL: [Tour; 2] = [Tour::PracticeDetails, Tour::Enrollment];

    pub fn key(&self) -> &'static str {
        match self {
            Tour::PracticeDetails => "practiceDetailsTourSeen",
            Tour::Enrollment => "enrollmentTourSeen",
        }
    }
}

pub struct OnboardingTours<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S> OnboardingTours<S> where S: KeyValueStore + ?Sized
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// `true` sólo si la marca guardada es exactamente `"true"`.
    pub fn has_seen(&self, tour: Tour) -> Result<bool, WorkflowError> {
        Ok(self.store.get(tour.key())?.as_deref() == Some(SEEN))
    }

    pub fn should_show(&self, tour: Tour) -> Result<bool, WorkflowError> {
        Ok(!self.has_seen(tour)?)
    }

    pub fn dismiss(&self, tour: Tour) -> Result<(), WorkflowError> {
        log::debug!("recorrido {} descartado", tour.key());
        self.store.set(tour.key(), SEEN)
    }

    /// Borra la marca; el recorrido vuelve a mostrarse.
    pub fn reset(&self, tour: Tour) -> Result<(), WorkflowError> {
        self.store.remove(tour.key())
    }
}
