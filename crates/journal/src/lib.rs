//! Crate `journal`: historial de eventos de sólo-anexar por práctica
//!
//! Define los tipos persistidos (`JournalEntry`, `StreamMeta`), el contrato
//! `JournalRepository`, una implementación en memoria
//! (`InMemoryJournalRepository`) y el motor `JournalEngine` con helpers para
//! anexar y leer eventos.
//!
//! Diseño resumido:
//! - Un stream por práctica; cada registro lleva un `cursor` monótono.
//! - Idempotencia: `command_id` evita duplicar reintentos.
//! - Locking optimista: `expected_version` detecta escrituras concurrentes
//!   (`PersistResult::Conflict`).
//!
//! Ejemplo rápido:
//! ```rust
//! use journal::{InMemoryJournalRepository, JournalEngine};
//! use std::sync::Arc;
//! let engine = JournalEngine::new(Arc::new(InMemoryJournalRepository::new()));
//! let id = uuid::Uuid::new_v4();
//! engine.open_stream(id, Some("práctica industrial".into())).unwrap();
//! engine.append(id, "practice_enrolled", serde_json::json!({}), None, None).unwrap();
//! assert_eq!(engine.count(&id).unwrap(), 1);
//! ```
pub mod domain;
pub mod engine;
pub mod errors;
pub mod repository;
pub mod stubs;

pub use domain::*;
pub use engine::*;
pub use errors::*;
pub use repository::*;
pub use stubs::*;
