//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod location;
pub mod mill;
pub mod trip;
pub mod truck;
pub mod user;
