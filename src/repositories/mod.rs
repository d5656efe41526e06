//! Repositorios de persistencia
//!
//! Un repositorio por agregado, cada uno con su PgPool y queries en
//! runtime con sqlx.

pub mod location_repository;
pub mod mill_repository;
pub mod sub_trip_repository;
pub mod trip_repository;
pub mod truck_repository;
pub mod user_repository;
