//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the access decision and its collaborators so route
//! handlers can stay focused on extraction, cookies, and rendering.

pub mod access;
pub mod session;
pub mod subscription;
