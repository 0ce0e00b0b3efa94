/// Database models
///
/// One module per table. Each model is a typed row (`sqlx::FromRow`) with
/// associated functions that run exactly one parameterized statement against
/// any Postgres executor. Multi-statement rules live in [`crate::services`].
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `project`: Projects
/// - `project_member`: Project ↔ user links
/// - `cycle`: Versioned cycles of a project
/// - `phase`: Lifecycle phases
/// - `artifact`: Deliverables
/// - `phase_artifact`: Phase ↔ artifact links
/// - `card`: Kanban cards

pub mod artifact;
pub mod card;
pub mod cycle;
pub mod phase;
pub mod phase_artifact;
pub mod project;
pub mod project_member;
pub mod user;
