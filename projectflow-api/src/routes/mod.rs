/// API route handlers
///
/// One module per resource. Request and response bodies use the Portuguese
/// field names of the public API; the shared crate's types stay in English.
///
/// - `health`: Health check endpoint
/// - `users`: registration, login and accounts (`/usuarios`)
/// - `projects`: `/projetos`
/// - `cycles`: `/ciclos`
/// - `phases`: `/fases`
/// - `artifacts`: `/artefatos`
/// - `cards`: `/card`

pub mod health;
pub mod users;
pub mod projects;
pub mod cycles;
pub mod phases;
pub mod artifacts;
pub mod cards;
