// [apps/api/src/lib.rs]
/*!
 * APARATO: QUERY & COMMAND API LIBRARY ROOT
 * RESPONSABILIDAD: Definición del árbol de módulos del binario `api`.
 */

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::routes::build_router;
    pub use crate::state::AppState;
}
