// [apps/worker/src/lib.rs]
/*!
 * APARATO: PIPELINE WORKER LIBRARY ROOT
 * RESPONSABILIDAD: Definición del árbol de módulos del binario `worker`.
 */

pub mod config;
pub mod worker;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::worker::JobDispatcher;
}
