// [libs/infra/ai-clients/src/lib.rs]
/*!
 * APARATO: AI CLIENTS
 * RESPONSABILIDAD: Clasificación por LLM remoto y transcripción de voz.
 */

pub mod classifier;
pub mod transcriber;

pub use classifier::{NoopClassifier, OpenRouterClassifier};
pub use transcriber::{GroqTranscriber, NoopTranscriber};
