// [apps/worker/src/main.rs]
//! Entry point for the pipeline worker.

use attention_worker::prelude::*;
use attention_domain_clustering::ClusteringEngine;
use attention_domain_pipeline::{
    AudioTranscriber, Classifier, ClusterAssigner, EventRepository as EventRepositoryCapability, FanOutPublisher,
    KeyframeExtractor, ObjectStore, PipelineOrchestrator,
};
use attention_infra_ai_clients::{GroqTranscriber, NoopClassifier, NoopTranscriber, OpenRouterClassifier};
use attention_infra_bus::FanOutBus;
use attention_infra_db::{ClusterRepository, DbClient, EventRepository, JobRepository};
use attention_infra_media_tools::{FfmpegKeyframeExtractor, NoopKeyframeExtractor};
use attention_infra_object_store::{NoopObjectStore, S3ObjectStore};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    attention_shared_observability::init_tracing("attention_worker");

    let config = Config::from_env();

    let db = DbClient::connect(&config.database_url, config.turso_auth_token.clone()).await?;
    let events = EventRepository::new(db.connection()?);
    let clusters = ClusterRepository::new(db.connection()?);
    let jobs = JobRepository::with_retry_config(
        db.connection()?,
        config.pipeline_max_retries,
        chrono::Duration::seconds(config.pipeline_retry_backoff_seconds));

    let bus = Arc::new(FanOutBus::connect(&config.bus_redis_url).await?);

    let object_store: Arc<dyn ObjectStore> = match config.object_store_config() {
        Some(object_store_config) => {
            info!("object store credentials present, connecting to S3-compatible endpoint");
            Arc::new(S3ObjectStore::connect(object_store_config).await?)
        }
        None => {
            warn!("object store not configured, uploads will be recorded as store_media failures");
            Arc::new(NoopObjectStore)
        }
    };

    let media_tools = config.media_tools_config();
    let keyframe_extractor: Arc<dyn KeyframeExtractor> =
        match FfmpegKeyframeExtractor::detect(media_tools.clone()).await {
            Some(extractor) => Arc::new(extractor),
            None => Arc::new(NoopKeyframeExtractor),
        };

    let audio_transcriber: Arc<dyn AudioTranscriber> = match config.groq_api_key.clone() {
        Some(api_key) => {
            Arc::new(GroqTranscriber::new(api_key, config.groq_transcription_model.clone(), media_tools))
        }
        None => {
            warn!("GROQ_API_KEY not configured, transcription disabled");
            Arc::new(NoopTranscriber)
        }
    };

    let classifier: Arc<dyn Classifier> = match config.openrouter_api_key.clone() {
        Some(api_key) => Arc::new(OpenRouterClassifier::new(api_key, config.openrouter_model.clone())),
        None => {
            warn!("OPENROUTER_API_KEY not configured, classification will fall back to the sentinel category");
            Arc::new(NoopClassifier)
        }
    };

    let cluster_assigner: Arc<dyn ClusterAssigner> =
        Arc::new(ClusteringEngine::new(Arc::new(clusters), config.clustering_config()));
    let event_repository: Arc<dyn EventRepositoryCapability> = Arc::new(events);
    let fan_out: Arc<dyn FanOutPublisher> = bus;

    let orchestrator = PipelineOrchestrator::new(
        event_repository,
        object_store,
        keyframe_extractor,
        audio_transcriber,
        classifier,
        cluster_assigner,
        fan_out);

    let dispatcher = JobDispatcher::new(
        jobs,
        orchestrator,
        config.worker_concurrency,
        Duration::from_millis(config.poll_interval_millis));

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("shutdown requested, draining in-flight pipeline jobs");
            shutdown_signal.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    });

    dispatcher.run(shutdown).await;

    info!("pipeline worker offline");
    Ok(())
}
