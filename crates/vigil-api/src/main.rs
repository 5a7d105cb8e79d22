//! Binary entrypoint for the Vigil API server.
use std::sync::Arc;

use vigil_api::offline::{
    LogNotifier, NullSynthesizer, OfflineModel, OfflineTranscriber, OfflineVision,
};
use vigil_api::{run, ExternalServices, Pipeline};
use vigil_core::PipelineConfig;
use vigil_store::FsStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Default listen address can be overridden with VIGIL_ADDR
    let addr = std::env::var("VIGIL_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());
    let data_dir = std::env::var("VIGIL_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

    let services = ExternalServices {
        transcriber: Arc::new(OfflineTranscriber),
        vision: Arc::new(OfflineVision),
        model: Arc::new(OfflineModel),
        notifier: Arc::new(LogNotifier),
        synthesizer: Arc::new(NullSynthesizer),
    };
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(FsStore::new(data_dir)),
        services,
        PipelineConfig::default(),
    ));

    run(&addr, pipeline).await;
}
