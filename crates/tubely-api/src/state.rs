//! Application state shared by all handlers.

use crate::auth::JwtService;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{MediaToolkit, UploadPipeline};
use tubely_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    pub pipeline: Arc<UploadPipeline>,
    pub jwt: JwtService,
}

impl AppState {
    /// Wire the upload pipeline from `config` over the given collaborators.
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        toolkit: Arc<dyn MediaToolkit>,
    ) -> Self {
        let pipeline = Arc::new(UploadPipeline::new(
            config.pipeline_config(),
            toolkit,
            storage.clone(),
            videos.clone(),
        ));
        let jwt = JwtService::new(config.jwt_secret());

        Self {
            config,
            videos,
            storage,
            pipeline,
            jwt,
        }
    }
}
