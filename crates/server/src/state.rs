use service::features::FeatureService;

/// Shared handler state, built once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub features: FeatureService,
}

impl ServerState {
    pub fn new(features: FeatureService) -> Self {
        Self { features }
    }
}
