use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::{
        repositories::{account_repository::AccountRepository, file_repository::FileRepository},
        services::StorageService,
    },
    domain::{config::service::ServiceConfig, tier::TierPolicyTable},
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub tiers: Arc<TierPolicyTable>,
    pub file_repository: Arc<dyn FileRepository>,
    pub account_repository: Arc<dyn AccountRepository>,
    pub storage_service: Arc<dyn StorageService>,
}
