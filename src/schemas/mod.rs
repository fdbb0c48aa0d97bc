use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod auth;
pub(crate) mod catalog;
pub(crate) mod course;
pub(crate) mod enrollment;
pub(crate) mod interview;
pub(crate) mod progress;
pub(crate) mod quiz;
pub(crate) mod user;
pub(crate) mod video;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) docs_url: String,
}
