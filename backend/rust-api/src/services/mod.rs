use crate::config::Config;
use mongodb::{Client as MongoClient, Database};

pub struct AppState {
    pub config: Config,
    pub mongo: Database,
}

impl AppState {
    pub fn new(config: Config, mongo_client: MongoClient) -> Self {
        let mongo = mongo_client.database(&config.mongo_database);
        Self { config, mongo }
    }
}

pub mod analysis_service;
pub mod question_service;
pub mod quiz_service;
pub mod recommendation_service;
pub mod scoring;
pub mod student_service;
