use mongodb::{
    bson::doc,
    options::{Acknowledgment, ClientOptions, ReadConcern, ServerApi, ServerApiVersion, WriteConcern},
    ClientSession, Collection, Client,
};
use std::time::Duration;

use crate::{config::Config, errors::AppResult};

pub const USERS: &str = "users";
pub const MATERIALS: &str = "materials";
pub const SUB_MATERIALS: &str = "sub_materials";
pub const PROGRESS: &str = "progress";
pub const QUIZZES: &str = "quizzes";
pub const QUIZ_QUESTIONS: &str = "quiz_questions";
pub const QUESTION_ANSWERS: &str = "question_answers";
pub const QUIZ_ATTEMPTS: &str = "quiz_attempts";
pub const QUIZ_ATTEMPT_ANSWERS: &str = "quiz_attempt_answers";

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    /// Opens a session with a running transaction. Dropping the session before
    /// `commit_transaction` aborts every write made through it.
    pub async fn begin_transaction(&self) -> AppResult<ClientSession> {
        let mut session = self.client.start_session().await?;
        session
            .start_transaction()
            .read_concern(ReadConcern::majority())
            .write_concern(WriteConcern::builder().w(Acknowledgment::Majority).build())
            .await?;
        Ok(session)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
