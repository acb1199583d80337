pub mod pipelines;
pub mod query;

use crate::utils::AppError;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::error::{TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT};
use mongodb::{Client, ClientSession, Collection, Database, IndexModel};
use std::error::Error;
use std::future::Future;
use std::time::{Duration, Instant};

pub const CAMPAIGNS: &str = "campains";
pub const REVIEWS: &str = "reviews";
pub const PARTICIPANTS: &str = "participants";
pub const PAYMENTS: &str = "payments";
pub const USERS: &str = "users";

const TRANSACTION_RETRY_WINDOW: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("curecamp-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Index creation is best effort: a failure is logged and startup continues.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let indexes: Vec<(&str, IndexModel)> = vec![
            (
                USERS,
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            ),
            (
                PAYMENTS,
                IndexModel::builder()
                    .keys(doc! { "transactionId": 1 })
                    .options(unique())
                    .build(),
            ),
            (
                PARTICIPANTS,
                IndexModel::builder()
                    .keys(doc! { "campId": 1, "participantEmail": 1 })
                    .options(unique())
                    .build(),
            ),
            (
                PARTICIPANTS,
                IndexModel::builder()
                    .keys(doc! { "participantEmail": 1 })
                    .build(),
            ),
            (
                CAMPAIGNS,
                IndexModel::builder()
                    .keys(doc! { "participantCount": -1 })
                    .build(),
            ),
        ];

        for (collection, index) in indexes {
            let keys = index.keys.clone();
            match self
                .collection::<Document>(collection)
                .create_index(index)
                .await
            {
                Ok(_) => log::info!("   ✅ Index ready: {}({})", collection, keys),
                Err(e) => log::warn!("   ⚠️  Index {}({}) not created: {}", collection, keys, e),
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Runs `body` inside a transaction, committing on success and aborting on error.
    ///
    /// The session is moved into `body` and handed back with its result. Attempts that
    /// fail with `TransientTransactionError` are rerun and commits reporting
    /// `UnknownTransactionCommitResult` are retried, both within `TRANSACTION_RETRY_WINDOW`.
    /// Needs a replica set.
    pub async fn transaction<T, F, Fut>(&self, mut body: F) -> Result<T, AppError>
    where
        F: FnMut(ClientSession) -> Fut,
        Fut: Future<Output = (ClientSession, Result<T, AppError>)>,
    {
        let started = Instant::now();
        let mut session = self.client.start_session().await?;

        'attempt: loop {
            session.start_transaction().await?;
            let (returned, result) = body(session).await;
            session = returned;

            let value = match result {
                Ok(value) => value,
                Err(e) => {
                    if let Err(abort_err) = session.abort_transaction().await {
                        log::warn!("⚠️  Transaction abort failed: {}", abort_err);
                    }
                    if is_transient(&e) && started.elapsed() < TRANSACTION_RETRY_WINDOW {
                        log::warn!("🔁 Retrying transaction after transient error: {}", e);
                        continue 'attempt;
                    }
                    return Err(e);
                }
            };

            loop {
                match session.commit_transaction().await {
                    Ok(()) => return Ok(value),
                    Err(e)
                        if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
                            && started.elapsed() < TRANSACTION_RETRY_WINDOW =>
                    {
                        log::warn!("🔁 Retrying commit with unknown result: {}", e);
                    }
                    Err(e)
                        if e.contains_label(TRANSIENT_TRANSACTION_ERROR)
                            && started.elapsed() < TRANSACTION_RETRY_WINDOW =>
                    {
                        log::warn!("🔁 Retrying transaction after failed commit: {}", e);
                        continue 'attempt;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Closes pooled connections. Call once after the HTTP server stops.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }
}

fn is_transient(err: &AppError) -> bool {
    matches!(err, AppError::Database(e) if e.contains_label(TRANSIENT_TRANSACTION_ERROR))
}

pub fn parse_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} ID", what)))
}

/// Fresh, uniquely named database on the server in `MONGODB_URI`.
#[cfg(test)]
pub(crate) async fn test_db() -> MongoDB {
    dotenv::dotenv().ok();
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    MongoDB::new(&uri, &format!("CureCampTest_{}", uuid::Uuid::new_v4().simple()))
        .await
        .expect("MongoDB must be reachable")
}

/// Client that never reaches a server; for handlers that fail before any query.
#[cfg(test)]
pub(crate) async fn detached_db() -> MongoDB {
    let mut options = mongodb::options::ClientOptions::parse("mongodb://127.0.0.1:1")
        .await
        .expect("static URI parses");
    options.server_selection_timeout = Some(Duration::from_millis(100));
    let client = Client::with_options(options).expect("client builds without I/O");
    let db = client.database("CureCampDetached");
    MongoDB { client, db }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex(), "camp").unwrap(), id);
    }

    #[test]
    fn only_labelled_database_errors_are_transient() {
        let unlabelled = mongodb::error::Error::custom("write conflict");
        assert!(!is_transient(&AppError::Database(unlabelled)));
        assert!(!is_transient(&AppError::Conflict("dup".into())));
        assert!(!is_transient(&AppError::NotFound("gone".into())));
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("not-an-id", "camp").unwrap_err();
        assert_eq!(err.to_string(), "Invalid camp ID");
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        let db = test_db().await;
        assert!(db.ping().await.is_ok());
        db.database().drop().await.unwrap();
        db.shutdown().await;
    }
}
