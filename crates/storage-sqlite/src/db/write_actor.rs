use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::error;
use sitebook_core::errors::{DatabaseError, Result};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// Type alias for the job to be executed by the writer actor.
// It takes a mutable reference to a SqliteConnection and returns a Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type JobReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
///
/// All writes go through one connection, so rows of a bulk import are
/// persisted strictly in submission order.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, JobReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// Each job runs inside its own immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| DatabaseError::Internal("writer actor has stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            DatabaseError::Internal("writer actor dropped the reply channel".to_string())
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            DatabaseError::Internal("unexpected result type from writer actor".to_string()).into()
        })
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
/// This actor owns one database connection from the pool and processes write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    // The channel is bounded; 1024 is an arbitrary size.
    let (tx, mut rx) = mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, JobReply)>(1024);

    tokio::spawn(async move {
        // Held for the lifetime of the actor.
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                // Dropping the receiver fails every pending and future exec call.
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // The requester may have gone away (e.g. request timed out).
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
