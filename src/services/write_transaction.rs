//! Atomic multi-entity writes.
//!
//! A [`WriteTransaction`] wraps a database transaction together with the blob
//! writes made on its behalf. Rows and join rows go through
//! [`WriteTransaction::conn`]; files go through [`WriteTransaction::put_file`]
//! so they can be removed again if the write does not commit. Work that must
//! only happen once the rows are durable (deleting replaced files) is
//! registered with [`WriteTransaction::on_commit`].
//!
//! Validation runs before [`WriteTransaction::begin`], so a rejected request
//! never opens a transaction.

use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::sync::Arc;

use crate::api::error::AppError;
use crate::services::storage::StorageService;

/// Stages of an open write. Validation has already passed by the time a
/// transaction exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriteStage {
    Persisting,
    SyncingAssociations,
    CommittingFiles,
    Committed,
    RolledBack,
}

type CommitHook = Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<()>> + Send>;

pub struct WriteTransaction {
    txn: DatabaseTransaction,
    storage: Arc<dyn StorageService>,
    stage: WriteStage,
    written: Vec<String>,
    after_commit: Vec<CommitHook>,
}

impl WriteTransaction {
    pub async fn begin(
        db: &DatabaseConnection,
        storage: Arc<dyn StorageService>,
    ) -> Result<Self, AppError> {
        let txn = db.begin().await?;
        Ok(Self {
            txn,
            storage,
            stage: WriteStage::Persisting,
            written: Vec::new(),
            after_commit: Vec::new(),
        })
    }

    /// Connection bound to the open transaction.
    pub fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub fn stage(&self) -> WriteStage {
        self.stage
    }

    /// Moves to a later stage. Stages never go backwards.
    pub fn enter(&mut self, stage: WriteStage) -> Result<(), AppError> {
        if stage <= self.stage || stage >= WriteStage::Committed {
            return Err(AppError::Internal(format!(
                "invalid write stage transition {:?} -> {:?}",
                self.stage, stage
            )));
        }
        tracing::debug!("Write stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        Ok(())
    }

    /// Writes a blob and remembers it for compensation.
    pub async fn put_file(&mut self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        self.storage
            .upload_file(key, data)
            .await
            .map_err(AppError::Storage)?;
        self.written.push(key.to_string());
        Ok(())
    }

    /// Registers work to run only after the transaction has committed.
    pub fn on_commit<F, Fut>(&mut self, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.after_commit.push(Box::new(move || Box::pin(hook())));
    }

    /// Deletes `key` from storage once the transaction has committed.
    pub fn delete_after_commit(&mut self, key: String) {
        let storage = self.storage.clone();
        self.on_commit(move || async move {
            tracing::info!("Removing replaced file {}", key);
            storage.delete_file(&key).await
        });
    }

    /// Commits the rows, then runs the post-commit hooks in order.
    ///
    /// If the commit itself fails, files written by this transaction are
    /// removed. If a hook fails, the rows stay committed but the files written
    /// by this transaction are still removed and the hook error is returned.
    pub async fn commit(mut self) -> Result<(), AppError> {
        let written = std::mem::take(&mut self.written);
        let hooks = std::mem::take(&mut self.after_commit);
        let storage = self.storage.clone();

        if let Err(e) = self.txn.commit().await {
            tracing::error!("Commit failed: {:?}", e);
            remove_files(storage.as_ref(), &written).await;
            return Err(AppError::from_db(e));
        }

        for hook in hooks {
            if let Err(e) = hook().await {
                tracing::error!("Post-commit action failed: {:?}", e);
                remove_files(storage.as_ref(), &written).await;
                return Err(AppError::FileCommit(e));
            }
        }

        tracing::debug!("Write committed ({} new files)", written.len());
        Ok(())
    }

    /// Rolls back the rows and removes the files written so far, then hands
    /// `cause` back to the caller.
    pub async fn rollback(self, cause: AppError) -> AppError {
        let stage = self.stage;
        tracing::warn!("Rolling back write during {:?}: {}", stage, cause);

        if let Err(e) = self.txn.rollback().await {
            tracing::error!("Rollback failed: {:?}", e);
        }
        remove_files(self.storage.as_ref(), &self.written).await;
        cause
    }

    /// Runs `work` inside a transaction, committing on success and rolling
    /// back on error.
    pub async fn run<T, F>(
        db: &DatabaseConnection,
        storage: Arc<dyn StorageService>,
        work: F,
    ) -> Result<T, AppError>
    where
        F: for<'t> FnOnce(&'t mut WriteTransaction) -> BoxFuture<'t, Result<T, AppError>>,
    {
        let mut tx = Self::begin(db, storage).await?;
        match work(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(cause) => Err(tx.rollback(cause).await),
        }
    }
}

async fn remove_files(storage: &dyn StorageService, keys: &[String]) {
    for key in keys {
        match storage.delete_file(key).await {
            Ok(()) => tracing::warn!("Removed file {} written by failed write", key),
            Err(e) => tracing::error!("Could not remove file {}: {:?}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::LocalStorageService;
    use futures::FutureExt;
    use sea_orm::Database;

    async fn setup() -> (DatabaseConnection, Arc<LocalStorageService>, tempfile::TempDir) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorageService::new(dir.path(), "http://localhost"));
        (db, storage, dir)
    }

    #[tokio::test]
    async fn test_stages_only_move_forward() {
        let (db, storage, _dir) = setup().await;
        let mut tx = WriteTransaction::begin(&db, storage).await.unwrap();

        assert_eq!(tx.stage(), WriteStage::Persisting);
        tx.enter(WriteStage::SyncingAssociations).unwrap();
        assert!(tx.enter(WriteStage::Persisting).is_err());
        assert!(tx.enter(WriteStage::Committed).is_err());
        tx.enter(WriteStage::CommittingFiles).unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_hooks_run_only_after_commit() {
        let (db, storage, _dir) = setup().await;
        storage.upload_file("v/old.jpg", b"old".to_vec()).await.unwrap();

        let mut tx = WriteTransaction::begin(&db, storage.clone()).await.unwrap();
        tx.put_file("v/new.jpg", b"new".to_vec()).await.unwrap();
        tx.delete_after_commit("v/old.jpg".to_string());
        assert!(storage.file_exists("v/old.jpg").await.unwrap());

        tx.commit().await.unwrap();
        assert!(!storage.file_exists("v/old.jpg").await.unwrap());
        assert!(storage.file_exists("v/new.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_rollback_removes_new_files_and_skips_hooks() {
        let (db, storage, _dir) = setup().await;
        storage.upload_file("v/old.jpg", b"old".to_vec()).await.unwrap();

        let mut tx = WriteTransaction::begin(&db, storage.clone()).await.unwrap();
        tx.put_file("v/new.jpg", b"new".to_vec()).await.unwrap();
        tx.delete_after_commit("v/old.jpg".to_string());

        let err = tx.rollback(AppError::Internal("boom".into())).await;
        assert!(matches!(err, AppError::Internal(_)));
        assert!(storage.file_exists("v/old.jpg").await.unwrap());
        assert!(!storage.file_exists("v/new.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_failing_hook_removes_new_files() {
        let (db, storage, _dir) = setup().await;

        let mut tx = WriteTransaction::begin(&db, storage.clone()).await.unwrap();
        tx.put_file("v/a.jpg", b"a".to_vec()).await.unwrap();
        tx.put_file("v/b.mp4", b"b".to_vec()).await.unwrap();
        tx.on_commit(|| async { Err(anyhow::anyhow!("listener failed")) });

        let err = tx.commit().await.unwrap_err();
        assert!(matches!(err, AppError::FileCommit(_)));
        assert!(storage.list_objects("v/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_rolls_back_on_error() {
        let (db, storage, _dir) = setup().await;

        let result: Result<(), AppError> = WriteTransaction::run(&db, storage.clone(), |tx| {
            async move {
                tx.put_file("v/a.jpg", b"a".to_vec()).await?;
                Err(AppError::Internal("sync failed".into()))
            }
            .boxed()
        })
        .await;

        assert!(result.is_err());
        assert!(!storage.file_exists("v/a.jpg").await.unwrap());
    }
}
