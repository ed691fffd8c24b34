//! Background credential rehash.
//!
//! When a verify succeeds against a stored form with stale parameters,
//! the caller schedules a detached task that re-hashes the plaintext and
//! persists the new stored form. The task's failure is logged and never
//! affects the outcome already returned to the caller.

use crate::tasks::BackgroundTasks;
use beacon_auth::CredentialHasher;
use beacon_metadata::MetadataResult;
use std::future::Future;
use std::sync::Arc;

pub(crate) async fn schedule_rehash<F, Fut>(
    tasks: &BackgroundTasks,
    hasher: &Arc<CredentialHasher>,
    task_name: &'static str,
    stored: &str,
    secret: &str,
    persist: F,
) where
    F: FnOnce(String) -> Fut + Send + 'static,
    Fut: Future<Output = MetadataResult<()>> + Send + 'static,
{
    if !hasher.needs_rehash(stored) {
        return;
    }

    let hasher = hasher.clone();
    let secret = secret.to_string();
    tasks
        .spawn(task_name, async move {
            let new_form = match hasher.hash(&secret) {
                Ok(form) => form,
                Err(err) => {
                    tracing::error!(error = %err, task = task_name, "credential rehash failed");
                    return;
                }
            };
            if let Err(err) = persist(new_form).await {
                tracing::error!(
                    error = %err,
                    task = task_name,
                    "credential rehash persistence failed"
                );
            }
        })
        .await;
}
