use crate::client::SlurmClient;
use crate::credential::Credential;
use crate::error::{Error, ErrorKind};
use crate::models::{
    CancelJobResponse, DiagnosticsResponse, JobRef, JobSubmitResponse, JobsResponse,
    NodesResponse,
};
use log::{debug, warn};
use serde::Serialize;
use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex as AsyncMutex;

mod config;
mod storage;

pub use config::SessionConfig;
pub use storage::{FileStorage, MemoryStorage, TokenStorage};

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    /// Bumped on every set/clear; lets a waiting `acquire` see that another
    /// caller already replaced the credential.
    generation: u64,
}

/// Single source of truth for the current credential.
///
/// Constructed explicitly and shared by reference (or `Arc`). The initial
/// state comes from `storage`; every later change goes through [`set`],
/// [`clear`] or [`acquire`] and is written back to `storage` before returning.
///
/// [`set`]: SessionStore::set
/// [`clear`]: SessionStore::clear
/// [`acquire`]: SessionStore::acquire
pub struct SessionStore<S = MemoryStorage> {
    client: SlurmClient,
    config: SessionConfig,
    storage: S,
    state: RwLock<SessionState>,
    acquire_lock: AsyncMutex<()>,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Reads the stored token, falling back to `config.seed_token`. Performs no
    /// network call.
    pub fn new(client: SlurmClient, config: SessionConfig, storage: S) -> Self {
        let stored = match storage.get(&config.storage_key) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!(
                    "failed to read session token from storage key '{}': {}",
                    config.storage_key, err
                );
                None
            }
        };
        let store = Self {
            client,
            config,
            storage,
            state: RwLock::new(SessionState::default()),
            acquire_lock: AsyncMutex::new(()),
        };
        match stored {
            Some(token) => {
                debug!("restored session for {} from storage", store.config.user_name);
                store.write_state().token = Some(token);
            }
            None => {
                if let Some(seed) = store.config.seed_token.clone().filter(|t| !t.is_empty()) {
                    debug!("seeding session for {} from configuration", store.config.user_name);
                    store.set(seed);
                }
            }
        }
        store
    }

    pub fn client(&self) -> &SlurmClient {
        &self.client
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn current_principal(&self) -> &str {
        &self.config.user_name
    }

    pub fn current_credential(&self) -> Option<Credential> {
        self.read_state()
            .token
            .as_deref()
            .map(|token| Credential::new(&self.config.user_name, token))
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().token.is_some()
    }

    /// Replaces the credential with an externally obtained token. An empty
    /// token is treated as [`clear`](SessionStore::clear).
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            self.clear();
            return;
        }
        let mut state = self.write_state();
        self.persist(Some(&token));
        state.token = Some(token);
        state.generation += 1;
        debug!("session credential set for {}", self.config.user_name);
    }

    /// Forgets the credential in memory and in storage.
    pub fn clear(&self) {
        let mut state = self.write_state();
        self.persist(None);
        state.token = None;
        state.generation += 1;
        debug!("session credential cleared for {}", self.config.user_name);
    }

    /// Obtains a fresh token from the scheduler and stores it.
    ///
    /// Concurrent callers are serialized; a caller that waited while another
    /// acquisition succeeded gets that credential instead of issuing a second
    /// request. On failure the state is left untouched and the cause is wrapped
    /// in [`Error::AuthenticationFailed`].
    pub async fn acquire(&self) -> Result<Credential, Error> {
        let observed = self.read_state().generation;
        let _guard = self.acquire_lock.lock().await;
        {
            let state = self.read_state();
            if state.generation != observed {
                if let Some(token) = state.token.as_deref() {
                    debug!("reusing credential acquired by a concurrent caller");
                    return Ok(Credential::new(&self.config.user_name, token));
                }
            }
        }

        let token = self
            .fetch_token()
            .await
            .map_err(|err| Error::AuthenticationFailed(Box::new(err)))?;
        self.set(token.clone());
        Ok(Credential::new(&self.config.user_name, token))
    }

    /// Returns the current credential, acquiring one first when unauthenticated.
    pub async fn ensure_authenticated(&self) -> Result<Credential, Error> {
        match self.current_credential() {
            Some(credential) => Ok(credential),
            None => self.acquire().await,
        }
    }

    pub async fn diagnostics(&self) -> Result<DiagnosticsResponse, Error> {
        self.with_credential(|credential| async move {
            self.client.get_diagnostics(Some(&credential)).await
        })
        .await
    }

    pub async fn list_jobs(&self) -> Result<JobsResponse, Error> {
        self.with_credential(
            |credential| async move { self.client.list_jobs(Some(&credential)).await },
        )
        .await
    }

    pub async fn get_job(&self, job: impl Into<JobRef>) -> Result<JobsResponse, Error> {
        let job = job.into();
        let job = &job;
        self.with_credential(|credential| async move {
            self.client.get_job(Some(&credential), job).await
        })
        .await
    }

    pub async fn submit_job<P: Serialize>(
        &self,
        payload: &P,
    ) -> Result<JobSubmitResponse, Error> {
        self.with_credential(|credential| async move {
            self.client.submit_job(Some(&credential), payload).await
        })
        .await
    }

    pub async fn cancel_job(&self, job: impl Into<JobRef>) -> Result<CancelJobResponse, Error> {
        let job = job.into();
        let job = &job;
        self.with_credential(|credential| async move {
            self.client.cancel_job(Some(&credential), job).await
        })
        .await
    }

    pub async fn list_nodes(&self) -> Result<NodesResponse, Error> {
        self.with_credential(
            |credential| async move { self.client.list_nodes(Some(&credential)).await },
        )
        .await
    }

    async fn fetch_token(&self) -> Result<String, Error> {
        let response = self.client.acquire_credential(None).await?;
        response
            .token(&self.config.token_field)
            .map(str::to_string)
            .ok_or_else(|| Error::MissingTokenField(self.config.token_field.clone()))
    }

    /// Runs `call` with the current credential (an empty token when
    /// unauthenticated, so the scheduler makes the decision). A 401 clears the
    /// rejected credential and, if enabled, re-acquires once and retries once.
    async fn with_credential<T, F, Fut>(&self, call: F) -> Result<T, Error>
    where
        F: Fn(Credential) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let credential = self
            .current_credential()
            .unwrap_or_else(|| Credential::new(&self.config.user_name, ""));
        let err = match call(credential.clone()).await {
            Err(err) if err.kind() == ErrorKind::Authentication => err,
            other => return other,
        };

        self.invalidate(credential.token());
        if !self.config.reacquire_on_unauthorized {
            return Err(err);
        }
        debug!("credential rejected ({}); re-acquiring once", err);
        let fresh = match self.current_credential() {
            Some(current) if current.token() != credential.token() => current,
            _ => self.acquire().await?,
        };
        let result = call(fresh.clone()).await;
        if matches!(&result, Err(err) if err.kind() == ErrorKind::Authentication) {
            self.invalidate(fresh.token());
        }
        result
    }

    /// Clears the session only if it still holds `rejected`, so a credential
    /// installed meanwhile by another caller survives.
    fn invalidate(&self, rejected: &str) {
        let still_current = self.read_state().token.as_deref() == Some(rejected);
        if still_current {
            self.clear();
        }
    }

    fn persist(&self, token: Option<&str>) {
        let key = &self.config.storage_key;
        let result = match token {
            Some(token) => self.storage.set(key, token),
            None => self.storage.remove(key),
        };
        if let Err(err) = result {
            warn!("failed to persist session token under key '{}': {}", key, err);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
