//! Shared harness for the API integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;

use report_portal::config::{AuthConfig, PortalConfig};
use report_portal::credentials::{Argon2Hasher, CredentialHasher, HashError};
use report_portal::export::XlsxEncoder;
use report_portal::store::{
    MemoryStore, NewUser, Row, RowStore, StoreError, StoreResult, Table, UserRecord,
};
use report_portal::{AppState, HttpServer, Shutdown};

/// A running server plus handles into its collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub store: Arc<MemoryStore>,
    pub shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Argon2 parameters cheap enough for tests.
pub fn cheap_hasher() -> Argon2Hasher {
    Argon2Hasher::new(&AuthConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

/// A hasher whose primitive always errors.
pub struct FailingHasher;

impl CredentialHasher for FailingHasher {
    fn hash(&self, _plaintext: &str) -> Result<String, HashError> {
        Err(HashError::Hash("out of memory".into()))
    }

    fn verify(&self, _plaintext: &str, _credential: &str) -> Result<bool, HashError> {
        Err(HashError::Hash("out of memory".into()))
    }
}

fn state_for(store: Arc<dyn RowStore>) -> AppState {
    state_with(store, Arc::new(cheap_hasher()))
}

fn state_with(store: Arc<dyn RowStore>, hasher: Arc<dyn CredentialHasher>) -> AppState {
    AppState::new(
        store,
        hasher,
        Arc::new(XlsxEncoder::new("Reports")),
        "reports.xlsx",
    )
}

async fn serve(state: AppState, config: &PortalConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, state);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Start the portal on an ephemeral port over a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(PortalConfig::default()).await
}

pub async fn spawn_app_with(config: PortalConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (addr, shutdown) = serve(state_for(store.clone()), &config).await;
    TestApp {
        addr,
        client: client(),
        store,
        shutdown,
    }
}

/// Start the portal over a fresh in-memory store with the given hasher.
pub async fn spawn_app_with_hasher(hasher: Arc<dyn CredentialHasher>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (addr, shutdown) = serve(state_with(store.clone(), hasher), &PortalConfig::default()).await;
    TestApp {
        addr,
        client: client(),
        store,
        shutdown,
    }
}

/// Start the portal over a store whose every call fails.
pub async fn spawn_broken_app() -> (SocketAddr, reqwest::Client, Shutdown) {
    let (addr, shutdown) = serve(state_for(Arc::new(BrokenStore)), &PortalConfig::default()).await;
    (addr, client(), shutdown)
}

/// A store that is never reachable.
pub struct BrokenStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection reset by peer".into()))
}

#[async_trait]
impl RowStore for BrokenStore {
    async fn insert_user(&self, _user: &NewUser) -> StoreResult<()> {
        down()
    }

    async fn find_user(&self, _username: &str) -> StoreResult<Option<UserRecord>> {
        down()
    }

    async fn insert_row(&self, _table: Table, _row: &Row) -> StoreResult<()> {
        down()
    }

    async fn fetch_all(&self, _table: Table) -> StoreResult<Vec<Row>> {
        down()
    }

    async fn search_reports(&self, _needle: &str) -> StoreResult<Vec<Row>> {
        down()
    }

    async fn ping(&self) -> StoreResult<()> {
        down()
    }
}
