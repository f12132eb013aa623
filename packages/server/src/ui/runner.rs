//! Server startup, serving and graceful shutdown.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{net::TcpListener, sync::watch};

use crate::{
    config::ServerConfig,
    domain::{ConnectionRegistry, MessageRepository, UserRepository},
    error::ServerError,
    infrastructure::repository::{
        Database, InMemoryMessageRepository, InMemoryUserRepository, SqliteMessageRepository,
        SqliteUserRepository,
    },
    usecase::RegisterUserUseCase,
};

use super::{router::build_router, signal::shutdown_signal, state::AppState};

/// How long live sessions get to close after the listener stops
const SESSION_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

const DEMO_USERS: [&str; 2] = ["alice", "bob"];
const DEMO_PASSWORD: &str = "password123";

/// Message and credential stores, optionally backed by one SQLite database
pub struct Stores {
    pub messages: Arc<dyn MessageRepository>,
    pub users: Arc<dyn UserRepository>,
    database: Option<Database>,
}

impl Stores {
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            messages: Arc::new(InMemoryMessageRepository::new(capacity)),
            users: Arc::new(InMemoryUserRepository::new()),
            database: None,
        }
    }

    pub async fn sqlite(url: &str, capacity: usize) -> Result<Self, ServerError> {
        let database = Database::connect(url).await?;
        Ok(Self {
            messages: Arc::new(SqliteMessageRepository::new(database.clone(), capacity)),
            users: Arc::new(SqliteUserRepository::new(database.clone())),
            database: Some(database),
        })
    }

    pub async fn open(config: &ServerConfig) -> Result<Self, ServerError> {
        if config.uses_in_memory_store() {
            tracing::warn!("Using in-memory stores; history is lost on restart");
            Ok(Self::in_memory(config.history_capacity))
        } else {
            Self::sqlite(&config.database_url, config.history_capacity).await
        }
    }

    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}

/// Run the server until Ctrl-C or SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    let stores = Stores::open(&config).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = Arc::new(AppState::new(
        stores.messages.clone(),
        stores.users.clone(),
        &config.jwt_secret,
        shutdown_rx,
    ));

    if config.seed_demo_users {
        seed_demo_users(&state).await?;
    }

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let result = serve(listener, state, shutdown_tx, shutdown_signal()).await;

    stores.close().await;
    result
}

/// Serve `state` on `listener` until `signal` resolves.
///
/// When the signal fires the listener stops accepting, every live session is
/// sent a going-away close and the sessions get a short grace period to
/// deregister.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown_tx: watch::Sender<bool>,
    signal: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!("Shutting down");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    drain_sessions(state.registry.as_ref(), SESSION_DRAIN_TIMEOUT).await;
    Ok(())
}

async fn drain_sessions(registry: &dyn ConnectionRegistry, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let remaining = registry.count().await;
        if remaining == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(remaining, "Sessions still open after shutdown grace period");
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Create alice and bob (password `password123`) when they do not exist
pub async fn seed_demo_users(state: &AppState) -> Result<(), ServerError> {
    let usecase = RegisterUserUseCase::new(
        state.user_repository.clone(),
        state.password_hasher.clone(),
        state.token_service.clone(),
    );

    for username in DEMO_USERS {
        if usecase.ensure_user(username, DEMO_PASSWORD).await? {
            tracing::info!(username, "Created demo user");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, ConnectionIdFactory, Username},
        infrastructure::InMemoryConnectionRegistry,
    };

    #[tokio::test]
    async fn test_drain_sessions_returns_when_registry_empties() {
        // テスト項目: 全セッションが登録解除されると待機が終わる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let connection_id = ConnectionIdFactory::generate();
        let (connection, _rx) =
            Connection::channel(Username::new("alice".to_string()).unwrap(), 4);
        registry.register(connection_id, connection).await;

        let remover = registry.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            remover.deregister(&connection_id).await;
        });

        // when (操作):
        let started = tokio::time::Instant::now();
        drain_sessions(registry.as_ref(), Duration::from_secs(5)).await;

        // then (期待する結果):
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_drain_sessions_gives_up_after_timeout() {
        // テスト項目: 残っているセッションがあってもタイムアウトで戻る
        let registry = InMemoryConnectionRegistry::new();
        let (connection, _rx) =
            Connection::channel(Username::new("alice".to_string()).unwrap(), 4);
        registry
            .register(ConnectionIdFactory::generate(), connection)
            .await;

        drain_sessions(&registry, Duration::from_millis(100)).await;

        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_seed_demo_users_is_idempotent() {
        // テスト項目: デモユーザーは 2 回投入しても重複しない
        let stores = Stores::in_memory(200);
        let (_tx, rx) = watch::channel(false);
        let state = AppState::new(stores.messages.clone(), stores.users.clone(), "secret", rx);

        seed_demo_users(&state).await.unwrap();
        seed_demo_users(&state).await.unwrap();

        let users = stores.users.list().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"alice"));
        assert!(names.contains(&"bob"));
    }
}
