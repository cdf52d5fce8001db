pub mod test_helpers {
    use crate::config::Settings;
    use crate::models::user::User;
    use crate::store::{MemoryRowStore, RowStore, RowStoreError, RowStoreResult, SheetRow, Tab};
    use crate::AppState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Settings with fixed values, independent of the environment.
    pub fn test_settings() -> Settings {
        Settings {
            timezone: chrono_tz::America::Argentina::Buenos_Aires,
            free_daily_comment_limit: 3,
            payment_api_url: "http://payment.invalid".to_string(),
            payment_api_token: "test-token".to_string(),
            premium_price: 2999.0,
            base_url: "http://localhost:3000".to_string(),
        }
    }

    pub fn test_settings_with_payment_url(payment_api_url: &str) -> Settings {
        Settings {
            payment_api_url: payment_api_url.to_string(),
            ..test_settings()
        }
    }

    /// Application state over a fresh in-memory store. The store handle is
    /// returned too so tests can inspect or seed raw rows.
    pub fn create_test_state() -> (AppState, Arc<MemoryRowStore>) {
        let store = Arc::new(MemoryRowStore::new());
        let state = AppState::new(store.clone(), test_settings());
        (state, store)
    }

    pub fn create_test_state_with_settings(
        settings: Settings,
    ) -> (AppState, Arc<MemoryRowStore>) {
        let store = Arc::new(MemoryRowStore::new());
        let state = AppState::new(store.clone(), settings);
        (state, store)
    }

    /// Inserts a user row with a real argon2 hash so login flows work.
    pub async fn insert_test_user(
        store: &Arc<MemoryRowStore>,
        email: &str,
        password: &str,
        premium: bool,
        admin: bool,
    ) -> RowStoreResult<()> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("password hashing")
            .to_string();

        let user = User {
            email: email.to_string(),
            name: "Test User".to_string(),
            image: String::new(),
            is_premium: premium,
            is_admin: admin,
            password_hash,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        store
            .append_row(
                Tab::Users,
                vec![
                    user.email,
                    user.name,
                    user.image,
                    if premium { "TRUE" } else { "FALSE" }.to_string(),
                    if admin { "TRUE" } else { "FALSE" }.to_string(),
                    user.password_hash,
                    user.created_at,
                ],
            )
            .await
    }

    /// Row store wrapper that starts failing cell updates after a number of
    /// successful ones. Used to induce partial fan-out failures.
    pub struct FlakyRowStore {
        inner: Arc<dyn RowStore>,
        updates_before_failure: usize,
        update_count: AtomicUsize,
    }

    impl FlakyRowStore {
        pub fn new(inner: Arc<dyn RowStore>, updates_before_failure: usize) -> Self {
            Self {
                inner,
                updates_before_failure,
                update_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RowStore for FlakyRowStore {
        async fn read_rows(&self, tab: Tab) -> RowStoreResult<Vec<SheetRow>> {
            self.inner.read_rows(tab).await
        }

        async fn append_row(&self, tab: Tab, values: Vec<String>) -> RowStoreResult<()> {
            self.inner.append_row(tab, values).await
        }

        async fn update_cell(
            &self,
            tab: Tab,
            row_index: usize,
            column: usize,
            value: String,
        ) -> RowStoreResult<()> {
            let n = self.update_count.fetch_add(1, Ordering::SeqCst);
            if n >= self.updates_before_failure {
                return Err(RowStoreError::Status(503, "injected failure".to_string()));
            }
            self.inner.update_cell(tab, row_index, column, value).await
        }

        async fn delete_row(&self, tab: Tab, row_index: usize) -> RowStoreResult<()> {
            self.inner.delete_row(tab, row_index).await
        }
    }

    /// Row store wrapper that holds every `read_rows` result until a fixed
    /// number of readers have arrived. Forces the scan phases of concurrent
    /// scan-then-append sequences to interleave, so both scans complete
    /// before either write lands.
    pub struct BarrierStore {
        inner: Arc<dyn RowStore>,
        barrier: tokio::sync::Barrier,
    }

    impl BarrierStore {
        pub fn new(inner: Arc<dyn RowStore>, readers: usize) -> Self {
            Self {
                inner,
                barrier: tokio::sync::Barrier::new(readers),
            }
        }
    }

    #[async_trait]
    impl RowStore for BarrierStore {
        async fn read_rows(&self, tab: Tab) -> RowStoreResult<Vec<SheetRow>> {
            let rows = self.inner.read_rows(tab).await;
            self.barrier.wait().await;
            rows
        }

        async fn append_row(&self, tab: Tab, values: Vec<String>) -> RowStoreResult<()> {
            self.inner.append_row(tab, values).await
        }

        async fn update_cell(
            &self,
            tab: Tab,
            row_index: usize,
            column: usize,
            value: String,
        ) -> RowStoreResult<()> {
            self.inner.update_cell(tab, row_index, column, value).await
        }

        async fn delete_row(&self, tab: Tab, row_index: usize) -> RowStoreResult<()> {
            self.inner.delete_row(tab, row_index).await
        }
    }
}
