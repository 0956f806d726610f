//! Console state and workflows
//!
//! [`Console`] ties the gateway, the query cache and the session together.
//! Reads go through the cache; writes go straight to the server and, once
//! the server accepts them, invalidate the cached resources they affect.
//! Nothing here is updated optimistically.

pub mod attachments;
pub mod autocomplete;
pub mod filters;
pub mod form;
pub mod list;
pub mod notice;

pub use attachments::AttachmentList;
pub use autocomplete::{Autocomplete, Candidate, Debouncer, SnapshotTarget};
pub use filters::{DateFilter, NameFilter, StatusFilter, StockFilter};
pub use form::{Form, FormError, FormMode};
pub use list::{InventoryFilters, PageTicket, RequestFilters, RequestListView};
pub use notice::{Notice, NoticeLevel};

use std::future::Future;
use thiserror::Error;

use crate::api::{ApiClient, ApiError, UploadFile};
use crate::core::cache::{resource, Mutation, QueryCache, QueryKey};
use crate::core::config::Config;
use crate::core::role::{Role, Section};
use crate::core::session::SessionHandle;
use crate::core::validation::Checked;
use crate::core::workflow::{ConfirmedTransition, WorkflowEngine, WorkflowError};
use crate::entities::buyer::{ActiveBuyer, Buyer, BuyerFilters, BuyerForm, BuyerPage};
use crate::entities::dashboard::DashboardStats;
use crate::entities::inventory::{InventoryForm, InventoryItem};
use crate::entities::sample_request::{SampleRequest, SampleRequestForm, SampleRequestPage};
use crate::entities::user::{LoginRequest, User};

/// Errors from console actions other than form submits
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Access denied: {section} is not available to {role}")]
    AccessDenied { section: Section, role: Role },

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Form(#[from] FormError),

    /// The server refused an action; `message` is what the user sees
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ConsoleError {
    fn rejected(source: ApiError, fallback: &str) -> Self {
        ConsoleError::Rejected {
            message: source.message_or(fallback),
            source,
        }
    }

    /// True when the user has to sign in (again) to continue
    pub fn needs_sign_in(&self) -> bool {
        match self {
            ConsoleError::NotSignedIn => true,
            ConsoleError::Api(e) | ConsoleError::Rejected { source: e, .. } => {
                e.is_unauthenticated()
            }
            ConsoleError::Form(FormError::Rejected { source, .. }) => source.is_unauthenticated(),
            _ => false,
        }
    }
}

/// A record the server accepted, with the notice to show for it
#[derive(Debug, Clone)]
pub struct Saved<T> {
    pub record: T,
    pub notice: Notice,
}

/// The console context
#[derive(Debug, Clone)]
pub struct Console {
    api: ApiClient,
    cache: QueryCache,
    session: SessionHandle,
    page_size: u32,
    candidate_limit: u32,
}

impl Console {
    pub fn new(config: &Config, session: SessionHandle) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_url, session.clone())?;
        Ok(Self {
            api,
            cache: QueryCache::new(config.cache_ttl()),
            session,
            page_size: config.page_size.max(1),
            candidate_limit: config.candidate_limit,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // =========================================================================
    // Session and gating
    // =========================================================================

    /// Sign in and start a fresh session
    ///
    /// Credentials are checked locally first. The cache is cleared so no
    /// data from a previous user survives.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, FormError> {
        credentials.check().map_err(FormError::Invalid)?;
        let response = self
            .api
            .login(credentials)
            .await
            .map_err(|e| FormError::rejected(e, "Login failed. Please try again."))?;
        self.cache.clear();
        self.session.sign_in(response.user.clone(), response.token);
        tracing::info!(user = %response.user.email, role = %response.user.role, "signed in");
        Ok(response.user)
    }

    pub fn logout(&self) {
        self.session.sign_out();
        self.cache.clear();
    }

    /// The signed-in role, if it may open `section`
    pub fn require(&self, section: Section) -> Result<Role, ConsoleError> {
        if !self.session.is_authenticated() {
            return Err(ConsoleError::NotSignedIn);
        }
        let role = self.session.role().ok_or(ConsoleError::NotSignedIn)?;
        if role.can_access(section) {
            Ok(role)
        } else {
            Err(ConsoleError::AccessDenied { section, role })
        }
    }

    /// Workflow engine for the signed-in role
    pub fn workflow(&self) -> WorkflowEngine {
        WorkflowEngine::new(self.session.role())
    }

    async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.cache.get_or_fetch(key, fetch).await
    }

    /// Local checks, then the server call, then invalidation
    async fn submit<F, T, Fut>(
        &self,
        mode: &FormMode,
        form: &F,
        call: impl FnOnce() -> Fut,
    ) -> Result<Saved<T>, FormError>
    where
        F: Form,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        form.precheck()?;
        let record = call()
            .await
            .map_err(|e| FormError::rejected(e, &F::failure_fallback(mode)))?;
        self.cache.invalidate_for(F::MUTATION);
        Ok(Saved {
            record,
            notice: Notice::success(F::success_message(mode)),
        })
    }

    async fn remove<Fut>(
        &self,
        mutation: Mutation,
        noun: &str,
        call: impl FnOnce() -> Fut,
    ) -> Result<Notice, ConsoleError>
    where
        Fut: Future<Output = Result<Option<String>, ApiError>>,
    {
        call()
            .await
            .map_err(|e| ConsoleError::rejected(e, &format!("Failed to delete {}", noun)))?;
        self.cache.invalidate_for(mutation);
        let mut message = format!("{} deleted successfully", noun);
        if let Some(first) = message.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Ok(Notice::success(message))
    }

    // =========================================================================
    // Buyers
    // =========================================================================

    pub async fn buyers(&self, page: u32, filters: &BuyerFilters) -> Result<BuyerPage, ApiError> {
        let page = page.max(1);
        let key = QueryKey::new(resource::BUYERS)
            .with(page)
            .with(self.page_size)
            .with(filters.name.as_deref().unwrap_or_default())
            .with(filters.email.as_deref().unwrap_or_default());
        self.cached(key, || self.api.list_buyers(page, self.page_size, filters))
            .await
    }

    pub async fn active_buyers(&self) -> Result<Vec<ActiveBuyer>, ApiError> {
        self.cached(QueryKey::new(resource::BUYERS_ACTIVE), || {
            self.api.active_buyers()
        })
        .await
    }

    pub async fn buyer(&self, id: &str) -> Result<Buyer, ApiError> {
        self.cached(QueryKey::new(resource::BUYER).with(id), || {
            self.api.get_buyer(id)
        })
        .await
    }

    pub async fn save_buyer(
        &self,
        mode: &FormMode,
        form: &BuyerForm,
    ) -> Result<Saved<Buyer>, FormError> {
        self.submit(mode, form, || async {
            match mode {
                FormMode::Create => self.api.create_buyer(form).await,
                FormMode::Edit(id) => self.api.update_buyer(id, form).await,
            }
        })
        .await
    }

    pub async fn delete_buyer(&self, id: &str) -> Result<Notice, ConsoleError> {
        self.remove(Mutation::Buyer, "buyer", || self.api.delete_buyer(id))
            .await
    }

    /// Buyer picker for the sample request form
    pub async fn buyer_autocomplete(&self) -> Result<Autocomplete<ActiveBuyer>, ApiError> {
        Ok(Autocomplete::new(self.active_buyers().await?))
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub async fn inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.cached(QueryKey::new(resource::INVENTORY), || {
            self.api.list_inventory()
        })
        .await
    }

    /// The bounded candidate set used by the fabric picker
    pub async fn inventory_candidates(&self) -> Result<Vec<InventoryItem>, ApiError> {
        let limit = self.candidate_limit;
        self.cached(QueryKey::new(resource::INVENTORY_ALL), || {
            self.api.list_inventory_limited(limit)
        })
        .await
    }

    pub async fn inventory_item(&self, id: &str) -> Result<InventoryItem, ApiError> {
        self.cached(QueryKey::new(resource::SINGLE_INVENTORY).with(id), || {
            self.api.get_inventory(id)
        })
        .await
    }

    pub async fn save_inventory(
        &self,
        mode: &FormMode,
        form: &InventoryForm,
    ) -> Result<Saved<InventoryItem>, FormError> {
        self.submit(mode, form, || async {
            match mode {
                FormMode::Create => self.api.create_inventory(form).await,
                FormMode::Edit(id) => self.api.update_inventory(id, form).await,
            }
        })
        .await
    }

    pub async fn delete_inventory(&self, id: &str) -> Result<Notice, ConsoleError> {
        self.remove(Mutation::Inventory, "inventory item", || {
            self.api.delete_inventory(id)
        })
        .await
    }

    /// Fabric picker for sample request items
    pub async fn fabric_autocomplete(&self) -> Result<Autocomplete<InventoryItem>, ApiError> {
        Ok(Autocomplete::new(self.inventory_candidates().await?))
    }

    // =========================================================================
    // Sample requests
    // =========================================================================

    pub async fn sample_requests(&self, page: u32) -> Result<SampleRequestPage, ApiError> {
        let page = page.max(1);
        let key = QueryKey::new(resource::SAMPLE_REQUESTS)
            .with(page)
            .with(self.page_size);
        self.cached(key, || self.api.list_sample_requests(page, self.page_size))
            .await
    }

    /// Fetch the page a ticket from [`RequestListView::begin_load`] asks for
    ///
    /// The view is not borrowed while the request is in flight, so several
    /// loads may overlap; hand each result to
    /// [`RequestListView::complete_load`] and only the newest ticket applies.
    pub async fn fetch_requests(
        &self,
        ticket: PageTicket,
    ) -> Result<(PageTicket, SampleRequestPage), ApiError> {
        let page = self.sample_requests(ticket.page()).await?;
        Ok((ticket, page))
    }

    /// Load `page` into `view` in one step
    ///
    /// This holds `view` across the request, so it never races another
    /// load; use [`Console::fetch_requests`] when loads can overlap.
    pub async fn load_requests(
        &self,
        view: &mut RequestListView,
        page: u32,
    ) -> Result<bool, ApiError> {
        let (ticket, result) = self.fetch_requests(view.begin_load(page)).await?;
        Ok(view.complete_load(ticket, result))
    }

    pub async fn sample_request(&self, id: &str) -> Result<SampleRequest, ApiError> {
        self.cached(QueryKey::new(resource::SINGLE_REQUEST).with(id), || {
            self.api.get_sample_request(id)
        })
        .await
    }

    pub async fn save_sample_request(
        &self,
        mode: &FormMode,
        form: &SampleRequestForm,
    ) -> Result<Saved<SampleRequest>, FormError> {
        self.submit(mode, form, || async {
            match mode {
                FormMode::Create => self.api.create_sample_request(form).await,
                FormMode::Edit(id) => self.api.update_sample_request(id, form).await,
            }
        })
        .await
    }

    pub async fn delete_sample_request(&self, id: &str) -> Result<Notice, ConsoleError> {
        self.remove(Mutation::SampleRequest, "sample request", || {
            self.api.delete_sample_request(id)
        })
        .await
    }

    /// Send a confirmed item status change to the server
    ///
    /// On failure nothing local changes and the server's message is
    /// returned. On success the request caches are invalidated.
    pub async fn execute_transition(
        &self,
        request_id: &str,
        transition: &ConfirmedTransition,
    ) -> Result<Notice, ConsoleError> {
        self.workflow().authorize()?;
        self.api
            .update_item_status(request_id, transition)
            .await
            .map_err(|e| ConsoleError::rejected(e, "Failed to update status"))?;
        self.cache.invalidate_for(Mutation::SampleRequest);
        tracing::info!(
            request = request_id,
            item = transition.item_id(),
            from = %transition.from(),
            to = %transition.to(),
            "status updated"
        );
        Ok(Notice::success(format!(
            "Status updated to {}",
            transition.to().label()
        )))
    }

    /// Upload files in one request and return their URLs
    pub async fn upload_attachments(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<Vec<String>, ConsoleError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        self.api
            .upload(files)
            .await
            .map_err(|e| ConsoleError::rejected(e, "Failed to upload files"))
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.cached(QueryKey::new(resource::DASHBOARD_STATS), || {
            self.api.dashboard_stats()
        })
        .await
    }
}
