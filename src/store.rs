//! Application state store
//!
//! A single `AppState` snapshot mutated only through the closed [`Update`]
//! set, applied by one reducer. Actions call the service client, then reduce
//! the response into state. The lock is never held across an await, so each
//! reducer application is atomic with respect to all other code; two in-flight
//! actions may still interleave, last completion wins.
//!
//! Read actions record failures in `error` and swallow them. Mutating actions
//! record and re-raise so the caller can keep a form open or retry. All remote
//! actions toggle `loading` uniformly. Actions are plain futures: dropping one
//! mid-flight cancels the underlying request and skips the reducer step.

use std::sync::Mutex;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    Category, CategoryRequest, Contact, ContactRequest, FilterUpdate, Filters, Page, Pagination,
    Stats,
};

/// Snapshot of everything the view layer reads
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub contacts: Vec<Contact>,
    pub current_contact: Option<Contact>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set when a call came back 401. The client has already purged the
    /// token; the view renders a login instruction instead of an error.
    pub session_expired: bool,
    pub categories: Vec<Category>,
    pub stats: Option<Stats>,
    pub filters: Filters,
    pub pagination: Pagination,
}

/// The closed set of state transitions
#[derive(Debug, Clone)]
pub enum Update {
    SetLoading(bool),
    SetError(Option<String>),
    SessionExpired,
    SetContacts(Page<Contact>),
    SetCurrentContact(Contact),
    AddContact(Contact),
    ReplaceContact(Contact),
    RemoveContact(i64),
    SetCategories(Vec<Category>),
    AddCategory(Category),
    ReplaceCategory(Category),
    RemoveCategory(i64),
    SetStats(Stats),
    SetFilters(FilterUpdate),
}

impl AppState {
    /// The reducer. Every fetch-completing variant clears `loading`.
    pub fn apply(&mut self, update: Update) {
        match update {
            Update::SetLoading(loading) => self.loading = loading,
            Update::SetError(error) => {
                self.error = error;
                self.loading = false;
            }
            Update::SessionExpired => {
                self.session_expired = true;
                self.loading = false;
            }
            Update::SetContacts(page) => {
                self.pagination = page.pagination();
                self.contacts = page.content;
                self.loading = false;
            }
            Update::SetCurrentContact(contact) => {
                self.current_contact = Some(contact);
                self.loading = false;
            }
            Update::AddContact(contact) => {
                // Newest first
                self.contacts.insert(0, contact);
                self.loading = false;
            }
            Update::ReplaceContact(contact) => {
                if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == contact.id) {
                    *slot = contact;
                }
                self.loading = false;
            }
            Update::RemoveContact(id) => {
                self.contacts.retain(|c| c.id != id);
                self.loading = false;
            }
            Update::SetCategories(categories) => {
                self.categories = categories;
                self.loading = false;
            }
            Update::AddCategory(category) => {
                self.categories.insert(0, category);
                self.loading = false;
            }
            Update::ReplaceCategory(category) => {
                if let Some(slot) = self.categories.iter_mut().find(|c| c.id == category.id) {
                    *slot = category;
                }
                self.loading = false;
            }
            Update::RemoveCategory(id) => {
                self.categories.retain(|c| c.id != id);
                self.loading = false;
            }
            Update::SetStats(stats) => {
                self.stats = Some(stats);
                self.loading = false;
            }
            Update::SetFilters(update) => self.filters.merge(update),
        }
    }
}

/// State container plus the service client its actions call
///
/// Constructed once at the application root and passed by reference; there
/// is no ambient global instance.
pub struct Store {
    api: ApiClient,
    state: Mutex<AppState>,
}

impl Store {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(AppState::default()),
        }
    }

    /// Cloned snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }

    /// Direct access for view-level calls outside store state (service
    /// status, single category lookup).
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn apply(&self, update: Update) {
        self.state.lock().unwrap().apply(update);
    }

    /// On 401 the client already purged the token; no error message is
    /// recorded, the `session_expired` flag carries the redirect signal to
    /// the view instead.
    fn record_failure(&self, error: &ApiError) {
        if matches!(error, ApiError::Unauthorized) {
            self.apply(Update::SessionExpired);
        } else {
            self.apply(Update::SetError(Some(error.to_string())));
        }
    }

    // Contact actions

    pub async fn load_contacts(&self, page: u32, size: u32) {
        self.apply(Update::SetLoading(true));
        match self.api.list_contacts(page, size).await {
            Ok(result) => self.apply(Update::SetContacts(result)),
            Err(error) => self.record_failure(&error),
        }
    }

    pub async fn load_contact(&self, id: i64) {
        self.apply(Update::SetLoading(true));
        match self.api.get_contact(id).await {
            Ok(contact) => self.apply(Update::SetCurrentContact(contact)),
            Err(error) => self.record_failure(&error),
        }
    }

    pub async fn create_contact(&self, data: &ContactRequest) -> Result<Contact, ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.create_contact(data).await {
            Ok(contact) => {
                tracing::info!(id = contact.id, "contact created");
                self.apply(Update::AddContact(contact.clone()));
                Ok(contact)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    pub async fn update_contact(&self, id: i64, data: &ContactRequest) -> Result<Contact, ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.update_contact(id, data).await {
            Ok(contact) => {
                self.apply(Update::ReplaceContact(contact.clone()));
                Ok(contact)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    pub async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.delete_contact(id).await {
            Ok(()) => {
                tracing::info!(id, "contact deleted");
                self.apply(Update::RemoveContact(id));
                Ok(())
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    /// Search results are unpaged; the pagination cursor is reset to a
    /// single synthetic page.
    pub async fn search_contacts(&self, term: &str) {
        self.apply(Update::SetLoading(true));
        match self.api.search_contacts(term).await {
            Ok(results) => self.apply(Update::SetContacts(Page::unpaged(results))),
            Err(error) => self.record_failure(&error),
        }
    }

    /// Replaces `contacts` like a search and also hands the list back.
    pub async fn load_favorites(&self) -> Result<Vec<Contact>, ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.favorites().await {
            Ok(results) => {
                self.apply(Update::SetContacts(Page::unpaged(results.clone())));
                Ok(results)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    pub async fn load_contacts_by_category(&self, category_id: i64) {
        self.apply(Update::SetLoading(true));
        match self.api.contacts_by_category(category_id).await {
            Ok(results) => self.apply(Update::SetContacts(Page::unpaged(results))),
            Err(error) => self.record_failure(&error),
        }
    }

    pub async fn toggle_favorite(&self, id: i64, value: bool) -> Result<Contact, ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.set_favorite(id, value).await {
            Ok(contact) => {
                self.apply(Update::ReplaceContact(contact.clone()));
                Ok(contact)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    // Category actions

    pub async fn load_categories(&self) {
        self.apply(Update::SetLoading(true));
        match self.api.list_categories().await {
            Ok(categories) => self.apply(Update::SetCategories(categories)),
            Err(error) => self.record_failure(&error),
        }
    }

    pub async fn create_category(&self, data: &CategoryRequest) -> Result<Category, ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.create_category(data).await {
            Ok(category) => {
                self.apply(Update::AddCategory(category.clone()));
                Ok(category)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    pub async fn update_category(
        &self,
        id: i64,
        data: &CategoryRequest,
    ) -> Result<Category, ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.update_category(id, data).await {
            Ok(category) => {
                self.apply(Update::ReplaceCategory(category.clone()));
                Ok(category)
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.apply(Update::SetLoading(true));
        match self.api.delete_category(id).await {
            Ok(()) => {
                self.apply(Update::RemoveCategory(id));
                Ok(())
            }
            Err(error) => {
                self.record_failure(&error);
                Err(error)
            }
        }
    }

    // Stats and synchronous actions

    pub async fn load_stats(&self) {
        self.apply(Update::SetLoading(true));
        match self.api.stats().await {
            Ok(stats) => self.apply(Update::SetStats(stats)),
            Err(error) => self.record_failure(&error),
        }
    }

    pub fn set_filters(&self, update: FilterUpdate) {
        self.apply(Update::SetFilters(update));
    }

    pub fn clear_error(&self) {
        self.apply(Update::SetError(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{delete, get, patch, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn contact(id: i64, nombre: &str, favorito: bool) -> Contact {
        serde_json::from_value(contact_json(id, nombre, favorito)).unwrap()
    }

    fn contact_json(id: i64, nombre: &str, favorito: bool) -> serde_json::Value {
        json!({
            "id": id,
            "nombre": nombre,
            "telefono": "5551234",
            "favorito": favorito
        })
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn store_for(router: Router) -> (Store, tempfile::TempDir) {
        let base = serve(router).await;
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.url = base;
        let api = ApiClient::new(&config, dir.path().join("config.toml")).unwrap();
        (Store::new(api), dir)
    }

    fn two_contact_page() -> serde_json::Value {
        json!({
            "content": [contact_json(1, "Ana", false), contact_json(2, "Luis", true)],
            "page": 0,
            "size": 10,
            "totalElements": 2,
            "totalPages": 1
        })
    }

    // Reducer unit tests

    #[test]
    fn reducer_prepends_created_contacts() {
        let mut state = AppState::default();
        state.contacts = vec![contact(1, "Ana", false), contact(2, "Luis", false)];
        state.loading = true;

        state.apply(Update::AddContact(contact(3, "Eva", false)));
        let ids: Vec<i64> = state.contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(!state.loading);
    }

    #[test]
    fn reducer_replaces_by_id_preserving_order() {
        let mut state = AppState::default();
        state.contacts = vec![
            contact(1, "Ana", false),
            contact(2, "Luis", false),
            contact(3, "Eva", false),
        ];

        state.apply(Update::ReplaceContact(contact(2, "Luisa", true)));
        let names: Vec<&str> = state.contacts.iter().map(|c| c.nombre.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Luisa", "Eva"]);
        assert!(state.contacts[1].favorito);
    }

    #[test]
    fn reducer_removes_by_id() {
        let mut state = AppState::default();
        state.contacts = vec![
            contact(1, "Ana", false),
            contact(2, "Luis", false),
            contact(3, "Eva", false),
        ];

        state.apply(Update::RemoveContact(2));
        let ids: Vec<i64> = state.contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn reducer_replace_of_unknown_id_changes_nothing() {
        let mut state = AppState::default();
        state.contacts = vec![contact(1, "Ana", false)];
        state.apply(Update::ReplaceContact(contact(9, "Nadie", false)));
        assert_eq!(state.contacts[0].nombre, "Ana");
        assert_eq!(state.contacts.len(), 1);
    }

    #[test]
    fn reducer_error_clears_loading() {
        let mut state = AppState::default();
        state.loading = true;
        state.apply(Update::SetError(Some("falló".into())));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("falló"));

        state.apply(Update::SetError(None));
        assert_eq!(state.error, None);
    }

    #[test]
    fn reducer_category_variants() {
        let cat = |id: i64, nombre: &str| Category {
            id,
            nombre: nombre.into(),
            color: None,
            descripcion: None,
        };
        let mut state = AppState::default();
        state.apply(Update::SetCategories(vec![cat(1, "Trabajo"), cat(2, "Familia")]));
        state.apply(Update::AddCategory(cat(3, "Gimnasio")));
        assert_eq!(state.categories[0].id, 3);

        state.apply(Update::ReplaceCategory(cat(2, "Amigos")));
        assert_eq!(state.categories[2].nombre, "Amigos");

        state.apply(Update::RemoveCategory(1));
        let ids: Vec<i64> = state.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    // Scenario tests against the stub service

    #[tokio::test]
    async fn load_contacts_replaces_contacts_and_pagination() {
        let router = Router::new().route("/contactos", get(|| async { Json(two_contact_page()) }));
        let (store, _dir) = store_for(router).await;

        store.load_contacts(0, 10).await;

        let state = store.state();
        assert_eq!(state.contacts, vec![contact(1, "Ana", false), contact(2, "Luis", true)]);
        assert_eq!(state.pagination.page, 0);
        assert_eq!(state.pagination.size, 10);
        assert_eq!(state.pagination.total_elements, 2);
        assert_eq!(state.pagination.total_pages, 1);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failed_load_keeps_stale_contacts_and_records_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/contactos",
            get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Json(two_contact_page()).into_response()
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"message": "caído"})),
                        )
                            .into_response()
                    }
                }
            }),
        );
        let (store, _dir) = store_for(router).await;

        store.load_contacts(0, 10).await;
        store.load_contacts(1, 10).await;

        let state = store.state();
        assert_eq!(state.contacts.len(), 2, "stale page is kept");
        assert_eq!(state.pagination.page, 0);
        assert!(state.error.is_some());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn load_contact_replaces_the_current_contact() {
        let router = Router::new().route(
            "/contactos/{id}",
            get(|| async { Json(contact_json(1, "Ana", false)) }),
        );
        let (store, _dir) = store_for(router).await;

        store.load_contact(1).await;

        let state = store.state();
        assert_eq!(state.current_contact, Some(contact(1, "Ana", false)));
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failed_load_contact_keeps_the_previous_current_contact() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/contactos/{id}",
            get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Json(contact_json(1, "Ana", false)).into_response()
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"message": "caído"})),
                        )
                            .into_response()
                    }
                }
            }),
        );
        let (store, _dir) = store_for(router).await;

        store.load_contact(1).await;
        store.load_contact(2).await;

        let state = store.state();
        assert_eq!(
            state.current_contact,
            Some(contact(1, "Ana", false)),
            "stale contact is kept"
        );
        assert!(state.error.is_some());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn create_contact_prepends_and_returns_it() {
        let router = Router::new().route(
            "/contactos",
            get(|| async { Json(two_contact_page()) })
                .post(|| async { Json(contact_json(9, "Eva", false)) }),
        );
        let (store, _dir) = store_for(router).await;
        store.load_contacts(0, 10).await;

        let data = ContactRequest {
            nombre: "Eva".into(),
            telefono: "5559999".into(),
            ..Default::default()
        };
        let created = store.create_contact(&data).await.unwrap();
        assert_eq!(created.id, 9);

        let ids: Vec<i64> = store.state().contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![9, 1, 2]);
    }

    #[tokio::test]
    async fn delete_contact_removes_by_id() {
        let router = Router::new()
            .route("/contactos", get(|| async { Json(two_contact_page()) }))
            .route("/contactos/{id}", delete(|| async { StatusCode::NO_CONTENT }));
        let (store, _dir) = store_for(router).await;
        store.load_contacts(0, 10).await;

        store.delete_contact(1).await.unwrap();

        let state = store.state();
        let ids: Vec<i64> = state.contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn toggle_favorite_applies_the_server_representation() {
        let router = Router::new()
            .route("/contactos", get(|| async { Json(two_contact_page()) }))
            .route(
                "/contactos/{id}/favorito",
                patch(|| async { Json(contact_json(1, "Ana", true)) }),
            );
        let (store, _dir) = store_for(router).await;
        store.load_contacts(0, 10).await;

        let updated = store.toggle_favorite(1, true).await.unwrap();
        assert!(updated.favorito);

        let state = store.state();
        assert!(state.contacts[0].favorito);
        assert_eq!(state.contacts[1], contact(2, "Luis", true));
    }

    #[tokio::test]
    async fn search_resets_pagination_to_a_synthetic_page() {
        let router = Router::new().route(
            "/contactos/buscar",
            get(|| async { Json(json!([contact_json(5, "Marta", false)])) }),
        );
        let (store, _dir) = store_for(router).await;

        store.search_contacts("mar").await;

        let state = store.state();
        assert_eq!(state.contacts.len(), 1);
        assert_eq!(state.pagination.page, 0);
        assert_eq!(state.pagination.size, 10);
        assert_eq!(state.pagination.total_elements, 1);
        assert_eq!(state.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn load_by_category_uses_the_same_synthetic_page_contract() {
        let router = Router::new().route(
            "/contactos/categoria/{id}",
            get(|| async {
                Json(json!([
                    contact_json(4, "Pedro", false),
                    contact_json(7, "Sara", false)
                ]))
            }),
        );
        let (store, _dir) = store_for(router).await;

        store.load_contacts_by_category(3).await;

        let state = store.state();
        let ids: Vec<i64> = state.contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 7]);
        assert_eq!(state.pagination.total_elements, 2);
        assert_eq!(state.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn load_favorites_replaces_contacts_and_returns_the_list() {
        let router = Router::new().route(
            "/contactos/favoritos",
            get(|| async { Json(json!([contact_json(2, "Luis", true)])) }),
        );
        let (store, _dir) = store_for(router).await;

        let favorites = store.load_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);

        let state = store.state();
        assert_eq!(state.contacts, favorites);
        assert_eq!(state.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn unauthorized_takes_the_redirect_path_not_the_error_path() {
        // No token is stored here; the 401 must still be visible to the
        // view through the flag, not only through token disappearance.
        let router = Router::new().route(
            "/contactos",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"message": "expirado"}))) }),
        );
        let (store, _dir) = store_for(router).await;

        store.load_contacts(0, 10).await;

        let state = store.state();
        assert_eq!(state.error, None, "401 is handled by redirect, not error state");
        assert!(state.session_expired);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn successful_load_leaves_the_session_flag_unset() {
        let router = Router::new().route("/contactos", get(|| async { Json(two_contact_page()) }));
        let (store, _dir) = store_for(router).await;

        store.load_contacts(0, 10).await;
        assert!(!store.state().session_expired);
    }

    #[tokio::test]
    async fn mutating_failure_is_recorded_and_reraised() {
        let router = Router::new().route(
            "/contactos",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "caído"})),
                )
            }),
        );
        let (store, _dir) = store_for(router).await;

        let data = ContactRequest {
            nombre: "Eva".into(),
            telefono: "5559999".into(),
            ..Default::default()
        };
        let error = store.create_contact(&data).await.unwrap_err();
        assert!(matches!(error, ApiError::Server { status: 500, .. }));
        assert!(store.state().error.is_some());
        assert!(!store.state().loading);
    }

    #[tokio::test]
    async fn aborting_an_in_flight_load_skips_the_reducer_step() {
        let router = Router::new().route(
            "/contactos",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(two_contact_page())
            }),
        );
        let (store, _dir) = store_for(router).await;
        let store = Arc::new(store);

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.load_contacts(0, 10).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        task.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let state = store.state();
        assert!(state.contacts.is_empty());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn category_crud_mirrors_the_contact_contract() {
        let router = Router::new()
            .route(
                "/categorias",
                get(|| async {
                    Json(json!([
                        {"id": 1, "nombre": "Trabajo"},
                        {"id": 2, "nombre": "Familia"}
                    ]))
                })
                .post(|| async { Json(json!({"id": 3, "nombre": "Gimnasio"})) }),
            )
            .route(
                "/categorias/{id}",
                axum::routing::put(|| async {
                    Json(json!({"id": 2, "nombre": "Amigos", "color": "#3498db"}))
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
            );
        let (store, _dir) = store_for(router).await;

        store.load_categories().await;
        assert_eq!(store.state().categories.len(), 2);

        let data = CategoryRequest {
            nombre: "Gimnasio".into(),
            ..Default::default()
        };
        store.create_category(&data).await.unwrap();
        assert_eq!(store.state().categories[0].id, 3);

        store.update_category(2, &data).await.unwrap();
        let state = store.state();
        assert_eq!(state.categories[2].nombre, "Amigos");
        assert_eq!(state.categories[2].color.as_deref(), Some("#3498db"));

        store.delete_category(1).await.unwrap();
        let ids: Vec<i64> = store.state().categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn load_stats_replaces_stats_wholesale() {
        let router = Router::new().route(
            "/contactos/estadisticas",
            get(|| async {
                Json(json!({
                    "totalContactos": 12,
                    "totalFavoritos": 3,
                    "contactosConEmail": 8,
                    "contactosConTelefono": 12,
                    "porCategoria": {"Trabajo": 5, "Familia": 4},
                    "contactosRecientes": [contact_json(12, "Iris", false)]
                }))
            }),
        );
        let (store, _dir) = store_for(router).await;

        store.load_stats().await;

        let state = store.state();
        let stats = state.stats.unwrap();
        assert_eq!(stats.total_contactos, 12);
        assert_eq!(stats.total_favoritos, 3);
        assert_eq!(stats.por_categoria.get("Trabajo"), Some(&5));
        assert_eq!(stats.contactos_recientes.len(), 1);
        assert!(!state.loading);
    }

    #[test]
    fn set_filters_and_clear_error_are_synchronous() {
        let mut config = Config::default();
        config.server.url = "http://localhost:1/api".to_string();
        let api = ApiClient::new(&config, PathBuf::from("unused.toml")).unwrap();
        let store = Store::new(api);

        store.set_filters(FilterUpdate {
            search_term: Some("ana".into()),
            favorites: Some(true),
            ..Default::default()
        });
        let state = store.state();
        assert_eq!(state.filters.search_term, "ana");
        assert!(state.filters.favorites);
        assert_eq!(state.filters.category, None);

        store.apply(Update::SetError(Some("falló".into())));
        store.clear_error();
        assert_eq!(store.state().error, None);
    }
}
