//! In-memory account-data API shared by the store tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use encore_core::{
    CategoryId, CategoryUpdate, EncoreError, EntityKey, EntityType, Favorite, FavoriteCategory,
    FavoriteFilter, FavoriteId, FavoritesApi, FavoritesGroup, FavoritesSummary, MoveFavorite,
    NewCategory, NewFavorite, Result, SearchEntryId, SearchHistoryApi, SearchHistoryEntry,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct State {
    favorites: Vec<Favorite>,
    categories: Vec<FavoriteCategory>,
    searches: Vec<SearchHistoryEntry>,
    next_id: i64,

    add_calls: usize,
    remove_calls: usize,
    list_calls: usize,
    summary_calls: usize,
    search_list_calls: usize,

    fail_adds: bool,
    fail_removes: bool,
    fail_lists: bool,
    empty_created_bodies: bool,
}

/// Fake account-data server.
///
/// Clones share state, so a test can hand one clone to a store and keep
/// another to inspect calls and inject failures.
#[derive(Clone, Default)]
pub struct InMemoryAccount {
    state: Arc<Mutex<State>>,
    add_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl InMemoryAccount {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Seed a favorite directly on the "server"
    pub fn seed(&self, external_id: &str, entity_type: EntityType) -> FavoriteId {
        let mut state = self.state();
        state.next_id += 1;
        let id = FavoriteId::new(state.next_id);
        state.favorites.push(favorite(id, external_id, entity_type));
        id
    }

    /// Seed a category directly on the "server"
    pub fn seed_category(&self, name: &str) -> CategoryId {
        let mut state = self.state();
        state.next_id += 1;
        let id = CategoryId::new(state.next_id);
        state.categories.push(category(id, name));
        id
    }

    /// Delete a favorite behind the client's back
    pub fn delete_on_server(&self, external_id: &str) {
        self.state()
            .favorites
            .retain(|f| f.external_id != external_id);
    }

    /// Make every add wait until the returned handle is notified
    pub fn gate_adds(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.add_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_adds(&self, fail: bool) {
        self.state().fail_adds = fail;
    }

    pub fn fail_removes(&self, fail: bool) {
        self.state().fail_removes = fail;
    }

    pub fn fail_lists(&self, fail: bool) {
        self.state().fail_lists = fail;
    }

    /// Answer creates with an empty body, as some deployments do
    pub fn empty_created_bodies(&self, empty: bool) {
        self.state().empty_created_bodies = empty;
    }

    pub fn add_calls(&self) -> usize {
        self.state().add_calls
    }

    pub fn remove_calls(&self) -> usize {
        self.state().remove_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    pub fn summary_calls(&self) -> usize {
        self.state().summary_calls
    }

    pub fn search_list_calls(&self) -> usize {
        self.state().search_list_calls
    }

    pub fn server_favorites(&self) -> Vec<Favorite> {
        self.state().favorites.clone()
    }

    pub fn server_searches(&self) -> Vec<SearchHistoryEntry> {
        self.state().searches.clone()
    }
}

pub fn favorite(id: FavoriteId, external_id: &str, entity_type: EntityType) -> Favorite {
    Favorite {
        id,
        entity_type,
        external_id: external_id.to_string(),
        display_name: format!("Entity {}", external_id),
        artist_name: None,
        album_name: None,
        duration_ms: None,
        image_url: None,
        created_at: Utc::now(),
        category: None,
    }
}

pub fn category(id: CategoryId, name: &str) -> FavoriteCategory {
    FavoriteCategory {
        id,
        name: name.to_string(),
        description: None,
        color_tag: "#ff0000".to_string(),
        created_at: Utc::now(),
        favorites_count: 0,
    }
}

pub fn track_request(external_id: &str) -> NewFavorite {
    NewFavorite::new(EntityKey::new(external_id, EntityType::Track), "Song")
}

pub fn album_request(external_id: &str) -> NewFavorite {
    NewFavorite::new(EntityKey::new(external_id, EntityType::Album), "Record")
}

fn unavailable() -> EncoreError {
    EncoreError::Server {
        status: 503,
        message: "unavailable".to_string(),
    }
}

#[async_trait]
impl FavoritesApi for InMemoryAccount {
    async fn list_favorites(&self, filter: FavoriteFilter) -> Result<Vec<Favorite>> {
        let mut state = self.state();
        state.list_calls += 1;
        if state.fail_lists {
            return Err(unavailable());
        }
        Ok(state
            .favorites
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect())
    }

    async fn summary(&self) -> Result<FavoritesSummary> {
        let mut state = self.state();
        state.summary_calls += 1;
        if state.fail_lists {
            return Err(unavailable());
        }

        let count = |t: EntityType| {
            state
                .favorites
                .iter()
                .filter(|f| f.entity_type == t)
                .count() as u32
        };
        Ok(FavoritesSummary {
            total_favorites: state.favorites.len() as u32,
            tracks_count: count(EntityType::Track),
            artists_count: count(EntityType::Artist),
            albums_count: count(EntityType::Album),
            categories_count: state.categories.len() as u32,
            categories: state.categories.clone(),
        })
    }

    async fn grouped(&self) -> Result<Vec<FavoritesGroup>> {
        let state = self.state();
        let mut groups: Vec<FavoritesGroup> = state
            .categories
            .iter()
            .map(|c| FavoritesGroup {
                category: Some(c.clone()),
                favorites: state
                    .favorites
                    .iter()
                    .filter(|f| f.category.as_ref().is_some_and(|fc| fc.id == c.id))
                    .cloned()
                    .collect(),
            })
            .collect();
        groups.push(FavoritesGroup {
            category: None,
            favorites: state
                .favorites
                .iter()
                .filter(|f| f.category.is_none())
                .cloned()
                .collect(),
        });
        Ok(groups)
    }

    async fn add_favorite(&self, request: NewFavorite) -> Result<Option<Favorite>> {
        let gate = self.add_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state();
        state.add_calls += 1;
        if state.fail_adds {
            return Err(unavailable());
        }
        if state.favorites.iter().any(|f| f.matches(&request.key())) {
            return Err(EncoreError::Server {
                status: 400,
                message: "already a favorite".to_string(),
            });
        }

        state.next_id += 1;
        let mut created = favorite(
            FavoriteId::new(state.next_id),
            &request.external_id,
            request.entity_type,
        );
        created.display_name = request.display_name;
        created.category = request
            .category_id
            .and_then(|id| state.categories.iter().find(|c| c.id == id).cloned());
        state.favorites.push(created.clone());
        Ok((!state.empty_created_bodies).then_some(created))
    }

    async fn remove_favorite(&self, id: FavoriteId) -> Result<()> {
        let mut state = self.state();
        state.remove_calls += 1;
        if state.fail_removes {
            return Err(unavailable());
        }
        let before = state.favorites.len();
        state.favorites.retain(|f| f.id != id);
        if state.favorites.len() == before {
            return Err(EncoreError::not_found("favorite", id));
        }
        Ok(())
    }

    async fn move_favorite(&self, id: FavoriteId, request: MoveFavorite) -> Result<()> {
        let mut state = self.state();
        let category = request
            .category_id
            .and_then(|cid| state.categories.iter().find(|c| c.id == cid).cloned());
        let favorite = state
            .favorites
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| EncoreError::not_found("favorite", id))?;
        favorite.category = category;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<FavoriteCategory>> {
        Ok(self.state().categories.clone())
    }

    async fn get_category(&self, id: CategoryId) -> Result<FavoriteCategory> {
        self.state()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| EncoreError::not_found("category", id))
    }

    async fn create_category(&self, request: NewCategory) -> Result<Option<FavoriteCategory>> {
        let mut state = self.state();
        state.next_id += 1;
        let mut created = category(CategoryId::new(state.next_id), &request.name);
        created.description = request.description;
        created.color_tag = request.color;
        state.categories.push(created.clone());
        Ok((!state.empty_created_bodies).then_some(created))
    }

    async fn update_category(&self, id: CategoryId, request: CategoryUpdate) -> Result<()> {
        let mut state = self.state();
        let existing = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EncoreError::not_found("category", id))?;
        existing.name = request.name;
        existing.description = request.description;
        existing.color_tag = request.color;
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId, move_to_uncategorized: bool) -> Result<()> {
        let mut state = self.state();
        state.categories.retain(|c| c.id != id);
        let in_category = |f: &Favorite| f.category.as_ref().is_some_and(|c| c.id == id);
        if move_to_uncategorized {
            for favorite in state.favorites.iter_mut().filter(|f| in_category(&**f)) {
                favorite.category = None;
            }
        } else {
            state.favorites.retain(|f| !in_category(f));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchHistoryApi for InMemoryAccount {
    async fn list_searches(&self) -> Result<Vec<SearchHistoryEntry>> {
        let mut state = self.state();
        state.search_list_calls += 1;
        Ok(state.searches.clone())
    }

    async fn add_search(&self, query: &str) -> Result<Option<SearchHistoryEntry>> {
        let mut state = self.state();
        state.next_id += 1;
        let entry = SearchHistoryEntry {
            id: SearchEntryId::new(state.next_id),
            query: query.to_string(),
            user_id: None,
            created_at: None,
            updated_at: None,
        };
        state.searches.push(entry.clone());
        Ok((!state.empty_created_bodies).then_some(entry))
    }

    async fn delete_search(&self, id: SearchEntryId) -> Result<()> {
        let mut state = self.state();
        let before = state.searches.len();
        state.searches.retain(|s| s.id != id);
        if state.searches.len() == before {
            return Err(EncoreError::not_found("search", id));
        }
        Ok(())
    }
}
