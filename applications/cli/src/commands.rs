/// Command definitions and handlers
use crate::app::App;
use crate::error::Result;
use clap::{Parser, Subcommand};
use encore_core::{
    CatalogItem, CategoryId, EncoreError, EntityKey, EntityType, Favorite, FavoriteFilter,
    FavoriteId, NewCategory, NewFavorite, SearchEntryId,
};
use encore_session::{GuardDecision, Route};
use encore_store::{FavoriteToggle, ToggleOutcome};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore favorites, search history and catalog from the terminal", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the stored session
    Status,
    /// Follow session changes until interrupted
    Watch,
    /// Sign out on the server and clear the local session
    Logout {
        /// Skip the server call
        #[arg(long)]
        local: bool,
    },
    /// Resolve a path through the route guards
    Route {
        /// Path such as /home or /player/track/<id>
        path: String,
    },
    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Manage favorite categories
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Manage search history
    #[command(subcommand)]
    History(HistoryCommand),
    /// Browse the catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List favorites
    List {
        /// Only this entity type (track, artist, album)
        #[arg(long = "type")]
        entity_type: Option<EntityType>,
        /// Only this category id
        #[arg(long)]
        category: Option<i64>,
    },
    /// Show aggregate counts
    Summary,
    /// List favorites grouped by category
    Grouped,
    /// Add the entity if it is not a favorite, remove it otherwise
    Toggle {
        /// Entity type, or a share link / spotify: URI on its own
        #[arg(value_name = "TYPE|LINK")]
        target: String,
        id: Option<String>,
        /// Category for a newly added favorite
        #[arg(long)]
        category: Option<i64>,
    },
    /// Remove the favorite recorded for an entity
    Remove { entity_type: EntityType, id: String },
    /// Move a favorite to a category (uncategorized when omitted)
    Move {
        id: i64,
        #[arg(long)]
        category: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    List,
    /// Create a category
    Create {
        name: String,
        #[arg(long, default_value = "#1db954")]
        color: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename or recolor a category
    Update {
        id: i64,
        name: String,
        #[arg(long, default_value = "#1db954")]
        color: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a category
    Delete {
        id: i64,
        /// Delete its favorites instead of moving them to uncategorized
        #[arg(long)]
        delete_favorites: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List past searches
    List,
    /// Record a search
    Add { query: String },
    /// Delete a past search
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Latest album releases
    NewReleases,
    /// Search tracks, albums and artists
    Search {
        query: String,
        /// Do not record the query in search history
        #[arg(long)]
        no_history: bool,
    },
    /// Look up one track, album or artist
    Describe {
        /// Entity type, or a share link / spotify: URI on its own
        #[arg(value_name = "TYPE|LINK")]
        target: String,
        id: Option<String>,
    },
}

/// `<type> <id>`, or a share link / URI given alone.
pub fn entity_key(target: &str, id: Option<String>) -> Result<EntityKey> {
    match id {
        Some(id) => Ok(EntityKey::new(id, target.parse::<EntityType>()?)),
        None => EntityKey::from_link(target).ok_or_else(|| {
            EncoreError::invalid_input(format!("not a track, album or artist link: {}", target))
                .into()
        }),
    }
}

/// Run one command against a connected app.
pub async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Status => status(app),
        Commands::Watch => watch(app).await,
        Commands::Logout { local } => logout(app, local).await,
        Commands::Route { path } => {
            let landed = app.guard().enforce(Route::parse(&path), app.navigator.as_ref());
            println!("{}", landed);
            Ok(())
        }
        Commands::Favorites(command) => {
            app.require_session()?;
            favorites(app, command).await
        }
        Commands::Categories(command) => {
            app.require_session()?;
            categories(app, command).await
        }
        Commands::History(command) => {
            app.require_session()?;
            history(app, command).await
        }
        Commands::Catalog(command) => {
            app.require_catalog().await?;
            catalog(app, command).await
        }
    }
}

// ============================================================================
// Session
// ============================================================================

fn status(app: &App) -> Result<()> {
    match app.auth.current_user() {
        Some(user) => println!("Signed in as {} <{}>", user.name(), user.email),
        None => println!("Not signed in"),
    }
    println!(
        "Access token: {}",
        if app.auth.has_access_token() { "present" } else { "missing" }
    );
    match app.guard().check(&Route::Home) {
        GuardDecision::Admit => println!("Home: reachable"),
        GuardDecision::Redirect(to) => println!("Home: redirects to {}", to),
    }
    Ok(())
}

async fn watch(app: &App) -> Result<()> {
    let mut updates = app.auth.subscribe();
    app.auth.start();
    println!("Watching {} (Ctrl-C to stop)", app.storage.path().display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                match current {
                    Some(user) => println!("Signed in as {}", user.email),
                    None => println!("Signed out"),
                }
            }
        }
    }

    app.auth.stop();
    Ok(())
}

async fn logout(app: &App, local: bool) -> Result<()> {
    if local {
        app.auth.logout_local();
    } else if let Err(e) = app.auth.logout().await {
        warn!(error = %e, "Server logout failed");
        println!("Server logout failed ({}); local session cleared", e);
    }
    app.account.clear_credentials().await;

    if let Some(route) = app.navigator.last() {
        println!("Signed out, now at {}", route);
    }
    Ok(())
}

// ============================================================================
// Favorites
// ============================================================================

async fn favorites(app: &App, command: FavoritesCommand) -> Result<()> {
    let store = app.store();

    match command {
        FavoritesCommand::List {
            entity_type,
            category,
        } => {
            let filter = FavoriteFilter {
                entity_type,
                category_id: category.map(CategoryId::new),
            };
            for favorite in store.fetch(filter).await? {
                print_favorite(&favorite);
            }
        }
        FavoritesCommand::Summary => {
            let summary = store.refresh_summary().await?;
            println!("Total:      {}", summary.total_favorites);
            println!("Tracks:     {}", summary.tracks_count);
            println!("Albums:     {}", summary.albums_count);
            println!("Artists:    {}", summary.artists_count);
            println!("Categories: {}", summary.categories_count);
        }
        FavoritesCommand::Grouped => {
            for group in store.grouped().await? {
                let heading = group
                    .category
                    .as_ref()
                    .map_or("Uncategorized", |c| c.name.as_str());
                println!("{} ({})", heading, group.favorites.len());
                for favorite in &group.favorites {
                    print!("  ");
                    print_favorite(favorite);
                }
            }
        }
        FavoritesCommand::Toggle {
            target,
            id,
            category,
        } => {
            let key = entity_key(&target, id)?;
            store.load().await?;
            let request = favorite_request(app, &key, category.map(CategoryId::new)).await?;

            let control = FavoriteToggle::new(store, request, app.config.toggle());
            control.mount();
            let outcome = control.activate().await;
            control.unmount();

            match outcome {
                ToggleOutcome::Toggled { is_favorite: true } => println!("Added {}", key),
                ToggleOutcome::Toggled { is_favorite: false } => println!("Removed {}", key),
                ToggleOutcome::Ignored => println!("Nothing to do for {}", key),
                ToggleOutcome::Failed(e) => return Err(e.into()),
            }
        }
        FavoritesCommand::Remove { entity_type, id } => {
            store.refresh_favorites().await?;
            let key = EntityKey::new(id, entity_type);
            let removed = store.remove_entity(&key).await?;
            println!("Removed favorite {} ({})", removed, key);
        }
        FavoritesCommand::Move { id, category } => {
            store
                .move_favorite(FavoriteId::new(id), category.map(CategoryId::new))
                .await?;
            println!("Moved favorite {}", id);
        }
    }
    Ok(())
}

/// Request carrying catalog metadata when the catalog is reachable, the
/// bare identity otherwise.
async fn favorite_request(
    app: &App,
    key: &EntityKey,
    category: Option<CategoryId>,
) -> Result<NewFavorite> {
    let described = match app.require_catalog().await {
        Ok(()) => app.catalog.describe(key).await.map_err(Into::into),
        Err(e) => Err(e),
    };

    match described {
        Ok(item) => Ok(NewFavorite::from_catalog_item(&item, category)?),
        Err(e) => {
            warn!(key = %key, error = %e, "Catalog lookup failed, saving without metadata");
            let mut request = NewFavorite::new(key.clone(), key.external_id.clone());
            request.category_id = category;
            Ok(request)
        }
    }
}

fn print_favorite(favorite: &Favorite) {
    let by = favorite
        .artist_name
        .as_deref()
        .map(|a| format!(" by {}", a))
        .unwrap_or_default();
    println!(
        "[{}] {:<6} {}{} ({})",
        favorite.id, favorite.entity_type, favorite.display_name, by, favorite.external_id
    );
}

// ============================================================================
// Categories
// ============================================================================

async fn categories(app: &App, command: CategoriesCommand) -> Result<()> {
    let store = app.store();

    match command {
        CategoriesCommand::List => {
            for category in store.refresh_categories().await? {
                println!(
                    "[{}] {} {} ({} favorites)",
                    category.id, category.name, category.color_tag, category.favorites_count
                );
            }
        }
        CategoriesCommand::Create {
            name,
            color,
            description,
        } => {
            let created = store
                .create_category(NewCategory {
                    name,
                    description,
                    color,
                })
                .await?;
            match created {
                Some(category) => println!("Created category {} ({})", category.id, category.name),
                None => println!("Created category"),
            }
        }
        CategoriesCommand::Update {
            id,
            name,
            color,
            description,
        } => {
            store
                .update_category(
                    CategoryId::new(id),
                    NewCategory {
                        name,
                        description,
                        color,
                    },
                )
                .await?;
            println!("Updated category {}", id);
        }
        CategoriesCommand::Delete {
            id,
            delete_favorites,
        } => {
            store
                .delete_category(CategoryId::new(id), !delete_favorites)
                .await?;
            println!("Deleted category {}", id);
        }
    }
    Ok(())
}

// ============================================================================
// Search history
// ============================================================================

async fn history(app: &App, command: HistoryCommand) -> Result<()> {
    let history = app.history();

    match command {
        HistoryCommand::List => {
            for entry in history.refresh().await? {
                println!("[{}] {}", entry.id, entry.query);
            }
        }
        HistoryCommand::Add { query } => {
            match history.record(&query).await? {
                Some(entry) => println!("Recorded search {} ({})", entry.id, entry.query),
                None => println!("Recorded search"),
            }
        }
        HistoryCommand::Delete { id } => {
            history.delete(SearchEntryId::new(id)).await?;
            println!("Deleted search {}", id);
        }
    }
    Ok(())
}

// ============================================================================
// Catalog
// ============================================================================

async fn catalog(app: &App, command: CatalogCommand) -> Result<()> {
    match command {
        CatalogCommand::NewReleases => {
            for item in app.catalog.new_releases().await? {
                print_item(&item);
            }
        }
        CatalogCommand::Search { query, no_history } => {
            let results = app.catalog.search(&query).await?;
            for item in results.favoritable() {
                print_item(item);
            }

            if !no_history && app.auth.is_authenticated() {
                if let Err(e) = app.history().record(&query).await {
                    warn!(error = %e, "Recording search failed");
                }
            }
        }
        CatalogCommand::Describe { target, id } => {
            let item = app.catalog.describe(&entity_key(&target, id)?).await?;
            print_item(&item);
            if let Some(url) = item.primary_image_url() {
                println!("  image: {}", url);
            }
        }
    }
    Ok(())
}

fn print_item(item: &CatalogItem) {
    let artists = item.artist_names();
    if artists.is_empty() {
        println!("{:<6} {} ({})", item.kind, item.name, item.id);
    } else {
        println!("{:<6} {} by {} ({})", item.kind, item.name, artists, item.id);
    }
}
