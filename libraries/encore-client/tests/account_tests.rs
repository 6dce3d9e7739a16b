//! Tests for the account-data API client.
//!
//! These tests use mock servers to verify request shape and response
//! mapping without a real backend.

use encore_client::{AccountClient, AccountConfig, ClientError};
use encore_core::{
    CategoryId, EncoreError, EntityKey, EntityType, FavoriteFilter, FavoriteId, FavoritesApi,
    MoveFavorite, NewCategory, NewFavorite, SearchEntryId, SearchHistoryApi, SessionApi,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JWT: &str = "jwt-abc";
const EMAIL: &str = "listener@example.com";

fn favorite_json(id: i64, external_id: &str, entity_type: u8) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "entityType": entity_type,
        "spotifyId": external_id,
        "entityName": format!("Entity {}", external_id),
        "createdAt": "2024-05-01T10:00:00Z"
    })
}

fn category_json(id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "color": "#ff0000",
        "createdAt": "2024-01-01T00:00:00Z",
        "favoritesCount": 2
    })
}

async fn client_for(server: &MockServer) -> AccountClient {
    let config = AccountConfig::with_token(server.uri(), JWT).user_email(EMAIL);
    AccountClient::new(config).unwrap()
}

// =============================================================================
// Favorites
// =============================================================================

mod favorites {
    use super::*;

    #[tokio::test]
    async fn test_list_sends_bearer_and_email() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/favorites"))
            .and(header("authorization", "Bearer jwt-abc"))
            .and(query_param("email", EMAIL))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                favorite_json(1, "abc", 0),
                favorite_json(2, "def", 2),
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let favorites = client
            .list_favorites(FavoriteFilter::default())
            .await
            .unwrap();

        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].id, FavoriteId::new(1));
        assert_eq!(favorites[1].entity_type, EntityType::Album);
    }

    #[tokio::test]
    async fn test_list_forwards_filters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/favorites"))
            .and(query_param("entityType", "1"))
            .and(query_param("categoryId", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                favorite_json(3, "artist-1", 1),
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let filter = FavoriteFilter {
            entity_type: Some(EntityType::Artist),
            category_id: Some(CategoryId::new(5)),
        };
        let favorites = client.list_favorites(filter).await.unwrap();
        assert_eq!(favorites.len(), 1);
    }

    #[tokio::test]
    async fn test_add_posts_request_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .and(body_json(serde_json::json!({
                "entityType": 0,
                "spotifyId": "abc",
                "entityName": "Song"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(favorite_json(10, "abc", 0)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let request = NewFavorite::new(EntityKey::new("abc", EntityType::Track), "Song");
        let created = client.add_favorite(request).await.unwrap().unwrap();

        assert_eq!(created.id, FavoriteId::new(10));
        assert_eq!(created.external_id, "abc");
    }

    #[tokio::test]
    async fn test_add_accepts_created_without_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let request = NewFavorite::new(EntityKey::new("abc", EntityType::Track), "Song");
        let created = client.add_favorite(request).await.unwrap();

        assert!(created.is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .respond_with(ResponseTemplate::new(201).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let request = NewFavorite::new(EntityKey::new("abc", EntityType::Track), "Song");
        assert!(client.add_favorite(request).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_accepts_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/favorites/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        client.remove_favorite(FavoriteId::new(7)).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_missing_favorite_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/favorites/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client.remove_favorite(FavoriteId::new(99)).await.unwrap_err();
        assert!(err.is_not_found(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_move_puts_target_category() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/favorites/4/move"))
            .and(body_json(serde_json::json!({ "categoryId": 2 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        client
            .move_favorite(
                FavoriteId::new(4),
                MoveFavorite {
                    category_id: Some(CategoryId::new(2)),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_summary_parses_counts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/favorites/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalFavorites": 3,
                "tracksCount": 2,
                "artistsCount": 0,
                "albumsCount": 1,
                "categoriesCount": 1,
                "categories": [category_json(1, "Chill")]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let summary = client.summary().await.unwrap();

        assert_eq!(summary.total_favorites, 3);
        assert_eq!(summary.tracks_count, 2);
        assert_eq!(summary.albums_count, 1);
        assert_eq!(summary.categories[0].name, "Chill");
    }

    #[tokio::test]
    async fn test_grouped_parses_uncategorized_group() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/favorites/grouped"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "category": category_json(1, "Chill"), "favorites": [favorite_json(1, "a", 0)] },
                { "favorites": [favorite_json(2, "b", 0)] }
            ])))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let groups = client.grouped().await.unwrap();

        assert_eq!(groups.len(), 2);
        assert!(groups[0].category.is_some());
        assert!(groups[1].category.is_none());
    }
}

// =============================================================================
// Categories
// =============================================================================

mod categories {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/categories"))
            .and(body_json(serde_json::json!({ "name": "Road trip", "color": "#ff0000" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(category_json(8, "Road trip")))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([category_json(8, "Road trip")])),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let created = client
            .create_category(NewCategory {
                name: "Road trip".into(),
                description: None,
                color: "#ff0000".into(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, CategoryId::new(8));

        let categories = client.list_categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].color_tag, "#ff0000");
    }

    #[tokio::test]
    async fn test_delete_sends_move_flag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/categories/3"))
            .and(query_param("moveFavoritesToUncategorized", "false"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        client
            .delete_category(CategoryId::new(3), false)
            .await
            .unwrap();
    }
}

// =============================================================================
// Search History & Session
// =============================================================================

mod history_and_session {
    use super::*;

    #[tokio::test]
    async fn test_search_history_round() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/UserSearchHistory"))
            .and(body_json(serde_json::json!({ "query": "daft punk" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 11,
                "query": "daft punk"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/UserSearchHistory/11"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let entry = client.add_search("daft punk").await.unwrap().unwrap();
        assert_eq!(entry.id, SearchEntryId::new(11));

        client.delete_search(entry.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_posts_with_bearer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .and(header("authorization", "Bearer jwt-abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        SessionApi::logout(&client, None).await.unwrap();
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/favorites"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let ctx = client.context().await;
        match ctx.favorites().list(FavoriteFilter::default()).await {
            Err(ClientError::AuthRequired) => {}
            other => panic!("Expected AuthRequired, got {:?}", other),
        }

        let err = client
            .list_favorites(FavoriteFilter::default())
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/favorites/summary"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        match client.summary().await {
            Err(EncoreError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected Server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        assert!(matches!(
            client.list_categories().await,
            Err(EncoreError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let ctx = client.context().await;
        match ctx.categories().list().await {
            Err(ClientError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 7),
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = AccountClient::new(AccountConfig::new("http://127.0.0.1:1")).unwrap();
        let err = client
            .list_favorites(FavoriteFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EncoreError::Network(_)));
    }
}
