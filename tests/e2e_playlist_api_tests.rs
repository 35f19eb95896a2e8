//! End-to-end tests for the streaming API client and playlist service
//!
//! Runs against an in-process fake of the streaming service's web API.

mod common;

use common::{
    playlist_service, spotify_client, FakeStreamingService, PLAYLIST_ID, TEST_TOKEN, TRACK_1_ID,
    TRACK_1_NAME, TRACK_2_ID, TRACK_3_ID, TRACK_3_NAME, TRACK_3_UNAVAILABLE_ID,
};
use streaming_playlist_maker::playlist::{PlaylistApi, Track};

#[tokio::test]
async fn test_list_playlist_follows_pages() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID, TRACK_2_ID, TRACK_3_ID, TRACK_1_ID, TRACK_2_ID]);
    let client = spotify_client(&service, TEST_TOKEN);

    let tracks = client.list_playlist(PLAYLIST_ID).await.unwrap();

    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![TRACK_1_ID, TRACK_2_ID, TRACK_3_ID, TRACK_1_ID, TRACK_2_ID]);
    assert_eq!(tracks[0].name, TRACK_1_NAME);
}

#[tokio::test]
async fn test_list_liked() {
    let service = FakeStreamingService::spawn().await;
    service.set_liked(&[TRACK_3_ID, TRACK_2_ID, TRACK_1_ID]);
    let client = spotify_client(&service, TEST_TOKEN);

    let tracks = client.list_liked().await.unwrap();

    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0].name, TRACK_3_NAME);
}

#[tokio::test]
async fn test_wrong_token_is_an_error() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID]);
    let client = spotify_client(&service, "stale-token");

    let err = client.list_playlist(PLAYLIST_ID).await.unwrap_err();

    assert!(err.to_string().contains("401"), "{}", err);
}

#[tokio::test]
async fn test_missing_playlist_is_an_error() {
    let service = FakeStreamingService::spawn().await;
    let client = spotify_client(&service, TEST_TOKEN);

    assert!(client.list_playlist("nope").await.is_err());
}

#[tokio::test]
async fn test_add_and_remove() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID, TRACK_2_ID, TRACK_1_ID]);
    let client = spotify_client(&service, TEST_TOKEN);

    client.add_to_playlist(PLAYLIST_ID, TRACK_3_ID).await.unwrap();
    assert_eq!(
        service.playlist(PLAYLIST_ID),
        vec![TRACK_1_ID, TRACK_2_ID, TRACK_1_ID, TRACK_3_ID]
    );

    // Removal drops every occurrence of the id
    client.remove_from_playlist(PLAYLIST_ID, TRACK_1_ID).await.unwrap();
    assert_eq!(service.playlist(PLAYLIST_ID), vec![TRACK_2_ID, TRACK_3_ID]);
}

#[tokio::test]
async fn test_add_unknown_track_is_an_error() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[]);
    let client = spotify_client(&service, TEST_TOKEN);

    assert!(client.add_to_playlist(PLAYLIST_ID, "ghost").await.is_err());
    assert!(service.playlist(PLAYLIST_ID).is_empty());
}

#[tokio::test]
async fn test_search_strips_featuring() {
    let service = FakeStreamingService::spawn().await;
    let client = spotify_client(&service, TEST_TOKEN);

    let found = client
        .search("Daft Punk feat. Pharrell Williams - Get Lucky")
        .await
        .unwrap();

    let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![TRACK_3_ID, TRACK_3_UNAVAILABLE_ID]);
    assert!(found[0].is_available_in("pl"));
    assert!(!found[1].is_available_in("PL"));
    assert_eq!(service.searches(), 1);
}

#[tokio::test]
async fn test_service_caches_listing() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID, TRACK_2_ID]);
    let playlists = playlist_service(&service);

    let (first, cached) = playlists.list_playlist(PLAYLIST_ID).await.unwrap();
    assert!(!cached);
    assert_eq!(first.len(), 2);

    // Changes made behind the cache's back are not seen
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID]);
    let (second, cached) = playlists.list_playlist(PLAYLIST_ID).await.unwrap();
    assert!(cached);
    assert_eq!(second, first);

    playlists.refresh(PLAYLIST_ID).await.unwrap();
    let (third, cached) = playlists.list_playlist(PLAYLIST_ID).await.unwrap();
    assert!(cached);
    assert_eq!(third.len(), 1);
}

#[tokio::test]
async fn test_service_mirrors_mutations_into_cache() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID]);
    let playlists = playlist_service(&service);
    playlists.list_playlist(PLAYLIST_ID).await.unwrap();

    let track = Track::new(TRACK_2_ID, "Dua Lipa", "Levitating");
    playlists.add(PLAYLIST_ID, &track).await.unwrap();
    assert_eq!(
        playlists.cache().get(PLAYLIST_ID),
        vec![Track::new(TRACK_1_ID, "Taylor Swift", "Blank Space"), track.clone()]
    );

    playlists.remove(PLAYLIST_ID, &track).await.unwrap();
    assert_eq!(playlists.cache().get(PLAYLIST_ID).len(), 1);
    assert_eq!(service.playlist(PLAYLIST_ID), vec![TRACK_1_ID]);
}

#[tokio::test]
async fn test_failed_add_is_undone_in_cache() {
    let service = FakeStreamingService::spawn().await;
    service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID]);
    let playlists = playlist_service(&service);
    playlists.list_playlist(PLAYLIST_ID).await.unwrap();

    let ghost = Track::new("ghost", "Nobody", "Nothing");
    assert!(playlists.add(PLAYLIST_ID, &ghost).await.is_err());

    assert_eq!(playlists.cache().get(PLAYLIST_ID).len(), 1);
}
