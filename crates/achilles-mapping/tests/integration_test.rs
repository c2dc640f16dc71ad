//! Integration tests for entity counters with lifecycle interception.
//!
//! These tests drive the public API end to end: entity metadata with
//! interceptors, a RocksDB counter store, and the counter session.

use std::fmt;

use achilles_mapping::{CounterSession, EntityMeta, Interceptable, InterceptionRecord};
use achilles_storage::{CounterKey, CounterStore};
use achilles_types::{CounterProfile, LifecycleEvent, Settings};
use tempfile::TempDir;

#[derive(Debug, Default)]
struct Playlist {
    owner: String,
    name: String,
    pinned: bool,
    touched: u32,
}

#[derive(Debug, PartialEq)]
struct PinnedPlaylist(String);

impl fmt::Display for PinnedPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "playlist {} is pinned", self.0)
    }
}

impl std::error::Error for PinnedPlaylist {}

fn playlist_meta() -> EntityMeta<Playlist> {
    EntityMeta::new("music.Playlist", |p: &Playlist| {
        format!("{}:{}", p.owner, p.name)
    })
    .with_counter("plays")
    .with_counter("likes")
    .with_interceptor_fn([LifecycleEvent::PreUpdate], |p: &mut Playlist, _| {
        p.touched += 1;
        Ok(())
    })
    .with_interceptor_fn([LifecycleEvent::PreRemove], |p: &mut Playlist, _| {
        if p.pinned {
            return Err(PinnedPlaylist(p.name.clone()).into());
        }
        Ok(())
    })
}

fn playlist(owner: &str, name: &str) -> Playlist {
    Playlist {
        owner: owner.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

fn open_store(tmp: &TempDir, profile: CounterProfile) -> CounterStore {
    let settings = Settings {
        db_path: tmp.path().to_string_lossy().to_string(),
        counter_profile: profile,
        ..Default::default()
    };
    CounterStore::open_with_settings(&settings).expect("Failed to open counter store")
}

#[test]
fn test_counter_lifecycle_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp, CounterProfile::Cql);
    let session = CounterSession::new(&store);
    let meta = playlist_meta();
    let mut road_trip = playlist("ana", "road-trip");

    session.incr(&meta, &mut road_trip, "plays", 5).unwrap();
    session.incr(&meta, &mut road_trip, "likes", 2).unwrap();
    session.decr(&meta, &mut road_trip, "plays", 1).unwrap();
    assert_eq!(road_trip.touched, 3);

    // Primary key with ':' maps onto the raw counter table layout
    let plays = CounterKey::new("music.Playlist", "ana:road-trip", "plays").unwrap();
    assert_eq!(store.get(&plays).unwrap(), Some(4));
    assert_eq!(
        store.entity_counters("music.Playlist", "ana:road-trip").unwrap(),
        vec![("likes".to_string(), 2), ("plays".to_string(), 4)]
    );

    assert_eq!(session.remove(&meta, &mut road_trip).unwrap(), 2);
    assert_eq!(session.load(&meta, &mut road_trip, "plays").unwrap(), None);
}

#[test]
fn test_failing_pre_remove_keeps_counters() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp, CounterProfile::Cql);
    let session = CounterSession::new(&store);
    let meta = playlist_meta();
    let mut favorites = playlist("ben", "favorites");
    favorites.pinned = true;

    session.incr(&meta, &mut favorites, "plays", 9).unwrap();

    let err = session.remove(&meta, &mut favorites).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PinnedPlaylist>(),
        Some(&PinnedPlaylist("favorites".to_string()))
    );
    assert_eq!(session.load(&meta, &mut favorites, "plays").unwrap(), Some(9));
}

#[test]
fn test_direct_dispatch_on_entity_meta() {
    let meta = playlist_meta();
    let mut chill = playlist("cy", "chill");

    let mut record = InterceptionRecord::builder()
        .metadata(&meta)
        .entity(&mut chill)
        .event(LifecycleEvent::PreUpdate)
        .build()
        .unwrap();
    record.trigger_interception().unwrap();
    assert_eq!(chill.touched, 1);

    // No interceptor listens to POST_LOAD
    meta.intercept(&mut chill, LifecycleEvent::PostLoad).unwrap();
    assert_eq!(chill.touched, 1);
}

#[test]
fn test_thrift_profile_session() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp, CounterProfile::Thrift);
    let session = CounterSession::new(&store);
    assert_eq!(session.registry().schema().table_name, "achillesCounterCF");

    let meta = playlist_meta();
    let mut gym = playlist("dee", "gym");
    session.execute("INCR", &meta, &mut gym, "plays", 1).unwrap();
    assert_eq!(
        session.execute("SELECT", &meta, &mut gym, "plays", 0).unwrap(),
        Some(1)
    );
}
