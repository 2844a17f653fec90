//! Store behavior tests.
//!
//! Tests verify:
//! - The walkthrough scenario: empty store, two z planes, matching queries
//! - Each coordinate is materialized at most once
//! - Per-axis maxima never decrease and only move for axes in the request
//! - Matching returns exactly the cached images satisfying the pattern
//! - Source failures leave the store untouched

use std::collections::HashSet;
use std::sync::Arc;

use plane_store::{Coords, Image, SourceError, StoreError};

use super::test_utils::{at, gray_plane, mock_store, MockImageSource};

fn coord_set(images: &[Image]) -> HashSet<Coords> {
    images.iter().map(|i| i.coords().clone()).collect()
}

// =============================================================================
// Walkthrough
// =============================================================================

#[tokio::test]
async fn test_z_stack_walkthrough() {
    let (store, _source, _publisher) = mock_store(MockImageSource::new());

    assert!(store.get_axes().await.is_empty());

    store.get_image(&at("z=0,channel=0")).await.unwrap();
    assert_eq!(store.get_max_index("z").await, Some(0));

    store.get_image(&at("z=2,channel=0")).await.unwrap();
    assert_eq!(store.get_max_index("z").await, Some(2));
    assert_eq!(store.get_max_index("channel").await, Some(0));

    let by_channel = store.get_images_matching(&at("channel=0")).await;
    assert_eq!(
        coord_set(&by_channel),
        HashSet::from([at("z=0,channel=0"), at("z=2,channel=0")])
    );

    assert!(store.get_images_matching(&at("z=5")).await.is_empty());
}

// =============================================================================
// Cache Idempotence
// =============================================================================

#[tokio::test]
async fn test_repeated_requests_snap_once() {
    let (store, source, _publisher) = mock_store(MockImageSource::new());
    let coords = at("time=1,z=3");

    let first = store.get_image(&coords).await.unwrap();
    for _ in 0..5 {
        let again = store.get_image(&coords).await.unwrap();
        assert!(again.shares_pixels_with(&first));
        assert!(again.shares_metadata_with(&first));
        assert_eq!(again.coords(), &coords);
    }

    assert_eq!(source.snap_count(), 1);
    assert_eq!(store.stats().hits, 5);
    assert_eq!(store.stats().misses, 1);
}

#[tokio::test]
async fn test_equal_coords_built_differently_hit_cache() {
    let (store, source, _publisher) = mock_store(MockImageSource::new());

    store
        .get_image(&Coords::builder().z(1).channel(2).build())
        .await
        .unwrap();
    store
        .get_image(&Coords::builder().channel(2).z(1).build())
        .await
        .unwrap();

    assert_eq!(source.snap_count(), 1);
}

#[tokio::test]
async fn test_source_metadata_is_kept() {
    let (store, _source, _publisher) =
        mock_store(MockImageSource::new().then_plane(gray_plane(8, 2, 7, 42)));

    let image = store.get_image(&at("position=3")).await.unwrap();

    assert_eq!(image.metadata().image_number, Some(42));
    assert_eq!(image.metadata().camera.as_deref(), Some("Mock"));
    assert_eq!(image.width(), 8);
    assert_eq!(image.intensity_at(7, 1).unwrap(), 7);
}

// =============================================================================
// Monotonic Maximum
// =============================================================================

#[tokio::test]
async fn test_max_index_is_monotonic() {
    let (store, _source, _publisher) = mock_store(MockImageSource::new());

    let sequence = [
        "time=3,z=1",
        "time=1,z=4",
        "channel=2",
        "time=0,z=0,channel=0",
        "time=5",
        "z=2,channel=1",
    ];

    let mut seen: Vec<Coords> = Vec::new();
    for text in sequence {
        let coords = at(text);
        let before = store.max_coords().await;

        store.get_image(&coords).await.unwrap();
        seen.push(coords.clone());

        let after = store.max_coords().await;
        for axis in before.axes() {
            if coords.position_at(axis).is_some() {
                assert!(after.position_at(axis) >= before.position_at(axis));
            } else {
                assert_eq!(after.position_at(axis), before.position_at(axis));
            }
        }

        // Each maximum equals the true maximum over everything inserted so far
        for axis in after.axes() {
            let truth = seen.iter().filter_map(|c| c.position_at(axis)).max();
            assert_eq!(after.position_at(axis), truth, "axis {}", axis);
        }
    }

    assert_eq!(store.max_coords().await, at("time=5,z=4,channel=2"));
    assert_eq!(store.get_axes().await, vec!["channel", "time", "z"]);
    assert_eq!(store.get_max_index("position").await, None);
}

// =============================================================================
// Matching
// =============================================================================

#[tokio::test]
async fn test_matching_returns_exact_set() {
    let (store, _source, _publisher) = mock_store(MockImageSource::new());

    let mut all = Vec::new();
    for t in 0..3 {
        for c in 0..2 {
            for z in 0..2 {
                let coords = Coords::builder().time(t).channel(c).z(z).build();
                store.get_image(&coords).await.unwrap();
                all.push(coords);
            }
        }
    }

    let patterns = [
        "channel=1",
        "time=2,z=0",
        "time=1,channel=0,z=1",
        "time=7",
        "position=0",
    ];
    for text in patterns {
        let pattern = at(text);
        let expected: HashSet<Coords> = all
            .iter()
            .filter(|c| c.matches(&pattern))
            .cloned()
            .collect();
        let found = store.get_images_matching(&pattern).await;

        assert_eq!(found.len(), expected.len(), "pattern {}", text);
        assert_eq!(coord_set(&found), expected, "pattern {}", text);
    }
}

#[tokio::test]
async fn test_empty_pattern_returns_everything() {
    let (store, _source, _publisher) = mock_store(MockImageSource::new());

    assert!(store.get_images_matching(&Coords::default()).await.is_empty());

    for z in 0..4 {
        store.get_image(&Coords::builder().z(z).build()).await.unwrap();
    }
    store.get_image(&Coords::default()).await.unwrap();

    let everything = store.get_images_matching(&Coords::default()).await;
    assert_eq!(everything.len(), 5);
    assert_eq!(everything.len(), store.len().await);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_failed_snap_then_retry() {
    let (store, source, _publisher) =
        mock_store(MockImageSource::new().then_fail("shutter jammed"));
    let coords = at("time=9,channel=1");

    let err = store.get_image(&coords).await.unwrap_err();
    assert!(matches!(err, StoreError::SourceUnavailable(_)));
    assert!(err.to_string().contains("shutter jammed"));

    assert!(!store.contains(&coords).await);
    assert!(store.is_empty().await);
    assert!(store.get_axes().await.is_empty());

    let image = store.get_image(&coords).await.unwrap();
    assert_eq!(image.coords(), &coords);
    assert_eq!(source.snap_count(), 2);
    assert_eq!(store.get_max_index("time").await, Some(9));
    assert_eq!(store.stats().failures, 1);
}

#[tokio::test]
async fn test_failure_does_not_disturb_existing_entries() {
    let (store, _source, _publisher) = mock_store(
        MockImageSource::new()
            .then_plane(gray_plane(4, 4, 1, 1))
            .then_fail("camera unplugged"),
    );

    let kept = store.get_image(&at("z=1")).await.unwrap();
    assert!(store.get_image(&at("z=8")).await.is_err());

    assert_eq!(store.len().await, 1);
    assert_eq!(store.get_max_index("z").await, Some(1));
    assert!(store
        .get_image(&at("z=1"))
        .await
        .unwrap()
        .shares_pixels_with(&kept));
}

#[tokio::test]
async fn test_exhausted_source_keeps_cached_planes() {
    let (store, _source, _publisher) = mock_store(MockImageSource::new().with_limit(2));

    store.get_image(&at("time=0")).await.unwrap();
    store.get_image(&at("time=1")).await.unwrap();

    let err = store.get_image(&at("time=2")).await.unwrap_err();
    assert_eq!(err, StoreError::SourceUnavailable(SourceError::Exhausted));

    // Cached planes are still served without asking the source
    assert!(store.get_image(&at("time=1")).await.is_ok());
    assert_eq!(store.source().snap_count(), 3);
    assert_eq!(store.len().await, 2);
    assert_eq!(store.get_max_index("time").await, Some(1));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_requests_for_many_coords() {
    let (store, source, _publisher) = mock_store(MockImageSource::new());
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for round in 0..3 {
        for z in 0..10u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let coords = Coords::builder().z(z).build();
                let image = store.get_image(&coords).await.unwrap();
                (round, image)
            }));
        }
    }
    for handle in handles {
        let (_, image) = handle.await.unwrap();
        // Every image seen by any task is accounted for in the maxima
        let z = image.coords().z().unwrap();
        assert!(store.get_max_index("z").await.unwrap() >= z);
    }

    assert_eq!(source.snap_count(), 10);
    assert_eq!(store.len().await, 10);
    assert_eq!(store.get_max_index("z").await, Some(9));
}

#[tokio::test]
async fn test_insert_preexisting_image() {
    let (store, source, _publisher) = mock_store(MockImageSource::new());

    let image = gray_plane(2, 2, 5, 77).into_image(at("time=4,z=1")).unwrap();
    assert!(store.insert(image.clone()).await.is_none());

    let fetched = store.get_image(&at("z=1,time=4")).await.unwrap();
    assert!(fetched.shares_pixels_with(&image));
    assert_eq!(source.snap_count(), 0);
    assert_eq!(store.get_max_index("time").await, Some(4));
}
