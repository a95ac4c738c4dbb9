mod common;

use campground_scan::{ScanError, SearchTarget, resolve_campgrounds};
use common::{MockFinder, facility};

fn finder() -> MockFinder {
    let mut finder = MockFinder::with_facilities(&[
        facility(232447, "Upper Pines"),
        facility(232450, "Lower Pines"),
    ]);
    finder.campsite_facilities.insert(1001, facility(232447, "Upper Pines"));
    finder.campsite_facilities.insert(1002, facility(232447, "Upper Pines"));
    finder.rec_areas.insert(
        2991,
        vec![facility(232447, "Upper Pines"), facility(232450, "Lower Pines")],
    );
    finder.rec_areas.insert(2907, vec![facility(232463, "Moraine Park")]);
    finder
}

fn ids(facilities: &[campground_scan::Facility]) -> Vec<i64> {
    let mut ids: Vec<i64> = facilities.iter().map(|f| f.facility_id).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_campsites_take_precedence_over_campgrounds() {
    let finder = finder();
    let target = SearchTarget {
        campsites: vec![1001],
        campgrounds: vec![232450],
        recreation_areas: vec![2907],
    };

    let facilities = resolve_campgrounds(&finder, &target).await.unwrap();

    assert_eq!(ids(&facilities), vec![232447]);
    assert_eq!(
        finder.lookups(),
        vec!["find_campgrounds campsites=[1001] campgrounds=[]".to_string()]
    );
}

#[tokio::test]
async fn test_campgrounds_take_precedence_over_recreation_areas() {
    let finder = finder();
    let target = SearchTarget {
        campgrounds: vec![232450],
        recreation_areas: vec![2907],
        ..Default::default()
    };

    let facilities = resolve_campgrounds(&finder, &target).await.unwrap();
    assert_eq!(ids(&facilities), vec![232450]);
}

#[tokio::test]
async fn test_duplicate_campgrounds_collapse() {
    let finder = finder();
    let target = SearchTarget {
        campgrounds: vec![232447, 232447],
        ..Default::default()
    };

    let facilities = resolve_campgrounds(&finder, &target).await.unwrap();
    assert_eq!(ids(&facilities), vec![232447]);
}

#[tokio::test]
async fn test_campsites_in_the_same_campground_collapse() {
    let finder = finder();
    let target = SearchTarget {
        campsites: vec![1001, 1002],
        ..Default::default()
    };

    let facilities = resolve_campgrounds(&finder, &target).await.unwrap();
    assert_eq!(ids(&facilities), vec![232447]);
}

#[tokio::test]
async fn test_recreation_areas_are_concatenated() {
    let finder = finder();
    let target = SearchTarget {
        recreation_areas: vec![2991, 2907, 2991],
        ..Default::default()
    };

    let facilities = resolve_campgrounds(&finder, &target).await.unwrap();
    assert_eq!(ids(&facilities), vec![232447, 232450, 232463]);
    assert_eq!(finder.lookups().len(), 3);
}

#[tokio::test]
async fn test_empty_target_is_rejected() {
    let finder = finder();
    let result = resolve_campgrounds(&finder, &SearchTarget::default()).await;

    assert!(matches!(result, Err(ScanError::NoSearchTarget)));
    assert!(finder.lookups().is_empty());
}

#[tokio::test]
async fn test_lookup_errors_propagate() {
    let finder = finder();
    let target = SearchTarget {
        campgrounds: vec![1],
        ..Default::default()
    };

    let result = resolve_campgrounds(&finder, &target).await;
    assert!(matches!(result, Err(ScanError::NotFound)));
}
