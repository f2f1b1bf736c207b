//! Integration tests for loading artifacts from disk

mod common;

use article_recs_engine::{
    load_artifact_set, ArtifactError, ArtifactKind, ArtifactStore, FsArtifactSource, UserId,
};
use common::{write_artifacts, ArtifactDir};
use ndarray::array;
use std::collections::HashMap;
use std::sync::Arc;

#[test]
fn test_load_from_directory() {
    let artifacts = ArtifactDir::new();
    let source = FsArtifactSource::from_config(&artifacts.config());

    let set = load_artifact_set(&source).unwrap();

    assert_eq!(set.article_count(), 5);
    assert_eq!(set.dimension(), 2);
    assert_eq!(set.popular_articles(), &[104, 102, 100]);
    assert_eq!(set.clicks(UserId(42)), Some(&[0, 1][..]));
    assert_eq!(set.row_of(103), Some(3));
    assert_eq!(set.metadata(1).and_then(|m| m.category_id), Some(1));
    assert_eq!(set.metadata(1).and_then(|m| m.words_count), Some(150));
}

#[test]
fn test_missing_artifact_is_an_error() {
    let artifacts = ArtifactDir::new();
    let config = artifacts.config();
    std::fs::remove_file(config.dir.join(&config.user_clicks_file)).unwrap();

    let err = load_artifact_set(&FsArtifactSource::from_config(&config)).unwrap_err();

    assert!(matches!(
        err,
        ArtifactError::Io {
            kind: ArtifactKind::UserClicks,
            ..
        }
    ));
}

#[test]
fn test_misaligned_artifacts_are_rejected() {
    let artifacts = ArtifactDir::new();
    write_artifacts(
        artifacts.dir.path(),
        &[1, 2, 3],
        &array![[1.0, 0.0], [0.0, 1.0]],
        &HashMap::new(),
        &[],
    );

    let err = load_artifact_set(&FsArtifactSource::from_config(&artifacts.config())).unwrap_err();
    assert!(matches!(err, ArtifactError::Invalid(_)));
}

#[tokio::test]
async fn test_store_reload_from_directory() {
    let artifacts = ArtifactDir::new();
    let source = Arc::new(FsArtifactSource::from_config(&artifacts.config()));
    let store = ArtifactStore::load(source).await.unwrap();
    let before = store.snapshot().await;

    write_artifacts(
        artifacts.dir.path(),
        &[7, 8],
        &array![[1.0, 1.0], [2.0, 0.5]],
        &HashMap::from([(9u64, vec![1usize])]),
        &[8, 7],
    );
    let stats = store.reload().await.unwrap();

    assert_eq!(stats.articles, 2);
    assert_eq!(stats.users, 1);
    assert_eq!(before.article_count(), 5);
    assert_eq!(store.snapshot().await.popular_articles(), &[8, 7]);
}
