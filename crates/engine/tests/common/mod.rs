//! On-disk artifact fixtures for integration tests

use article_recs_core::config::ArtifactConfig;
use article_recs_engine::EmbeddingMatrix;
use ndarray::{array, Array2};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

/// Artifact directory holding five articles (ids 100..=104).
///
/// - user 42 clicked rows 0 then 1, so its profile is row 1 = `[0, 1]`
/// - popularity ranking is `[104, 102, 100]`
pub struct ArtifactDir {
    pub dir: TempDir,
}

impl ArtifactDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            &[100, 101, 102, 103, 104],
            &array![[1.0, 0.0], [0.0, 1.0], [0.6, 0.8], [0.8, 0.6], [-1.0, 0.0]],
            &HashMap::from([(42u64, vec![0usize, 1])]),
            &[104, 102, 100],
        );
        Self { dir }
    }

    pub fn config(&self) -> ArtifactConfig {
        ArtifactConfig {
            dir: self.dir.path().to_path_buf(),
            ..ArtifactConfig::default()
        }
    }
}

pub fn write_artifacts(
    dir: &Path,
    ids: &[u64],
    embeddings: &Array2<f32>,
    clicks: &HashMap<u64, Vec<usize>>,
    popular: &[u64],
) {
    let config = ArtifactConfig::default();

    let mut writer = csv::Writer::from_path(dir.join(&config.metadata_file)).unwrap();
    writer
        .write_record(["article_id", "category_id", "words_count"])
        .unwrap();
    for (i, id) in ids.iter().enumerate() {
        writer
            .write_record([id.to_string(), (i % 3).to_string(), "150".to_string()])
            .unwrap();
    }
    writer.flush().unwrap();

    std::fs::write(
        dir.join(&config.embeddings_file),
        bincode::serialize(&EmbeddingMatrix::from_array(embeddings)).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join(&config.user_clicks_file),
        bincode::serialize(clicks).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join(&config.popular_articles_file),
        bincode::serialize(popular).unwrap(),
    )
    .unwrap();
}
