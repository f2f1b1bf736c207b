//! Artifact loading
//!
//! Resolves the four logical artifacts through an [`ArtifactSource`] and
//! decodes them into an [`ArtifactSet`]:
//!
//! - `metadata`: CSV with a header row, at least an `article_id` column
//! - `embeddings`: bincode [`EmbeddingMatrix`] (row-major)
//! - `user_clicks`: bincode `HashMap<u64, Vec<usize>>`
//! - `popular_articles`: bincode `Vec<u64>`

use crate::artifacts::{ArticleMetadata, ArtifactSet, ClickHistory};
use crate::error::ArtifactError;
use crate::types::ArticleId;
use article_recs_core::config::ArtifactConfig;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument};

/// Logical artifact names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Metadata,
    Embeddings,
    UserClicks,
    PopularArticles,
}

impl ArtifactKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Metadata => "metadata",
            ArtifactKind::Embeddings => "embeddings",
            ArtifactKind::UserClicks => "user_clicks",
            ArtifactKind::PopularArticles => "popular_articles",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where artifact bytes come from.
///
/// Reads are synchronous and return the whole artifact; decoding happens in
/// [`load_artifact_set`].
pub trait ArtifactSource: Send + Sync {
    /// Human readable location, used in logs
    fn describe(&self) -> String;

    fn read(&self, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactError>;
}

/// Reads artifacts from files in a local directory
#[derive(Debug, Clone)]
pub struct FsArtifactSource {
    dir: PathBuf,
    files: HashMap<ArtifactKind, String>,
}

impl FsArtifactSource {
    pub fn from_config(config: &ArtifactConfig) -> Self {
        let files = HashMap::from([
            (ArtifactKind::Metadata, config.metadata_file.clone()),
            (ArtifactKind::Embeddings, config.embeddings_file.clone()),
            (ArtifactKind::UserClicks, config.user_clicks_file.clone()),
            (
                ArtifactKind::PopularArticles,
                config.popular_articles_file.clone(),
            ),
        ]);

        Self {
            dir: config.dir.clone(),
            files,
        }
    }

    /// Full path of an artifact file
    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        match self.files.get(&kind) {
            Some(file) => self.dir.join(file),
            None => self.dir.join(kind.name()),
        }
    }
}

impl ArtifactSource for FsArtifactSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn read(&self, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactError> {
        let path = self.path(kind);
        std::fs::read(&path).map_err(|source| ArtifactError::Io {
            kind,
            location: path.display().to_string(),
            source,
        })
    }
}

/// On-disk layout of the embedding matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMatrix {
    pub rows: usize,
    pub dim: usize,
    /// Row-major values, `rows * dim` long
    pub data: Vec<f32>,
}

impl EmbeddingMatrix {
    pub fn from_array(array: &Array2<f32>) -> Self {
        Self {
            rows: array.nrows(),
            dim: array.ncols(),
            data: array.iter().copied().collect(),
        }
    }

    pub fn into_array(self) -> Result<Array2<f32>, ArtifactError> {
        let (rows, dim) = (self.rows, self.dim);
        Array2::from_shape_vec((rows, dim), self.data).map_err(|e| {
            ArtifactError::Invalid(format!(
                "embedding matrix declares {}x{} but data does not fit: {}",
                rows, dim, e
            ))
        })
    }
}

pub fn decode_metadata(bytes: &[u8]) -> Result<Vec<ArticleMetadata>, ArtifactError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    reader
        .deserialize::<ArticleMetadata>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ArtifactError::Csv {
            kind: ArtifactKind::Metadata,
            source,
        })
}

pub fn decode_embeddings(bytes: &[u8]) -> Result<Array2<f32>, ArtifactError> {
    let matrix: EmbeddingMatrix = decode(ArtifactKind::Embeddings, bytes)?;
    matrix.into_array()
}

pub fn decode_user_clicks(bytes: &[u8]) -> Result<ClickHistory, ArtifactError> {
    decode(ArtifactKind::UserClicks, bytes)
}

pub fn decode_popular_articles(bytes: &[u8]) -> Result<Vec<ArticleId>, ArtifactError> {
    decode(ArtifactKind::PopularArticles, bytes)
}

fn decode<T: serde::de::DeserializeOwned>(
    kind: ArtifactKind,
    bytes: &[u8],
) -> Result<T, ArtifactError> {
    bincode::deserialize(bytes).map_err(|source| ArtifactError::Decode { kind, source })
}

/// Read, decode and validate all four artifacts.
///
/// Any single failure aborts the whole load; there is no partial set.
#[instrument(skip(source), fields(artifact_source = %source.describe()))]
pub fn load_artifact_set(source: &dyn ArtifactSource) -> Result<ArtifactSet, ArtifactError> {
    let start = Instant::now();

    let metadata = timed(source, ArtifactKind::Metadata, decode_metadata)?;
    let embeddings = timed(source, ArtifactKind::Embeddings, decode_embeddings)?;
    let user_clicks = timed(source, ArtifactKind::UserClicks, decode_user_clicks)?;
    let popular_articles = timed(
        source,
        ArtifactKind::PopularArticles,
        decode_popular_articles,
    )?;

    let set = ArtifactSet::new(metadata, embeddings, user_clicks, popular_articles)?;

    info!(
        articles = set.article_count(),
        dimension = set.dimension(),
        users = set.user_count(),
        popular_articles = set.popular_articles().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Artifact set loaded"
    );

    Ok(set)
}

fn timed<T>(
    source: &dyn ArtifactSource,
    kind: ArtifactKind,
    decode: impl FnOnce(&[u8]) -> Result<T, ArtifactError>,
) -> Result<T, ArtifactError> {
    let start = Instant::now();
    let bytes = source.read(kind)?;
    let size_bytes = bytes.len();
    let value = decode(&bytes)?;

    info!(
        artifact = %kind,
        size_bytes,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Artifact loaded"
    );

    Ok(value)
}
