//! Persistent similarity collection on SQLite
//!
//! Documents are embedded on insert and stored with their metadata as JSON
//! and their embedding as a little-endian f32 BLOB. Queries scan the whole
//! collection and rank by cosine similarity in Rust, which is plenty for a
//! portfolio of a few hundred rows.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;
use serde_json::{Map, Value};

use super::embedding::{cosine_similarity, Embedder, HarmonicEmbedder};
use crate::error::{PortfolioError, Result};

/// File name of the SQLite database inside a store directory
pub const INDEX_FILE: &str = "index.sqlite3";

/// Key-value data attached to a document
pub type Metadata = Map<String, Value>;

/// Nearest neighbours for each query text, as parallel nested lists
///
/// The outer index matches the position of the query text; inner lists are
/// ordered by ascending distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub ids: Vec<Vec<String>>,
    pub documents: Vec<Vec<String>>,
    pub metadatas: Vec<Vec<Metadata>>,
    pub distances: Vec<Vec<f32>>,
}

struct StoredEntry {
    id: String,
    document: String,
    metadata: Metadata,
    embedding: Vec<f32>,
}

/// A named collection of embedded documents
pub struct Collection<E: Embedder = HarmonicEmbedder> {
    conn: Connection,
    name: String,
    embedder: E,
}

impl Collection<HarmonicEmbedder> {
    /// Open the store under `store_dir` and get or create collection `name`
    pub fn open(store_dir: &Path, name: &str) -> Result<Self> {
        Self::open_with(store_dir, name, HarmonicEmbedder::new())
    }

    /// In-memory store (for testing)
    pub fn open_in_memory(name: &str) -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, name, HarmonicEmbedder::new())
    }
}

impl<E: Embedder> Collection<E> {
    pub fn open_with(store_dir: &Path, name: &str, embedder: E) -> Result<Self> {
        std::fs::create_dir_all(store_dir)?;
        let conn = Connection::open(store_dir.join(INDEX_FILE))?;
        Self::from_connection(conn, name, embedder)
    }

    fn from_connection(conn: Connection, name: &str, embedder: E) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL,
                collection TEXT NOT NULL REFERENCES collections(name) ON DELETE CASCADE,
                document TEXT NOT NULL,
                metadata TEXT NOT NULL,  -- JSON object
                embedding BLOB NOT NULL,
                added_at INTEGER NOT NULL,
                UNIQUE (collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_entries_collection ON entries(collection);
            "#,
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO collections (name, created_at) VALUES (?1, ?2)",
            params![name, chrono::Utc::now().timestamp()],
        )?;

        Ok(Self {
            conn,
            name: name.to_string(),
            embedder,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries in this collection
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE collection = ?1",
            params![self.name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Embed and insert documents
    ///
    /// Rows are inserted one at a time; if one fails, the ones before it stay.
    pub fn add(&self, documents: &[String], metadatas: &[Metadata], ids: &[String]) -> Result<()> {
        if documents.len() != metadatas.len() || documents.len() != ids.len() {
            return Err(PortfolioError::InvalidInsert(format!(
                "{} documents, {} metadatas, {} ids",
                documents.len(),
                metadatas.len(),
                ids.len()
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let mut stmt = self.conn.prepare(
            r#"
            INSERT INTO entries (id, collection, document, metadata, embedding, added_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )?;

        for ((document, metadata), id) in documents.iter().zip(metadatas).zip(ids) {
            let embedding = self.embedder.embed(document);
            stmt.execute(params![
                id,
                self.name,
                document,
                serde_json::to_string(metadata)?,
                embedding_to_blob(&embedding),
                now,
            ])?;
        }

        Ok(())
    }

    /// Up to `n_results` nearest entries for each query text
    pub fn query(&self, query_texts: &[String], n_results: usize) -> Result<QueryResult> {
        if query_texts.is_empty() {
            return Err(PortfolioError::InvalidQuery("no query texts".to_string()));
        }
        if n_results == 0 {
            return Err(PortfolioError::InvalidQuery(
                "n_results must be at least 1".to_string(),
            ));
        }

        let entries = self.load_entries()?;
        let mut result = QueryResult::default();

        for text in query_texts {
            let query_embedding = self.embedder.embed(text);

            let mut scored: Vec<(&StoredEntry, f32)> = entries
                .iter()
                .map(|e| (e, cosine_similarity(&query_embedding, &e.embedding)))
                .collect();
            // Stable sort keeps insertion order between equal scores
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(n_results);

            result.ids.push(scored.iter().map(|(e, _)| e.id.clone()).collect());
            result
                .documents
                .push(scored.iter().map(|(e, _)| e.document.clone()).collect());
            result
                .metadatas
                .push(scored.iter().map(|(e, _)| e.metadata.clone()).collect());
            result
                .distances
                .push(scored.iter().map(|(_, s)| 1.0 - s).collect());
        }

        Ok(result)
    }

    fn load_entries(&self) -> Result<Vec<StoredEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, document, metadata, embedding FROM entries WHERE collection = ?1 ORDER BY seq",
        )?;

        let rows = stmt.query_map(params![self.name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Vec<u8>>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, document, metadata_json, blob) = row?;
            entries.push(StoredEntry {
                id,
                document,
                metadata: serde_json::from_str(&metadata_json)?,
                embedding: blob_to_embedding(&blob),
            });
        }
        Ok(entries)
    }
}

fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
