// LanceDB vector store module
// Holds the (id, vector, text, metadata) records and serves cosine KNN search


use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection, DistanceType,
    query::{ExecutableQuery, QueryBase},
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{PoseSearchError, config::Config, dataset::PoseRecord, document::Document};

/// LanceDB trains an IVF-PQ index from sampled rows; below this row count
/// index creation fails and brute-force scan is used instead.
pub const MIN_ROWS_FOR_INDEX: usize = 256;

/// Vector store over a LanceDB table, one row per ingested document.
pub struct VectorStore {
    connection: Connection,
    table_name: String,
    dimension: usize,
}

/// One ranked result of a similarity search, resolved back to the original
/// document text and metadata.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub text: String,
    pub metadata: PoseRecord,
    pub similarity_score: f32,
    pub distance: f32,
}

impl VectorStore {
    /// Connect to the store and create the table if it does not exist. The
    /// table schema is fixed by the configured embedding dimension.
    #[inline]
    pub async fn new(config: &Config) -> Result<Self, PoseSearchError> {
        let db_path = config.vector_database_path();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        std::fs::create_dir_all(&db_path).map_err(|e| {
            PoseSearchError::Store(format!("Failed to create vector database directory: {}", e))
        })?;

        // A `file://` URI needs an absolute path; a relative one would end
        // up in the URL authority slot.
        let db_path = db_path.canonicalize().map_err(|e| {
            PoseSearchError::Store(format!("Failed to resolve vector database path: {}", e))
        })?;

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to connect to LanceDB: {}", e)))?;

        let store = Self {
            connection,
            table_name: config.store.table_name.clone(),
            dimension: config.ollama.embedding_dimension as usize,
        };

        store.initialize_table().await?;

        info!("Vector store initialized successfully");
        Ok(store)
    }

    async fn initialize_table(&self) -> Result<(), PoseSearchError> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to list tables: {}", e)))?;

        if table_names.contains(&self.table_name) {
            debug!("Table '{}' already exists", self.table_name);
            return Ok(());
        }

        let schema = self.create_schema();
        self.connection
            .create_empty_table(&self.table_name, schema)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to create table: {}", e)))?;

        info!(
            "Created table '{}' with {} dimensions",
            self.table_name, self.dimension
        );
        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.dimension as i32,
                ),
                false,
            ),
            Field::new("text", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, true),
            Field::new("description", DataType::Utf8, true),
            Field::new("sanskrit_name", DataType::Utf8, true),
            Field::new("expertise_level", DataType::Utf8, true),
            Field::new("pose_type", DataType::Utf8, true),
        ]))
    }

    /// Insert one stored record per document. `ids`, `documents` and
    /// `vectors` are parallel sequences; each vector must have the
    /// configured dimensionality. Partial-failure semantics of the write are
    /// store-defined.
    #[inline]
    pub async fn insert(
        &self,
        ids: &[String],
        documents: &[Document],
        vectors: &[Vec<f32>],
    ) -> Result<(), PoseSearchError> {
        if ids.len() != documents.len() || documents.len() != vectors.len() {
            return Err(PoseSearchError::Store(format!(
                "Mismatched insert lengths: {} ids, {} documents, {} vectors",
                ids.len(),
                documents.len(),
                vectors.len()
            )));
        }

        if documents.is_empty() {
            debug!("No documents to insert");
            return Ok(());
        }

        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(PoseSearchError::Store(format!(
                    "Vector dimension mismatch: got {}, table expects {}",
                    vector.len(),
                    self.dimension
                )));
            }
        }

        debug!("Inserting batch of {} documents", documents.len());

        let record_batch = self.create_record_batch(ids, documents, vectors)?;

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to open table: {}", e)))?;

        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to insert documents: {}", e)))?;

        info!("Successfully stored {} documents", documents.len());
        Ok(())
    }

    fn create_record_batch(
        &self,
        ids: &[String],
        documents: &[Document],
        vectors: &[Vec<f32>],
    ) -> Result<RecordBatch, PoseSearchError> {
        let len = documents.len();

        let mut id_values = Vec::with_capacity(len);
        let mut texts = Vec::with_capacity(len);
        let mut names = Vec::with_capacity(len);
        let mut descriptions = Vec::with_capacity(len);
        let mut sanskrit_names = Vec::with_capacity(len);
        let mut expertise_levels = Vec::with_capacity(len);
        let mut pose_types = Vec::with_capacity(len);

        for (id, document) in ids.iter().zip(documents) {
            id_values.push(id.as_str());
            texts.push(document.text.as_str());
            names.push(document.metadata.name.as_deref());
            descriptions.push(document.metadata.description.as_deref());
            sanskrit_names.push(document.metadata.sanskrit_name.as_deref());
            expertise_levels.push(document.metadata.expertise_level.as_deref());
            pose_types.push(document.metadata.pose_type.as_deref());
        }

        let mut flat_values = Vec::with_capacity(len * self.dimension);
        for vector in vectors {
            flat_values.extend_from_slice(vector);
        }
        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array =
            FixedSizeListArray::try_new(field, self.dimension as i32, Arc::new(values_array), None)
                .map_err(|e| {
                    PoseSearchError::Store(format!("Failed to create vector array: {}", e))
                })?;

        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(id_values)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(texts)),
            Arc::new(StringArray::from(names)),
            Arc::new(StringArray::from(descriptions)),
            Arc::new(StringArray::from(sanskrit_names)),
            Arc::new(StringArray::from(expertise_levels)),
            Arc::new(StringArray::from(pose_types)),
        ];

        RecordBatch::try_new(self.create_schema(), arrays)
            .map_err(|e| PoseSearchError::Store(format!("Failed to create record batch: {}", e)))
    }

    /// Return the `k` stored records most similar to `query_vector` by
    /// cosine distance, best match first.
    #[inline]
    pub async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<SearchHit>, PoseSearchError> {
        debug!("Searching for similar vectors with limit: {}", k);

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to open table: {}", e)))?;

        let results = table
            .vector_search(query_vector)
            .map_err(|e| {
                PoseSearchError::Store(format!("Failed to create vector search: {}", e))
            })?
            .column("vector")
            .distance_type(DistanceType::Cosine)
            .limit(k)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to execute search: {}", e)))?;

        self.parse_search_results_stream(results).await
    }

    async fn parse_search_results_stream(
        &self,
        mut results: lancedb::arrow::SendableRecordBatchStream,
    ) -> Result<Vec<SearchHit>, PoseSearchError> {
        let mut hits = Vec::new();

        while let Some(batch) = results.try_next().await.map_err(|e| {
            PoseSearchError::Store(format!("Failed to read result stream: {}", e))
        })? {
            hits.extend(self.parse_search_batch(&batch)?);
        }

        debug!("Parsed {} search results from stream", hits.len());
        Ok(hits)
    }

    fn parse_search_batch(&self, batch: &RecordBatch) -> Result<Vec<SearchHit>, PoseSearchError> {
        let texts = string_column(batch, "text")?;
        let names = string_column(batch, "name")?;
        let descriptions = string_column(batch, "description")?;
        let sanskrit_names = string_column(batch, "sanskrit_name")?;
        let expertise_levels = string_column(batch, "expertise_level")?;
        let pose_types = string_column(batch, "pose_type")?;

        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        let mut hits = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let metadata = PoseRecord {
                name: optional_value(names, row),
                description: optional_value(descriptions, row),
                sanskrit_name: optional_value(sanskrit_names, row),
                expertise_level: optional_value(expertise_levels, row),
                pose_type: optional_value(pose_types, row),
            };

            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            hits.push(SearchHit {
                text: texts.value(row).to_string(),
                metadata,
                // Cosine distance, so higher score means more similar
                similarity_score: 1.0 - distance,
                distance,
            });
        }

        Ok(hits)
    }

    /// Declare a vector similarity index over the embedding column. Conflict
    /// behavior for an already-indexed column is store-defined.
    #[inline]
    pub async fn create_index(&self) -> Result<(), PoseSearchError> {
        debug!("Creating vector index on table '{}'", self.table_name);

        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to open table: {}", e)))?;

        table
            .create_index(&["vector"], lancedb::index::Index::Auto)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to create vector index: {}", e)))?;

        info!("Vector index created successfully");
        Ok(())
    }

    /// Total number of stored records.
    #[inline]
    pub async fn count(&self) -> Result<u64, PoseSearchError> {
        let table = self
            .connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to open table: {}", e)))?;

        let count = table
            .count_rows(None)
            .await
            .map_err(|e| PoseSearchError::Store(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, PoseSearchError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PoseSearchError::Store(format!("Missing {} column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| PoseSearchError::Store(format!("Invalid {} column type", name)))
}

fn optional_value(array: &StringArray, row: usize) -> Option<String> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row).to_string())
    }
}
