//! Collection: one schema, its documents, and their on-disk state
//!
//! A collection lives in a directory holding `zvec.toml` (options),
//! `collection.snapshot` (schema + documents) and a `.lock` file held
//! exclusively for as long as the collection is open in this process.
//!
//! All index families are served by exact search over the stored vectors;
//! index parameters are validated and persisted with the schema, and the
//! metric they carry decides the similarity function.
//!
//! # Concurrency
//!
//! Each collection is guarded by one `RwLock`. Reads (`query`, `fetch`,
//! `stats`) share it; writes take it exclusively for the whole batch.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use zvec_core::{
    CollectionOptions, CollectionSchema, CollectionStats, Doc, Error, FieldValue, IndexParams,
    IndexType, MetricType, Result, VectorQuery,
};

use crate::config::{self, CONFIG_FILE_NAME};
use crate::distance::compute_similarity;
use crate::filter::FilterExpr;
use crate::registry::OPEN_COLLECTIONS;
use crate::storage::{self, SNAPSHOT_FILE_NAME};

const LOCK_FILE_NAME: &str = ".lock";

/// Per-item outcome of a batch write, in input order
pub type BatchResults = Vec<Result<()>>;

/// An open collection
#[derive(Debug)]
pub struct Collection {
    path: PathBuf,
    state: RwLock<State>,
    _lock: File,
}

#[derive(Debug)]
struct State {
    schema: CollectionSchema,
    options: CollectionOptions,
    docs: BTreeMap<String, Doc>,
    dirty: bool,
    destroyed: bool,
}

impl State {
    fn ensure_live(&self, path: &Path) -> Result<()> {
        if self.destroyed {
            return Err(Error::not_found(format!(
                "collection at '{}' has been destroyed",
                path.display()
            )));
        }
        Ok(())
    }

    fn validate_doc(&self, doc: &Doc) -> Result<()> {
        if doc.pk().is_empty() {
            return Err(Error::invalid_argument("document primary key is empty"));
        }
        for (name, value) in doc.fields() {
            let field = self.schema.field(name).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "document '{}' sets unknown field '{}'",
                    doc.pk(),
                    name
                ))
            })?;
            field.validate_value(value)?;
        }
        Ok(())
    }

    fn insert(&mut self, doc: &Doc) -> Result<()> {
        self.validate_doc(doc)?;
        if self.docs.contains_key(doc.pk()) {
            return Err(Error::already_exists(format!(
                "document '{}' already exists",
                doc.pk()
            )));
        }
        self.docs.insert(doc.pk().to_string(), stored(doc));
        Ok(())
    }

    fn upsert(&mut self, doc: &Doc) -> Result<()> {
        self.validate_doc(doc)?;
        self.docs.insert(doc.pk().to_string(), stored(doc));
        Ok(())
    }

    fn update(&mut self, doc: &Doc) -> Result<()> {
        self.validate_doc(doc)?;
        let existing = self
            .docs
            .get_mut(doc.pk())
            .ok_or_else(|| Error::not_found(format!("document '{}' not found", doc.pk())))?;
        existing.merge_from(doc);
        Ok(())
    }

    fn delete(&mut self, pk: &str) -> Result<()> {
        self.docs
            .remove(pk)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("document '{}' not found", pk)))
    }

    fn indexed_field_count(&self) -> u32 {
        self.schema
            .fields()
            .iter()
            .filter(|f| f.index_params().is_some())
            .count() as u32
    }
}

/// Stored copy of a caller document; scores only exist on results
fn stored(doc: &Doc) -> Doc {
    let mut doc = doc.clone();
    doc.set_score(0.0);
    doc
}

impl Collection {
    /// Create a collection directory and open it
    ///
    /// # Errors
    /// - `InvalidSchema` if the schema cannot back a collection
    /// - `AlreadyExists` if a collection already lives at `path`
    /// - `Io` on filesystem failures
    pub fn create_and_open(
        path: impl AsRef<Path>,
        schema: CollectionSchema,
        options: CollectionOptions,
    ) -> Result<Arc<Self>> {
        schema.validate()?;
        let path = path.as_ref();
        if path.join(SNAPSHOT_FILE_NAME).exists() {
            return Err(Error::already_exists(format!(
                "collection already exists at '{}'",
                path.display()
            )));
        }
        std::fs::create_dir_all(path)?;
        let canonical = path.canonicalize()?;

        let mut registry = OPEN_COLLECTIONS.lock();
        if registry
            .get(&canonical)
            .map_or(false, |w| w.strong_count() > 0)
        {
            return Err(Error::already_exists(format!(
                "collection already open at '{}'",
                canonical.display()
            )));
        }

        let lock = acquire_lock(&canonical)?;
        config::write_options(&options, &canonical.join(CONFIG_FILE_NAME))?;
        storage::write_snapshot(
            &canonical.join(SNAPSHOT_FILE_NAME),
            &schema,
            std::iter::empty::<&Doc>(),
        )?;

        info!(
            target: "zvec::collection",
            path = ?canonical,
            schema = schema.name(),
            fields = schema.fields().len(),
            "Created collection"
        );
        let collection = Arc::new(Collection {
            path: canonical.clone(),
            state: RwLock::new(State {
                schema,
                options,
                docs: BTreeMap::new(),
                dirty: false,
                destroyed: false,
            }),
            _lock: lock,
        });
        registry.insert(canonical, Arc::downgrade(&collection));
        Ok(collection)
    }

    /// Open an existing collection
    ///
    /// Opening a path that is already open in this process returns the same
    /// instance. `options`, when given, replace the stored options for this
    /// session.
    ///
    /// # Errors
    /// - `NotFound` if no collection lives at `path`
    /// - `Io` / `Serialization` if the stored state cannot be read
    pub fn open(path: impl AsRef<Path>, options: Option<CollectionOptions>) -> Result<Arc<Self>> {
        let path = path.as_ref();
        if !path.join(SNAPSHOT_FILE_NAME).exists() {
            return Err(Error::not_found(format!(
                "no collection at '{}'",
                path.display()
            )));
        }
        let canonical = path.canonicalize()?;

        let mut registry = OPEN_COLLECTIONS.lock();
        let existing = registry.get(&canonical).and_then(|w| w.upgrade());
        if let Some(existing) = existing {
            drop(registry);
            if let Some(options) = options {
                existing.state.write().options = options;
            }
            info!(
                target: "zvec::collection",
                path = ?canonical,
                "Returning existing collection instance",
            );
            return Ok(existing);
        }

        let lock = acquire_lock(&canonical)?;
        let options = match options {
            Some(options) => options,
            None => config::read_options_or_default(&canonical.join(CONFIG_FILE_NAME))?,
        };
        let snapshot = storage::load_snapshot(&canonical.join(SNAPSHOT_FILE_NAME))?;
        let docs: BTreeMap<String, Doc> = snapshot
            .docs
            .into_iter()
            .map(|doc| (doc.pk().to_string(), doc))
            .collect();

        info!(
            target: "zvec::collection",
            path = ?canonical,
            docs = docs.len(),
            "Opened collection"
        );
        let collection = Arc::new(Collection {
            path: canonical.clone(),
            state: RwLock::new(State {
                schema: snapshot.schema,
                options,
                docs,
                dirty: false,
                destroyed: false,
            }),
            _lock: lock,
        });
        registry.insert(canonical, Arc::downgrade(&collection));
        Ok(collection)
    }

    /// Erase the collection directory
    ///
    /// Every later operation on this instance fails with `NotFound`.
    pub fn destroy_data(&self) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;
        state.destroyed = true;
        state.dirty = false;
        state.docs.clear();
        OPEN_COLLECTIONS.lock().remove(&self.path);
        if self.path.exists() {
            std::fs::remove_dir_all(&self.path)?;
        }
        info!(target: "zvec::collection", path = ?self.path, "Destroyed collection data");
        Ok(())
    }

    /// Canonical collection directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current schema
    pub fn schema(&self) -> CollectionSchema {
        self.state.read().schema.clone()
    }

    /// Options in effect
    pub fn options(&self) -> CollectionOptions {
        self.state.read().options
    }

    /// Point-in-time statistics
    pub fn stats(&self) -> Result<CollectionStats> {
        let state = self.state.read();
        state.ensure_live(&self.path)?;
        Ok(CollectionStats::compute(
            state.docs.len() as u64,
            state.options.segment_max_docs,
            state.indexed_field_count(),
        ))
    }

    /// Persist unflushed writes
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;
        if state.dirty {
            self.persist(&mut state)?;
        }
        debug!(target: "zvec::collection", path = ?self.path, "Flushed collection");
        Ok(())
    }

    /// Compact stored state and rewrite the snapshot
    pub fn optimize(&self) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;
        self.persist(&mut state)?;
        info!(
            target: "zvec::collection",
            path = ?self.path,
            docs = state.docs.len(),
            "Optimized collection"
        );
        Ok(())
    }

    /// Attach an index to a field
    ///
    /// # Errors
    /// - `NotFound` if the field does not exist
    /// - `InvalidArgument` if the index family does not fit the field type
    pub fn create_index(&self, field: &str, params: IndexParams) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;
        let index_type = params.index_type();
        state
            .schema
            .field_mut(field)
            .ok_or_else(|| Error::not_found(format!("field '{}' not found", field)))?
            .set_index_params(params)?;
        self.persist(&mut state)?;
        info!(target: "zvec::collection", field, index = index_type.name(), "Created index");
        Ok(())
    }

    /// Remove the index attached to a field
    ///
    /// # Errors
    /// `NotFound` if the field does not exist or carries no index.
    pub fn drop_index(&self, field: &str) -> Result<()> {
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;
        let schema_field = state
            .schema
            .field_mut(field)
            .ok_or_else(|| Error::not_found(format!("field '{}' not found", field)))?;
        if schema_field.clear_index_params().is_none() {
            return Err(Error::not_found(format!("field '{}' has no index", field)));
        }
        self.persist(&mut state)?;
        info!(target: "zvec::collection", field, "Dropped index");
        Ok(())
    }

    /// Insert new documents; an existing primary key fails that item
    pub fn insert(&self, docs: &[Doc]) -> Result<BatchResults> {
        self.write_batch("insert", docs, State::insert)
    }

    /// Insert or replace documents
    pub fn upsert(&self, docs: &[Doc]) -> Result<BatchResults> {
        self.write_batch("upsert", docs, State::upsert)
    }

    /// Merge fields into existing documents; a missing primary key fails that item
    pub fn update(&self, docs: &[Doc]) -> Result<BatchResults> {
        self.write_batch("update", docs, State::update)
    }

    /// Delete documents by primary key; a missing key fails that item
    pub fn delete<S: AsRef<str>>(&self, pks: &[S]) -> Result<BatchResults> {
        self.write_batch("delete", pks, |state, pk| state.delete(pk.as_ref()))
    }

    /// Delete every document matching a filter expression, returning the count
    ///
    /// # Errors
    /// `InvalidArgument` if the expression does not parse.
    pub fn delete_by_filter(&self, filter: &str) -> Result<usize> {
        let expr = FilterExpr::parse(filter)?;
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;
        let doomed: Vec<String> = state
            .docs
            .values()
            .filter(|doc| expr.matches(doc))
            .map(|doc| doc.pk().to_string())
            .collect();
        for pk in &doomed {
            state.docs.remove(pk);
        }
        if !doomed.is_empty() {
            state.dirty = true;
            self.auto_flush(&mut state);
        }
        debug!(target: "zvec::collection", filter, deleted = doomed.len(), "Deleted by filter");
        Ok(doomed.len())
    }

    /// Fetch documents by primary key in request order
    ///
    /// Missing keys are skipped. An empty key list returns every document in
    /// primary-key order.
    pub fn fetch<S: AsRef<str>>(&self, pks: &[S]) -> Result<Vec<Doc>> {
        let state = self.state.read();
        state.ensure_live(&self.path)?;
        let docs: Vec<Doc> = if pks.is_empty() {
            state.docs.values().cloned().collect()
        } else {
            pks.iter()
                .filter_map(|pk| state.docs.get(pk.as_ref()).cloned())
                .collect()
        };
        debug!(target: "zvec::collection", requested = pks.len(), found = docs.len(), "Fetched");
        Ok(docs)
    }

    /// Similarity search over one dense vector field
    ///
    /// Results are ordered by score descending, then primary key ascending.
    ///
    /// # Errors
    /// - `InvalidArgument` for a non-positive `topk`, a non-vector target, a
    ///   dimension mismatch, search parameters for another index family, or
    ///   a filter that does not parse
    /// - `NotFound` if the target field does not exist
    pub fn query(&self, query: &VectorQuery) -> Result<Vec<Doc>> {
        if query.topk <= 0 {
            return Err(Error::invalid_argument(format!(
                "topk must be positive, got {}",
                query.topk
            )));
        }
        let vector = query.vector()?;
        let filter = query.filter.as_deref().map(FilterExpr::parse).transpose()?;

        let state = self.state.read();
        state.ensure_live(&self.path)?;
        let field = state.schema.field(&query.field_name).ok_or_else(|| {
            Error::not_found(format!("field '{}' not found", query.field_name))
        })?;
        if !field.data_type().is_dense_vector() {
            return Err(Error::invalid_argument(format!(
                "field '{}' is not a dense vector field",
                query.field_name
            )));
        }
        if vector.len() != field.dimension() as usize {
            return Err(Error::invalid_argument(format!(
                "query vector dimension mismatch: expected {}, got {}",
                field.dimension(),
                vector.len()
            )));
        }
        if let Some(params) = &query.query_params {
            let field_family = match field.index_type() {
                IndexType::Undefined => IndexType::Flat,
                other => other,
            };
            if params.index_type() != field_family {
                return Err(Error::invalid_argument(format!(
                    "{} query parameters do not match the {} index on '{}'",
                    params.index_type().name(),
                    field_family.name(),
                    query.field_name
                )));
            }
        }
        let metric = field
            .index_params()
            .and_then(IndexParams::metric)
            .unwrap_or(MetricType::Undefined);

        let mut scored: Vec<(f32, &Doc)> = state
            .docs
            .values()
            .filter(|doc| filter.as_ref().map_or(true, |f| f.matches(doc)))
            .filter_map(|doc| {
                doc.value(&query.field_name)
                    .and_then(FieldValue::as_vector)
                    .filter(|stored| stored.len() == vector.len())
                    .map(|stored| (compute_similarity(&vector, stored, metric), doc))
            })
            .collect();

        // NaN ranks below every real score
        scored.sort_by(|(sa, da), (sb, db)| {
            rank_key(*sb)
                .total_cmp(&rank_key(*sa))
                .then_with(|| da.pk().cmp(db.pk()))
        });
        scored.truncate(query.topk as usize);

        let results: Vec<Doc> = scored
            .into_iter()
            .map(|(score, doc)| project(&state.schema, doc, score, query))
            .collect();
        debug!(
            target: "zvec::collection",
            field = %query.field_name,
            topk = query.topk,
            returned = results.len(),
            "Query"
        );
        Ok(results)
    }

    fn write_batch<T>(
        &self,
        op: &'static str,
        items: &[T],
        mut apply: impl FnMut(&mut State, &T) -> Result<()>,
    ) -> Result<BatchResults> {
        let mut state = self.state.write();
        state.ensure_live(&self.path)?;

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(apply(&mut state, item));
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        if let Some(Err(first)) = results.iter().find(|r| r.is_err()) {
            warn!(
                target: "zvec::collection",
                op,
                failed,
                total = items.len(),
                error = %first,
                "Batch items failed",
            );
        }
        if failed < results.len() {
            state.dirty = true;
            self.auto_flush(&mut state);
        }
        debug!(target: "zvec::collection", op, total = items.len(), failed, "Batch write");
        Ok(results)
    }

    /// Writes are already applied when this runs. A failed flush leaves the
    /// state dirty for the next `flush` or close.
    fn auto_flush(&self, state: &mut State) {
        if !state.options.auto_flush {
            return;
        }
        if let Err(e) = self.persist(state) {
            warn!(
                target: "zvec::collection",
                path = ?self.path,
                error = %e,
                "Auto-flush failed, writes kept in memory"
            );
        }
    }

    fn persist(&self, state: &mut State) -> Result<()> {
        storage::write_snapshot(
            &self.path.join(SNAPSHOT_FILE_NAME),
            &state.schema,
            state.docs.values(),
        )?;
        state.dirty = false;
        Ok(())
    }
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

/// Shape a stored document into a query result
fn project(schema: &CollectionSchema, doc: &Doc, score: f32, query: &VectorQuery) -> Doc {
    let mut out = doc.clone();
    out.set_score(f64::from(score));
    out.retain_fields(|name, value| {
        let is_vector = match schema.field(name) {
            Some(field) => field.is_vector_field(),
            None => matches!(
                value,
                FieldValue::VectorFp32(_) | FieldValue::SparseVectorFp32 { .. }
            ),
        };
        if is_vector {
            return query.include_vector;
        }
        match &query.output_fields {
            Some(fields) => fields.iter().any(|f| f == name),
            None => true,
        }
    });
    out
}

fn acquire_lock(dir: &Path) -> Result<File> {
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(dir.join(LOCK_FILE_NAME))?;
    fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
        Error::internal(format!(
            "collection at '{}' is already in use by another process",
            dir.display()
        ))
    })?;
    Ok(lock_file)
}

impl Drop for Collection {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.dirty && !state.destroyed {
            let result = storage::write_snapshot(
                &self.path.join(SNAPSHOT_FILE_NAME),
                &state.schema,
                state.docs.values(),
            );
            if let Err(e) = result {
                warn!(
                    target: "zvec::collection",
                    path = ?self.path,
                    error = %e,
                    "Failed to flush on close",
                );
            }
        }
        OPEN_COLLECTIONS
            .lock()
            .retain(|_, weak| weak.strong_count() > 0);
    }
}
