use std::path::Path;

use futures::stream::TryStreamExt;
use futures_util::io::{copy, AsyncWriteExt};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::gridfs::GridFsBucket;
use mongodb::options::GridFsBucketOptions;
use mongodb::Client;
use tokio::fs;
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::StoreError;
use crate::models::{FileRecord, UploadOptions};

/// Facade over a GridFS bucket: metadata lookups plus streaming
/// upload/download with future-based completion.
///
/// Owns its own client; `close` consumes the store and releases the
/// connection exactly once.
pub struct FileStore {
    client: Client,
    bucket: GridFsBucket,
}

impl FileStore {
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongodb_uri).await?;

        let db = match &config.database {
            Some(name) => client.database(name),
            None => client.default_database().ok_or(StoreError::NoDatabase)?,
        };
        db.run_command(doc! { "ping": 1 }).await?;

        let options = GridFsBucketOptions::builder()
            .bucket_name(config.bucket_name.clone())
            .chunk_size_bytes(config.chunk_size_bytes)
            .build();
        let bucket = db.gridfs_bucket(options);
        info!(
            "Opened GridFS bucket {} on database {}",
            config.bucket_name,
            db.name()
        );

        Ok(Self { client, bucket })
    }

    /// First metadata record with the given id, or `None` when the bucket
    /// holds no such file.
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<FileRecord>, StoreError> {
        let mut cursor = self.bucket.find(doc! { "_id": id }).await?;
        Ok(cursor.try_next().await?)
    }

    pub async fn find_many(&self, filter: Document) -> Result<Vec<FileRecord>, StoreError> {
        let cursor = self.bucket.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Metadata records whose filename matches the given regular expression.
    pub async fn find_by_filename_pattern(
        &self,
        pattern: &str,
    ) -> Result<Vec<FileRecord>, StoreError> {
        self.find_many(filename_pattern_filter(pattern)?).await
    }

    pub async fn rename(&self, id: ObjectId, new_filename: &str) -> Result<(), StoreError> {
        self.bucket.rename(id.into(), new_filename).await?;
        debug!("Renamed file {} to {}", id, new_filename);
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> Result<(), StoreError> {
        self.bucket.delete(id.into()).await?;
        debug!("Deleted file {}", id);
        Ok(())
    }

    /// Streams a filesystem file into the bucket. `filename` is only the
    /// stored name; the bytes always come from `source`. When the caller
    /// supplies no metadata, a content type guessed from the source path is
    /// recorded.
    pub async fn upload_from_path(
        &self,
        source: impl AsRef<Path>,
        filename: &str,
        options: Option<UploadOptions>,
    ) -> Result<ObjectId, StoreError> {
        let source = source.as_ref();
        let mut options = options.unwrap_or_default();
        if options.metadata.is_none() {
            if let Some(content_type) = guess_content_type(source) {
                options.metadata = Some(doc! { "contentType": content_type });
            }
        }

        let file = fs::File::open(source).await?;
        let id = self.upload_from_reader(file, filename, Some(options)).await?;
        info!("Uploaded {} as {} ({})", source.display(), filename, id);
        Ok(id)
    }

    /// Streams an already-open reader into the bucket, resolving with the
    /// new file's id. The GridFS stream is closed on success and aborted on
    /// failure, so no partial chunks outlive the call.
    pub async fn upload_from_reader<R>(
        &self,
        reader: R,
        filename: &str,
        options: Option<UploadOptions>,
    ) -> Result<ObjectId, StoreError>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let options = options.unwrap_or_default();

        let mut open = self.bucket.open_upload_stream(filename);
        if let Some(metadata) = options.metadata {
            open = open.metadata(metadata);
        }
        if let Some(chunk_size) = options.chunk_size_bytes {
            open = open.chunk_size_bytes(chunk_size);
        }
        let mut stream = open.await?;

        match copy(reader.compat(), &mut stream).await {
            Ok(bytes) => {
                stream.close().await?;
                let id = stream.id().clone();
                debug!("Upload of {} finished ({} bytes)", filename, bytes);
                id.as_object_id()
                    .ok_or_else(|| StoreError::invalid_object_id(id.to_string()))
            }
            Err(err) => {
                if let Err(abort_err) = stream.abort().await {
                    warn!("Failed to abort upload of {}: {}", filename, abort_err);
                }
                Err(err.into())
            }
        }
    }

    /// Streams a stored file to a filesystem path, creating parent
    /// directories as needed. Returns the number of bytes written.
    pub async fn download_to_path(
        &self,
        id: ObjectId,
        dest: impl AsRef<Path>,
    ) -> Result<u64, StoreError> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let file = fs::File::create(dest).await?;
        let bytes = self.download_to_writer(id, file).await?;
        info!("Downloaded {} to {} ({} bytes)", id, dest.display(), bytes);
        Ok(bytes)
    }

    /// Streams a stored file into an already-open writer.
    pub async fn download_to_writer<W>(&self, id: ObjectId, writer: W) -> Result<u64, StoreError>
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let stream = self.bucket.open_download_stream(id.into()).await?;
        let mut writer = writer.compat_write();
        let bytes = copy(stream, &mut writer).await?;
        writer.flush().await?;
        Ok(bytes)
    }

    /// The underlying bucket, for call chains not covered above.
    pub fn bucket(&self) -> &GridFsBucket {
        &self.bucket
    }

    /// Shuts the connection down. Consumes the store.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("Closed GridFS client");
    }
}

pub(crate) fn filename_pattern_filter(pattern: &str) -> Result<Document, StoreError> {
    // Compile locally first, so a bad pattern fails before reaching the server.
    regex::Regex::new(pattern)?;
    Ok(doc! { "filename": { "$regex": pattern } })
}

pub(crate) fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
