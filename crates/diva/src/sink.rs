//! Destinations for normalized publications.
//!
//! The crawl writes every publication as soon as it is normalized, so a run that aborts halfway
//! keeps everything written before the failure. Records are never rewritten or deduplicated.

use tokio::{
  fs::{self, File, OpenOptions},
  io::AsyncWriteExt,
};

use super::*;

/// Somewhere normalized publications go.
#[async_trait]
pub trait RecordSink: Send {
  /// Stores one publication.
  async fn write(&mut self, publication: &Publication) -> Result<()>;

  /// Makes everything written so far durable.
  async fn flush(&mut self) -> Result<()> { Ok(()) }
}

/// Appends publications to a file, one compact JSON object per line.
///
/// # Examples
///
/// ```no_run
/// use diva::{prelude::*, publication::Publication, sink::JsonLinesSink};
///
/// # async fn example() -> Result<(), DivaError> {
/// let mut sink = JsonLinesSink::open("publications.jsonl").await?;
/// sink.write(&Publication::new("diva2:1600051")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JsonLinesSink {
  /// Where the lines go
  path:    PathBuf,
  /// File opened in append mode
  file:    File,
  /// Lines written through this sink
  written: usize,
}

impl JsonLinesSink {
  /// Opens `path` for appending, creating it and its parent directories when missing.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      fs::create_dir_all(parent).await?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).await?;
    debug!("Appending publications to {}", path.display());
    Ok(Self { path, file, written: 0 })
  }

  /// The output file.
  pub fn path(&self) -> &Path { &self.path }

  /// Number of publications written through this sink.
  pub fn written(&self) -> usize { self.written }
}

#[async_trait]
impl RecordSink for JsonLinesSink {
  async fn write(&mut self, publication: &Publication) -> Result<()> {
    let mut line = serde_json::to_vec(publication)?;
    line.push(b'\n');
    self.file.write_all(&line).await?;
    self.file.flush().await?;
    self.written += 1;
    Ok(())
  }

  async fn flush(&mut self) -> Result<()> {
    self.file.sync_data().await?;
    Ok(())
  }
}

/// Keeps publications in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
  /// Everything written, in order
  pub publications: Vec<Publication>,
}

#[async_trait]
impl RecordSink for MemorySink {
  async fn write(&mut self, publication: &Publication) -> Result<()> {
    self.publications.push(publication.clone());
    Ok(())
  }
}
