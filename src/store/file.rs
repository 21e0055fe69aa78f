//! Durable concept store backed by segment files.
//!
//! Each committed store is written to `<dir>/<name>.concepts` on refresh.
//! The segment layout (little-endian):
//!
//! ```text
//! magic    [u8; 4]  "SKOS"
//! version  u32
//! count    u32      number of records
//! checksum u32      CRC32 of the payload
//! length   u64      payload length in bytes
//! payload  [u8]     bincode-encoded Vec<ConceptRecord>
//! ```
//!
//! Segments are written to a temporary file and renamed into place, so a
//! crashed build never leaves a half-written segment behind. A store that
//! has a segment on disk is loaded lazily on first access.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::{debug, info};

use crate::error::{Result, SkosError};
use crate::store::index::ConceptIndex;
use crate::store::memory::MemoryConceptStore;
use crate::store::{
    BulkResponse, ConceptRecord, ConceptStore, CreateOutcome, Readiness, SearchHits, StoreQuery,
    validate_store_name,
};

const SEGMENT_MAGIC: &[u8; 4] = b"SKOS";
const SEGMENT_VERSION: u32 = 1;
const SEGMENT_EXTENSION: &str = "concepts";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A concept store that persists committed stores in a directory.
#[derive(Debug)]
pub struct FileConceptStore {
    directory: PathBuf,
    memory: MemoryConceptStore,
}

impl FileConceptStore {
    /// Open (and create if needed) a store directory.
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(FileConceptStore {
            directory,
            memory: MemoryConceptStore::new(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Names of the stores that have a segment on disk, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SEGMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn segment_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.{SEGMENT_EXTENSION}"))
    }

    fn ensure_loaded(&self, name: &str) -> Result<()> {
        if self.memory.exists(name)? {
            return Ok(());
        }
        let path = self.segment_path(name);
        if !path.exists() {
            return Ok(());
        }
        let records = read_segment(&path)?;
        debug!(store = name, records = records.len(), "loaded concept segment");
        self.memory.install(name, ConceptIndex::from_records(records));
        Ok(())
    }
}

impl ConceptStore for FileConceptStore {
    fn wait_until_ready(&self, timeout: Duration) -> Result<Readiness> {
        let deadline = Instant::now() + timeout;
        loop {
            match fs::metadata(&self.directory) {
                Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {
                    return Ok(Readiness::Ready);
                }
                Ok(_) if Instant::now() >= deadline => {
                    return Ok(Readiness::TimedOut {
                        status: format!("{} is not a writable directory", self.directory.display()),
                    });
                }
                Err(e) if Instant::now() >= deadline => {
                    return Ok(Readiness::TimedOut {
                        status: format!("{}: {e}", self.directory.display()),
                    });
                }
                _ => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.memory.exists(name)? || self.segment_path(name).exists())
    }

    fn create(&self, name: &str) -> Result<CreateOutcome> {
        validate_store_name(name)?;
        if self.segment_path(name).exists() {
            return Ok(CreateOutcome::AlreadyExists);
        }
        self.memory.create(name)
    }

    fn bulk(&self, name: &str, records: Vec<ConceptRecord>) -> Result<BulkResponse> {
        self.ensure_loaded(name)?;
        self.memory.bulk(name, records)
    }

    fn refresh(&self, name: &str) -> Result<()> {
        self.ensure_loaded(name)?;
        self.memory.refresh(name)?;
        let snapshot = self.memory.snapshot(name)?;
        write_segment(&self.segment_path(name), snapshot.records())?;
        info!(store = name, records = snapshot.len(), "committed concept segment");
        Ok(())
    }

    fn search(&self, name: &str, query: &StoreQuery, size: usize) -> Result<SearchHits> {
        self.ensure_loaded(name)?;
        self.memory.search(name, query, size)
    }

    fn count(&self, name: &str) -> Result<usize> {
        self.ensure_loaded(name)?;
        self.memory.count(name)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let in_memory = self.memory.exists(name)?;
        if in_memory {
            self.memory.delete(name)?;
        }
        let path = self.segment_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
        } else if !in_memory {
            return Err(SkosError::store(format!("no such concept store '{name}'")));
        }
        debug!(store = name, "deleted concept store");
        Ok(())
    }
}

/// Write a segment through a temporary file and an atomic rename.
pub fn write_segment(path: &Path, records: &[ConceptRecord]) -> Result<()> {
    let payload = bincode::serialize(records)?;
    let count = u32::try_from(records.len())
        .map_err(|_| SkosError::store(format!("too many records: {}", records.len())))?;

    let tmp = path.with_extension(format!("{SEGMENT_EXTENSION}.tmp"));
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        writer.write_all(SEGMENT_MAGIC)?;
        writer.write_u32::<LittleEndian>(SEGMENT_VERSION)?;
        writer.write_u32::<LittleEndian>(count)?;
        writer.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        writer.write_u64::<LittleEndian>(payload.len() as u64)?;
        writer.write_all(&payload)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read and verify a segment.
pub fn read_segment(path: &Path) -> Result<Vec<ConceptRecord>> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != SEGMENT_MAGIC {
        return Err(SkosError::store(format!(
            "{} is not a concept segment",
            path.display()
        )));
    }
    let version = reader.read_u32::<LittleEndian>()?;
    if version != SEGMENT_VERSION {
        return Err(SkosError::store(format!(
            "unsupported segment version {version} in {}",
            path.display()
        )));
    }
    let count = reader.read_u32::<LittleEndian>()? as usize;
    let checksum = reader.read_u32::<LittleEndian>()?;
    let length = reader.read_u64::<LittleEndian>()?;

    let mut payload = Vec::new();
    reader.take(length).read_to_end(&mut payload)?;
    if payload.len() as u64 != length {
        return Err(SkosError::store(format!(
            "truncated segment {}",
            path.display()
        )));
    }
    if crc32fast::hash(&payload) != checksum {
        return Err(SkosError::store(format!(
            "checksum mismatch in {}",
            path.display()
        )));
    }

    let records: Vec<ConceptRecord> = bincode::deserialize(&payload)?;
    if records.len() != count {
        return Err(SkosError::store(format!(
            "segment {} declares {count} records, found {}",
            path.display(),
            records.len()
        )));
    }
    Ok(records)
}
