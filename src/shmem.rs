//! # Shared ephemeris region
//!
//! A memory-mapped file holding one [`EphemerisData`] record, so that a single producer
//! process can publish positions that any number of consumer processes read.
//!
//! ## File layout
//!
//! ```text
//! offset 0   magic       u32  "SKYE"
//! offset 4   version     u32
//! offset 8   payload     u64  size of the record in bytes
//! offset 16  EphemerisData
//! ```
//!
//! ## Consistency
//!
//! There is no locking. The writer updates the record in place, field by field, and a reader
//! may observe a record halfway through an update. Values change slowly between ticks, so a
//! torn snapshot shows at worst one body lagging by one update.
//!
//! ## Example
//!
//! ```rust,no_run
//! use skyephem::shmem::{EphemerisReader, EphemerisWriter};
//!
//! let path = EphemerisWriter::default_path();
//! let mut writer = EphemerisWriter::attach(&path)?;
//! writer.record_mut().turbidity = 3.0;
//!
//! let reader = EphemerisReader::attach(&path)?;
//! assert_eq!(reader.snapshot().turbidity, 3.0);
//! # Ok::<(), skyephem::sky_errors::SkyError>(())
//! ```

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use log::info;
use memmap2::{Mmap, MmapMut};

use crate::{engine::EphemerisStore, ephemeris_data::EphemerisData, sky_errors::SkyError};

/// "SKYE" in little-endian ASCII.
const MAGIC: u32 = 0x4559_4B53;

const VERSION: u32 = 1;

pub const HEADER_SIZE: usize = std::mem::size_of::<RegionHeader>();

pub const PAYLOAD_SIZE: usize = std::mem::size_of::<EphemerisData>();

pub const REGION_SIZE: usize = HEADER_SIZE + PAYLOAD_SIZE;

/// Well-known file name of the region inside the temporary directory.
pub const DEFAULT_REGION_NAME: &str = "skyephem.shm";

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
struct RegionHeader {
    magic: u32,
    version: u32,
    payload_size: u64,
}

impl RegionHeader {
    fn current() -> Self {
        RegionHeader {
            magic: MAGIC,
            version: VERSION,
            payload_size: PAYLOAD_SIZE as u64,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SkyError + '_ {
    move |source| SkyError::SharedRegionIo {
        path: path.to_path_buf(),
        source,
    }
}

/// Check the size and header of a mapped region.
fn validate(path: &Path, bytes: &[u8]) -> Result<(), SkyError> {
    if bytes.len() < REGION_SIZE {
        return Err(SkyError::SharedRegionSize {
            path: path.to_path_buf(),
            expected: REGION_SIZE,
            found: bytes.len(),
        });
    }
    let header: RegionHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    if header != RegionHeader::current() {
        return Err(SkyError::SharedRegionHeader(path.to_path_buf()));
    }
    Ok(())
}

/// Single writer handle on the shared region.
pub struct EphemerisWriter {
    path: PathBuf,
    mmap: MmapMut,
    // keeps the mapping's file open for the lifetime of the handle
    _file: File,
}

impl EphemerisWriter {
    /// `skyephem.shm` in the OS temporary directory.
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(DEFAULT_REGION_NAME)
    }

    /// Attach to the region at `path`, creating and initializing it if the file is absent or
    /// empty.
    ///
    /// A new region is filled with [`EphemerisData::default`]. An existing region keeps
    /// its content, so a restarted producer resumes from the last published record.
    ///
    /// Return
    /// ------
    /// * `SkyError::SharedRegionIo` if the file cannot be opened, sized or mapped.
    /// * `SkyError::SharedRegionSize` / `SharedRegionHeader` if an existing file is not a
    ///   region of this layout.
    pub fn attach(path: impl AsRef<Path>) -> Result<Self, SkyError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(io_error(path))?;

        let len = file.metadata().map_err(io_error(path))?.len();
        let fresh = len == 0;
        if fresh {
            file.set_len(REGION_SIZE as u64).map_err(io_error(path))?;
        }

        // SAFETY: the file stays open in `_file`; concurrent writers are excluded by the
        // single-producer contract, readers only copy plain bytes out.
        let mut mmap = unsafe { MmapMut::map_mut(&file) }.map_err(io_error(path))?;

        if fresh {
            mmap[..HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&RegionHeader::current()));
            mmap[HEADER_SIZE..REGION_SIZE]
                .copy_from_slice(bytemuck::bytes_of(&EphemerisData::default()));
            info!("Created shared ephemeris region {}", path.display());
        } else {
            validate(path, &mmap)?;
            info!("Attached to shared ephemeris region {}", path.display());
        }

        Ok(EphemerisWriter {
            path: path.to_path_buf(),
            mmap,
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The record as currently stored in the region.
    pub fn record(&self) -> &EphemerisData {
        // the mapping is page aligned and HEADER_SIZE keeps the record 8-byte aligned
        bytemuck::from_bytes(&self.mmap[HEADER_SIZE..REGION_SIZE])
    }

    /// Mutable view on the record; writes are immediately visible to readers.
    pub fn record_mut(&mut self) -> &mut EphemerisData {
        bytemuck::from_bytes_mut(&mut self.mmap[HEADER_SIZE..REGION_SIZE])
    }

    /// Overwrite the whole record at once.
    pub fn publish(&mut self, data: &EphemerisData) {
        *self.record_mut() = *data;
    }

    /// Flush the mapping to its backing file.
    pub fn flush(&self) -> Result<(), SkyError> {
        self.mmap.flush().map_err(io_error(&self.path))
    }
}

impl EphemerisStore for EphemerisWriter {
    fn record(&self) -> &EphemerisData {
        EphemerisWriter::record(self)
    }

    fn record_mut(&mut self) -> &mut EphemerisData {
        EphemerisWriter::record_mut(self)
    }
}

/// Read-only handle on the shared region.
pub struct EphemerisReader {
    path: PathBuf,
    mmap: Mmap,
    _file: File,
}

impl EphemerisReader {
    /// Attach read-only to an existing region.
    ///
    /// Return
    /// ------
    /// * `SkyError::SharedRegionIo` if the file does not exist or cannot be mapped.
    /// * `SkyError::SharedRegionSize` / `SharedRegionHeader` if it is not a region of
    ///   this layout.
    pub fn attach(path: impl AsRef<Path>) -> Result<Self, SkyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(io_error(path))?;

        // SAFETY: the mapping is only ever copied out of, see `snapshot`.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_error(path))?;
        validate(path, &mmap)?;
        info!("Reading shared ephemeris region {}", path.display());

        Ok(EphemerisReader {
            path: path.to_path_buf(),
            mmap,
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the record as it is right now.
    ///
    /// The copy is not atomic with respect to the writer.
    pub fn snapshot(&self) -> EphemerisData {
        bytemuck::pod_read_unaligned(&self.mmap[HEADER_SIZE..REGION_SIZE])
    }
}

#[cfg(test)]
mod shmem_test {
    use super::*;
    use crate::bodies::CelestialBodyName;

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 16);
        assert_eq!(REGION_SIZE % 8, 0);
    }

    #[test]
    fn test_create_and_reattach() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.shm");

        let mut writer = EphemerisWriter::attach(&path).unwrap();
        assert_eq!(*writer.record(), EphemerisData::default());
        writer.record_mut().latitude = -33.9;
        writer.record_mut().body_mut(CelestialBodyName::Venus).magnitude = -4.1;
        writer.flush().unwrap();
        drop(writer);

        let writer = EphemerisWriter::attach(&path).unwrap();
        assert_eq!(writer.record().latitude, -33.9);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), REGION_SIZE as u64);
    }

    #[test]
    fn test_reader_sees_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.shm");

        let mut writer = EphemerisWriter::attach(&path).unwrap();
        let reader = EphemerisReader::attach(&path).unwrap();

        writer.record_mut().turbidity = 7.5;
        let snap = reader.snapshot();
        assert_eq!(snap.turbidity, 7.5);
        assert_eq!(snap.body(CelestialBodyName::Moon).name(), "Moon");

        let mut data = EphemerisData::default();
        data.longitude = 2.35;
        writer.publish(&data);
        assert_eq!(reader.snapshot().longitude, 2.35);
    }

    #[test]
    fn test_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();

        let small = dir.path().join("small.shm");
        std::fs::write(&small, [1u8; 8]).unwrap();
        assert!(matches!(
            EphemerisWriter::attach(&small),
            Err(SkyError::SharedRegionSize { expected: REGION_SIZE, found: 8, .. })
        ));

        let garbage = dir.path().join("garbage.shm");
        std::fs::write(&garbage, vec![0xAB; REGION_SIZE]).unwrap();
        assert_eq!(
            EphemerisReader::attach(&garbage).err(),
            Some(SkyError::SharedRegionHeader(garbage.clone()))
        );
    }

    #[test]
    fn test_reader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.shm");
        assert!(matches!(
            EphemerisReader::attach(&path),
            Err(SkyError::SharedRegionIo { .. })
        ));
    }
}
