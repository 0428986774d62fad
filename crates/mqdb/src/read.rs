//! Types for reading MQDB archives
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use indexmap::IndexMap;
use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::{
    error::{Error, RecordNotFoundError, Result},
    image::{read_packed_images, PackedImage},
    index::IndexData,
    types::{
        MqdbHeader, MqrcHeader, NameListEntry, RecordId, SpecialId, TocEntry, MQDB_VERSION,
        MQRC_HEADER_LEN, MQRC_MAGIC,
    },
};

/// Name of the optional record holding packed image and animation metadata.
pub const INDEX_RECORD_NAME: &str = "-INDEX.OPT";

/// Name of the optional record holding packed image data.
pub const IMAGES_RECORD_NAME: &str = "-IMAGES.OPT";

/// MQDB archive reader
///
/// Decodes the table of contents, the name list, and the optional index and image records when
/// opened, then serves record lookups from the decoded tables.
///
/// ```no_run
/// fn list_names(path: &str) -> mqdb::error::Result<()> {
///     let archive = mqdb::MqdbArchive::open(path)?;
///
///     for name in archive.names() {
///         let data = archive.record_data_by_name(name)?;
///         println!("{}: {} bytes", name, data.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct MqdbArchive {
    path: PathBuf,
    toc: IndexMap<RecordId, TocEntry>,
    names: IndexMap<Box<str>, RecordId>,
    index: IndexData,
    packed_images: IndexMap<u32, PackedImage>,
}

/// Tables decoded during the construction pass.
pub(crate) struct Tables {
    toc: IndexMap<RecordId, TocEntry>,
    names: IndexMap<Box<str>, RecordId>,
    index: IndexData,
    packed_images: IndexMap<u32, PackedImage>,
}

impl MqdbArchive {
    /// Open an archive and decode its tables, including the packed image data.
    pub fn open(path: impl AsRef<Path>) -> Result<MqdbArchive> {
        Self::open_with(path, true)
    }

    /// Open an archive, optionally skipping the packed image data pass.
    ///
    /// Skipping is useful when only raw records or the index tables are needed, since
    /// `-IMAGES.OPT` is by far the largest record in real archives.
    pub fn open_with(path: impl AsRef<Path>, read_image_data: bool) -> Result<MqdbArchive> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let tables = Tables::read(&mut file, read_image_data)?;

        Ok(MqdbArchive {
            path,
            toc: tables.toc,
            names: tables.names,
            index: tables.index,
            packed_images: tables.packed_images,
        })
    }

    /// Path this archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of resolved names in this archive.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether this archive resolved no names at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all resolved record names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(|s| s.as_ref())
    }

    /// Search for a table of contents entry by record id.
    ///
    /// Accepts plain ids as well as [`SpecialId`] values.
    pub fn by_id(&self, id: impl Into<RecordId>) -> Option<&TocEntry> {
        self.toc.get(&id.into())
    }

    /// Search for a table of contents entry by record name.
    pub fn by_name(&self, name: &str) -> Option<&TocEntry> {
        self.names.get(name).and_then(|id| self.toc.get(id))
    }

    /// Read the raw contents of a record by id.
    ///
    /// The archive file is reopened for every call; no handle is kept between fetches.
    pub fn record_data(&self, id: impl Into<RecordId>) -> Result<Vec<u8>> {
        let id = id.into();
        let entry = self.by_id(id).ok_or(RecordNotFoundError::Id(id))?;

        self.fetch(entry)
    }

    /// Read the raw contents of a record by name.
    pub fn record_data_by_name(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .by_name(name)
            .ok_or_else(|| RecordNotFoundError::Name(name.to_owned()))?;

        self.fetch(entry)
    }

    /// Decoded `-INDEX.OPT` tables; empty when the archive carries no index record.
    pub fn index(&self) -> &IndexData {
        &self.index
    }

    /// Decoded `-IMAGES.OPT` blocks keyed by their payload-relative offset.
    ///
    /// Empty when the archive carries no images record or when it was opened with the image
    /// data pass skipped.
    pub fn packed_images(&self) -> &IndexMap<u32, PackedImage> {
        &self.packed_images
    }

    fn fetch(&self, entry: &TocEntry) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.offset as u64 + MQRC_HEADER_LEN))?;

        let mut data = vec![0u8; entry.size as usize];
        file.read_exact(&mut data)?;

        Ok(data)
    }
}

impl Tables {
    /// Run the full construction pass over the archive.
    ///
    /// Any failure aborts the pass; there is no partially decoded result.
    pub(crate) fn read<R: Read + Seek>(reader: &mut R, read_image_data: bool) -> Result<Tables> {
        check_file_header(reader)?;

        let toc = read_table_of_contents(reader)?;
        let names = read_name_list(reader, &toc)?;

        let index = match find_named(&toc, &names, INDEX_RECORD_NAME) {
            Some(entry) => IndexData::read(&read_record_payload(reader, entry)?)?,
            None => IndexData::default(),
        };

        let packed_images = match find_named(&toc, &names, IMAGES_RECORD_NAME) {
            Some(entry) if read_image_data => {
                read_packed_images(&read_record_payload(reader, entry)?)?
            }
            _ => IndexMap::new(),
        };

        Ok(Tables {
            toc,
            names,
            index,
            packed_images,
        })
    }
}

/// Read and check the MQDB file header.
#[instrument(skip(reader), err)]
fn check_file_header<R: Read + Seek>(reader: &mut R) -> Result<()> {
    let header = MqdbHeader::read(reader).map_err(|err| match err {
        binrw::Error::BadMagic { .. } => Error::InvalidSignature,
        err => err.into(),
    })?;

    if header.version != MQDB_VERSION {
        return Err(Error::UnsupportedVersion(header.version));
    }

    Ok(())
}

/// Read the table of contents into an id-keyed map.
#[instrument(skip(reader), err)]
fn read_table_of_contents<R: Read + Seek>(
    reader: &mut R,
) -> Result<IndexMap<RecordId, TocEntry>> {
    let toc_offset = reader.read_u32::<LittleEndian>()?;
    reader.seek(SeekFrom::Start(toc_offset as u64))?;

    let total = reader.read_u32::<LittleEndian>()?;

    let mut toc = IndexMap::with_capacity(total as usize);
    for _ in 0..total {
        let entry = TocEntry::read(reader)?;

        if toc.insert(entry.id, entry).is_some() {
            return Err(Error::DuplicateRecordId(entry.id));
        }
    }

    debug!(records = toc.len(), "read table of contents");

    Ok(toc)
}

/// Resolve the name list record into a name-keyed id map.
#[instrument(skip(reader, toc), err)]
fn read_name_list<R: Read + Seek>(
    reader: &mut R,
    toc: &IndexMap<RecordId, TocEntry>,
) -> Result<IndexMap<Box<str>, RecordId>> {
    let list = toc
        .get(&RecordId::from(SpecialId::NameList))
        .ok_or(Error::MissingNameList)?;

    reader.seek(SeekFrom::Start(list.offset as u64 + MQRC_HEADER_LEN))?;
    let total = reader.read_u32::<LittleEndian>()?;

    let mut names = IndexMap::new();
    for _ in 0..total {
        let entry = NameListEntry::read(reader)?;

        let Some(record) = toc.get(&entry.id) else {
            // Stale entries are left behind by tools that delete records
            // without rewriting the name list.
            debug!(id = entry.id, "name list references an unknown record");
            continue;
        };

        // The header at the ToC offset must carry the MQRC signature;
        // anything else means the file is corrupt.
        let position = reader.stream_position()?;
        reader.seek(SeekFrom::Start(record.offset as u64))?;

        let header = MqrcHeader::read(reader)?;
        if header.signature != MQRC_MAGIC {
            return Err(Error::BadRecordSignature(entry.id));
        }

        reader.seek(SeekFrom::Start(position))?;

        if !header.used {
            continue;
        }

        let name: Box<str> = entry.name().into();
        if names.contains_key(&name) {
            // Archive editors are known to leave several records under one
            // name; the game resolves names to the first occurrence.
            debug!(%name, id = entry.id, "dropping duplicate name");
            continue;
        }

        names.insert(name, entry.id);
    }

    debug!(names = names.len(), "resolved name list");

    Ok(names)
}

fn find_named<'a>(
    toc: &'a IndexMap<RecordId, TocEntry>,
    names: &IndexMap<Box<str>, RecordId>,
    name: &str,
) -> Option<&'a TocEntry> {
    names.get(name).and_then(|id| toc.get(id))
}

/// Load the full payload of a record into memory.
#[instrument(skip(reader, entry), err)]
fn read_record_payload<R: Read + Seek>(reader: &mut R, entry: &TocEntry) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(entry.offset as u64 + MQRC_HEADER_LEN))?;

    let mut contents = vec![0u8; entry.size as usize];
    reader.read_exact(&mut contents)?;

    Ok(contents)
}
