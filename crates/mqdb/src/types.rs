//! Base types for the structure of a MQDB file.

use binrw::BinRead;
use std::borrow::Cow;

/// Expected version of supported MQDB files.
pub const MQDB_VERSION: u32 = 9;

/// Signature every MQRC record header must carry.
pub const MQRC_MAGIC: [u8; 4] = *b"MQRC";

/// Size of a [`MqrcHeader`] on disk, in bytes.
pub const MQRC_HEADER_LEN: u64 = 28;

/// Size of the name buffer in a [`NameListEntry`], in bytes.
pub const NAME_BUFFER_LEN: usize = 256;

/// Id of a record within an archive.
pub type RecordId = u32;

/// Special MQRC records have their own predefined ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpecialId {
    /// The name list record every archive must contain.
    NameList = 2,
}

impl From<SpecialId> for RecordId {
    fn from(id: SpecialId) -> RecordId {
        id as RecordId
    }
}

/// MQDB file header
///
/// Defines the header of the MQDB file which always starts with "MQDB" followed by a fixed
/// version. All data is stored in little endian format. The remaining header bytes are reserved.
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
#[br(magic = b"MQDB", little)]
pub struct MqdbHeader {
    /// The format version, fixed at [`MQDB_VERSION`] for supported archives
    #[br(pad_before = 4, pad_after = 12)]
    pub version: u32,
}

/// Table of contents entry
///
/// Defines where a record lives within the MQDB file
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
#[br(little)]
pub struct TocEntry {
    /// Unique id of the record
    pub id: RecordId,

    /// The size of the contents in this record, in bytes
    pub size: u32,

    /// Total size reserved for the record in the file, in bytes
    pub size_allocated: u32,

    /// The offset from the start of the file to the associated MQRC record header
    pub offset: u32,
}

/// MQRC record header
///
/// Precedes the contents of every record in the file. Only consulted while resolving names;
/// never kept around afterwards.
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
#[br(little)]
pub struct MqrcHeader {
    /// Record signature, must equal [`MQRC_MAGIC`]
    pub signature: [u8; 4],

    /// Unique id of the record
    #[br(pad_before = 4)]
    pub id: RecordId,

    /// The size of the contents in this record, in bytes
    pub size: u32,

    /// Total size reserved for the record in the file, in bytes
    pub size_allocated: u32,

    /// Whether the record is live; deleted records stay in the file with this flag cleared
    #[br(map = |v: u32| v != 0, pad_after = 4)]
    pub used: bool,
}

/// Name list entry
///
/// Maps a human-readable name to a record id. Entries are stored back to back inside the
/// name list record payload, after a 4-byte entry count.
#[derive(BinRead, Debug, Copy, Clone, PartialEq)]
#[br(little)]
pub struct NameListEntry {
    /// Raw name buffer, null-padded
    pub name_raw: [u8; NAME_BUFFER_LEN],

    /// Id of the MQRC record this name refers to
    pub id: RecordId,
}

impl NameListEntry {
    /// Name bytes up to the first terminator.
    ///
    /// The buffer may lack a terminator entirely; at most 255 bytes are ever considered.
    pub fn name(&self) -> Cow<'_, str> {
        let len = self
            .name_raw
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_BUFFER_LEN - 1);

        String::from_utf8_lossy(&self.name_raw[..len])
    }
}
