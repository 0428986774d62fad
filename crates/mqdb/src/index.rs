//! Types for the contents of the `-INDEX.OPT` record.

use binrw::{BinRead, NullString};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::debug;

use crate::error::Result;
use crate::types::RecordId;

/// Id value marking an index entry as an animation-frame descriptor.
pub const ANIMATION_SENTINEL: RecordId = RecordId::MAX;

/// Location of packed image data inside the `-IMAGES.OPT` record payload.
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct PackedImageInfo {
    /// Offset from the beginning of the images record payload
    pub offset: u32,

    /// Total size of the packed image data, in bytes
    pub size: u32,
}

/// One `-INDEX.OPT` entry as stored on disk.
#[derive(BinRead, Debug)]
#[br(little)]
struct IndexEntry {
    id: RecordId,

    #[br(map = |s: NullString| String::from_utf8_lossy(&s.0).into_owned())]
    name: String,

    info: PackedImageInfo,
}

/// Entries describing packed images.
///
/// The three vectors always have the same number of elements. This way it is possible to look up
/// the index of an image name and access the corresponding record id or [`PackedImageInfo`] with
/// the same index.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImageIndices {
    /// Ids of the MQRC records where raw image data is stored
    pub ids: Vec<RecordId>,

    /// Names of the images
    pub names: Vec<String>,

    /// Where each packed image lives inside the images record
    pub packed_info: Vec<PackedImageInfo>,
}

/// Entries describing packed animations.
///
/// As with [`ImageIndices`], the vectors always have the same number of elements. Animations
/// carry no record id of their own.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnimationIndices {
    /// Names of the animations
    pub names: Vec<String>,

    /// Where each packed animation lives inside the images record
    pub packed_info: Vec<PackedImageInfo>,
}

/// Decoded contents of the `-INDEX.OPT` record.
///
/// Stays empty when the archive carries no index record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexData {
    /// Packed image entries
    pub images: ImageIndices,

    /// Packed animation entries
    pub animations: AnimationIndices,
}

impl IndexData {
    /// Decode index entries from the full record payload.
    ///
    /// Entries carrying the sentinel id describe animation frames and land in the animation
    /// table; every other entry is an image.
    pub(crate) fn read(contents: &[u8]) -> Result<IndexData> {
        let mut cursor = Cursor::new(contents);
        let total = cursor.read_u32::<LittleEndian>()?;

        let mut index = IndexData::default();
        for _ in 0..total {
            let entry = IndexEntry::read(&mut cursor)?;

            if entry.id == ANIMATION_SENTINEL {
                index.animations.names.push(entry.name);
                index.animations.packed_info.push(entry.info);
            } else {
                index.images.ids.push(entry.id);
                index.images.names.push(entry.name);
                index.images.packed_info.push(entry.info);
            }
        }

        debug!(
            images = index.images.names.len(),
            animations = index.animations.names.len(),
            "read index record"
        );

        Ok(index)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::index::{IndexData, PackedImageInfo, ANIMATION_SENTINEL};

    fn entry(id: u32, name: &str, offset: u32, size: u32) -> Vec<u8> {
        let mut bytes = id.to_le_bytes().to_vec();
        bytes.extend_from_slice(name.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&offset.to_le_bytes());
        bytes.extend_from_slice(&size.to_le_bytes());
        bytes
    }

    fn payload(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = (entries.len() as u32).to_le_bytes().to_vec();
        for entry in entries {
            bytes.extend_from_slice(entry);
        }
        bytes
    }

    #[test]
    fn read_empty() -> Result<()> {
        let index = IndexData::read(&payload(&[]))?;
        assert_eq!(index, IndexData::default());

        Ok(())
    }

    #[test]
    fn read_images_and_animations() -> Result<()> {
        let index = IndexData::read(&payload(&[
            entry(100, "LOGO.PNG", 0, 1063),
            entry(ANIMATION_SENTINEL, "RLOOP", 1063, 2098),
            entry(101, "CURSOR.PNG", 3161, 1063),
        ]))?;

        assert_eq!(index.images.ids, vec![100, 101]);
        assert_eq!(index.images.names, vec!["LOGO.PNG", "CURSOR.PNG"]);
        assert_eq!(
            index.images.packed_info,
            vec![
                PackedImageInfo {
                    offset: 0,
                    size: 1063
                },
                PackedImageInfo {
                    offset: 3161,
                    size: 1063
                },
            ]
        );

        assert_eq!(index.animations.names, vec!["RLOOP"]);
        assert_eq!(
            index.animations.packed_info,
            vec![PackedImageInfo {
                offset: 1063,
                size: 2098
            }]
        );

        Ok(())
    }

    #[test]
    fn sentinel_entries_never_reach_the_image_table() -> Result<()> {
        let index = IndexData::read(&payload(&[entry(ANIMATION_SENTINEL, "ANIM1", 0, 10)]))?;

        assert_eq!(index.animations.names, vec!["ANIM1"]);
        assert_eq!(index.animations.packed_info.len(), 1);
        assert!(index.images.ids.is_empty());
        assert!(index.images.names.is_empty());
        assert!(index.images.packed_info.is_empty());

        Ok(())
    }

    #[test]
    fn tables_stay_aligned() -> Result<()> {
        let index = IndexData::read(&payload(&[
            entry(1, "A", 0, 1),
            entry(ANIMATION_SENTINEL, "B", 1, 1),
            entry(2, "C", 2, 1),
            entry(ANIMATION_SENTINEL, "D", 3, 1),
            entry(3, "E", 4, 1),
        ]))?;

        assert_eq!(index.images.ids.len(), index.images.names.len());
        assert_eq!(index.images.ids.len(), index.images.packed_info.len());
        assert_eq!(
            index.animations.names.len(),
            index.animations.packed_info.len()
        );
        assert_eq!(index.images.ids.len(), 3);
        assert_eq!(index.animations.names.len(), 2);

        Ok(())
    }

    #[test]
    fn read_truncated_entry() {
        let mut bytes = payload(&[entry(1, "A", 0, 1)]);
        bytes.truncate(bytes.len() - 2);

        assert!(IndexData::read(&bytes).is_err());
    }
}
