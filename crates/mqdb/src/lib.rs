//! This library handles reading **MQDB** resource archives used by *Disciples II*.
//!
//! # MQDB Archive Format Documentation
//!
//! This crate provides utilities to read and extract data from the **MQDB** archive format used by
//! the game *Disciples II*. The MQDB format is a custom binary format that stores various game
//! resources as id-addressed records within a single file. MQDB files are typically identified
//! with the `.ff` extension.
//!
//! ## File Structure
//!
//! A MQDB file consists of a file header, an offset to the table of contents, the record blocks
//! themselves, and the table of contents.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "MQDB"                                            |
//! | 0x0004         | Reserved               | 4 bytes                                                    |
//! | 0x0008         | Version                | 4 bytes: Fixed value 9                                     |
//! | 0x000C         | Reserved               | 12 bytes                                                   |
//! | 0x0018         | ToC Offset             | 4 bytes: Absolute offset to the table of contents          |
//!
//! ### Table of Contents
//!
//! The table of contents starts with a 4-byte entry count followed by that many fixed-size
//! entries. Record ids are unique within an archive; a duplicate id makes every later id-based
//! lookup ambiguous and is treated as corruption.
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Record Id              | 4 bytes: Unique id of the record                        |
//! | 0x0004         | Size                   | 4 bytes: Size of the record contents                    |
//! | 0x0008         | Allocated Size         | 4 bytes: Total size reserved for the record in the file |
//! | 0x000C         | Offset                 | 4 bytes: Absolute offset to the record header           |
//!
//! ### Records
//!
//! Each record is preceded by a 28-byte MQRC header:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "MQRC"                                         |
//! | 0x0004         | Reserved               | 4 bytes                                                 |
//! | 0x0008         | Record Id              | 4 bytes: Unique id of the record                        |
//! | 0x000C         | Size                   | 4 bytes: Size of the record contents                    |
//! | 0x0010         | Allocated Size         | 4 bytes: Total size reserved for the record in the file |
//! | 0x0014         | Used                   | 4 bytes: Nonzero if the record is live                  |
//! | 0x0018         | Reserved               | 4 bytes                                                 |
//!
//! ### Name List
//!
//! The record with id 2 is the name list, mapping human-readable names to record ids. Its payload
//! is a 4-byte entry count followed by fixed-size entries: a 256-byte null-padded name buffer and
//! a 4-byte record id. Entries referencing ids absent from the table of contents are stale
//! leftovers from archive-editing tools and are skipped. Deleted records (whose header reports an
//! unused state) and duplicate names are skipped as well; the first occurrence of a name wins.
//!
//! ### Index Record
//!
//! The optional record named `-INDEX.OPT` enumerates packed images and animations. Its payload is
//! a 4-byte entry count followed by variable-length entries:
//!
//! | Field          | Description                                                             |
//! |----------------|-------------------------------------------------------------------------|
//! | Id             | 4 bytes: Record id of the raw image data, or `0xFFFFFFFF` for animations|
//! | Name           | Variable: Null-terminated name                                          |
//! | Offset         | 4 bytes: Offset into the `-IMAGES.OPT` payload                          |
//! | Size           | 4 bytes: Size of the packed image data                                  |
//!
//! ### Images Record
//!
//! The optional record named `-IMAGES.OPT` holds the packed image data itself: a sequence of
//! blocks, each a 1035-byte palette (11-byte header plus 256 4-byte colors), a 4-byte frame
//! count, and the frames. A frame is a null-terminated name, a 4-byte part count, 4-byte width
//! and height, and its parts. A part is six 4-byte fields describing how a shuffled rectangle
//! maps into the final image: source x/y, target x/y, width, height. Blocks are addressed by
//! their byte offset within the payload, the same value stored in the index entries.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.ff`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod image;
pub mod index;
pub mod read;
pub mod types;

pub use image::PackedImage;
pub use index::IndexData;
pub use read::MqdbArchive;
pub use types::SpecialId;
