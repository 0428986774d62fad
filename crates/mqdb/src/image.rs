//! Types for the contents of the `-IMAGES.OPT` record.

use binrw::{binread, BinRead, NullString};
use indexmap::IndexMap;
use std::io::Cursor;
use tracing::debug;

use crate::error::Result;

/// Size of a packed image palette: an 11-byte header followed by 256 4-byte colors.
pub const PALETTE_LEN: usize = 11 + 1024;

/// Part of a packed image.
///
/// Packed images contain shuffled rectangular areas. Each part maps one such area, described by
/// its top-left corner and size, to its place in the final unpacked image.
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct ImagePart {
    /// X coordinate of the shuffled image part
    pub source_x: u32,

    /// Y coordinate of the shuffled image part
    pub source_y: u32,

    /// X coordinate of the part in the final image
    pub target_x: u32,

    /// Y coordinate of the part in the final image
    pub target_y: u32,

    /// Width of the image part
    pub width: u32,

    /// Height of the image part
    pub height: u32,
}

/// A packed image or one animation frame.
#[binread]
#[br(little)]
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    /// Name of this frame
    #[br(map = |s: NullString| String::from_utf8_lossy(&s.0).into_owned())]
    pub name: String,

    #[br(temp)]
    parts_total: u32,

    /// Width of the unpacked frame
    pub width: u32,

    /// Height of the unpacked frame
    pub height: u32,

    /// Parts used for unpacking
    #[br(count = parts_total)]
    pub parts: Vec<ImagePart>,
}

/// A packed image or animation.
///
/// A simple packed image contains a single frame describing its contents, whereas an animation
/// contains multiple frames. The game expects all frames of one animation to share width and
/// height; the decoder does not enforce this.
#[binread]
#[br(little)]
#[derive(Debug, Clone, PartialEq)]
pub struct PackedImage {
    /// Palette bytes, [`PALETTE_LEN`] in total
    #[br(count = PALETTE_LEN)]
    pub palette: Vec<u8>,

    #[br(temp)]
    frames_total: u32,

    /// Frames in the order they appear in the file
    #[br(count = frames_total)]
    pub frames: Vec<ImageFrame>,
}

/// Decode packed image blocks from the full record payload.
///
/// Blocks are read back to back until the payload is exhausted and keyed by the offset at which
/// each block began. Those offsets are the same values the index record stores, which lets
/// callers join index entries to decoded images.
pub(crate) fn read_packed_images(contents: &[u8]) -> Result<IndexMap<u32, PackedImage>> {
    let mut cursor = Cursor::new(contents);
    let mut images = IndexMap::new();

    while (cursor.position() as usize) < contents.len() {
        let offset = cursor.position() as u32;
        let image = PackedImage::read(&mut cursor)?;
        images.insert(offset, image);
    }

    debug!(images = images.len(), "read packed images");

    Ok(images)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::image::{read_packed_images, ImagePart, PALETTE_LEN};

    fn palette(fill: u8) -> Vec<u8> {
        vec![fill; PALETTE_LEN]
    }

    fn part(values: [u32; 6]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn frame(name: &str, width: u32, height: u32, parts: &[[u32; 6]]) -> Vec<u8> {
        let mut bytes = name.as_bytes().to_vec();
        bytes.push(0);
        bytes.extend_from_slice(&(parts.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        for p in parts {
            bytes.extend_from_slice(&part(*p));
        }
        bytes
    }

    fn block(palette_fill: u8, frames: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = palette(palette_fill);
        bytes.extend_from_slice(&(frames.len() as u32).to_le_bytes());
        for f in frames {
            bytes.extend_from_slice(f);
        }
        bytes
    }

    #[test]
    fn read_single_block() -> Result<()> {
        let payload = block(
            0xAB,
            &[frame("LOGO.PNG", 800, 600, &[[0, 0, 0, 0, 800, 600]])],
        );

        let images = read_packed_images(&payload)?;
        assert_eq!(images.len(), 1);

        let image = &images[&0];
        assert_eq!(image.palette, palette(0xAB));
        assert_eq!(image.frames.len(), 1);

        let frame = &image.frames[0];
        assert_eq!(frame.name, "LOGO.PNG");
        assert_eq!(frame.width, 800);
        assert_eq!(frame.height, 600);
        assert_eq!(
            frame.parts,
            vec![ImagePart {
                source_x: 0,
                source_y: 0,
                target_x: 0,
                target_y: 0,
                width: 800,
                height: 600,
            }]
        );

        Ok(())
    }

    #[test]
    fn blocks_are_keyed_by_their_offset() -> Result<()> {
        let first = block(1, &[frame("A", 4, 4, &[[0, 0, 0, 0, 4, 4]])]);
        let second = block(
            2,
            &[
                frame("B0", 8, 8, &[[0, 0, 0, 0, 8, 8]]),
                frame("B1", 8, 8, &[[8, 0, 0, 0, 4, 8], [12, 0, 4, 0, 4, 8]]),
            ],
        );

        let mut payload = first.clone();
        payload.extend_from_slice(&second);

        let images = read_packed_images(&payload)?;
        assert_eq!(
            images.keys().copied().collect::<Vec<_>>(),
            vec![0, first.len() as u32]
        );

        let animation = &images[&(first.len() as u32)];
        assert_eq!(animation.frames.len(), 2);
        assert_eq!(animation.frames[0].name, "B0");
        assert_eq!(animation.frames[1].parts.len(), 2);

        Ok(())
    }

    #[test]
    fn block_consumes_exact_size() -> Result<()> {
        // palette + frame count + (name + terminator + part count + width + height + one part)
        let payload = block(0, &[frame("AB", 2, 2, &[[0, 0, 0, 0, 2, 2]])]);
        assert_eq!(payload.len(), PALETTE_LEN + 4 + (3 + 12 + 24));

        let images = read_packed_images(&payload)?;
        assert_eq!(images.len(), 1);

        Ok(())
    }

    #[test]
    fn read_truncated_payload() {
        let mut payload = block(0, &[frame("A", 4, 4, &[[0, 0, 0, 0, 4, 4]])]);
        payload.truncate(payload.len() - 1);

        assert!(read_packed_images(&payload).is_err());
    }
}
