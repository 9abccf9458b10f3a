use std::{io::Write as _, path::Path};

use crate::error::{VatError, VatResult};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Row-major, tightly packed RGB8 grid. Row 0 is the top scanline.
#[derive(Clone, Debug)]
pub struct RgbGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbGrid {
    pub fn new(width: u32, height: u32) -> VatResult<Self> {
        if width == 0 || height == 0 {
            return Err(VatError::config("RgbGrid width/height must be non-zero"));
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        debug_assert!(x < self.width && y < self.height);
        let at = (y as usize * self.width as usize + x as usize) * 3;
        self.data[at..at + 3].copy_from_slice(&rgb);
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let at = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[at], self.data[at + 1], self.data[at + 2]]
    }

    fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let at = y as usize * stride;
        &self.data[at..at + stride]
    }
}

/// Encode the grid as a minimal truecolor PNG: IHDR, one zlib IDAT with
/// a "no filter" byte per scanline, IEND.
pub fn encode(grid: &RgbGrid) -> VatResult<Vec<u8>> {
    let mut out = Vec::with_capacity(grid.data.len() / 2 + 64);
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&grid.width.to_be_bytes());
    ihdr.extend_from_slice(&grid.height.to_be_bytes());
    // bit depth 8, color type 2 (truecolor), compression 0, filter 0, interlace 0
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
    write_chunk(&mut out, b"IHDR", &ihdr);

    let mut raw = Vec::with_capacity(grid.data.len() + grid.height as usize);
    for y in 0..grid.height {
        raw.push(0); // filter: None
        raw.extend_from_slice(grid.row(y));
    }

    let mut encoder = flate2::write::ZlibEncoder::new(
        Vec::with_capacity(raw.len() / 2),
        flate2::Compression::best(),
    );
    encoder
        .write_all(&raw)
        .map_err(|e| VatError::io(format!("deflate of image data failed: {e}")))?;
    let compressed = encoder
        .finish()
        .map_err(|e| VatError::io(format!("deflate of image data failed: {e}")))?;
    write_chunk(&mut out, b"IDAT", &compressed);

    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

/// Encode and write in one step. The file is only created once the
/// whole encoding succeeded, so a failure leaves no partial output.
pub fn write(grid: &RgbGrid, path: &Path) -> VatResult<()> {
    let bytes = encode(grid)?;
    std::fs::write(path, bytes)
        .map_err(|e| VatError::io(format!("write png '{}': {e}", path.display())))
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);

    let mut crc = crc32fast::Hasher::new();
    crc.update(tag);
    crc.update(payload);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
}
