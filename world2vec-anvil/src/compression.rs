//! Chunk payload compression.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use lz4_java_wrc::{Lz4BlockInput, Lz4BlockOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
    Lz4 = 4,
}

impl CompressionType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Gzip),
            2 => Some(Self::Zlib),
            3 => Some(Self::Uncompressed),
            4 => Some(Self::Lz4),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

pub fn decompress(data: &[u8], compression: CompressionType) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    match compression {
        CompressionType::Gzip => {
            GzDecoder::new(data).read_to_end(&mut out)?;
        }
        CompressionType::Zlib => {
            ZlibDecoder::new(data).read_to_end(&mut out)?;
        }
        CompressionType::Uncompressed => out.extend_from_slice(data),
        CompressionType::Lz4 => {
            Lz4BlockInput::new(data).read_to_end(&mut out)?;
        }
    }
    Ok(out)
}

pub fn compress(data: &[u8], compression: CompressionType) -> std::io::Result<Vec<u8>> {
    match compression {
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;
            encoder.finish()
        }
        CompressionType::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;
            encoder.finish()
        }
        CompressionType::Uncompressed => Ok(data.to_vec()),
        CompressionType::Lz4 => {
            let mut out = Vec::new();
            {
                let mut encoder = Lz4BlockOutput::new(&mut out);
                encoder.write_all(data)?;
                encoder.flush()?;
            }
            Ok(out)
        }
    }
}

/// Compress NBT bytes and pack in MCA format: [length:4][type:1][data:N]
pub fn compress_and_wrap_chunk(nbt: &[u8], compression: CompressionType) -> std::io::Result<Vec<u8>> {
    let compressed = compress(nbt, compression)?;
    let mut result = Vec::with_capacity(5 + compressed.len());
    let total_len = (compressed.len() + 1) as u32;
    result.extend_from_slice(&total_len.to_be_bytes());
    result.push(compression.as_byte());
    result.extend_from_slice(&compressed);
    Ok(result)
}
