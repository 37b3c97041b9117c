//! Packed palette index arrays.
//!
//! Sections store one palette index per block, packed into 64-bit longs
//! with at least 4 bits per entry. Before 20w17a (data version 2529)
//! entries may straddle two longs; from then on each long holds
//! `64 / bits` whole entries and the remaining high bits are padding.

use world2vec_core::world::SECTION_VOLUME;

/// First data version whose packed arrays never span long boundaries.
pub const NON_SPANNING_DATA_VERSION: i32 = 2529;

/// Bits used per entry for a palette of `len` entries.
pub fn bits_per_entry(len: usize) -> u32 {
    let needed = if len <= 1 { 0 } else { usize::BITS - (len - 1).leading_zeros() };
    needed.max(4)
}

/// Decode 4096 palette indices.
pub fn unpack_indices(packed: &[i64], palette_len: usize, spanning: bool) -> Vec<u16> {
    let bits = bits_per_entry(palette_len) as usize;
    let mask = (1u64 << bits) - 1;
    let mut indices = Vec::with_capacity(SECTION_VOLUME);

    if spanning {
        for i in 0..SECTION_VOLUME {
            let bit = i * bits;
            let (word, shift) = (bit / 64, bit % 64);
            let Some(&low) = packed.get(word) else { break };
            let mut value = (low as u64) >> shift;
            if shift + bits > 64 {
                let high = packed.get(word + 1).copied().unwrap_or(0) as u64;
                value |= high << (64 - shift);
            }
            indices.push((value & mask) as u16);
        }
    } else {
        let per_long = 64 / bits;
        'outer: for &long in packed {
            let long = long as u64;
            for j in 0..per_long {
                if indices.len() == SECTION_VOLUME {
                    break 'outer;
                }
                indices.push(((long >> (j * bits)) & mask) as u16);
            }
        }
    }

    indices.resize(SECTION_VOLUME, 0);
    indices
}

/// Encode palette indices in the non-spanning layout.
pub fn pack_indices(indices: &[u16], palette_len: usize) -> Vec<i64> {
    if palette_len <= 1 {
        return Vec::new();
    }
    let bits = bits_per_entry(palette_len) as usize;
    let per_long = 64 / bits;
    let mask = (1u64 << bits) - 1;
    let mut packed = vec![0i64; indices.len().div_ceil(per_long)];

    for (i, &index) in indices.iter().enumerate() {
        let value = (index as u64) & mask;
        packed[i / per_long] |= (value << ((i % per_long) * bits)) as i64;
    }
    packed
}
