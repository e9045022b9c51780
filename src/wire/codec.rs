//! Candidate packing for inter-island transport
//!
//! Layout, all little-endian:
//!
//! ```text
//! magic "LJPB" | version u16 | count u32 | particles u32
//! count × ( fitness f64 | particles × ( x i32 | y i32 ) )
//! ```
//!
//! The body after the header is exactly `count` fitness values plus
//! `count × particles` coordinate pairs.

use crate::error::WireError;
use crate::genome::position::Position;
use crate::population::candidate::Candidate;

/// Magic bytes identifying a packed candidate buffer
pub const WIRE_MAGIC: [u8; 4] = *b"LJPB";

/// Current schema version
pub const WIRE_VERSION: u16 = 1;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 4 + 2 + 4 + 4;

const FITNESS_LEN: usize = 8;
const PAIR_LEN: usize = 8;

/// Decoded buffer header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireHeader {
    pub version: u16,
    pub count: usize,
    pub num_particles: usize,
}

impl WireHeader {
    /// Parse and validate the header against the buffer's total length
    pub fn parse(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < HEADER_LEN {
            return Err(WireError::Truncated {
                needed: HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let mut reader = Reader::new(bytes);
        let magic: [u8; 4] = reader.array();
        if magic != WIRE_MAGIC {
            return Err(WireError::BadMagic(magic));
        }

        let version = u16::from_le_bytes(reader.array());
        if version != WIRE_VERSION {
            return Err(WireError::UnsupportedVersion {
                expected: WIRE_VERSION,
                found: version,
            });
        }

        let count = u32::from_le_bytes(reader.array()) as usize;
        let num_particles = u32::from_le_bytes(reader.array()) as usize;

        let needed = checked_packed_len(count, num_particles).ok_or(WireError::Overflow(count))?;
        if bytes.len() < needed {
            return Err(WireError::Truncated {
                needed,
                actual: bytes.len(),
            });
        }
        if bytes.len() > needed {
            return Err(WireError::TrailingBytes {
                expected: needed,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            version,
            count,
            num_particles,
        })
    }
}

/// Exact size of a packed buffer holding `count` candidates
///
/// # Panics
/// Panics on arithmetic overflow
pub fn packed_len(count: usize, num_particles: usize) -> usize {
    checked_packed_len(count, num_particles).expect("packed length overflows usize")
}

fn checked_packed_len(count: usize, num_particles: usize) -> Option<usize> {
    let per_candidate = num_particles.checked_mul(PAIR_LEN)?.checked_add(FITNESS_LEN)?;
    count.checked_mul(per_candidate)?.checked_add(HEADER_LEN)
}

/// Pack a run of candidates
///
/// Every candidate must have exactly `num_particles` positions.
pub fn encode(candidates: &[Candidate], num_particles: usize) -> Result<Vec<u8>, WireError> {
    let count = u32::try_from(candidates.len()).map_err(|_| WireError::Overflow(candidates.len()))?;
    let particles = u32::try_from(num_particles).map_err(|_| WireError::Overflow(num_particles))?;
    let len = checked_packed_len(candidates.len(), num_particles)
        .ok_or(WireError::Overflow(candidates.len()))?;

    let mut buf = Vec::with_capacity(len);
    buf.extend_from_slice(&WIRE_MAGIC);
    buf.extend_from_slice(&WIRE_VERSION.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&particles.to_le_bytes());

    for candidate in candidates {
        if candidate.len() != num_particles {
            return Err(WireError::ParticleMismatch {
                expected: num_particles,
                actual: candidate.len(),
            });
        }
        buf.extend_from_slice(&candidate.fitness().to_le_bytes());
        for p in candidate.positions() {
            buf.extend_from_slice(&p.x.to_le_bytes());
            buf.extend_from_slice(&p.y.to_le_bytes());
        }
    }

    debug_assert_eq!(buf.len(), len);
    Ok(buf)
}

/// Unpack a buffer into new candidates
pub fn decode(bytes: &[u8]) -> Result<Vec<Candidate>, WireError> {
    let header = WireHeader::parse(bytes)?;
    let mut reader = Reader::new(&bytes[HEADER_LEN..]);
    Ok((0..header.count)
        .map(|_| read_candidate(&mut reader, header.num_particles))
        .collect())
}

/// Unpack a buffer over a caller-supplied run of candidates
///
/// The buffer must hold exactly `dest.len()` candidates with the same
/// particle count as the destination.
pub fn decode_into(bytes: &[u8], dest: &mut [Candidate]) -> Result<(), WireError> {
    let header = WireHeader::parse(bytes)?;
    if header.count != dest.len() {
        return Err(WireError::CountMismatch {
            expected: dest.len(),
            actual: header.count,
        });
    }
    if let Some(first) = dest.first() {
        if header.num_particles != first.len() {
            return Err(WireError::ParticleMismatch {
                expected: first.len(),
                actual: header.num_particles,
            });
        }
    }

    let mut reader = Reader::new(&bytes[HEADER_LEN..]);
    for slot in dest.iter_mut() {
        *slot = read_candidate(&mut reader, header.num_particles);
    }
    Ok(())
}

fn read_candidate(reader: &mut Reader<'_>, num_particles: usize) -> Candidate {
    let fitness = f64::from_le_bytes(reader.array());
    let positions = (0..num_particles)
        .map(|_| {
            let x = i32::from_le_bytes(reader.array());
            let y = i32::from_le_bytes(reader.array());
            Position::new(x, y)
        })
        .collect();
    Candidate::from_raw_parts(positions, fitness)
}

/// Cursor over a buffer whose length was validated up front
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}
