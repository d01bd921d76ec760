//! JPEG marker scanning
//!
//! Walks the marker segments in front of the first scan and pulls out the
//! side information an encoder chose: frame components with their sampling
//! factors and table slots, quantization tables, restart interval, and
//! whether a JFIF segment was written.

use byteorder::{BigEndian, ByteOrder};

use crate::errors::{TileError, TileResult};

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const DQT: u8 = 0xDB;
const DRI: u8 = 0xDD;
const APP0: u8 = 0xE0;
const TEM: u8 = 0x01;

const JFIF_ID: &[u8; 5] = b"JFIF\0";

/// Natural-order index of each zigzag position
pub const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20, 13, 6, 7, 14, 21,
    28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59, 52, 45, 38, 31, 39, 46, 53, 60, 61,
    54, 47, 55, 62, 63,
];

/// One component of the frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameComponent {
    pub id: u8,
    pub horizontal: u8,
    pub vertical: u8,
    pub table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub components: Vec<FrameComponent>,
}

impl Frame {
    /// Subsampling of component `i` relative to the largest sampling factors
    pub fn subsampling(&self, i: usize) -> (u8, u8) {
        let max_h = self.components.iter().map(|c| c.horizontal).max().unwrap_or(1);
        let max_v = self.components.iter().map(|c| c.vertical).max().unwrap_or(1);
        let c = &self.components[i];
        (max_h / c.horizontal.max(1), max_v / c.vertical.max(1))
    }
}

/// Side information found in front of the first scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JpegMarkers {
    pub frame: Option<Frame>,
    /// Quantization tables by slot, natural order
    pub tables: [Option<[u16; 64]>; 4],
    pub restart_interval: u16,
    pub jfif: bool,
}

/// A marker segment: its code, byte span and the bytes after the length field
struct Segment<'a> {
    marker: u8,
    start: usize,
    end: usize,
    body: &'a [u8],
}

/// Iterates segments from just after SOI up to and including SOS
struct Segments<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Segments<'a> {
    fn new(data: &'a [u8]) -> TileResult<Self> {
        if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
            return Err(TileError::CodecError("payload does not start with a JPEG SOI marker".to_string()));
        }
        Ok(Segments { data, pos: 2, done: false })
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = TileResult<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let data = self.data;

        // Fill bytes may precede a marker
        let mut pos = self.pos;
        while pos < data.len() && data[pos] != 0xFF {
            pos += 1;
        }
        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        if pos >= data.len() {
            self.done = true;
            return None;
        }
        let marker = data[pos];
        let start = pos - 1;
        pos += 1;

        if marker == EOI {
            self.done = true;
            return None;
        }
        if marker == TEM || (0xD0..=0xD7).contains(&marker) {
            self.pos = pos;
            return Some(Ok(Segment { marker, start, end: pos, body: &[] }));
        }
        if pos + 2 > data.len() {
            self.done = true;
            return Some(Err(TileError::CodecError(format!("segment {:02X} has no length", marker))));
        }
        let length = BigEndian::read_u16(&data[pos..]) as usize;
        if length < 2 || pos + length > data.len() {
            self.done = true;
            return Some(Err(TileError::CodecError(format!(
                "segment {:02X} of length {} runs past the payload",
                marker, length
            ))));
        }
        let body = &data[pos + 2..pos + length];
        self.pos = pos + length;
        if marker == SOS {
            self.done = true;
        }
        Some(Ok(Segment { marker, start, end: self.pos, body }))
    }
}

fn short(marker: u8) -> TileError {
    TileError::CodecError(format!("segment {:02X} is too short", marker))
}

/// Scan the segments in front of the first scan
pub fn scan(data: &[u8]) -> TileResult<JpegMarkers> {
    let mut markers = JpegMarkers::default();
    for segment in Segments::new(data)? {
        let segment = segment?;
        let body = segment.body;
        match segment.marker {
            0xC0..=0xC2 => markers.frame = Some(parse_frame(body).ok_or_else(|| short(segment.marker))?),
            DQT => parse_tables(body, &mut markers.tables).ok_or_else(|| short(DQT))?,
            DRI => {
                if body.len() < 2 {
                    return Err(short(DRI));
                }
                markers.restart_interval = BigEndian::read_u16(body);
            }
            APP0 if body.starts_with(JFIF_ID) => markers.jfif = true,
            _ => {}
        }
    }
    Ok(markers)
}

fn parse_frame(body: &[u8]) -> Option<Frame> {
    // precision, height, width, component count
    let count = *body.get(5)? as usize;
    let component_bytes = body.get(6..6 + 3 * count)?;
    let components = component_bytes
        .chunks_exact(3)
        .map(|c| FrameComponent {
            id: c[0],
            horizontal: c[1] >> 4,
            vertical: c[1] & 0x0F,
            table: c[2],
        })
        .collect();
    Some(Frame {
        height: BigEndian::read_u16(body.get(1..3)?),
        width: BigEndian::read_u16(body.get(3..5)?),
        components,
    })
}

fn parse_tables(mut body: &[u8], tables: &mut [Option<[u16; 64]>; 4]) -> Option<()> {
    while !body.is_empty() {
        let precision = body[0] >> 4;
        let slot = (body[0] & 0x0F) as usize;
        let entry_size = if precision == 0 { 1 } else { 2 };
        let entries = body.get(1..1 + 64 * entry_size)?;

        let mut table = [0u16; 64];
        for (zz, &natural) in ZIGZAG.iter().enumerate() {
            table[natural] = if entry_size == 1 {
                entries[zz] as u16
            } else {
                BigEndian::read_u16(&entries[2 * zz..])
            };
        }
        *tables.get_mut(slot)? = Some(table);
        body = &body[1 + 64 * entry_size..];
    }
    Some(())
}

/// Drop every JFIF APP0 segment in front of the first scan
pub fn strip_jfif(data: &[u8]) -> TileResult<Vec<u8>> {
    let mut cut = Vec::new();
    for segment in Segments::new(data)? {
        let segment = segment?;
        if segment.marker == APP0 && segment.body.starts_with(JFIF_ID) {
            cut.push((segment.start, segment.end));
        }
    }

    let mut out = Vec::with_capacity(data.len());
    let mut from = 0;
    for (start, end) in cut {
        out.extend_from_slice(&data[from..start]);
        from = end;
    }
    out.extend_from_slice(&data[from..]);
    Ok(out)
}
