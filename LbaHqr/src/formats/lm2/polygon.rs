//! Polygon section: blocks of equally sized polygon records

use super::{Polygon, PolygonTexture, colour_index};
use crate::error::{Error, Result};
use crate::formats::reader::EntryReader;

const BLOCK_HEADER_SIZE: usize = 8;

const FLAG_QUAD: u16 = 0x8000;
const FLAG_EXTRA: u16 = 0x4000;
const FLAG_TEXTURED: u16 = 0x8;
const RENDER_TRANSPARENT: u16 = 2;

/// Records narrower than this never carry texture data
const MIN_TEXTURED_WIDTH: usize = 16;

const COLOUR_OFFSET: usize = 8;
const UV_OFFSET: usize = 12;

/// Per-block polygon layout decoded from the block header
#[derive(Debug, Clone, Copy)]
struct BlockLayout {
    render_type: u16,
    width: usize,
}

impl BlockLayout {
    fn vertex_count(self) -> usize {
        if self.render_type & FLAG_QUAD != 0 { 4 } else { 3 }
    }

    fn is_textured(self) -> bool {
        self.render_type & FLAG_TEXTURED != 0 && self.width > MIN_TEXTURED_WIDTH
    }
}

/// Read polygon blocks from `start` until `end` or a zero-size block
pub(super) fn read_polygons(
    r: &mut EntryReader<'_>,
    start: usize,
    end: usize,
) -> Result<Vec<Polygon>> {
    let mut polygons = Vec::new();
    let mut block_start = start;

    while block_start < end {
        r.seek_forward(block_start)?;
        let render_type = r.u16()?;
        let count = r.u16()?;
        let size = r.u16()?;
        let _unused = r.u16()?;

        if size == 0 {
            tracing::trace!("Polygon sentinel block at {}", block_start);
            break;
        }

        let body = usize::from(size)
            .checked_sub(BLOCK_HEADER_SIZE)
            .filter(|body| count > 0 && body % usize::from(count) == 0)
            .ok_or(Error::InvalidPolygonBlock {
                offset: block_start,
                size,
                count,
            })?;
        let layout = BlockLayout {
            render_type,
            width: body / usize::from(count),
        };
        tracing::trace!(
            "Polygon block at {}: type {:#06x}, {} x {} bytes",
            block_start,
            render_type,
            count,
            layout.width
        );

        let mut offset = block_start + BLOCK_HEADER_SIZE;
        for _ in 0..count {
            polygons.push(read_polygon(r, offset, layout)?);
            offset += layout.width;
        }
        block_start += usize::from(size);
    }

    Ok(polygons)
}

fn read_polygon(r: &mut EntryReader<'_>, offset: usize, layout: BlockLayout) -> Result<Polygon> {
    let n = layout.vertex_count();
    let textured = layout.is_textured();

    r.seek_forward(offset)?;
    let vertices = (0..n).map(|_| r.u16()).collect::<Result<Vec<_>>>()?;
    let mut texture_id = if textured && n == 3 { r.u8()? } else { 0 };

    r.seek_forward(offset + COLOUR_OFFSET)?;
    let colour = colour_index(r.u16()?);
    let intensity = r.i16()?;

    let texture = if textured {
        r.seek_forward(offset + UV_OFFSET)?;
        let mut uvs = Vec::with_capacity(n);
        for _ in 0..n {
            r.skip(1)?;
            let u = r.u8()?;
            r.skip(1)?;
            let v = r.u8()?;
            uvs.push([u, v]);
        }
        // quads store the texture id right after the last UV pair
        if n == 4 {
            texture_id = r.u8()?;
        }
        Some(PolygonTexture { texture_id, uvs })
    } else {
        None
    };

    Ok(Polygon {
        render_type: layout.render_type,
        vertices,
        colour,
        intensity,
        has_extra: layout.render_type & FLAG_EXTRA != 0,
        has_transparency: layout.render_type == RENDER_TRANSPARENT,
        texture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(render_type: u16, records: &[Vec<u8>]) -> Vec<u8> {
        let size = BLOCK_HEADER_SIZE + records.iter().map(Vec::len).sum::<usize>();
        let mut b = Vec::new();
        b.extend_from_slice(&render_type.to_le_bytes());
        b.extend_from_slice(&(records.len() as u16).to_le_bytes());
        b.extend_from_slice(&(size as u16).to_le_bytes());
        b.extend_from_slice(&[0, 0]);
        for rec in records {
            b.extend_from_slice(rec);
        }
        b
    }

    fn flat_triangle(v: [u16; 3], colour_word: u16, intensity: i16) -> Vec<u8> {
        let mut rec = Vec::new();
        for i in v {
            rec.extend_from_slice(&i.to_le_bytes());
        }
        rec.extend_from_slice(&[0, 0]);
        rec.extend_from_slice(&colour_word.to_le_bytes());
        rec.extend_from_slice(&intensity.to_le_bytes());
        rec
    }

    fn parse(data: &[u8]) -> Result<Vec<Polygon>> {
        let mut r = EntryReader::new(data);
        read_polygons(&mut r, 0, data.len())
    }

    #[test]
    fn test_zero_size_block_stops_parsing() {
        let mut data = vec![0u8; 8];
        data.extend(block(0, &[flat_triangle([0, 1, 2], 0x30, 5)]));
        assert!(parse(&data).unwrap().is_empty());
    }

    #[test]
    fn test_flat_triangles() {
        let data = [
            block(2, &[flat_triangle([0, 1, 2], 0x35, -4), flat_triangle([2, 3, 4], 0xF0, 1)]),
            vec![0u8; 8],
        ]
        .concat();
        let polys = parse(&data).unwrap();
        assert_eq!(polys.len(), 2);
        assert_eq!(polys[0].vertices, vec![0, 1, 2]);
        assert_eq!(polys[0].colour, 3);
        assert_eq!(polys[0].intensity, -4);
        assert!(polys[0].has_transparency);
        assert!(!polys[0].is_textured());
        assert_eq!(polys[1].colour, 15);
    }

    #[test]
    fn test_textured_triangle() {
        let mut rec = Vec::new();
        for i in [4u16, 5, 6] {
            rec.extend_from_slice(&i.to_le_bytes());
        }
        rec.push(9); // texture id
        rec.push(0);
        rec.extend_from_slice(&0x20u16.to_le_bytes());
        rec.extend_from_slice(&0i16.to_le_bytes());
        rec.extend_from_slice(&[0, 10, 0, 11, 0, 20, 0, 21, 0, 30, 0, 31]);
        assert_eq!(rec.len(), 24);

        let polys = parse(&block(FLAG_TEXTURED, &[rec])).unwrap();
        let tex = polys[0].texture.as_ref().unwrap();
        assert_eq!(tex.texture_id, 9);
        assert_eq!(tex.uvs, vec![[10, 11], [20, 21], [30, 31]]);
        assert_eq!(polys[0].colour, 2);
    }

    #[test]
    fn test_textured_quad_texture_follows_uvs() {
        let mut rec = Vec::new();
        for i in [0u16, 1, 2, 3] {
            rec.extend_from_slice(&i.to_le_bytes());
        }
        rec.extend_from_slice(&0x10u16.to_le_bytes());
        rec.extend_from_slice(&7i16.to_le_bytes());
        rec.extend_from_slice(&[0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8]);
        rec.extend_from_slice(&[42, 0, 0, 0]);
        assert_eq!(rec.len(), 32);

        let polys = parse(&block(FLAG_QUAD | FLAG_TEXTURED, &[rec])).unwrap();
        assert!(polys[0].is_quad());
        let tex = polys[0].texture.as_ref().unwrap();
        assert_eq!(tex.texture_id, 42);
        assert_eq!(tex.uvs, vec![[1, 2], [3, 4], [5, 6], [7, 8]]);
    }

    #[test]
    fn test_narrow_textured_block_is_untextured() {
        let data = block(FLAG_TEXTURED | FLAG_EXTRA, &[flat_triangle([0, 1, 2], 0, 0)]);
        let polys = parse(&data).unwrap();
        assert!(!polys[0].is_textured());
        assert!(polys[0].has_extra);
    }

    #[test]
    fn test_uneven_block_is_rejected() {
        let mut data = block(0, &[flat_triangle([0, 1, 2], 0, 0)]);
        // five records cannot share a 12-byte body
        data[2] = 5;
        let err = parse(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPolygonBlock {
                offset: 0,
                size: 20,
                count: 5
            }
        ));
    }

    #[test]
    fn test_zero_count_block_is_rejected() {
        let mut data = block(0, &[flat_triangle([0, 1, 2], 0, 0)]);
        data[2] = 0;
        assert!(matches!(
            parse(&data).unwrap_err(),
            Error::InvalidPolygonBlock { count: 0, .. }
        ));
    }
}
