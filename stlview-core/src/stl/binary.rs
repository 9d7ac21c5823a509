//! Binary STL decoding: 80-byte header, little-endian triangle count,
//! then one 50-byte record per triangle.

use nalgebra::Vector3;
use nom::{
    bytes::complete::take,
    number::complete::{le_f32, le_u16, le_u32},
    sequence::tuple,
    IResult,
};

use crate::error::LoadError;
use crate::geometry::{Mesh, Triangle};

pub const HEADER_LEN: usize = 80;
pub const RECORD_LEN: usize = 50;

/// Declared counts above this are treated as corruption rather than allocated.
pub const MAX_TRIANGLES: u32 = 10_000_000;

/// Read the triangle count that follows the header, if the data is long enough.
pub fn declared_count(data: &[u8]) -> Option<u32> {
    preamble(data).ok().map(|(_, count)| count)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    let (mut input, count) =
        preamble(data).map_err(|_| LoadError::corrupt(None, "missing header or triangle count"))?;

    if count == 0 {
        return Err(LoadError::corrupt(None, "no triangles found"));
    }
    if count > MAX_TRIANGLES {
        return Err(LoadError::corrupt(
            None,
            format!("triangle count {} too large, likely corrupted", count),
        ));
    }

    let mut mesh = Mesh::with_capacity((count as usize).min(input.len() / RECORD_LEN));
    for index in 0..count {
        let (rest, triangle) = record(input)
            .map_err(|_| LoadError::corrupt(Some(index), "unexpected end of data"))?;
        mesh.add_triangle(triangle);
        input = rest;
    }

    Ok(mesh)
}

fn preamble(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, _header) = take(HEADER_LEN)(input)?;
    le_u32(input)
}

fn record(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, (normal, v1, v2, v3)) = tuple((vector3, vector3, vector3, vector3))(input)?;
    // Attribute byte count, not interpreted
    let (input, _) = le_u16(input)?;
    Ok((input, Triangle::new(normal, v1, v2, v3)))
}

fn vector3(input: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode triangles as a binary STL with a zeroed header.
    pub(crate) fn encode(triangles: &[[[f32; 3]; 4]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for triangle in triangles {
            for component in triangle.iter().flatten() {
                data.extend_from_slice(&component.to_le_bytes());
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    const UNIT: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    #[test]
    fn test_parse_single_triangle_recomputes_normal() {
        let mesh = parse_binary_stl(&encode(&[UNIT])).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.triangles[0].v2, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_count_is_corrupt() {
        let data = encode(&[]);
        assert_eq!(data.len(), 84);
        match parse_binary_stl(&data) {
            Err(LoadError::CorruptFile { triangle: None, reason }) => {
                assert_eq!(reason, "no triangles found")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_count_above_ceiling_is_corrupt() {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(MAX_TRIANGLES + 1).to_le_bytes());
        assert!(matches!(
            parse_binary_stl(&data),
            Err(LoadError::CorruptFile { triangle: None, .. })
        ));
    }

    #[test]
    fn test_truncated_record_reports_index() {
        let mut data = encode(&[UNIT, UNIT, UNIT]);
        data.truncate(data.len() - 10);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(LoadError::CorruptFile { triangle: Some(2), .. })
        ));
    }

    #[test]
    fn test_declared_count() {
        assert_eq!(declared_count(&encode(&[UNIT, UNIT])), Some(2));
        assert_eq!(declared_count(&[0u8; 83]), None);
    }
}
