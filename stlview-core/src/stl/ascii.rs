//! Text STL decoding.
//!
//! The grammar is line oriented: every trimmed line holds exactly one
//! keyword production, and the facet/loop nesting is tracked by
//! [`ParseState`]. Any statement arriving in the wrong state aborts the
//! whole parse.

use nalgebra::Vector3;
use nom::{
    bytes::complete::tag,
    character::complete::{space0, space1},
    combinator::{all_consuming, map_res, verify},
    number::complete::recognize_float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use super::StlFormat;
use crate::error::LoadError;
use crate::geometry::{Mesh, Triangle};

/// One recognized line of a text STL file
#[derive(Debug, Clone, Copy)]
enum Statement {
    Solid,
    EndSolid,
    FacetNormal(Vector3<f32>),
    OuterLoop,
    Vertex(Vector3<f32>),
    EndLoop,
    EndFacet,
}

/// Facet/loop nesting while walking the file
#[derive(Debug, Clone, Copy)]
enum ParseState {
    Idle,
    InFacet {
        normal: Vector3<f32>,
        corners: Option<[Vector3<f32>; 3]>,
    },
    InLoop {
        normal: Vector3<f32>,
        corners: [Vector3<f32>; 3],
        count: usize,
    },
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    let mut mesh = Mesh::new();
    let mut state = ParseState::Idle;
    let mut last_line = 0;

    for (index, raw) in data.split(|&b| b == b'\n').enumerate() {
        let number = index + 1;
        last_line = number;

        let line = std::str::from_utf8(raw)
            .map_err(|_| LoadError::parse(number, &String::from_utf8_lossy(raw), "not valid UTF-8 text"))?
            .trim();
        if line.is_empty() {
            continue;
        }

        let next = statement(line)
            .and_then(|statement| step(state, statement, &mut mesh))
            .map_err(|reason| LoadError::parse(number, line, reason))?;
        match next {
            Some(next) => state = next,
            None => break,
        }
    }

    if !matches!(state, ParseState::Idle) {
        return Err(LoadError::parse(last_line, "", "unterminated facet at end of input"));
    }
    if mesh.is_empty() {
        return Err(LoadError::EmptyResult {
            format: StlFormat::Text,
        });
    }

    Ok(mesh)
}

/// Apply one statement to the nesting state, appending finished facets to
/// `mesh`. `None` means `endsolid` was reached.
fn step(state: ParseState, statement: Statement, mesh: &mut Mesh) -> Result<Option<ParseState>, String> {
    use ParseState::*;
    use Statement::*;

    let next = match (state, statement) {
        (Idle, Solid) => Idle,
        (_, Solid) => return Err("'solid' inside a facet".into()),

        (Idle, FacetNormal(normal)) => InFacet {
            normal,
            corners: None,
        },
        (_, FacetNormal(_)) => return Err("new facet before 'endfacet'".into()),

        (InFacet { normal, corners: None }, OuterLoop) => InLoop {
            normal,
            corners: [Vector3::zeros(); 3],
            count: 0,
        },
        (InFacet { .. }, OuterLoop) => return Err("facet already has a vertex loop".into()),
        (InLoop { .. }, OuterLoop) => return Err("nested 'outer loop'".into()),
        (Idle, OuterLoop) => return Err("'outer loop' outside facet".into()),

        (InLoop { count: 3, .. }, Vertex(_)) => return Err("too many vertices in loop".into()),
        (InLoop { normal, mut corners, count }, Vertex(position)) => {
            corners[count] = position;
            InLoop {
                normal,
                corners,
                count: count + 1,
            }
        }
        (_, Vertex(_)) => return Err("vertex outside loop".into()),

        (InLoop { normal, corners, count: 3 }, EndLoop) => InFacet {
            normal,
            corners: Some(corners),
        },
        (InLoop { count, .. }, EndLoop) => {
            return Err(format!("loop has {} vertices, expected 3", count))
        }
        (_, EndLoop) => return Err("'endloop' without matching 'outer loop'".into()),

        (InFacet { normal, corners: Some([v1, v2, v3]) }, EndFacet) => {
            mesh.add_triangle(Triangle::new(normal, v1, v2, v3));
            Idle
        }
        (InFacet { corners: None, .. }, EndFacet) => {
            return Err("'endfacet' before any vertex loop".into())
        }
        (InLoop { .. }, EndFacet) => return Err("'endfacet' with unclosed loop".into()),
        (Idle, EndFacet) => return Err("'endfacet' without matching 'facet'".into()),

        (Idle, EndSolid) => return Ok(None),
        (_, EndSolid) => return Err("'endsolid' inside an unterminated facet".into()),
    };

    Ok(Some(next))
}

/// Classify a trimmed, non-empty line.
fn statement(line: &str) -> Result<Statement, String> {
    let (keyword, args) = match line.split_once(|c: char| c.is_ascii_whitespace()) {
        Some((keyword, args)) => (keyword, args.trim_start()),
        None => (line, ""),
    };

    let no_args = |statement: Statement| {
        if args.is_empty() {
            Ok(statement)
        } else {
            Err(format!("unexpected text after '{}'", keyword))
        }
    };

    match keyword {
        "solid" => Ok(Statement::Solid),
        "endsolid" => Ok(Statement::EndSolid),
        "facet" => facet_normal(args)
            .map(|(_, normal)| Statement::FacetNormal(normal))
            .map_err(|_| "malformed 'facet normal' line".to_string()),
        "outer" if args == "loop" => Ok(Statement::OuterLoop),
        "outer" => Err("expected 'outer loop'".into()),
        "vertex" => coordinates(args)
            .map(|(_, position)| Statement::Vertex(position))
            .map_err(|_| "malformed vertex coordinates".to_string()),
        "endloop" => no_args(Statement::EndLoop),
        "endfacet" => no_args(Statement::EndFacet),
        other => Err(format!("unrecognized keyword '{}'", other)),
    }
}

fn facet_normal(input: &str) -> IResult<&str, Vector3<f32>> {
    preceded(terminated(tag("normal"), space1), coordinates)(input)
}

/// Exactly three numbers separated by spaces or tabs
fn coordinates(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, (x, _, y, _, z)) = all_consuming(terminated(
        tuple((number, space1, number, space1, number)),
        space0,
    ))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Optional sign, digits with optional decimal point, optional exponent.
/// Literals outside the `f32` range are rejected.
fn number(input: &str) -> IResult<&str, f32> {
    verify(map_res(recognize_float, str::parse::<f32>), |value: &f32| {
        value.is_finite()
    })(input)
}
