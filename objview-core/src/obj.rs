/// Wavefront OBJ reader for the `v` / `f` subset
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{char, i64 as integer, multispace0, multispace1},
    combinator::{all_consuming, eof, opt, peek},
    multi::many1,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::geometry::{Face, Mesh, Vertex};

/// What to do with a `v` or `f` line that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Fail the whole load
    #[default]
    Reject,
    /// Drop the line, log it and keep going
    Skip,
}

/// Parser behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub malformed: MalformedLinePolicy,
    /// Reject faces referencing vertices that were never defined
    pub validate_indices: bool,
}

/// Outcome of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ObjParse {
    pub mesh: Mesh,
    /// Lines dropped under [`MalformedLinePolicy::Skip`]
    pub skipped: Vec<ParseError>,
}

/// Parse OBJ text into a fresh mesh.
///
/// Only lines starting with `"v "` or `"f "` are read; everything else is
/// ignored. Face indices are converted from 1-based to 0-based and any
/// `/texture/normal` suffix is dropped.
pub fn parse_obj(text: &str, options: &ParseOptions) -> Result<ObjParse, ParseError> {
    parse_obj_lines(text.lines(), options)
}

/// Same as [`parse_obj`] for input already split into lines
pub fn parse_obj_lines<'a, I>(lines: I, options: &ParseOptions) -> Result<ObjParse, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mesh = Mesh::new();
    let mut faces: Vec<(usize, Face)> = Vec::new();
    let mut skipped = Vec::new();

    for (number, line) in lines.into_iter().enumerate() {
        let number = number + 1;
        let outcome = if line.starts_with("v ") {
            parse_vertex(line, number).map(|v| mesh.vertices.push(v))
        } else if line.starts_with("f ") {
            parse_face(line, number).map(|f| faces.push((number, f)))
        } else {
            Ok(())
        };

        if let Err(err) = outcome {
            reject_or_skip(err, options, &mut skipped)?;
        }
    }

    // Faces may precede the vertices they use, so bounds are checked once all
    // vertices are known.
    let vertex_count = mesh.vertex_count();
    for (number, face) in faces {
        if options.validate_indices {
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                let err = ParseError::FaceIndexOutOfRange {
                    line: number,
                    index,
                    vertex_count,
                };
                reject_or_skip(err, options, &mut skipped)?;
                continue;
            }
        }
        mesh.faces.push(face);
    }

    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        skipped = skipped.len(),
        "parsed OBJ text"
    );

    Ok(ObjParse { mesh, skipped })
}

fn reject_or_skip(
    err: ParseError,
    options: &ParseOptions,
    skipped: &mut Vec<ParseError>,
) -> Result<(), ParseError> {
    match options.malformed {
        MalformedLinePolicy::Reject => Err(err),
        MalformedLinePolicy::Skip => {
            warn!(line = err.line(), "skipping OBJ line: {}", err);
            skipped.push(err);
            Ok(())
        }
    }
}

fn parse_vertex(line: &str, number: usize) -> Result<Vertex, ParseError> {
    match vertex_record(line) {
        Ok((_, (x, y, z))) => Ok(Vertex::new(x, y, z)),
        Err(_) => Err(ParseError::MalformedVertex {
            line: number,
            content: line.to_string(),
        }),
    }
}

fn parse_face(line: &str, number: usize) -> Result<Face, ParseError> {
    let malformed = || ParseError::MalformedFace {
        line: number,
        content: line.to_string(),
    };

    let (_, indices) = face_record(line).map_err(|_| malformed())?;
    indices
        .into_iter()
        .map(|index| {
            if index < 1 {
                return Err(malformed());
            }
            usize::try_from(index - 1).map_err(|_| malformed())
        })
        .collect()
}

/// `v x y z [...]`; tokens past the third coordinate are ignored
fn vertex_record(input: &str) -> IResult<&str, (f64, f64, f64)> {
    preceded(tag("v"), tuple((coordinate, coordinate, coordinate)))(input)
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    preceded(multispace1, terminated(double, token_end))(input)
}

/// `f i[/t[/n]] ...`; the whole line must be consumed
fn face_record(input: &str) -> IResult<&str, Vec<i64>> {
    all_consuming(terminated(
        preceded(tag("f"), many1(preceded(multispace1, face_index))),
        multispace0,
    ))(input)
}

fn face_index(input: &str) -> IResult<&str, i64> {
    terminated(
        integer,
        terminated(
            opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
            token_end,
        ),
    )(input)
}

fn token_end(input: &str) -> IResult<&str, &str> {
    peek(alt((multispace1, eof)))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn strict() -> ParseOptions {
        ParseOptions::default()
    }

    #[test]
    fn test_vertices_and_faces() {
        let text = "# comment\nv 1.0 2.5 -3\nv 0 0 0\nv 4 5 6\nf 1 2 3\n";
        let parsed = parse_obj(text, &strict()).unwrap();
        assert_eq!(
            parsed.mesh.vertices,
            vec![
                Point3::new(1.0, 2.5, -3.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 5.0, 6.0),
            ]
        );
        assert_eq!(parsed.mesh.faces, vec![vec![0, 1, 2]]);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_face_suffixes_dropped() {
        let parsed = parse_obj("f 1/2/3 4//6 7/8 9", &strict()).unwrap();
        assert_eq!(parsed.mesh.faces, vec![vec![0, 3, 6, 8]]);
    }

    #[test]
    fn test_extra_vertex_tokens_ignored() {
        let parsed = parse_obj("v 1 2 3 1.0", &strict()).unwrap();
        assert_eq!(parsed.mesh.vertices, vec![Point3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_unknown_records_ignored() {
        let text = "vn 0 0 1\nvt 0.5 0.5\nusemtl red\ng group\nv\tnot a vertex\n";
        let parsed = parse_obj(text, &strict()).unwrap();
        assert!(parsed.mesh.vertices.is_empty());
        assert!(parsed.mesh.faces.is_empty());
    }

    #[test]
    fn test_short_vertex_rejected() {
        let err = parse_obj("v 1 2 3\nv 1 2", &strict()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedVertex {
                line: 2,
                content: "v 1 2".to_string()
            }
        );
    }

    #[test]
    fn test_non_numeric_vertex_rejected() {
        let err = parse_obj("v 1 two 3", &strict()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedVertex { line: 1, .. }));

        let err = parse_obj("v 1 2x 3", &strict()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedVertex { .. }));
    }

    #[test]
    fn test_bad_face_rejected() {
        for line in ["f 1 a 3", "f 0 1 2", "f -1 2 3", "f ", "f /2 3"] {
            let err = parse_obj(line, &strict()).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedFace { line: 1, .. }),
                "{line:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_skip_policy_collects_errors() {
        let options = ParseOptions {
            malformed: MalformedLinePolicy::Skip,
            ..ParseOptions::default()
        };
        let text = "v 0 0 0\nv oops\nv 1 1 1\nf 1 x\nf 1 2";
        let parsed = parse_obj(text, &options).unwrap();
        assert_eq!(parsed.mesh.vertex_count(), 2);
        assert_eq!(parsed.mesh.faces, vec![vec![0, 1]]);
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line(), 2);
        assert_eq!(parsed.skipped[1].line(), 4);
    }

    #[test]
    fn test_indices_unchecked_by_default() {
        let parsed = parse_obj("v 0 0 0\nf 1 2 9", &strict()).unwrap();
        assert_eq!(parsed.mesh.faces, vec![vec![0, 1, 8]]);
    }

    #[test]
    fn test_index_validation() {
        let options = ParseOptions {
            validate_indices: true,
            ..ParseOptions::default()
        };
        let err = parse_obj("v 0 0 0\nf 1 2", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::FaceIndexOutOfRange {
                line: 2,
                index: 1,
                vertex_count: 1
            }
        );
    }

    #[test]
    fn test_crlf_lines() {
        let parsed = parse_obj("v 1 2 3\r\nf 1 1 1\r\n", &strict()).unwrap();
        assert_eq!(parsed.mesh.vertex_count(), 1);
        assert_eq!(parsed.mesh.faces, vec![vec![0, 0, 0]]);
    }
}
