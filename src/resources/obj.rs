//! Wavefront OBJ import.
//!
//! Only the geometry statements are read: `v`, `vt`, `vn` and triangular `f`
//! faces. Every distinct combination of position, texture coordinate and normal
//! index becomes one vertex, repeated combinations reuse it.

use std::{collections::HashMap, path::Path};

use cgmath::{Vector2, Vector3};

use crate::{
    data_structures::mesh::{Mesh, Vertex},
    error::GlgeError,
};

/// Mesh file formats the engine can name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    /// Recognised by extension, but there is no importer for it.
    Gltf,
}

impl MeshFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "obj" => Some(MeshFormat::Obj),
            "gltf" | "glb" => Some(MeshFormat::Gltf),
            _ => None,
        }
    }
}

/// How the corners of a face reference attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum FaceGrammar {
    /// `f 1 2 3`
    Position,
    /// `f 1/1 2/2 3/3`
    PositionTexture,
    /// `f 1//1 2//2 3//3`
    PositionNormal,
    /// `f 1/1/1 2/2/2 3/3/3`
    PositionTextureNormal,
}

impl FaceGrammar {
    /// Sniffs the grammar from the number of slashes compared to the number of corners.
    fn detect(corners: &[&str]) -> Option<Self> {
        let slashes: usize = corners.iter().map(|c| c.matches('/').count()).sum();
        let n = corners.len();
        if slashes == 0 {
            Some(FaceGrammar::Position)
        } else if slashes == n {
            Some(FaceGrammar::PositionTexture)
        } else if slashes == 2 * n {
            if corners.iter().any(|c| c.contains("//")) {
                Some(FaceGrammar::PositionNormal)
            } else {
                Some(FaceGrammar::PositionTextureNormal)
            }
        } else {
            None
        }
    }
}

type CornerKey = (FaceGrammar, usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct ObjBuilder {
    positions: Vec<Vector3<f32>>,
    tex_coords: Vec<Vector2<f32>>,
    normals: Vec<Vector3<f32>>,
    corners: HashMap<CornerKey, u32>,
    mesh: Mesh,
}

impl ObjBuilder {
    fn face(&mut self, line_no: usize, corners: &[&str]) -> Result<(), GlgeError> {
        let grammar = FaceGrammar::detect(corners).ok_or_else(|| {
            GlgeError::format(
                "obj",
                format!("line {line_no}: unknown face layout '{}'", corners.join(" ")),
            )
        })?;

        let mut keys = Vec::with_capacity(corners.len());
        for corner in corners {
            keys.push(self.corner_key(line_no, grammar, corner)?);
        }

        // the engine expects the opposite winding of what OBJ declares
        for key in keys.into_iter().rev() {
            let index = match self.corners.get(&key) {
                Some(&index) => index,
                None => {
                    let index = self.mesh.vertices.len() as u32;
                    let vertex = self.build_vertex(key);
                    self.mesh.vertices.push(vertex);
                    self.corners.insert(key, index);
                    index
                }
            };
            self.mesh.indices.push(index);
        }
        Ok(())
    }

    fn corner_key(
        &self,
        line_no: usize,
        grammar: FaceGrammar,
        corner: &str,
    ) -> Result<CornerKey, GlgeError> {
        let mut parts = corner.split('/');
        let mut next = |len: usize, what: &str| -> Result<Option<usize>, GlgeError> {
            match parts.next() {
                Some(raw) if !raw.is_empty() => resolve_index(line_no, raw, len, what).map(Some),
                _ => Ok(None),
            }
        };
        let position = next(self.positions.len(), "position")?;
        let tex = next(self.tex_coords.len(), "texture coordinate")?;
        let normal = next(self.normals.len(), "normal")?;

        let Some(position) = position else {
            return Err(GlgeError::format(
                "obj",
                format!("line {line_no}: face corner '{corner}' has no position"),
            ));
        };
        let missing = match grammar {
            FaceGrammar::Position => false,
            FaceGrammar::PositionTexture => tex.is_none(),
            FaceGrammar::PositionNormal => normal.is_none(),
            FaceGrammar::PositionTextureNormal => tex.is_none() || normal.is_none(),
        };
        if missing {
            return Err(GlgeError::format(
                "obj",
                format!("line {line_no}: face corner '{corner}' does not match the face layout"),
            ));
        }
        Ok((grammar, position, tex, normal))
    }

    fn build_vertex(&self, (_, position, tex, normal): CornerKey) -> Vertex {
        let position = self.positions[position];
        match (tex, normal) {
            (Some(t), Some(n)) => Vertex::textured(position, self.tex_coords[t], self.normals[n]),
            (Some(t), None) => Vertex::with_tex_coords(position, self.tex_coords[t]),
            (None, Some(n)) => Vertex::with_normal(position, self.normals[n]),
            (None, None) => Vertex::new(position),
        }
    }
}

/// Turns a 1-based (or negative, relative) OBJ index into a 0-based one.
fn resolve_index(line_no: usize, raw: &str, len: usize, what: &str) -> Result<usize, GlgeError> {
    let index: i64 = raw.parse().map_err(|_| {
        GlgeError::format("obj", format!("line {line_no}: '{raw}' is not a valid {what} index"))
    })?;
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= len as i64 {
        return Err(GlgeError::format(
            "obj",
            format!("line {line_no}: {what} index {index} is out of range, {len} are defined"),
        ));
    }
    Ok(resolved as usize)
}

fn parse_floats<const N: usize>(
    line_no: usize,
    args: &[&str],
    what: &str,
) -> Result<[f32; N], GlgeError> {
    if args.len() < N {
        return Err(GlgeError::format(
            "obj",
            format!("line {line_no}: {what} needs {N} values, got {}", args.len()),
        ));
    }
    let mut out = [0.0; N];
    for (value, raw) in out.iter_mut().zip(args) {
        *value = raw.parse().map_err(|_| {
            GlgeError::format("obj", format!("line {line_no}: '{raw}' is not a number"))
        })?;
    }
    Ok(out)
}

impl Mesh {
    /**
     * Parses the content of an OBJ file.
     *
     * Faces with other than three corners are skipped. Indices may be 1-based or
     * negative (relative to the end of the list at that point). The triangle
     * winding is reversed relative to the file.
     */
    pub fn from_obj(source: &str) -> Result<Mesh, GlgeError> {
        let mut builder = ObjBuilder::default();
        for (i, line) in source.lines().enumerate() {
            let line_no = i + 1;
            let mut tokens = line.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };
            let args: Vec<&str> = tokens.collect();
            match keyword {
                "v" => {
                    let [x, y, z] = parse_floats(line_no, &args, "position")?;
                    builder.positions.push(Vector3::new(x, y, z));
                }
                "vt" => {
                    // v is optional and defaults to 0
                    let [u] = parse_floats(line_no, &args, "texture coordinate")?;
                    let v = match args.get(1..2) {
                        Some(rest) => {
                            let [v] = parse_floats(line_no, rest, "texture coordinate")?;
                            v
                        }
                        None => 0.0,
                    };
                    builder.tex_coords.push(Vector2::new(u, v));
                }
                "vn" => {
                    let [x, y, z] = parse_floats(line_no, &args, "normal")?;
                    builder.normals.push(Vector3::new(x, y, z));
                }
                "f" if args.len() == 3 => builder.face(line_no, &args)?,
                "f" => log::debug!(
                    "Skipping face with {} corners on line {line_no}, only triangles are supported",
                    args.len()
                ),
                _ => {}
            }
        }
        log::debug!(
            "Parsed obj mesh with {} vertices and {} triangles",
            builder.mesh.vertex_count(),
            builder.mesh.triangle_count()
        );
        Ok(builder.mesh)
    }

    /// Parses `source` as a mesh file of the given format.
    pub fn from_obj_with(source: &str, format: MeshFormat) -> Result<Mesh, GlgeError> {
        match format {
            MeshFormat::Obj => Mesh::from_obj(source),
            other => Err(GlgeError::Unsupported(format!(
                "mesh format {other:?}, only obj files can be imported"
            ))),
        }
    }

    /// Reads and parses an OBJ file from disk.
    pub fn from_obj_file(path: impl AsRef<Path>) -> Result<Mesh, GlgeError> {
        let path = path.as_ref();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GlgeError::NotFound(format!("mesh file {}", path.display())));
            }
            Err(e) => return Err(e.into()),
        };
        Mesh::from_obj(&source)
    }

    /// Reads a mesh file, picking the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Mesh, GlgeError> {
        let path = path.as_ref();
        match MeshFormat::from_path(path) {
            Some(MeshFormat::Obj) => Mesh::from_obj_file(path),
            Some(format) => Mesh::from_obj_with("", format),
            None => Err(GlgeError::Unsupported(format!(
                "mesh file {} has an unknown extension",
                path.display()
            ))),
        }
    }
}
