//! Texture atlas description files.
//!
//! An atlas file lists the named sub-images packed into one texture sheet:
//!
//! ```text
//! "GLGE_AtlasFile_1" | i32 count | i32 width | i32 height
//! per image: i32 name length | name | i32 x | i32 y | i32 width | i32 height
//! ```
//!
//! All integers are big-endian.

use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::Vector2;

use crate::error::GlgeError;

pub const ATLAS_HEADER: &[u8; 16] = b"GLGE_AtlasFile_1";

/// Whether an [`AtlasFile`] was opened for reading or writing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
}

impl TryFrom<char> for FileMode {
    type Error = GlgeError;

    fn try_from(mode: char) -> Result<Self, Self::Error> {
        match mode {
            'r' => Ok(FileMode::Read),
            'w' => Ok(FileMode::Write),
            other => Err(GlgeError::InvalidMode(other)),
        }
    }
}

/// One sub-image of an atlas, in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasImage {
    pub name: String,
    pub pos: Vector2<i32>,
    pub size: Vector2<i32>,
}

impl AtlasImage {
    pub fn new(name: impl Into<String>, pos: Vector2<i32>, size: Vector2<i32>) -> Self {
        Self {
            name: name.into(),
            pos,
            size,
        }
    }

    /// `true` if the image lies completely inside a `size` sized atlas.
    pub fn fits_into(&self, size: Vector2<i32>) -> bool {
        self.pos.x >= 0
            && self.pos.y >= 0
            && self.size.x >= 0
            && self.size.y >= 0
            && self.pos.x as i64 + self.size.x as i64 <= size.x as i64
            && self.pos.y as i64 + self.size.y as i64 <= size.y as i64
    }
}

/**
 * The images of a texture atlas together with the atlas size.
 *
 * The file is opened with a mode, then [`AtlasFile::read`] or
 * [`AtlasFile::write`] transfers the whole content at once. Overlapping images
 * are not detected; keeping them apart is up to whoever packs the atlas.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasFile {
    pub images: Vec<AtlasImage>,
    pub size: Vector2<i32>,
    mode: Option<FileMode>,
    path: Option<PathBuf>,
}

impl AtlasFile {
    pub fn new(size: Vector2<i32>) -> Self {
        Self {
            images: Vec::new(),
            size,
            mode: None,
            path: None,
        }
    }

    /**
     * Opens `path` with mode `'r'` or `'w'`.
     *
     * Reading requires the file to exist. Writing creates (or truncates) the file
     * right away so a bad path is reported here and not on the first write.
     */
    pub fn open(&mut self, path: impl AsRef<Path>, mode: char) -> Result<(), GlgeError> {
        let mode = FileMode::try_from(mode)?;
        let path = path.as_ref();
        match mode {
            FileMode::Read if !path.is_file() => {
                return Err(GlgeError::NotFound(format!("atlas file {}", path.display())));
            }
            FileMode::Read => {}
            FileMode::Write => {
                fs::File::create(path)?;
            }
        }
        self.mode = Some(mode);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn mode(&self) -> Option<FileMode> {
        self.mode
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the atlas to the opened file.
    pub fn write(&self) -> Result<(), GlgeError> {
        let path = self.opened_path(FileMode::Write, "writing")?;
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        log::info!(
            "Wrote atlas with {} images to {}",
            self.images.len(),
            path.display()
        );
        Ok(())
    }

    /// Replaces size and images with the content of the opened file.
    pub fn read(&mut self) -> Result<(), GlgeError> {
        let path = self.opened_path(FileMode::Read, "reading")?;
        let bytes = fs::read(path)?;
        let parsed = Self::from_bytes(&bytes)?;
        log::info!(
            "Read atlas with {} images from {}",
            parsed.images.len(),
            path.display()
        );
        self.size = parsed.size;
        self.images = parsed.images;
        Ok(())
    }

    /// Forgets the opened file. The images stay.
    pub fn close(&mut self) {
        self.mode = None;
        self.path = None;
    }

    pub fn add_image(&mut self, name: impl Into<String>, pos: Vector2<i32>, size: Vector2<i32>) {
        self.images.push(AtlasImage::new(name, pos, size));
    }

    pub fn push(&mut self, image: AtlasImage) {
        self.images.push(image);
    }

    /// Index of the first image called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.images.iter().position(|image| image.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&AtlasImage> {
        self.find(name).map(|i| &self.images[i])
    }

    /// Fails with [`GlgeError::OutOfSpace`] for the first image reaching outside the atlas.
    pub fn check_bounds(&self) -> Result<(), GlgeError> {
        match self.images.iter().find(|image| !image.fits_into(self.size)) {
            Some(image) => Err(GlgeError::OutOfSpace(image.name.clone())),
            None => Ok(()),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GlgeError> {
        let mut bytes = ATLAS_HEADER.to_vec();
        push_int(&mut bytes, self.images.len(), "image count")?;
        bytes.extend_from_slice(&self.size.x.to_be_bytes());
        bytes.extend_from_slice(&self.size.y.to_be_bytes());
        for image in &self.images {
            push_int(&mut bytes, image.name.len(), "image name length")?;
            bytes.extend_from_slice(image.name.as_bytes());
            for value in [image.pos.x, image.pos.y, image.size.x, image.size.y] {
                bytes.extend_from_slice(&value.to_be_bytes());
            }
        }
        Ok(bytes)
    }

    /// Parses the content of an atlas file. The result is not attached to any file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GlgeError> {
        let Some(mut rest) = bytes.strip_prefix(ATLAS_HEADER.as_slice()) else {
            return Err(GlgeError::format("atlas file", "missing GLGE_AtlasFile_1 header"));
        };
        let count = read_int(&mut rest, "image count")?;
        let count = usize::try_from(count)
            .map_err(|_| GlgeError::format("atlas file", format!("negative image count {count}")))?;
        let size = Vector2::new(read_int(&mut rest, "width")?, read_int(&mut rest, "height")?);

        let mut images = Vec::new();
        for _ in 0..count {
            let name_len = read_int(&mut rest, "image name length")?;
            let name_len = usize::try_from(name_len).map_err(|_| {
                GlgeError::format("atlas file", format!("negative name length {name_len}"))
            })?;
            if name_len > rest.len() {
                return Err(GlgeError::format("atlas file", "image name is cut off"));
            }
            let (name, tail) = rest.split_at(name_len);
            rest = tail;
            let name = String::from_utf8(name.to_vec()).map_err(|e| {
                GlgeError::format("atlas file", format!("image name is not UTF-8: {e}"))
            })?;
            let pos = Vector2::new(read_int(&mut rest, "x")?, read_int(&mut rest, "y")?);
            let size = Vector2::new(read_int(&mut rest, "width")?, read_int(&mut rest, "height")?);
            images.push(AtlasImage { name, pos, size });
        }
        if !rest.is_empty() {
            log::warn!("Ignoring {} trailing bytes in atlas file", rest.len());
        }
        Ok(Self {
            images,
            size,
            mode: None,
            path: None,
        })
    }

    fn opened_path(&self, mode: FileMode, action: &'static str) -> Result<&Path, GlgeError> {
        match (&self.path, self.mode) {
            (Some(path), Some(opened)) if opened == mode => Ok(path),
            _ => Err(GlgeError::WrongMode(action)),
        }
    }
}

fn push_int(bytes: &mut Vec<u8>, value: usize, what: &str) -> Result<(), GlgeError> {
    let value = i32::try_from(value)
        .map_err(|_| GlgeError::format("atlas file", format!("{what} {value} is too large")))?;
    bytes.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

fn read_int(rest: &mut &[u8], what: &str) -> Result<i32, GlgeError> {
    let current: &[u8] = *rest;
    let Some((int, tail)) = current.split_first_chunk::<4>() else {
        return Err(GlgeError::format("atlas file", format!("{what} is cut off")));
    };
    *rest = tail;
    Ok(i32::from_be_bytes(*int))
}
