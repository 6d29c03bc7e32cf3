//! Scene files (`.glges`).
//!
//! A scene is a flat collection of [`NamedObject`]s keyed by name. On disk it
//! starts with the magic `GLGEScene` and a three digit version, followed by one
//! record per object:
//!
//! ```text
//! [u32 LE record length][u8 name length][name][named object bytes]
//! ```
//!
//! The record length covers the name length byte, the name and the object.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::error::GlgeError;

use super::{Encode, NamedObject};

pub const SCENE_MAGIC: &[u8; 9] = b"GLGEScene";
pub const SCENE_VERSION: u32 = 1;
pub const SCENE_EXTENSION: &str = ".glges";

const HEADER_LEN: usize = SCENE_MAGIC.len() + 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scene {
    pub name: String,
    objects: HashMap<String, NamedObject>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: HashMap::new(),
        }
    }

    pub fn from_objects(
        name: impl Into<String>,
        objects: impl IntoIterator<Item = NamedObject>,
    ) -> Self {
        let mut scene = Self::new(name);
        scene.store_objects(objects);
        scene
    }

    /// Inserts all `objects`, replacing objects with the same name.
    pub fn store_objects(&mut self, objects: impl IntoIterator<Item = NamedObject>) {
        for object in objects {
            self.set(object);
        }
    }

    /// Inserts `object`, returning the object it replaced.
    pub fn set(&mut self, object: NamedObject) -> Option<NamedObject> {
        self.objects.insert(object.name.clone(), object)
    }

    /// Encodes `value` and stores it as `name`.
    pub fn set_object<T: Encode>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<(), GlgeError> {
        self.set(NamedObject::from_object(name, value)?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&NamedObject> {
        self.objects.get(name)
    }

    /// Decodes the object called `name` as a `T`.
    pub fn get_object<T: Encode>(&self, name: &str) -> Result<T, GlgeError> {
        let Some(object) = self.get(name) else {
            return Err(GlgeError::NotFound(format!(
                "object '{name}' in scene '{}'",
                self.name
            )));
        };
        object.get_object()
    }

    pub fn remove(&mut self, name: &str) -> Option<NamedObject> {
        self.objects.remove(name)
    }

    pub fn all_objects(&self) -> impl Iterator<Item = &NamedObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The file the scene is saved to: its name with `.glges` appended if missing.
    pub fn file_path(&self) -> PathBuf {
        if self.name.ends_with(SCENE_EXTENSION) {
            PathBuf::from(&self.name)
        } else {
            PathBuf::from(format!("{}{SCENE_EXTENSION}", self.name))
        }
    }

    /// Writes the scene to [`Scene::file_path`].
    pub fn save_file(&self) -> Result<(), GlgeError> {
        self.save_to(self.file_path())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), GlgeError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        log::info!(
            "Saved scene '{}' with {} objects to {}",
            self.name,
            self.objects.len(),
            path.display()
        );
        Ok(())
    }

    /// Replaces the scene's objects with the content of [`Scene::file_path`].
    pub fn load(&mut self) -> Result<(), GlgeError> {
        let path = self.file_path();
        self.load_from(path)
    }

    /// Replaces the scene's objects with the content of `path`.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<(), GlgeError> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GlgeError::NotFound(format!("scene file {}", path.display())));
            }
            Err(e) => return Err(e.into()),
        };
        self.objects = Self::parse_records(&bytes)?;
        log::info!(
            "Loaded scene '{}' with {} objects from {}",
            self.name,
            self.objects.len(),
            path.display()
        );
        Ok(())
    }

    /// Loads a scene file. The scene is named after the file without its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GlgeError> {
        let path = path.as_ref();
        let name = path.with_extension("").to_string_lossy().into_owned();
        let mut scene = Self::new(name);
        scene.load_from(path)?;
        Ok(scene)
    }

    /**
     * Serializes the scene into the `.glges` format.
     *
     * Records are ordered by name so saving the same scene twice gives the same
     * file. Every name is checked before anything is encoded. The record name is
     * the key the object is stored under in the scene.
     */
    pub fn to_bytes(&self) -> Result<Vec<u8>, GlgeError> {
        let mut objects: Vec<(&String, &NamedObject)> = self.objects.iter().collect();
        objects.sort_by(|a, b| a.0.cmp(b.0));

        if let Some((name, _)) = objects.iter().find(|(name, _)| name.len() > u8::MAX as usize) {
            return Err(GlgeError::format(
                "scene",
                format!(
                    "object name is {} bytes long, at most {} are allowed: '{}'",
                    name.len(),
                    u8::MAX,
                    name
                ),
            ));
        }

        let mut bytes = Vec::with_capacity(HEADER_LEN);
        bytes.extend_from_slice(SCENE_MAGIC);
        bytes.extend_from_slice(format!("{SCENE_VERSION:03}").as_bytes());
        for (name, object) in objects {
            let record_len = name.len() + 1 + object.len();
            let record_len = u32::try_from(record_len).map_err(|_| {
                GlgeError::format("scene", format!("object '{name}' is too large"))
            })?;
            bytes.extend_from_slice(&record_len.to_le_bytes());
            bytes.push(name.len() as u8);
            bytes.extend_from_slice(name.as_bytes());
            bytes.extend_from_slice(object.data());
            log::debug!("Wrote scene record '{name}' ({record_len} bytes)");
        }
        Ok(bytes)
    }

    /// Parses a `.glges` buffer into a scene called `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, GlgeError> {
        Ok(Self {
            name: name.into(),
            objects: Self::parse_records(bytes)?,
        })
    }

    fn parse_records(bytes: &[u8]) -> Result<HashMap<String, NamedObject>, GlgeError> {
        let Some(rest) = bytes.strip_prefix(SCENE_MAGIC.as_slice()) else {
            return Err(GlgeError::format("scene", "missing GLGEScene header"));
        };
        let Some((version, mut rest)) = rest.split_first_chunk::<3>() else {
            return Err(GlgeError::format("scene", "missing file version"));
        };
        let version: u32 = std::str::from_utf8(version)
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                GlgeError::format(
                    "scene",
                    format!("unreadable file version {:?}", String::from_utf8_lossy(version)),
                )
            })?;
        if version > SCENE_VERSION {
            return Err(GlgeError::format(
                "scene",
                format!(
                    "file was created by a newer version of GLGE \
                     (file version {version}, supported {SCENE_VERSION})"
                ),
            ));
        }

        let mut objects = HashMap::new();
        while !rest.is_empty() {
            let Some((len, body)) = rest.split_first_chunk::<4>() else {
                return Err(GlgeError::format("scene", "truncated record length"));
            };
            let record_len = u32::from_le_bytes(*len) as usize;
            if record_len == 0 || record_len > body.len() {
                return Err(GlgeError::format(
                    "scene",
                    format!(
                        "record of {record_len} bytes does not fit into the remaining {} bytes",
                        body.len()
                    ),
                ));
            }
            let (record, tail) = body.split_at(record_len);
            rest = tail;

            let name_len = record[0] as usize;
            if 1 + name_len > record.len() {
                return Err(GlgeError::format("scene", "record name is cut off"));
            }
            let name = std::str::from_utf8(&record[1..1 + name_len])
                .map_err(|e| GlgeError::format("scene", format!("object name is not UTF-8: {e}")))?
                .to_string();
            let body = &record[1 + name_len..];
            // objects that never got a payload are stored without any bytes
            let object = if body.is_empty() {
                NamedObject::new(name.clone())
            } else {
                NamedObject::from_bytes(name.clone(), body.to_vec())?
            };
            log::debug!("Read scene record '{name}' ({record_len} bytes)");
            objects.insert(name, object);
        }
        Ok(objects)
    }
}
