use crate::error::GlgeError;

use super::{Data, Encode};

const LEN_FIELD: usize = std::mem::size_of::<u64>();

/**
 * A named, type tagged blob of bytes.
 *
 * The object keeps a single buffer laid out as
 *
 * ```text
 * [u64 LE total length][type tag][0x00][payload]
 * ```
 *
 * where the total length counts everything after the length field. The tag is
 * checked when the payload is decoded, so a mesh can't be read back as a
 * transform by accident.
 */
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedObject {
    pub name: String,
    obj_data: Vec<u8>,
}

impl NamedObject {
    /// An object without any data. Decoding it fails until a payload is set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            obj_data: Vec::new(),
        }
    }

    /// Builds an object from a raw payload stored under `tag`.
    pub fn encode(name: impl Into<String>, payload: &[u8], tag: &str) -> Result<Self, GlgeError> {
        let mut object = Self::new(name);
        object.set_payload(payload, tag)?;
        Ok(object)
    }

    /// Replaces the stored payload and tag.
    pub fn set_payload(&mut self, payload: &[u8], tag: &str) -> Result<(), GlgeError> {
        if tag.as_bytes().contains(&0) {
            return Err(GlgeError::format(
                "type tag",
                format!("'{}' contains a NUL byte", tag.escape_debug()),
            ));
        }
        let total = tag.len() + 1 + payload.len();
        let mut buffer = vec![0u8; LEN_FIELD + total];
        buffer[..LEN_FIELD].copy_from_slice(&(total as u64).to_le_bytes());
        buffer[LEN_FIELD..LEN_FIELD + tag.len()].copy_from_slice(tag.as_bytes());
        buffer[LEN_FIELD + tag.len() + 1..].copy_from_slice(payload);
        self.obj_data = buffer;
        Ok(())
    }

    /// Stores `value` under its type tag.
    pub fn set_object<T: Encode>(&mut self, value: &T) -> Result<(), GlgeError> {
        let data = value.to_data();
        self.set_payload(data.as_bytes(), T::TYPE_TAG)
    }

    /// Wraps `value` into a new object called `name`.
    pub fn from_object<T: Encode>(name: impl Into<String>, value: &T) -> Result<Self, GlgeError> {
        let mut object = Self::new(name);
        object.set_object(value)?;
        Ok(object)
    }

    /**
     * Returns a copy of the payload if it was stored under `tag`.
     *
     * An object whose length field leaves no room for a payload decodes to an
     * empty buffer.
     */
    pub fn decode(&self, tag: &str) -> Result<Vec<u8>, GlgeError> {
        let (stored, payload) = self.split()?;
        if stored != tag.as_bytes() {
            return Err(GlgeError::TypeMismatch {
                stored: String::from_utf8_lossy(stored).into_owned(),
                requested: tag.to_string(),
            });
        }
        Ok(payload.to_vec())
    }

    /// Decodes the payload as a `T`, checking the type tag first.
    pub fn get_object<T: Encode>(&self) -> Result<T, GlgeError> {
        let payload = self.decode(T::TYPE_TAG)?;
        T::decode(&mut Data::from_bytes(payload))
    }

    /// The type tag the payload was stored with.
    pub fn type_name(&self) -> Result<String, GlgeError> {
        let (stored, _) = self.split()?;
        Ok(String::from_utf8_lossy(stored).into_owned())
    }

    /// The complete encoded buffer including the length field and tag.
    pub fn data(&self) -> &[u8] {
        &self.obj_data
    }

    pub fn len(&self) -> usize {
        self.obj_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obj_data.is_empty()
    }

    /// Takes over an encoded buffer, e.g. one read back from a scene file.
    ///
    /// The length field has to cover the whole buffer, trailing bytes are rejected.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, GlgeError> {
        let object = Self {
            name: name.into(),
            obj_data: bytes,
        };
        object.split()?;
        let stored = object.obj_data.len() - LEN_FIELD;
        if object.total_len() != stored as u64 {
            return Err(GlgeError::format(
                "named object",
                format!(
                    "'{}' claims {} bytes but {stored} are stored, found trailing bytes",
                    object.name,
                    object.total_len()
                ),
            ));
        }
        Ok(object)
    }

    /// The value of the length field. Only meaningful once `split` succeeded.
    fn total_len(&self) -> u64 {
        self.obj_data
            .first_chunk::<LEN_FIELD>()
            .map_or(0, |len| u64::from_le_bytes(*len))
    }

    /// Splits the buffer into the tag and the payload.
    fn split(&self) -> Result<(&[u8], &[u8]), GlgeError> {
        let Some((len, body)) = self.obj_data.split_first_chunk::<LEN_FIELD>() else {
            return Err(GlgeError::format(
                "named object",
                format!("'{}' has no length field", self.name),
            ));
        };
        let total = u64::from_le_bytes(*len);
        if total > body.len() as u64 {
            return Err(GlgeError::format(
                "named object",
                format!(
                    "'{}' claims {total} bytes but only {} are stored",
                    self.name,
                    body.len()
                ),
            ));
        }
        let body = &body[..total as usize];
        let Some(end) = body.iter().position(|&b| b == 0) else {
            return Err(GlgeError::format(
                "named object",
                format!("'{}' has an unterminated type tag", self.name),
            ));
        };
        Ok((&body[..end], &body[end + 1..]))
    }
}
