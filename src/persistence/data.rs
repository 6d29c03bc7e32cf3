//! A growable byte buffer with typed writes and reads.
//!
//! [`Data`] is the payload format objects encode themselves into before they
//! are wrapped in a [`crate::persistence::named_object::NamedObject`]. All
//! fixed size numbers are stored big-endian, variable length integers use
//! 7 bit groups with the high bit as continuation flag (low group first).

use cgmath::{Matrix3, Matrix4, Quaternion, Vector2, Vector3, Vector4};

use crate::error::GlgeError;

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;

/// Encoded object payload. Writes append at the end, reads consume from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Data {
    bytes: Vec<u8>,
    cursor: usize,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Everything written so far, including bytes that were already read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes not consumed by reads yet.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bytes.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    /// Writes the two's complement bits of `value`, so negative numbers always take five bytes.
    pub fn write_var_i32(&mut self, value: i32) {
        self.write_var(value as u32 as u64);
    }

    /// Writes the two's complement bits of `value`, so negative numbers always take ten bytes.
    pub fn write_var_i64(&mut self, value: i64) {
        self.write_var(value as u64);
    }

    fn write_var(&mut self, mut value: u64) {
        loop {
            if value & !(SEGMENT_BITS as u64) == 0 {
                self.bytes.push(value as u8);
                return;
            }
            self.bytes.push((value as u8 & SEGMENT_BITS) | CONTINUE_BIT);
            value >>= 7;
        }
    }

    /// Writes a var int length followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_var_len(value.len());
        self.bytes.extend_from_slice(value.as_bytes());
    }

    /// Writes raw bytes without a length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_vec2(&mut self, value: Vector2<f32>) {
        self.write_f32(value.x);
        self.write_f32(value.y);
    }

    pub fn write_vec3(&mut self, value: Vector3<f32>) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    pub fn write_vec4(&mut self, value: Vector4<f32>) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
        self.write_f32(value.w);
    }

    /// Row by row.
    pub fn write_mat3(&mut self, value: Matrix3<f32>) {
        for row in 0..3 {
            for col in 0..3 {
                self.write_f32(value[col][row]);
            }
        }
    }

    /// Row by row.
    pub fn write_mat4(&mut self, value: Matrix4<f32>) {
        for row in 0..4 {
            for col in 0..4 {
                self.write_f32(value[col][row]);
            }
        }
    }

    /// Scalar part first: `w, x, y, z`.
    pub fn write_quaternion(&mut self, value: Quaternion<f32>) {
        self.write_f32(value.s);
        self.write_vec3(value.v);
    }

    pub(crate) fn write_var_len(&mut self, len: usize) {
        self.write_var(len as u64);
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], GlgeError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], GlgeError> {
        if self.remaining() < len {
            return Err(GlgeError::format(
                "data",
                format!(
                    "tried to read {len} bytes but only {} are left",
                    self.remaining()
                ),
            ));
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.bytes[start..self.cursor])
    }

    pub fn read_bool(&mut self) -> Result<bool, GlgeError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, GlgeError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, GlgeError> {
        Ok(self.take::<1>()?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, GlgeError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, GlgeError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, GlgeError> {
        Ok(u32::from_be_bytes(self.take()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, GlgeError> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, GlgeError> {
        Ok(u64::from_be_bytes(self.take()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, GlgeError> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, GlgeError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, GlgeError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_var_i32(&mut self) -> Result<i32, GlgeError> {
        Ok(self.read_var(32)? as u32 as i32)
    }

    pub fn read_var_i64(&mut self) -> Result<i64, GlgeError> {
        Ok(self.read_var(64)? as i64)
    }

    fn read_var(&mut self, bits: u32) -> Result<u64, GlgeError> {
        let mut value = 0u64;
        let mut position = 0u32;
        loop {
            let byte = self.read_u8()?;
            value |= ((byte & SEGMENT_BITS) as u64) << position;
            if byte & CONTINUE_BIT == 0 {
                return Ok(value);
            }
            position += 7;
            if position >= bits {
                return Err(GlgeError::format(
                    "data",
                    format!("var int is longer than {bits} bits"),
                ));
            }
        }
    }

    pub(crate) fn read_var_len(&mut self) -> Result<usize, GlgeError> {
        let len = self.read_var(64)?;
        usize::try_from(len)
            .map_err(|_| GlgeError::format("data", format!("length {len} is too large")))
    }

    pub fn read_string(&mut self) -> Result<String, GlgeError> {
        let len = self.read_var_len()?;
        let bytes = self.read_bytes(len)?.to_vec();
        String::from_utf8(bytes).map_err(|e| GlgeError::format("string", e.to_string()))
    }

    pub fn read_vec2(&mut self) -> Result<Vector2<f32>, GlgeError> {
        Ok(Vector2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vector3<f32>, GlgeError> {
        Ok(Vector3::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    pub fn read_vec4(&mut self) -> Result<Vector4<f32>, GlgeError> {
        Ok(Vector4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    pub fn read_mat3(&mut self) -> Result<Matrix3<f32>, GlgeError> {
        let mut m = Matrix3::from_scale(0.0);
        for row in 0..3 {
            for col in 0..3 {
                m[col][row] = self.read_f32()?;
            }
        }
        Ok(m)
    }

    pub fn read_mat4(&mut self) -> Result<Matrix4<f32>, GlgeError> {
        let mut m = Matrix4::from_scale(0.0);
        for row in 0..4 {
            for col in 0..4 {
                m[col][row] = self.read_f32()?;
            }
        }
        Ok(m)
    }

    pub fn read_quaternion(&mut self) -> Result<Quaternion<f32>, GlgeError> {
        let s = self.read_f32()?;
        let v = self.read_vec3()?;
        Ok(Quaternion::from_sv(s, v))
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}
