use std::fmt;
use std::str::FromStr;

use bytemuck::Pod;
use num_traits::{AsPrimitive, Zero};

use crate::error::PaintError;

/// Declared element type of a raw mask buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in bytes
    pub fn size(&self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::U16 | ElementType::I16 => 2,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::I8 => "int8",
            ElementType::U16 => "uint16",
            ElementType::I16 => "int16",
            ElementType::U32 => "uint32",
            ElementType::I32 => "int32",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts numpy dtype names, short Rust-style names and JS typed array names
impl FromStr for ElementType {
    type Err = PaintError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let ty = match tag.trim() {
            "uint8" | "u8" | "Uint8Array" | "Uint8ClampedArray" => ElementType::U8,
            "int8" | "i8" | "Int8Array" => ElementType::I8,
            "uint16" | "u16" | "Uint16Array" => ElementType::U16,
            "int16" | "i16" | "Int16Array" => ElementType::I16,
            "uint32" | "u32" | "Uint32Array" => ElementType::U32,
            "int32" | "i32" | "Int32Array" => ElementType::I32,
            "float32" | "f32" | "Float32Array" => ElementType::F32,
            "float64" | "f64" | "Float64Array" => ElementType::F64,
            other => return Err(PaintError::UnsupportedElementWidth(other.to_string())),
        };
        Ok(ty)
    }
}

/// Numeric element of a mask buffer
///
/// Every painter loop is generic over this trait and monomorphized per element type.
pub trait MaskElement: Pod + Zero + AsPrimitive<f64> + PartialEq {
    const TYPE: ElementType;

    /// Non-zero and not NaN
    #[inline]
    fn is_set(self) -> bool {
        let value: f64 = self.as_();
        value != 0.0 && !value.is_nan()
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.as_()
    }

    /// Store a class id, wrapping the way a typed array assignment does
    fn from_class_id(id: u32) -> Self;
}

macro_rules! impl_mask_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl MaskElement for $ty {
                const TYPE: ElementType = ElementType::$tag;

                #[inline]
                fn from_class_id(id: u32) -> Self {
                    id as $ty
                }
            }
        )*
    };
}

impl_mask_element!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f32 => F32,
    f64 => F64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("uint8".parse::<ElementType>().unwrap(), ElementType::U8);
        assert_eq!("Float32Array".parse::<ElementType>().unwrap(), ElementType::F32);
        assert_eq!("i16".parse::<ElementType>().unwrap(), ElementType::I16);
        assert_eq!(
            "complex128".parse::<ElementType>(),
            Err(PaintError::UnsupportedElementWidth("complex128".to_string()))
        );
    }

    #[test]
    fn test_sizes() {
        assert_eq!(ElementType::U8.size(), 1);
        assert_eq!(ElementType::I16.size(), 2);
        assert_eq!(ElementType::F32.size(), 4);
        assert_eq!(ElementType::F64.size(), 8);
        assert!(ElementType::F64.is_float());
        assert!(!ElementType::U32.is_float());
    }

    #[test]
    fn test_class_id_wraps_like_typed_arrays() {
        assert_eq!(u8::from_class_id(300), 44);
        assert_eq!(u16::from_class_id(7), 7);
        assert_eq!(f32::from_class_id(3), 3.0);
    }

    #[test]
    fn test_is_set() {
        assert!(!0u8.is_set());
        assert!(5u8.is_set());
        assert!((-1i16).is_set());
        assert!(!f32::NAN.is_set());
        assert!(!0.0f64.is_set());
    }
}
