/// Typed storage and no-copy views over raw mask buffers
use crate::error::PaintError;
use crate::mask::element::{ElementType, MaskElement};

/// Owned mask storage, one variant per supported element type
#[derive(Debug, Clone, PartialEq)]
pub enum MaskData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Mutable typed view borrowed from a `MaskData` or a raw byte slice
#[derive(Debug)]
pub enum MaskView<'a> {
    U8(&'a mut [u8]),
    I8(&'a mut [i8]),
    U16(&'a mut [u16]),
    I16(&'a mut [i16]),
    U32(&'a mut [u32]),
    I32(&'a mut [i32]),
    F32(&'a mut [f32]),
    F64(&'a mut [f64]),
}

/// Run `$body` with `$slice` bound to the typed slice inside a `MaskView`
macro_rules! with_view {
    ($view:expr, $slice:ident => $body:expr) => {
        match $view {
            $crate::mask::MaskView::U8($slice) => $body,
            $crate::mask::MaskView::I8($slice) => $body,
            $crate::mask::MaskView::U16($slice) => $body,
            $crate::mask::MaskView::I16($slice) => $body,
            $crate::mask::MaskView::U32($slice) => $body,
            $crate::mask::MaskView::I32($slice) => $body,
            $crate::mask::MaskView::F32($slice) => $body,
            $crate::mask::MaskView::F64($slice) => $body,
        }
    };
}
pub(crate) use with_view;

macro_rules! with_data {
    ($data:expr, $vec:ident => $body:expr) => {
        match $data {
            MaskData::U8($vec) => $body,
            MaskData::I8($vec) => $body,
            MaskData::U16($vec) => $body,
            MaskData::I16($vec) => $body,
            MaskData::U32($vec) => $body,
            MaskData::I32($vec) => $body,
            MaskData::F32($vec) => $body,
            MaskData::F64($vec) => $body,
        }
    };
}

impl MaskData {
    /// Decode raw bytes (native endianness) into typed storage
    ///
    /// The input does not need to be aligned; the result always is.
    pub fn from_bytes(bytes: &[u8], ty: ElementType) -> Result<Self, PaintError> {
        if bytes.len() % ty.size() != 0 {
            return Err(PaintError::BufferSizeMismatch {
                expected: bytes.len() / ty.size() * ty.size() + ty.size(),
                actual: bytes.len(),
            });
        }

        let data = match ty {
            ElementType::U8 => MaskData::U8(bytes.to_vec()),
            ElementType::I8 => MaskData::I8(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::U16 => MaskData::U16(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::I16 => MaskData::I16(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::U32 => MaskData::U32(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::I32 => MaskData::I32(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::F32 => MaskData::F32(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::F64 => MaskData::F64(bytemuck::pod_collect_to_vec(bytes)),
        };
        Ok(data)
    }

    /// Same as `from_bytes`, with the element type given as a tag string
    pub fn from_tagged_bytes(bytes: &[u8], tag: &str) -> Result<Self, PaintError> {
        Self::from_bytes(bytes, tag.parse()?)
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            MaskData::U8(_) => ElementType::U8,
            MaskData::I8(_) => ElementType::I8,
            MaskData::U16(_) => ElementType::U16,
            MaskData::I16(_) => ElementType::I16,
            MaskData::U32(_) => ElementType::U32,
            MaskData::I32(_) => ElementType::I32,
            MaskData::F32(_) => ElementType::F32,
            MaskData::F64(_) => ElementType::F64,
        }
    }

    /// Number of elements (not bytes)
    pub fn len(&self) -> usize {
        with_data!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of the storage
    pub fn as_bytes(&self) -> &[u8] {
        with_data!(self, v => bytemuck::cast_slice(v.as_slice()))
    }

    /// Element at `index` widened to f64
    pub fn get(&self, index: usize) -> Option<f64> {
        with_data!(self, v => v.get(index).map(|x| x.to_f64()))
    }

    pub fn view_mut(&mut self) -> MaskView<'_> {
        match self {
            MaskData::U8(v) => MaskView::U8(v),
            MaskData::I8(v) => MaskView::I8(v),
            MaskData::U16(v) => MaskView::U16(v),
            MaskData::I16(v) => MaskView::I16(v),
            MaskData::U32(v) => MaskView::U32(v),
            MaskData::I32(v) => MaskView::I32(v),
            MaskData::F32(v) => MaskView::F32(v),
            MaskData::F64(v) => MaskView::F64(v),
        }
    }

    /// Keep the first `len` elements and release the rest of the allocation
    pub fn truncate(&mut self, len: usize) {
        with_data!(self, v => {
            v.truncate(len);
            v.shrink_to_fit();
        })
    }
}

impl<'a> MaskView<'a> {
    /// View raw bytes as `ty` without copying
    ///
    /// Fails when the slice is not aligned for `ty` or its length is not a multiple of the element size.
    pub fn from_bytes_mut(bytes: &'a mut [u8], ty: ElementType) -> Result<Self, PaintError> {
        let misaligned = |_| PaintError::MisalignedBuffer(ty);
        let view = match ty {
            ElementType::U8 => MaskView::U8(bytes),
            ElementType::I8 => MaskView::I8(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
            ElementType::U16 => MaskView::U16(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
            ElementType::I16 => MaskView::I16(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
            ElementType::U32 => MaskView::U32(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
            ElementType::I32 => MaskView::I32(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
            ElementType::F32 => MaskView::F32(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
            ElementType::F64 => MaskView::F64(bytemuck::try_cast_slice_mut(bytes).map_err(misaligned)?),
        };
        Ok(view)
    }

    pub fn element_type(&self) -> ElementType {
        with_view!(self, s => element_type_of(&**s))
    }

    pub fn len(&self) -> usize {
        with_view!(self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        with_view!(self, s => s.get(index).map(|x| x.to_f64()))
    }
}

fn element_type_of<T: MaskElement>(_: &[T]) -> ElementType {
    T::TYPE
}

/// Read the first three channels of pixel `index` from an interleaved buffer
///
/// Callers must only use this for `channels >= 3`.
#[inline]
pub fn read_rgb<T: MaskElement>(values: &[T], channels: usize, index: usize) -> (T, T, T) {
    let base = index * channels;
    (values[base], values[base + 1], values[base + 2])
}
