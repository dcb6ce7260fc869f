//! Byte-order conversion over scalars, fixed arrays, and schema-described
//! records

#[cfg(feature = "logging")]
use tracing::warn;

/// Byte order of multi-byte values as stored in an underlying resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// The host's native byte order.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// Whether this order equals the host's native order.
    pub const fn is_native(self) -> bool {
        (self as u32) == (Self::native() as u32)
    }
}

/// Reverse each `elem_size` chunk of `bytes` when `order` differs from the
/// host's native order.
///
/// No-op for single-byte elements or native order. `bytes` must be a whole
/// number of elements long.
pub fn swap_in_place(order: ByteOrder, bytes: &mut [u8], elem_size: usize) {
    if elem_size <= 1 || order.is_native() {
        return;
    }

    debug_assert!(
        bytes.len() % elem_size == 0,
        "buffer length must be a multiple of the element size"
    );

    for elem in bytes.chunks_exact_mut(elem_size) {
        elem.reverse();
    }
}

/// Classification of one record field for the conversion traversal.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Arithmetic scalar of the given byte width.
    Scalar {
        /// Byte width of the scalar.
        size: usize,
    },
    /// Fixed-size array of scalar elements.
    Array {
        /// Byte width of one element.
        elem_size: usize,
        /// Number of elements.
        count: usize,
    },
    /// Enumeration; its underlying representation is swapped like a scalar.
    Enum {
        /// Byte width of the underlying representation.
        size: usize,
    },
    /// Nested plain record, converted recursively through its own schema.
    Record(&'static [FieldSpec]),
    /// Field with no byte-order conversion; left untouched with a diagnostic.
    Opaque {
        /// Byte width of the field.
        size: usize,
    },
}

/// One entry in a record's ordered field schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Byte offset of the field from the start of the record.
    pub offset: usize,
    /// How the conversion traversal treats the field.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field entry.
    pub const fn new(offset: usize, kind: FieldKind) -> Self {
        Self { offset, kind }
    }

    /// Total byte width of the field.
    pub fn extent(&self) -> usize {
        match self.kind {
            FieldKind::Scalar { size } | FieldKind::Enum { size } | FieldKind::Opaque { size } => {
                size
            }
            FieldKind::Array { elem_size, count } => elem_size * count,
            FieldKind::Record(layout) => layout_extent(layout),
        }
    }
}

/// Total byte extent of a field schema: the end of its furthest field.
pub fn layout_extent(layout: &[FieldSpec]) -> usize {
    layout
        .iter()
        .map(|field| field.offset + field.extent())
        .max()
        .unwrap_or(0)
}

/// Convert a packed record buffer between `order` and the host's native
/// order, visiting every schema field in order.
///
/// Nested records recurse, arrays swap element-wise (skipped for 1-byte
/// elements), scalars and enumerations swap whole. [`FieldKind::Opaque`]
/// fields stay byte-identical; a diagnostic is emitted for them since their
/// content crosses the byte-order boundary unconverted.
pub fn convert_record(order: ByteOrder, bytes: &mut [u8], layout: &[FieldSpec]) {
    if order.is_native() {
        return;
    }

    for field in layout {
        let start = field.offset;
        match field.kind {
            FieldKind::Scalar { size } | FieldKind::Enum { size } => {
                swap_in_place(order, &mut bytes[start..start + size], size);
            }
            FieldKind::Array { elem_size, count } => {
                swap_in_place(order, &mut bytes[start..start + elem_size * count], elem_size);
            }
            FieldKind::Record(nested) => {
                convert_record(order, &mut bytes[start..start + layout_extent(nested)], nested);
            }
            FieldKind::Opaque { size: _size } => {
                #[cfg(feature = "logging")]
                warn!(
                    "field at offset {} ({} bytes) has no byte-order conversion; leaving it untouched",
                    start, _size
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_native() -> ByteOrder {
        match ByteOrder::native() {
            ByteOrder::Little => ByteOrder::Big,
            ByteOrder::Big => ByteOrder::Little,
        }
    }

    #[test]
    fn test_swap_is_identity_for_native_order() {
        let mut bytes = [0x12, 0x34, 0x56, 0x78];
        swap_in_place(ByteOrder::native(), &mut bytes, 4);
        assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_swap_is_identity_for_single_byte_elements() {
        let mut bytes = [0x12, 0x34, 0x56, 0x78];
        swap_in_place(non_native(), &mut bytes, 1);
        assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_swap_reverses_each_element_independently() {
        let mut bytes = [0x12, 0x34, 0x56, 0x78];
        swap_in_place(non_native(), &mut bytes, 2);
        assert_eq!(bytes, [0x34, 0x12, 0x78, 0x56]);
    }

    #[test]
    fn test_double_swap_restores_original_bytes() {
        let original = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04];
        let mut bytes = original;
        swap_in_place(non_native(), &mut bytes, 4);
        swap_in_place(non_native(), &mut bytes, 4);
        assert_eq!(bytes, original);
    }

    // Scalar, two-element array of u16, enumeration, and an opaque tail.
    const MIXED_LAYOUT: &[FieldSpec] = &[
        FieldSpec::new(0, FieldKind::Scalar { size: 4 }),
        FieldSpec::new(4, FieldKind::Array { elem_size: 2, count: 2 }),
        FieldSpec::new(8, FieldKind::Enum { size: 2 }),
        FieldSpec::new(10, FieldKind::Opaque { size: 2 }),
    ];

    #[test]
    fn test_convert_record_swaps_supported_kinds_only() {
        let mut bytes = [
            0x11, 0x22, 0x33, 0x44, // scalar
            0xAA, 0xBB, 0xCC, 0xDD, // array of two u16
            0x55, 0x66, // enum
            0x77, 0x88, // opaque
        ];
        convert_record(non_native(), &mut bytes, MIXED_LAYOUT);

        assert_eq!(&bytes[0..4], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[4..8], &[0xBB, 0xAA, 0xDD, 0xCC]);
        assert_eq!(&bytes[8..10], &[0x66, 0x55]);
        // The opaque field crosses untouched.
        assert_eq!(&bytes[10..12], &[0x77, 0x88]);
    }

    #[test]
    fn test_convert_record_is_identity_for_native_order() {
        let original = [
            0x11, 0x22, 0x33, 0x44, 0xAA, 0xBB, 0xCC, 0xDD, 0x55, 0x66, 0x77, 0x88,
        ];
        let mut bytes = original;
        convert_record(ByteOrder::native(), &mut bytes, MIXED_LAYOUT);
        assert_eq!(bytes, original);
    }

    #[test]
    fn test_convert_record_recurses_into_nested_records() {
        const INNER: &[FieldSpec] = &[
            FieldSpec::new(0, FieldKind::Scalar { size: 2 }),
            FieldSpec::new(2, FieldKind::Scalar { size: 2 }),
        ];
        const OUTER: &[FieldSpec] = &[
            FieldSpec::new(0, FieldKind::Scalar { size: 2 }),
            FieldSpec::new(2, FieldKind::Record(INNER)),
        ];

        let mut bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        convert_record(non_native(), &mut bytes, OUTER);
        assert_eq!(bytes, [0x02, 0x01, 0x04, 0x03, 0x06, 0x05]);
    }

    #[test]
    fn test_layout_extent_covers_furthest_field() {
        assert_eq!(layout_extent(MIXED_LAYOUT), 12);
        assert_eq!(layout_extent(&[]), 0);
    }
}
