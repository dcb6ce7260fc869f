//! Plain-record codec driven by explicit field schemas

use crate::endian::FieldSpec;

/// A flat, self-contained record with a fixed packed wire layout.
///
/// The schema in [`Record::LAYOUT`] is the data-driven replacement for
/// structural field reflection: the conversion traversal walks it instead of
/// the type's declaration. Implementations must keep [`Record::WIDTH`] equal
/// to the schema's total extent, with no padding between fields, and
/// `WIDTH` must be nonzero.
pub trait Record: Sized {
    /// Exact packed size of the record on the wire.
    const WIDTH: usize;

    /// Ordered field schema consumed by the conversion traversal.
    const LAYOUT: &'static [FieldSpec];

    /// Decode from a native-order buffer of exactly [`Self::WIDTH`] bytes.
    fn decode_fields(bytes: &[u8]) -> Self;

    /// Encode into a native-order buffer of exactly [`Self::WIDTH`] bytes.
    fn encode_fields(&self, out: &mut [u8]);
}
