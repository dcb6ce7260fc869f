//! Property-based tests using proptest

use binflow_core::backend::FileBackend;
use binflow_core::endian::{convert_record, swap_in_place, ByteOrder};
use binflow_core::record::Record;
use binflow_core::stream::TypedStream;
use binflow_core::zip::LocalFileHeader;
use proptest::prelude::*;

fn any_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)]
}

fn any_header() -> impl Strategy<Value = LocalFileHeader> {
    (
        any::<u32>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        (any::<u16>(), any::<u16>()),
        any::<u32>(),
        (any::<u32>(), any::<u32>()),
        (any::<u16>(), any::<u16>()),
    )
        .prop_map(
            |(
                signature,
                version_needed,
                flags,
                compression_method,
                (last_mod_time, last_mod_date),
                crc32,
                (compressed_size, uncompressed_size),
                (file_name_length, extra_field_length),
            )| LocalFileHeader {
                signature,
                version_needed,
                flags,
                compression_method,
                last_mod_time,
                last_mod_date,
                crc32,
                compressed_size,
                uncompressed_size,
                file_name_length,
                extra_field_length,
            },
        )
}

proptest! {
    #[test]
    fn prop_double_swap_restores_bytes(
        elements in prop::collection::vec(any::<[u8; 4]>(), 0..64),
        order in any_order(),
    ) {
        let original: Vec<u8> = elements.concat();
        let mut bytes = original.clone();

        swap_in_place(order, &mut bytes, 4);
        swap_in_place(order, &mut bytes, 4);

        prop_assert_eq!(bytes, original);
    }

    #[test]
    fn prop_header_codec_round_trip(header in any_header(), order in any_order()) {
        let mut buf = [0u8; LocalFileHeader::WIDTH];
        header.encode_fields(&mut buf);

        // Conversion is an involution: wire-to-native equals native-to-wire.
        convert_record(order, &mut buf, LocalFileHeader::LAYOUT);
        convert_record(order, &mut buf, LocalFileHeader::LAYOUT);

        prop_assert_eq!(LocalFileHeader::decode_fields(&buf), header);
    }

    #[test]
    fn prop_header_decode_never_panics(
        bytes in prop::collection::vec(any::<u8>(), LocalFileHeader::WIDTH),
        order in any_order(),
    ) {
        let mut buf = bytes;
        convert_record(order, &mut buf, LocalFileHeader::LAYOUT);
        let _ = LocalFileHeader::decode_fields(&buf);
    }

    #[test]
    fn prop_file_scalar_round_trip(value in any::<u64>(), order in any_order()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop.bin");

        let mut stream = TypedStream::new(FileBackend::create(&path).unwrap());
        stream.write_scalar(value, order).unwrap();
        stream.seek(0).unwrap();

        prop_assert_eq!(stream.read_scalar::<u64>(order).unwrap(), value);
    }

    #[test]
    fn prop_decoder_survives_random_small_archives(
        mut bytes in prop::collection::vec(any::<u8>(), 0..64),
        declared_size in 0u32..1024,
    ) {
        // Keep the declared payload size small; a random u32 there would
        // make the decoder attempt a gigabyte-scale buffer before hitting
        // end-of-stream.
        if bytes.len() > 22 {
            bytes[18..22].copy_from_slice(&declared_size.to_le_bytes());
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("random.zip");
        std::fs::write(&path, &bytes).unwrap();

        // Most random prefixes fail the header read; none may panic. The
        // trailing lengths a random header declares rarely fit in 64 bytes,
        // so those fields simply come back empty.
        let mut archive = binflow_core::zip::ZipArchive::open(&path).unwrap();
        let _ = archive.first_entry();
    }
}
