/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{BufReader, Cursor};

use tcspc_core::bytestream::ByteCursor;
use tcspc_core::options::DecoderOptions;
use tcspc_sdt::constants::{FileKind, MeasureMode};
use tcspc_sdt::errors::SdtDecoderErrors;
use tcspc_sdt::{probe_sdt, SdtDecoder, SdtFile};

use crate::fixture::{binary_setup_with_mcs_image, payload, SdtFixture};
use crate::{hash, read_scenarios, JsonGeometry, TestEntry};

fn scenario(name: &str) -> TestEntry {
    read_scenarios()
        .into_iter()
        .find(|x| x.name == name)
        .unwrap()
}

fn decode(bytes: &[u8]) -> Result<SdtFile, SdtDecoderErrors> {
    SdtDecoder::new(ByteCursor::new(bytes)).decode()
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_sdt() {
    let entries = read_scenarios();

    let mut error = false;
    let mut files = Vec::new();

    for entry in &entries {
        let bytes = SdtFixture::from_entry(entry).build();

        let file = decode(&bytes).unwrap();
        let geometry = JsonGeometry {
            width:      file.width(),
            height:     file.height(),
            time_bins:  file.time_bins(),
            channels:   file.channels(),
            timepoints: file.timepoints()
        };
        let records = file
            .measurement
            .as_ref()
            .map(|x| x.record_count())
            .unwrap_or(0);

        if geometry != entry.expected || records != entry.records {
            error = true;
            files.push(entry.name.clone());
            let err = format!(
                "Mismatch for scenario {}\nExpected {:?} with {} records but found {:?} with {}\nConfig:{:#?}",
                entry.name, entry.expected, entry.records, geometry, records, entry
            );
            eprintln!("{}\n", err)
        }
    }
    if error {
        panic!("Errors found during test decoding\n {:#?}", files);
    }
}

#[test]
fn scenario_a_layout() {
    let entry = scenario("scenario-a");
    let bytes = SdtFixture::from_entry(&entry).build();
    let file = decode(&bytes).unwrap();

    let header = file.header;
    assert_eq!(header.revision, 655);
    assert_eq!(header.info_offs, 42);
    assert_eq!(header.info_length, 267);
    assert_eq!(header.setup_offs, 309);
    assert_eq!(header.setup_length, 25094);
    assert_eq!(header.meas_desc_block_length, 512);

    let measurement = file.measurement.as_ref().unwrap();
    assert!(measurement.info.is_some());
    assert!(measurement.stop.is_some());
    assert!(measurement.fcs.is_some());
    assert!(measurement.extended.is_some());
    assert!(measurement.hist.is_some());

    let info = file.measure_info().unwrap();
    assert_eq!(info.time, "12:04:33");
    assert_eq!(info.date, "10-19-2026");
    assert_eq!(info.mod_ser_no, "A1234567");
    assert_eq!(info.mod_type, "SPC-150");
    assert_eq!(measurement.stop.unwrap().status, 3);
    assert_eq!(file.measure_mode(), Some(MeasureMode::Other(9)));

    assert_eq!(file.info.title, "scenario-a");
    assert_eq!(file.info.revision, "655");
    assert_eq!(file.file_kind(), FileKind::SetupAndData);

    let setup = file.setup.as_ref().unwrap();
    assert_eq!(setup.pr.device_name, "PDF printer");
    assert_eq!(setup.sp.scan_x, 256);
    assert_eq!(setup.tr[0], Some([0, 1, 2, 3, 4, 5, 6, 7]));
    // no sentinel, no binary header
    assert!(file.extended_header.is_none());

    assert_eq!(file.data_blocks.len(), 1);
    assert_eq!(file.data_blocks[0].block_length, 1024);
}

#[test]
fn window_interval_scenario() {
    let fixture = SdtFixture {
        setup_lines: vec!["  #WI #2 *NO *0 [0,255]".into()],
        ..Default::default()
    };
    let file = decode(&fixture.build()).unwrap();
    let wi = file.setup.unwrap().wi;

    assert_eq!(wi.len(), 1);
    assert_eq!(
        (
            wi[0].channel,
            wi[0].enabled,
            wi[0].sub_index,
            wi[0].range_from,
            wi[0].range_to
        ),
        (2, false, 0, 0.0, 255.0)
    );
}

#[test]
fn decoding_is_idempotent() {
    let bytes = SdtFixture::from_entry(&scenario("fifo-image")).build();

    let mut decoder = SdtDecoder::new(ByteCursor::new(&bytes));
    let first = decoder.decode().unwrap();
    let second = decoder.decode().unwrap();
    let fresh = decode(&bytes).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn std_readers_match_in_memory_cursor() {
    let bytes = SdtFixture::from_entry(&scenario("scenario-b")).build();

    let from_cursor = decode(&bytes).unwrap();
    let from_std = SdtDecoder::new(Cursor::new(&bytes)).decode().unwrap();
    let from_buf = SdtDecoder::new(BufReader::new(Cursor::new(&bytes)))
        .decode()
        .unwrap();

    assert_eq!(from_cursor, from_std);
    assert_eq!(from_cursor, from_buf);
}

#[test]
fn truncated_files_fail() {
    let bytes = SdtFixture::from_entry(&scenario("scenario-a")).build();

    // everything up to the end of the block index is needed, payloads are read lazily
    let index_end = bytes.len() - 1024;

    for cut in (0..index_end).step_by(97) {
        let result = decode(&bytes[..cut]);

        match result {
            Err(SdtDecoderErrors::OffsetOutOfBounds(..)) => (),
            Err(err) => assert!(err.is_truncated(), "cut at {cut}: {err:?}"),
            Ok(_) => panic!("decoded a file cut at {cut}")
        }
    }
    // cutting into the first data block header
    let result = decode(&bytes[..index_end - 1]);
    assert!(result.unwrap_err().is_truncated());

    // payload itself cut short
    let mut decoder = SdtDecoder::new(ByteCursor::new(&bytes[..bytes.len() - 1]));
    decoder.decode_headers().unwrap();
    assert!(decoder.read_data_block(0).unwrap_err().is_truncated());
}

#[test]
fn invalid_marker_is_an_error_only_in_strict_mode() {
    let fixture = SdtFixture {
        header_valid: 0x1111,
        ..Default::default()
    };
    let bytes = fixture.build();
    assert!(probe_sdt(&bytes));

    let lenient = decode(&bytes).unwrap();
    assert!(!lenient.header.is_valid());

    let mut strict =
        SdtDecoder::new_with_options(ByteCursor::new(&bytes), DecoderOptions::new_strict());
    assert!(matches!(
        strict.decode(),
        Err(SdtDecoderErrors::InvalidHeaderMarker(0x1111))
    ));
}

#[test]
fn checksum_mismatch_is_an_error_only_in_strict_mode() {
    let good = SdtFixture::default().build();
    let mut strict =
        SdtDecoder::new_with_options(ByteCursor::new(&good), DecoderOptions::new_strict());
    let file = strict.decode().unwrap();
    assert_eq!(file.header.computed_checksum(), file.header.chksum);

    let fixture = SdtFixture {
        corrupt_checksum: true,
        ..Default::default()
    };
    let bytes = fixture.build();
    assert!(decode(&bytes).is_ok());

    let mut strict =
        SdtDecoder::new_with_options(ByteCursor::new(&bytes), DecoderOptions::new_strict());
    match strict.decode() {
        Err(SdtDecoderErrors::ChecksumMismatch { expected, found }) => {
            assert_eq!(expected ^ 0xffff, found);
        }
        other => panic!("unexpected result {other:?}")
    }
}

#[test]
fn data_block_payloads() {
    let entry = scenario("fifo-image");
    let fixture = SdtFixture::from_entry(&entry);
    let bytes = fixture.build();

    let mut decoder = SdtDecoder::new(ByteCursor::new(&bytes));

    for (i, expected) in fixture.payloads.iter().enumerate() {
        let block = decoder.read_data_block_bytes(i).unwrap();
        assert_eq!(hash(&block), hash(expected), "block {i}");
    }
    let counts = decoder.read_data_block(1).unwrap();
    let expected = payload(1, 64);
    assert_eq!(counts.len(), 32);
    assert_eq!(counts[0], u16::from_le_bytes([expected[0], expected[1]]));
    assert_eq!(counts[31], u16::from_le_bytes([expected[62], expected[63]]));

    assert!(matches!(
        decoder.read_data_block(3),
        Err(SdtDecoderErrors::BlockIndexOutOfRange(3, 3))
    ));

    let blocks = decoder.data_blocks().unwrap();
    assert_eq!(blocks[2].lblock_no, 2);
    assert_eq!(blocks[0].next_block_offs as u64, blocks[0].header_end);
    assert_eq!(blocks[2].next_block_offs, 0);
}

#[test]
fn compressed_blocks_are_not_read_as_counts() {
    let fixture = SdtFixture {
        payloads: vec![payload(0, 8)],
        // zip compressed image decay data
        block_type: 0x1060,
        ..Default::default()
    };
    let bytes = fixture.build();

    let mut decoder = SdtDecoder::new(ByteCursor::new(&bytes));
    assert!(matches!(
        decoder.read_data_block(0),
        Err(SdtDecoderErrors::CompressedBlock(0))
    ));
    assert!(decoder.data_blocks().unwrap()[0].block_type().compressed);

    // raw bytes are still handed out untouched
    let raw = decoder.read_data_block_bytes(0).unwrap();
    assert_eq!(raw, fixture.payloads[0]);

    // out of range indices keep their own error
    assert!(matches!(
        decoder.read_data_block(1),
        Err(SdtDecoderErrors::BlockIndexOutOfRange(1, 1))
    ));
}

#[test]
fn too_many_blocks_is_rejected() {
    let bytes = SdtFixture::from_entry(&scenario("fifo-image")).build();
    let options = DecoderOptions::default().set_max_data_blocks(2);

    let mut decoder = SdtDecoder::new_with_options(ByteCursor::new(&bytes), options);
    assert!(matches!(
        decoder.decode(),
        Err(SdtDecoderErrors::TooManyDataBlocks(2, 3))
    ));
}

#[test]
fn binary_setup_header_with_mcs_image() {
    let fixture = SdtFixture {
        setup_lines: vec!["  #SP [SP_SCAN_X,I,16]".into()],
        setup_binary: Some(binary_setup_with_mcs_image(512, 256)),
        setup_length: Some(4096),
        ..Default::default()
    };
    let bytes = fixture.build();
    let file = decode(&bytes).unwrap();

    let extended = file.extended_header.as_ref().unwrap();
    assert_eq!(extended.soft_rev, 900);
    assert!(extended.bin_hdr_ext.is_present());

    let mcs = extended.mcs_image().unwrap();
    assert_eq!((mcs.image_x, mcs.image_y), (512, 256));
    assert_eq!(mcs.pixel_time, 10.0);

    // the text before the sentinel still parses
    assert_eq!(file.setup.as_ref().unwrap().sp.scan_x, 16);
}

#[test]
fn sentinel_at_end_of_setup_has_no_binary_header() {
    let fixture = SdtFixture {
        setup_binary: Some(Vec::new()),
        ..Default::default()
    };
    let file = decode(&fixture.build()).unwrap();

    assert!(file.setup.is_some());
    assert!(file.extended_header.is_none());
}

#[test]
fn decoder_accessors_before_and_after_headers() {
    let bytes = SdtFixture::from_entry(&scenario("scenario-b")).build();
    let mut decoder = SdtDecoder::new(ByteCursor::new(&bytes));

    assert!(decoder.dimensions().is_none());
    assert!(decoder.file().is_none());

    decoder.decode_headers().unwrap();
    assert_eq!(decoder.dimensions(), Some((128, 128)));
    assert_eq!(decoder.fixed_header().unwrap().revision, 655);
    assert_eq!(decoder.info().unwrap().title, "scenario-b");
    assert_eq!(decoder.geometry().unwrap().channels, 16);
}

#[test]
fn decoded_file_serializes() {
    let bytes = SdtFixture::from_entry(&scenario("scenario-a")).build();
    let file = decode(&bytes).unwrap();

    let value = serde_json::to_value(&file).unwrap();

    assert_eq!(value["geometry"]["width"], 256);
    assert_eq!(value["info"]["id"], "SPC Setup & Data File");
    assert_eq!(value["setup"]["wi"][0]["range_to"], 255.0);
}

#[test]
fn decode_file_reads_from_disk() {
    let bytes = SdtFixture::from_entry(&scenario("single-point")).build();
    let path = std::env::temp_dir().join("tcspc-tests-single-point.sdt");
    std::fs::write(&path, &bytes).unwrap();

    let file = tcspc_sdt::decode_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(file, decode(&bytes).unwrap());
    assert_eq!((file.width(), file.height()), (1, 1));

    let missing = std::env::temp_dir().join("tcspc-tests-does-not-exist.sdt");
    assert!(tcspc_sdt::decode_file(missing).is_err());
}
