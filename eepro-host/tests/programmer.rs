//! Bulk operations against the simulated programmer

mod common;

use common::{loopback, programmer};
use eepro_host::{Job, JobRequest, ProgrammerConfig, ProgrammerError, Step, ERASED};
use proptest::prelude::*;

const SIZE: usize = 256;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn write_then_read_returns_payload(
        (start, payload) in (0usize..SIZE).prop_flat_map(|start| {
            (Just(start), proptest::collection::vec(any::<u8>(), 0..=SIZE - start))
        }),
    ) {
        let mut programmer = programmer::<SIZE>();
        programmer.write(&payload, start as u32).unwrap();
        let read = programmer.read(start as u32, payload.len()).unwrap();
        prop_assert_eq!(read, payload);
    }

    #[test]
    fn fill_then_check_filled(byte in any::<u8>(), length in 0usize..=SIZE) {
        let mut programmer = programmer::<SIZE>();
        programmer.fill(byte, length).unwrap();
        programmer.check_filled(byte, length).unwrap();
    }
}

#[test]
fn fill_edge_lengths() {
    for length in [0, 1, SIZE] {
        let mut programmer = programmer::<SIZE>();
        programmer.fill(0x00, length).unwrap();
        programmer.check_filled(0x00, length).unwrap();

        let chip = loopback(&mut programmer).chip();
        assert!(chip.contents()[..length].iter().all(|&b| b == 0x00));
        assert!(chip.contents()[length..].iter().all(|&b| b == ERASED));
    }
}

#[test]
fn fill_at_offset() {
    let mut programmer = programmer::<SIZE>();
    programmer.fill_at(0xAA, 4, 100).unwrap();
    programmer.check_filled_at(0xAA, 4, 100).unwrap();
    assert!(programmer.check_filled(ERASED, 100).is_ok());
}

#[test]
fn check_filled_reports_single_difference() {
    let mut programmer = programmer::<SIZE>();
    loopback(&mut programmer).chip_mut().contents_mut()[77] = 0x00;

    let err = programmer.check_filled(ERASED, SIZE).unwrap_err();
    match &err {
        ProgrammerError::ContentMismatch { message, diff } => {
            assert_eq!(message, "EEPROM is not filled with 0xFF");
            assert!(diff.starts_with("--- fill bytes (0xFF)\n+++ EEPROM contents\n"));
            assert!(diff.contains("+0x0048:    FF FF FF FF  FF 00 FF FF"));
            assert_eq!(diff.lines().count(), 4);
            assert_eq!(err.details(), Some(diff.as_str()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn verify_detects_mismatch() {
    let mut programmer = programmer::<SIZE>();
    programmer.write(b"hello", 0).unwrap();
    programmer.verify(b"hello", 0).unwrap();

    let err = programmer.verify(b"help!", 0).unwrap_err();
    match err {
        ProgrammerError::ContentMismatch { message, diff } => {
            assert_eq!(message, "EEPROM contents differ from input");
            assert!(diff.contains("-0x0000:    68 65 6C 70  21"));
            assert!(diff.contains("+0x0000:    68 65 6C 6C  6F"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn verify_labeled_names_source() {
    let mut programmer = programmer::<SIZE>();
    let err = programmer
        .verify_labeled(&[0x00], 0, "image.bin")
        .unwrap_err();
    assert!(err.details().unwrap().starts_with("--- image.bin\n"));
}

#[test]
fn standard_write_job() {
    let mut programmer = programmer::<SIZE>();
    loopback(&mut programmer).chip_mut().contents_mut().fill(0x55);

    let request = JobRequest {
        clear: true,
        check_empty: true,
        write: Some((b"firmware".to_vec(), "image.bin".into())),
        read: false,
        verify: true,
    };
    let output = Job::standard(&request, SIZE).run(&mut programmer).unwrap();
    assert!(output.is_empty());

    let chip = loopback(&mut programmer).chip();
    assert_eq!(&chip.contents()[..8], b"firmware");
    assert!(chip.contents()[8..].iter().all(|&b| b == ERASED));
}

#[test]
fn standard_read_job() {
    let mut programmer = programmer::<SIZE>();
    loopback(&mut programmer).chip_mut().contents_mut()[..4].copy_from_slice(&[4, 3, 2, 1]);

    let request = JobRequest {
        read: true,
        verify: true,
        ..JobRequest::default()
    };
    let output = Job::standard(&request, SIZE).run(&mut programmer).unwrap();
    assert_eq!(output.len(), SIZE);
    assert_eq!(&output[..4], &[4, 3, 2, 1]);
}

#[test]
fn configured_read_job_covers_whole_chip() {
    let config = ProgrammerConfig::from_toml_str("port = \"loopback\"\ndevice_size = 256").unwrap();
    let request = JobRequest {
        clear: true,
        read: true,
        ..JobRequest::default()
    };

    let mut programmer = programmer::<SIZE>();
    loopback(&mut programmer).chip_mut().contents_mut().fill(0x00);
    let output = Job::from_config(&request, &config)
        .unwrap()
        .run(&mut programmer)
        .unwrap();
    assert_eq!(output, [ERASED; SIZE]);
}

#[test]
fn job_stops_at_first_fault() {
    let mut programmer = programmer::<SIZE>();
    // One cell was never erased
    loopback(&mut programmer).chip_mut().contents_mut()[3] = 0x00;

    let job = Job::new()
        .step(Step::CheckFilled {
            byte: ERASED,
            length: SIZE,
        })
        .step(Step::Write {
            data: vec![1, 2, 3],
        });
    let err = job.run(&mut programmer).unwrap_err();
    assert!(matches!(err, ProgrammerError::ContentMismatch { .. }));
    assert_eq!(loopback(&mut programmer).chip().write_cycles(), 0);
}

#[test]
fn job_aborts_on_connection_fault() {
    let mut programmer = programmer::<SIZE>();
    // First ACK of the fill session
    loopback(&mut programmer).substitute(0, b'!');

    let job = Job::new()
        .step(Step::Fill {
            byte: 0x00,
            length: 16,
        })
        .step(Step::Write { data: vec![7] });
    let err = job.run(&mut programmer).unwrap_err();
    assert!(matches!(
        err,
        ProgrammerError::Connection {
            received: Some(b'!'),
            ..
        }
    ));
    assert_eq!(loopback(&mut programmer).chip().write_cycles(), 0);
}
