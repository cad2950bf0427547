//! Validation behavior across the public surface.

use eof_bytecode::{
    get_eof_version, is_eof_code, validate_code, validate_code_inner, validate_raw_eof, Eof,
    EofBody, OpCodeSet, TypesSection, DEFINED_OPCODES, OPCODE_INFO,
};
use primitives::{bytes, hex, Bytes};

const MINIMAL: [u8; 20] = hex!("ef00010100040200010001030000000000000000");

#[test]
fn minimal_container_is_accepted() {
    assert!(validate_code(&MINIMAL));
    let eof = validate_raw_eof(Bytes::from_static(&MINIMAL)).unwrap();
    assert_eq!(eof.header.code_sizes, vec![1]);
    assert_eq!(eof.encode_slow(), Bytes::from_static(&MINIMAL));
}

#[test]
fn legacy_bytecode_passes_through() {
    // Classic PUSH1 0 PUSH1 0 RETURN.
    assert!(validate_code(&hex!("60006000f3")));
    // Truncated push, undefined bytes, empty code: all legacy, all accepted.
    assert!(validate_code(&hex!("60")));
    assert!(validate_code(&hex!("0c")));
    assert!(validate_code(&[]));
    // One magic byte is still legacy.
    assert!(validate_code(&hex!("ef")));
}

#[test]
fn version_probe_is_consistent() {
    for code in [
        &MINIMAL[..],
        &hex!("ef0002")[..],
        &hex!("ef00")[..],
        &hex!("60006000f3")[..],
        &[][..],
    ] {
        if is_eof_code(code) {
            assert_eq!(get_eof_version(code), code.get(2).copied().unwrap_or(0));
        } else {
            assert_eq!(get_eof_version(code), 0);
        }
    }
}

#[test]
fn validation_is_pure() {
    let raw = Bytes::from_static(&hex!("ef00020100040200010001030000000000000000"));
    assert_eq!(validate_raw_eof(raw.clone()), validate_raw_eof(raw.clone()));
    assert_eq!(validate_code(&raw), validate_code(&raw));
}

#[test]
fn header_rejections_are_prefix_stable() {
    // A container rejected while parsing the header keeps rejecting no
    // matter what is appended.
    let wrong_version = hex!("ef0002010004");
    let mut extended = wrong_version.to_vec();
    assert!(!validate_code(&wrong_version));
    for byte in [0x00u8, 0x01, 0xFF] {
        extended.push(byte);
        assert!(!validate_code(&extended));
    }
}

#[test]
fn built_container_validates() {
    let body = EofBody {
        types_section: vec![TypesSection::default(), TypesSection::new(0, 0, 1)],
        code_section: vec![1, 7],
        // Section 1: STOP. Section 2: PUSH1 1; RJUMPI over nothing; STOP.
        code: bytes!("0060015d000000"),
        data_section: bytes!("deadbeef"),
    };
    let eof = Eof::new(body);
    assert!(eof.validate().is_ok());

    let reparsed = validate_raw_eof(eof.raw().clone()).unwrap();
    assert_eq!(reparsed, eof);
    assert_eq!(reparsed.data(), &hex!("deadbeef"));
}

#[test]
fn hardfork_table_is_a_plain_predicate() {
    // A Frontier-style table without the static relative jumps rejects them,
    // while the built-in table accepts the same container.
    let no_static_jumps = OpCodeSet::from_fn(|op| {
        !(0x5C..=0x5F).contains(&op) && OPCODE_INFO[op as usize].is_some()
    });
    let raw = bytes!("ef0001010004020001000503000000000000005c0001fe00");
    assert!(!validate_code_inner(&raw, &no_static_jumps));
    assert!(validate_code_inner(&raw, &DEFINED_OPCODES));
}
