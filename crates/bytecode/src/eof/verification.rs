//! Verification logic for the EOF bytecode.

use crate::{
    eof::{is_eof_code, Eof, EofDecodeError},
    opcode::{self, OpCodeSet, DEFINED_OPCODES, OPCODE_INFO},
    utils::read_i16,
};
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use core::fmt;
use primitives::Bytes;
use std::vec::Vec;

/// Validates bytecode as a contract-creation path would.
///
/// Anything that does not start with the EOF magic is legacy code and is
/// accepted untouched; EOF containers must decode and verify against the
/// built-in opcode table.
pub fn validate_code(code: &[u8]) -> bool {
    validate_code_inner(code, &DEFINED_OPCODES)
}

/// Validates bytecode against the given defined-opcode set.
///
/// See [`validate_code`].
pub fn validate_code_inner(code: &[u8], opcodes: &OpCodeSet) -> bool {
    if !is_eof_code(code) {
        return true;
    }
    validate_raw_eof_inner(Bytes::copy_from_slice(code), opcodes).is_ok()
}

/// Decodes `raw` into an [`Eof`] container and validates it.
pub fn validate_raw_eof(raw: Bytes) -> Result<Eof, EofError> {
    validate_raw_eof_inner(raw, &DEFINED_OPCODES)
}

/// Decodes `raw` into an [`Eof`] container and validates it against the
/// given defined-opcode set.
#[inline]
pub fn validate_raw_eof_inner(raw: Bytes, opcodes: &OpCodeSet) -> Result<Eof, EofError> {
    let eof = Eof::decode(raw)?;
    validate_eof_inner(&eof, opcodes)?;
    Ok(eof)
}

/// Fully validates a decoded [`Eof`] container against the built-in opcode
/// table.
pub fn validate_eof(eof: &Eof) -> Result<(), EofError> {
    validate_eof_inner(eof, &DEFINED_OPCODES)
}

/// Fully validates a decoded [`Eof`] container.
///
/// Each code section is verified independently; header and data bytes are
/// never scanned as opcodes, and jumps cannot leave their section.
#[inline]
pub fn validate_eof_inner(eof: &Eof, opcodes: &OpCodeSet) -> Result<(), EofError> {
    if eof.body.code_section.is_empty() {
        // No code sections. This should be already checked in decode.
        return Err(EofValidationError::NoCodeSections.into());
    }

    let allowed = eof_opcodes(*opcodes);
    for code in eof.body.code_sections() {
        validate_code_section(code, &allowed)?;
    }
    Ok(())
}

/// Composes the EOF body opcode set from a hardfork's defined opcodes.
///
/// INVALID becomes a valid instruction, while PC, CALLCODE and SELFDESTRUCT
/// are removed. SELFDESTRUCT stays in the terminating-byte set, so a section
/// may still end on `0xFF` inside an immediate.
pub const fn eof_opcodes(defined: OpCodeSet) -> OpCodeSet {
    defined
        .with(opcode::INVALID)
        .without(opcode::PC)
        .without(opcode::CALLCODE)
        .without(opcode::SELFDESTRUCT)
}

/// Validates one code section.
///
/// Expects the composed EOF opcode set (see [`eof_opcodes`]); `opcodes`
/// membership decides instruction legality. The walk marks every immediate
/// operand byte, records every relative-jump target, checks the
/// terminating-byte rule and finally rejects any jump landing on an
/// immediate.
pub fn validate_code_section(
    code: &[u8],
    opcodes: &OpCodeSet,
) -> Result<(), EofValidationError> {
    // Operand bytes of the preceding instruction. Jumps may not land on any
    // of them.
    let mut immediates: BitVec<u8> = bitvec![u8, Lsb0; 0; code.len()];
    // In-section offsets recorded from RJUMP, RJUMPI and RJUMPV.
    let mut jump_targets: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < code.len() {
        let op = code[i];
        if !opcodes.contains(op) {
            return Err(if OPCODE_INFO[op as usize].is_none() {
                EofValidationError::UnknownOpcode
            } else {
                EofValidationError::OpcodeDisabled
            });
        }
        i += 1;
        match op {
            opcode::RJUMP | opcode::RJUMPI => {
                if i + 2 > code.len() {
                    return Err(EofValidationError::MissingImmediateBytes);
                }
                immediates[i..i + 2].fill(true);
                let offset = read_i16(&code[i..]) as isize;
                i += 2;
                // Targets are relative to the byte after the immediate.
                record_jump_target(offset, i, code.len(), &mut jump_targets)?;
            }
            opcode::RJUMPV => {
                if i >= code.len() {
                    return Err(EofValidationError::MissingRJUMPVImmediateBytes);
                }
                let table_size = code[i] as usize;
                if table_size == 0 {
                    return Err(EofValidationError::RJUMPVZeroTableSize);
                }
                let table_end = i + 1 + 2 * table_size;
                if table_end > code.len() {
                    return Err(EofValidationError::MissingRJUMPVImmediateBytes);
                }
                // The length prefix is an immediate too.
                immediates[i..table_end].fill(true);
                // Targets are relative to the first byte after the table.
                for entry in 0..table_size {
                    let offset = read_i16(&code[i + 1 + 2 * entry..]) as isize;
                    record_jump_target(offset, table_end, code.len(), &mut jump_targets)?;
                }
                i = table_end;
            }
            _ => {
                let immediate_size =
                    OPCODE_INFO[op as usize].map_or(0, |info| info.immediate_size() as usize);
                if immediate_size != 0 {
                    if i + immediate_size > code.len() {
                        return Err(EofValidationError::MissingImmediateBytes);
                    }
                    immediates[i..i + immediate_size].fill(true);
                    i += immediate_size;
                }
            }
        }
    }

    // The rule is byte-level: a section may end inside a PUSH or jump
    // immediate as long as the final byte doubles as a terminating opcode.
    let Some(&last) = code.last() else {
        return Err(EofValidationError::UnterminatedCodeSection);
    };
    if !OPCODE_INFO[last as usize].is_some_and(|info| info.is_terminating()) {
        return Err(EofValidationError::UnterminatedCodeSection);
    }

    for target in jump_targets {
        if immediates[target] {
            return Err(EofValidationError::JumpToImmediateBytes);
        }
    }

    Ok(())
}

/// Resolves `base + offset`, bounds-checks it against the section and
/// records it.
#[inline]
fn record_jump_target(
    offset: isize,
    base: usize,
    code_len: usize,
    targets: &mut Vec<usize>,
) -> Result<(), EofValidationError> {
    let target = base as isize + offset;
    if target < 0 {
        return Err(EofValidationError::JumpUnderflow);
    }
    if target >= code_len as isize {
        return Err(EofValidationError::JumpOverflow);
    }
    targets.push(target as usize);
    Ok(())
}

/// EOF Error
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum EofError {
    /// Decoding error.
    Decode(EofDecodeError),
    /// Validation Error.
    Validation(EofValidationError),
}

impl From<EofDecodeError> for EofError {
    fn from(err: EofDecodeError) -> Self {
        EofError::Decode(err)
    }
}

impl From<EofValidationError> for EofError {
    fn from(err: EofValidationError) -> Self {
        EofError::Validation(err)
    }
}

impl fmt::Display for EofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofError::Decode(e) => write!(f, "Bytecode decode error: {e}"),
            EofError::Validation(e) => write!(f, "Bytecode validation error: {e}"),
        }
    }
}

impl core::error::Error for EofError {}

/// EOF Validation Error
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum EofValidationError {
    /// Opcode is not known. It is not defined in the opcode table.
    UnknownOpcode,
    /// Opcode is disabled in EOF. For example PC, CALLCODE, SELFDESTRUCT
    OpcodeDisabled,
    /// Bytecode is too small and is missing immediate bytes for instruction
    MissingImmediateBytes,
    /// Bytecode is too small and is missing immediate bytes for instruction
    ///
    /// Similar to [`MissingImmediateBytes`][EofValidationError::MissingImmediateBytes]
    /// but for the special case of the RJUMPV jump table.
    MissingRJUMPVImmediateBytes,
    /// The RJUMPV jump table must not be empty
    RJUMPVZeroTableSize,
    /// Jump target is before the start of the code section
    JumpUnderflow,
    /// Jump target is past the end of the code section
    JumpOverflow,
    /// Invalid jump into immediate bytes
    JumpToImmediateBytes,
    /// Code section does not end with a terminating opcode byte
    UnterminatedCodeSection,
    /// No code sections present
    NoCodeSections,
}

impl fmt::Display for EofValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnknownOpcode => "Opcode is not known",
            Self::OpcodeDisabled => "Opcode is disabled",
            Self::MissingImmediateBytes => "Bytecode is missing bytes",
            Self::MissingRJUMPVImmediateBytes => "Bytecode is missing bytes after RJUMPV opcode",
            Self::RJUMPVZeroTableSize => "Used RJUMPV with zero size table",
            Self::JumpUnderflow => "Jump destination is too low",
            Self::JumpOverflow => "Jump destination is too high",
            Self::JumpToImmediateBytes => "Invalid jump into immediate bytes",
            Self::UnterminatedCodeSection => "Code section does not end with terminating opcode",
            Self::NoCodeSections => "No code sections",
        };
        f.write_str(s)
    }
}

impl core::error::Error for EofValidationError {}

#[cfg(test)]
mod test {
    use super::*;
    use primitives::hex;

    /// Wraps `code` into a single-section container with a zeroed types entry.
    fn single_section(code: &[u8]) -> Bytes {
        let mut raw = Vec::new();
        raw.extend_from_slice(&hex!("ef000101000402"));
        raw.extend_from_slice(&1u16.to_be_bytes());
        raw.extend_from_slice(&(code.len() as u16).to_be_bytes());
        raw.extend_from_slice(&hex!("03000000"));
        raw.extend_from_slice(&hex!("00000000"));
        raw.extend_from_slice(code);
        raw.into()
    }

    #[test]
    fn minimum_accepted_container() {
        let raw = Bytes::from_static(&hex!("ef00010100040200010001030000000000000000"));
        assert!(validate_raw_eof(raw.clone()).is_ok());
        assert!(validate_code(&raw));
    }

    #[test]
    fn wrong_version_rejects() {
        let raw = Bytes::from_static(&hex!("ef00020100040200010001030000000000000000"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Decode(EofDecodeError::InvalidEOFVersion))
        );
    }

    #[test]
    fn zero_code_sections_reject() {
        let raw = Bytes::from_static(&hex!("ef000101000002000003000000"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Decode(EofDecodeError::InvalidTypesSectionSize))
        );
    }

    #[test]
    fn push_operand_overrun_rejects() {
        let raw = single_section(&hex!("60"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(
                EofValidationError::MissingImmediateBytes
            ))
        );
    }

    #[test]
    fn rjump_into_immediate_rejects() {
        // PUSH1 0x00; RJUMP -2 lands inside immediate bytes.
        let raw = single_section(&hex!("60005cfffe00"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(
                EofValidationError::JumpToImmediateBytes
            ))
        );
    }

    #[test]
    fn legacy_code_passes_through() {
        assert!(validate_code(&hex!("60006000f3")));
        assert!(validate_code(&hex!("fe")));
        assert!(validate_code(&[]));
        // Magic makes it an EOF container, which must then parse.
        assert!(!validate_code(&hex!("ef00")));
        assert!(!validate_code(&hex!("ef0001")));
    }

    #[test]
    fn rjump_forward_accepts() {
        // RJUMP +1 over an INVALID byte onto STOP.
        let raw = single_section(&hex!("5c0001fe00"));
        assert!(validate_raw_eof(raw).is_ok());
    }

    #[test]
    fn rjump_backward_accepts() {
        // STOP; RJUMP -4 back to offset 0.
        let raw = single_section(&hex!("005cfffc00"));
        assert!(validate_raw_eof(raw).is_ok());
    }

    #[test]
    fn rjump_overflow_rejects() {
        let raw = single_section(&hex!("5c000100"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(EofValidationError::JumpOverflow))
        );
    }

    #[test]
    fn rjump_underflow_rejects() {
        let raw = single_section(&hex!("5cfffc00"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(EofValidationError::JumpUnderflow))
        );
    }

    #[test]
    fn rjump_truncated_immediate_rejects() {
        let raw = single_section(&hex!("5c00"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(
                EofValidationError::MissingImmediateBytes
            ))
        );
    }

    #[test]
    fn rjumpi_accepts() {
        // PUSH1 1; RJUMPI +1 over INVALID onto STOP.
        let raw = single_section(&hex!("60015d0001fe00"));
        assert!(validate_raw_eof(raw).is_ok());
    }

    #[test]
    fn rjumpv_accepts() {
        // PUSH1 0; RJUMPV with two entries, both in bounds.
        let raw = single_section(&hex!("60005e0200000001fe00"));
        assert!(validate_raw_eof(raw).is_ok());
    }

    #[test]
    fn rjumpv_zero_table_rejects() {
        let raw = single_section(&hex!("60005e0000"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(
                EofValidationError::RJUMPVZeroTableSize
            ))
        );
    }

    #[test]
    fn rjumpv_truncated_table_rejects() {
        let raw = single_section(&hex!("60005e020000"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(
                EofValidationError::MissingRJUMPVImmediateBytes
            ))
        );
    }

    #[test]
    fn rjumpv_target_out_of_bounds_rejects() {
        let raw = single_section(&hex!("60005e01000200"));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(EofValidationError::JumpOverflow))
        );
    }

    #[test]
    fn terminator_asymmetry() {
        // SELFDESTRUCT as the final byte of a PUSH immediate terminates..
        assert!(validate_raw_eof(single_section(&hex!("60ff"))).is_ok());
        // ..but is rejected wherever it is read as an opcode.
        assert_eq!(
            validate_raw_eof(single_section(&hex!("ff"))),
            Err(EofError::Validation(EofValidationError::OpcodeDisabled))
        );
        assert_eq!(
            validate_raw_eof(single_section(&hex!("ff00"))),
            Err(EofError::Validation(EofValidationError::OpcodeDisabled))
        );
    }

    #[test]
    fn disabled_opcodes_reject() {
        // PC
        assert_eq!(
            validate_raw_eof(single_section(&hex!("5800"))),
            Err(EofError::Validation(EofValidationError::OpcodeDisabled))
        );
        // CALLCODE
        assert_eq!(
            validate_raw_eof(single_section(&hex!("f200"))),
            Err(EofError::Validation(EofValidationError::OpcodeDisabled))
        );
    }

    #[test]
    fn invalid_opcode_is_allowed_in_body() {
        assert!(validate_raw_eof(single_section(&hex!("fe"))).is_ok());
        assert!(validate_raw_eof(single_section(&hex!("fe00"))).is_ok());
    }

    #[test]
    fn unknown_opcode_rejects() {
        assert_eq!(
            validate_raw_eof(single_section(&hex!("0c00"))),
            Err(EofError::Validation(EofValidationError::UnknownOpcode))
        );
    }

    #[test]
    fn unterminated_section_rejects() {
        // ADD is defined but not terminating.
        assert_eq!(
            validate_raw_eof(single_section(&hex!("0001"))),
            Err(EofError::Validation(
                EofValidationError::UnterminatedCodeSection
            ))
        );
    }

    #[test]
    fn push_immediate_as_terminator_accepts() {
        // The byte-level rule: PUSH1 0x00 ends the section on a STOP byte.
        assert!(validate_raw_eof(single_section(&hex!("6000"))).is_ok());
        // A PUSH immediate ending on a non-terminating byte does not.
        assert_eq!(
            validate_raw_eof(single_section(&hex!("6001"))),
            Err(EofError::Validation(
                EofValidationError::UnterminatedCodeSection
            ))
        );
    }

    #[test]
    fn multi_section_container_accepts() {
        let raw = Bytes::from_static(&hex!(
            "ef000101000802000200010002030000000000000000000000fe5b00"
        ));
        assert!(validate_raw_eof(raw).is_ok());
    }

    #[test]
    fn per_section_terminator_enforced() {
        // Second section ends with ADD.
        let raw = Bytes::from_static(&hex!(
            "ef000101000802000200010002030000000000000000000000fe5b01"
        ));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(
                EofValidationError::UnterminatedCodeSection
            ))
        );
    }

    #[test]
    fn jumps_cannot_leave_their_section() {
        // First section RJUMP +1 would land in the second section.
        let raw = Bytes::from_static(&hex!(
            "ef0001010008020002000400010300000000000000000000005c00010000"
        ));
        assert_eq!(
            validate_raw_eof(raw),
            Err(EofError::Validation(EofValidationError::JumpOverflow))
        );
    }

    #[test]
    fn custom_opcode_set() {
        // A hardfork table without PUSH1 rejects what the built-in accepts.
        let no_push1 = OpCodeSet::from_fn(|op| {
            op != opcode::PUSH1 && OPCODE_INFO[op as usize].is_some()
        });
        let raw = single_section(&hex!("600000"));
        assert_eq!(
            validate_raw_eof_inner(raw.clone(), &no_push1),
            Err(EofError::Validation(EofValidationError::OpcodeDisabled))
        );
        assert!(validate_raw_eof_inner(raw, &DEFINED_OPCODES).is_ok());
    }

    #[test]
    fn validation_is_pure() {
        let raw = single_section(&hex!("60005cfffe00"));
        assert_eq!(validate_raw_eof(raw.clone()), validate_raw_eof(raw));
    }
}
