//! Crate that contains EOF container types, opcode constants and validation.
//!
//! Anything that does not start with the `0xEF00` magic is legacy bytecode
//! and passes validation untouched; EOF containers are decoded against the
//! EOF v1 grammar and their code sections fully verified.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod eof;
pub mod opcode;
pub mod utils;

/// Re-export of bitvec crate, used to store immediate and jump-target bitmaps.
pub use bitvec;
pub use eof::{
    get_eof_version, is_eof_code, validate_code, validate_code_inner, validate_code_section,
    validate_eof, validate_eof_inner, validate_raw_eof, validate_raw_eof_inner, Eof, EofBody,
    EofDecodeError, EofError, EofHeader, EofValidationError, TypesSection, EOF_MAGIC,
    EOF_MAGIC_BYTES, EOF_VERSION_1,
};
pub use opcode::{OpCode, OpCodeInfo, OpCodeSet, DEFINED_OPCODES, OPCODE_INFO};
