//! EOF container bytecode.
//!
//! Contains body, header and raw bytes, together with the verification
//! logic and the magic/version probes callers use to route bytecode.
mod body;
mod decode_helpers;
mod header;
mod types_section;
/// Verification logic for the EOF bytecode.
pub mod verification;

pub use body::EofBody;
pub use header::{
    EofHeader, CODE_SECTION_SIZE, KIND_CODE, KIND_DATA, KIND_TERMINAL, KIND_TYPES,
};
pub use types_section::{TypesSection, TYPES_SECTION_ENTRY_SIZE};
pub use verification::*;

use crate::opcode::OpCodeSet;
use core::fmt;
use primitives::{bytes, Bytes};
use std::{vec, vec::Vec};

/// EOF Magic in [u16] form
pub const EOF_MAGIC: u16 = 0xEF00;

/// EOF magic number in array form
pub static EOF_MAGIC_BYTES: Bytes = bytes!("ef00");

/// The only container version this crate understands.
pub const EOF_VERSION_1: u8 = 0x01;

/// Returns `true` when `code` starts with the EOF magic.
///
/// This is a prefix probe only; it says nothing about whether the container
/// is well formed.
#[inline]
pub fn is_eof_code(code: &[u8]) -> bool {
    code.starts_with(&EOF_MAGIC_BYTES)
}

/// Returns the container version byte, or `0` for anything that is not EOF.
///
/// Legacy bytecode and containers truncated before the version byte both
/// yield `0`.
#[inline]
pub fn get_eof_version(code: &[u8]) -> u8 {
    if !is_eof_code(code) {
        return 0;
    }
    code.get(2).copied().unwrap_or(0)
}

/// EVM Object Format (EOF) container
///
/// It consists of a header, body and the raw original bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eof {
    /// Header of the EOF container
    pub header: EofHeader,
    /// Body of the EOF container
    pub body: EofBody,
    /// Raw bytes of the EOF container. Chunks of raw Bytes are used in Body
    /// to reference parts of code and data sections.
    pub raw: Bytes,
}

impl Default for Eof {
    fn default() -> Self {
        let body = EofBody {
            // Types section with zero inputs, zero outputs and zero max stack height.
            types_section: vec![TypesSection::default()],
            code_section: vec![1],
            // One code section with a STOP byte.
            code: Bytes::from_static(&[0x00]),
            data_section: Bytes::new(),
        };
        body.into_eof()
    }
}

impl Eof {
    /// Creates a new EOF container from the given body.
    pub fn new(body: EofBody) -> Self {
        body.into_eof()
    }

    /// Validates the EOF container against the built-in opcode table.
    pub fn validate(&self) -> Result<(), EofError> {
        validate_eof(self)
    }

    /// Validates the EOF container against the given defined-opcode set.
    pub fn validate_inner(&self, opcodes: &OpCodeSet) -> Result<(), EofError> {
        validate_eof_inner(self, opcodes)
    }

    /// Returns len of the header and body in bytes.
    pub fn size(&self) -> usize {
        self.header.size() + self.header.body_size()
    }

    /// Returns raw EOF bytes.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns a slice of the data section.
    pub fn data(&self) -> &[u8] {
        &self.body.data_section
    }

    /// Slow encodes EOF bytes.
    pub fn encode_slow(&self) -> Bytes {
        let mut buffer: Vec<u8> = Vec::with_capacity(self.size());
        self.header.encode(&mut buffer);
        self.body.encode(&mut buffer);
        buffer.into()
    }

    /// Decodes EOF from raw bytes.
    pub fn decode(raw: Bytes) -> Result<Self, EofDecodeError> {
        let (header, _) = EofHeader::decode(&raw)?;
        let body = EofBody::decode(&raw, &header)?;
        Ok(Self { header, body, raw })
    }
}

/// EOF decode errors
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EofDecodeError {
    /// Short input while processing EOF
    MissingInput,
    /// Container is longer than the header-declared sections
    DanglingData,
    /// Invalid EOF magic number
    InvalidEOFMagicNumber,
    /// Invalid EOF version
    InvalidEOFVersion,
    /// Invalid number for types kind
    InvalidTypesKind,
    /// Invalid number for code kind
    InvalidCodeKind,
    /// Invalid data kind
    InvalidDataKind,
    /// Invalid terminal byte
    InvalidTerminalByte,
    /// Types section size is not a positive multiple of the entry size
    InvalidTypesSectionSize,
    /// Types entry declares more inputs than the format allows
    InvalidTypesSectionInputs {
        /// Number of inputs
        value: u8,
    },
    /// Types entry declares more outputs than the format allows
    InvalidTypesSectionOutputs {
        /// Number of outputs
        value: u8,
    },
    /// Types entry declares a max stack height above the stack limit
    InvalidMaxStackHeight {
        /// Declared max stack height
        value: u16,
    },
    /// Mismatch of code section count and types section size
    MismatchCodeAndTypesSize,
    /// Missing size
    ShortInputForSizes,
    /// Size cant be zero
    ZeroSize,
    /// Invalid code number
    TooManyCodeSections,
    /// Invalid number of code sections
    ZeroCodeSections,
}

impl fmt::Display for EofDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingInput => "Short input while processing EOF",
            Self::DanglingData => "Body size is more than specified in the header",
            Self::InvalidEOFMagicNumber => "Invalid EOF magic number",
            Self::InvalidEOFVersion => "Invalid EOF version",
            Self::InvalidTypesKind => "Invalid number for types kind",
            Self::InvalidCodeKind => "Invalid number for code kind",
            Self::InvalidDataKind => "Invalid data kind",
            Self::InvalidTerminalByte => "Invalid terminal byte",
            Self::InvalidTypesSectionSize => "Invalid types section size",
            Self::InvalidTypesSectionInputs { value } => {
                return write!(f, "Invalid types section input count: {value}");
            }
            Self::InvalidTypesSectionOutputs { value } => {
                return write!(f, "Invalid types section output count: {value}");
            }
            Self::InvalidMaxStackHeight { value } => {
                return write!(f, "Invalid types section max stack height: {value}");
            }
            Self::MismatchCodeAndTypesSize => "Mismatch of code and types sizes",
            Self::ShortInputForSizes => "Missing size",
            Self::ZeroSize => "Size cant be zero",
            Self::TooManyCodeSections => "Invalid code number",
            Self::ZeroCodeSections => "Invalid number of code sections",
        };
        f.write_str(s)
    }
}

impl core::error::Error for EofDecodeError {}
