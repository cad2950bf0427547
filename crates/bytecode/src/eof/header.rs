use super::{
    decode_helpers::{consume_u16, consume_u8},
    types_section::TYPES_SECTION_ENTRY_SIZE,
    EofDecodeError, EOF_MAGIC, EOF_VERSION_1,
};
use primitives::MAX_CODE_SECTIONS;
use std::vec::Vec;

/// EOF header structure that contains section sizes and metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EofHeader {
    /// Size of EOF types section
    ///
    /// Types section includes num of input and outputs and max stack height.
    pub types_size: u16,
    /// Sizes of EOF code sections
    ///
    /// Code size can't be zero.
    pub code_sizes: Vec<u16>,
    /// EOF data size
    pub data_size: u16,
    /// Sum of code sizes
    pub sum_code_sizes: usize,
}

/// EOF header terminal kind, marking end of header.
pub const KIND_TERMINAL: u8 = 0x00;
/// EOF header types kind, marking types section.
pub const KIND_TYPES: u8 = 0x01;
/// EOF header code kind, marking code section.
pub const KIND_CODE: u8 = 0x02;
/// EOF header data kind, marking data section.
pub const KIND_DATA: u8 = 0x03;
/// EOF header code section size length.
pub const CODE_SECTION_SIZE: usize = 2;

/// Consumes the code-section size list from the header.
///
/// It returns rest of the input, list of sizes and sum of all sizes.
#[inline]
fn consume_header_code_section(input: &[u8]) -> Result<(&[u8], Vec<u16>, usize), EofDecodeError> {
    // `num_code_sections` 2 bytes 0x0001-0x0400
    // 16-bit unsigned big-endian integer denoting the number of the sections
    let (input, num_sections) = consume_u16(input)?;
    if num_sections == 0 {
        return Err(EofDecodeError::ZeroCodeSections);
    }
    let num_sections = num_sections as usize;
    if num_sections > MAX_CODE_SECTIONS {
        return Err(EofDecodeError::TooManyCodeSections);
    }
    let byte_size = num_sections * CODE_SECTION_SIZE;
    if input.len() < byte_size {
        return Err(EofDecodeError::ShortInputForSizes);
    }
    let mut sizes = Vec::with_capacity(num_sections);
    let mut sum = 0;
    for i in 0..num_sections {
        // `code_size`  2 bytes 0x0001-0xFFFF
        // 16-bit unsigned big-endian integer denoting the length of the section content
        let code_size = u16::from_be_bytes([
            input[i * CODE_SECTION_SIZE],
            input[i * CODE_SECTION_SIZE + 1],
        ]);
        if code_size == 0 {
            return Err(EofDecodeError::ZeroSize);
        }
        sum += code_size as usize;
        sizes.push(code_size);
    }

    Ok((&input[byte_size..], sizes, sum))
}

impl EofHeader {
    /// Gets the length of the header in bytes.
    ///
    /// It is minimum 15 bytes (there is at least one code section).
    pub fn size(&self) -> usize {
        2 + // Magic
        1 + // Version
        3 + // Types section kind and size
        3 + // Code section kind and count
        CODE_SECTION_SIZE * self.code_sizes.len() + // `code_sizes`
        3 + // Data section kind and size
        1 // Terminator
    }

    /// Returns number of types.
    pub fn types_count(&self) -> usize {
        self.types_size as usize / TYPES_SECTION_ENTRY_SIZE
    }

    /// Returns body size.
    ///
    /// It is sum of types size, code sizes and data size.
    pub fn body_size(&self) -> usize {
        self.types_size as usize + self.sum_code_sizes + self.data_size as usize
    }

    /// Returns raw size of the EOF.
    pub fn eof_size(&self) -> usize {
        self.size() + self.body_size()
    }

    /// Encodes EOF header into binary form.
    pub fn encode(&self, buffer: &mut Vec<u8>) {
        // `magic`	2 bytes	0xEF00	EOF prefix
        buffer.extend_from_slice(&EOF_MAGIC.to_be_bytes());
        // `version`	1 byte	0x01	EOF version
        buffer.push(EOF_VERSION_1);
        // `kind_types`	1 byte	0x01	kind marker for types size section
        buffer.push(KIND_TYPES);
        // `types_size`	2 bytes	0x0004-0xFFFF
        buffer.extend_from_slice(&self.types_size.to_be_bytes());
        // `kind_code`	1 byte	0x02	kind marker for code size section
        buffer.push(KIND_CODE);
        // `num_code_sections`	2 bytes	0x0001-0x0400
        buffer.extend_from_slice(&(self.code_sizes.len() as u16).to_be_bytes());
        // `code_sizes`
        for size in &self.code_sizes {
            buffer.extend_from_slice(&size.to_be_bytes());
        }
        // `kind_data`	1 byte	0x03	kind marker for data size section
        buffer.push(KIND_DATA);
        // `data_size`	2 bytes	0x0000-0xFFFF	16-bit unsigned big-endian integer denoting the length of the data section content
        buffer.extend_from_slice(&self.data_size.to_be_bytes());
        // `terminator`	1 byte	0x00	marks the end of the EofHeader
        buffer.push(KIND_TERMINAL);
    }

    /// Decodes EOF header from binary form.
    ///
    /// Format of the header is:
    /// 0xEF00 | 0x01 | 0x01 | u16 | 0x02 | u16 | u16 * cnum | 0x03 | u16 | 0x00
    pub fn decode(input: &[u8]) -> Result<(Self, &[u8]), EofDecodeError> {
        let mut header = EofHeader::default();

        // `magic`	2 bytes	0xEF00	EOF prefix
        let (input, magic) = consume_u16(input)?;
        if magic != EOF_MAGIC {
            return Err(EofDecodeError::InvalidEOFMagicNumber);
        }

        // `version`	1 byte	0x01	EOF version
        let (input, version) = consume_u8(input)?;
        if version != EOF_VERSION_1 {
            return Err(EofDecodeError::InvalidEOFVersion);
        }

        // `kind_types`	1 byte	0x01	kind marker for types size section
        let (input, kind_types) = consume_u8(input)?;
        if kind_types != KIND_TYPES {
            return Err(EofDecodeError::InvalidTypesKind);
        }

        // `types_size`	2 bytes	0x0004-0xFFFF
        // 16-bit unsigned big-endian integer denoting the length of the types section content
        let (input, types_size) = consume_u16(input)?;
        header.types_size = types_size;

        // Each types entry is four bytes, one entry per code section.
        if types_size < TYPES_SECTION_ENTRY_SIZE as u16
            || types_size as usize % TYPES_SECTION_ENTRY_SIZE != 0
        {
            return Err(EofDecodeError::InvalidTypesSectionSize);
        }

        // `kind_code`	1 byte	0x02	kind marker for code size section
        let (input, kind_code) = consume_u8(input)?;
        if kind_code != KIND_CODE {
            return Err(EofDecodeError::InvalidCodeKind);
        }

        // `num_code_sections` and `code_sizes`
        let (input, sizes, sum) = consume_header_code_section(input)?;

        if sizes.len() != header.types_count() {
            return Err(EofDecodeError::MismatchCodeAndTypesSize);
        }

        header.code_sizes = sizes;
        header.sum_code_sizes = sum;

        // `kind_data`	1 byte	0x03	kind marker for data size section
        let (input, kind_data) = consume_u8(input)?;
        if kind_data != KIND_DATA {
            return Err(EofDecodeError::InvalidDataKind);
        }

        // `data_size`	2 bytes	0x0000-0xFFFF	16-bit unsigned big-endian integer
        // denoting the length of the data section content
        let (input, data_size) = consume_u16(input)?;
        header.data_size = data_size;

        // `terminator`	1 byte	0x00	marks the end of the EofHeader
        let (input, terminator) = consume_u8(input)?;
        if terminator != KIND_TERMINAL {
            return Err(EofDecodeError::InvalidTerminalByte);
        }

        Ok((header, input))
    }
}
