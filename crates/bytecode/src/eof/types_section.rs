use super::{
    decode_helpers::{consume_u16, consume_u8},
    EofDecodeError,
};
use primitives::{MAX_STACK_HEIGHT, MAX_TYPE_IO};
use std::vec::Vec;

/// Size of one types section entry on the wire.
pub const TYPES_SECTION_ENTRY_SIZE: usize = 4;

/// Types section entry describing the stack contract of one code section.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypesSection {
    /// `inputs` - 1 byte - `0x00-0x7F`
    ///
    /// Number of stack elements the code section consumes
    pub inputs: u8,
    /// `outputs` - 1 byte - `0x00-0x7F`
    ///
    /// Number of stack elements the code section returns
    pub outputs: u8,
    /// `max_stack_height` - 2 bytes - `0x0000-0x03FF`
    ///
    /// Maximum number of elements ever placed onto the stack by the code section
    pub max_stack_height: u16,
}

impl TypesSection {
    /// Returns a new instance with the given inputs, outputs and max stack height.
    pub fn new(inputs: u8, outputs: u8, max_stack_height: u16) -> Self {
        Self {
            inputs,
            outputs,
            max_stack_height,
        }
    }

    /// Calculates the difference between the number of input and output stack elements.
    #[inline]
    pub const fn io_diff(&self) -> i32 {
        self.outputs as i32 - self.inputs as i32
    }

    /// Encodes the entry into the buffer.
    #[inline]
    pub fn encode(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.inputs);
        buffer.push(self.outputs);
        buffer.extend_from_slice(&self.max_stack_height.to_be_bytes());
    }

    /// Decodes one entry from the input.
    #[inline]
    pub fn decode(input: &[u8]) -> Result<(Self, &[u8]), EofDecodeError> {
        let (input, inputs) = consume_u8(input)?;
        let (input, outputs) = consume_u8(input)?;
        let (input, max_stack_height) = consume_u16(input)?;
        let section = Self {
            inputs,
            outputs,
            max_stack_height,
        };
        section.validate()?;
        Ok((section, input))
    }

    /// Validates the entry against the format bounds.
    pub fn validate(&self) -> Result<(), EofDecodeError> {
        if self.inputs > MAX_TYPE_IO {
            return Err(EofDecodeError::InvalidTypesSectionInputs { value: self.inputs });
        }
        if self.outputs > MAX_TYPE_IO {
            return Err(EofDecodeError::InvalidTypesSectionOutputs {
                value: self.outputs,
            });
        }
        if self.max_stack_height > MAX_STACK_HEIGHT {
            return Err(EofDecodeError::InvalidMaxStackHeight {
                value: self.max_stack_height,
            });
        }
        Ok(())
    }
}
