//! Protocol limits for the EOF v1 container format.

/// Maximum number of code sections one container may declare.
///
/// The header stores the section count as a 16-bit integer, but EIP-4750
/// caps the function table at 1024 entries.
pub const MAX_CODE_SECTIONS: usize = 1024;

/// Maximum `max_stack_height` a type-section entry may declare.
pub const MAX_STACK_HEIGHT: u16 = 0x03FF;

/// Maximum stack elements a code section may consume or return.
///
/// `inputs` and `outputs` are single bytes with the high bit reserved.
pub const MAX_TYPE_IO: u8 = 0x7F;
