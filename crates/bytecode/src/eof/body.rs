use super::{Eof, EofDecodeError, EofHeader, TypesSection};
use primitives::Bytes;
use std::vec::Vec;

/// EOF container body.
///
/// Contains types, code and data sections.
///
/// Can be used to create a new EOF container using the
/// [`into_eof`](EofBody::into_eof) method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EofBody {
    /// Stack contracts of the code sections
    pub types_section: Vec<TypesSection>,
    /// Index of the end of each code section within `code`
    pub code_section: Vec<usize>,
    /// All code sections, concatenated
    pub code: Bytes,
    /// Data section bytes, opaque to validation
    pub data_section: Bytes,
}

impl EofBody {
    /// Returns the code section at the given index.
    pub fn code(&self, index: usize) -> Option<Bytes> {
        if index == 0 {
            // There should be at least one code section.
            return Some(self.code.slice(..self.code_section[0]));
        }
        self.code_section
            .get(index)
            .map(|end| self.code.slice(self.code_section[index - 1]..*end))
    }

    /// Iterates the code sections as slices of the shared code bytes.
    ///
    /// Section boundaries are assumed consistent with `code`, as produced by
    /// [`decode`](EofBody::decode) and [`into_eof`](EofBody::into_eof).
    pub fn code_sections(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let code: &[u8] = &self.code;
        let mut start = 0;
        self.code_section.iter().map(move |end| {
            let section = &code[start..*end];
            start = *end;
            section
        })
    }

    /// Creates an EOF container from this body.
    pub fn into_eof(self) -> Eof {
        let mut prev_value = 0;
        let header = EofHeader {
            types_size: (self.types_section.len() * 4) as u16,
            code_sizes: self
                .code_section
                .iter()
                .map(|x| {
                    let ret = (x - prev_value) as u16;
                    prev_value = *x;
                    ret
                })
                .collect(),
            data_size: self.data_section.len() as u16,
            sum_code_sizes: self.code.len(),
        };
        let mut buffer = Vec::with_capacity(header.eof_size());
        header.encode(&mut buffer);
        self.encode(&mut buffer);
        Eof {
            header,
            body: self,
            raw: buffer.into(),
        }
    }

    /// Encodes this body into the given buffer.
    pub fn encode(&self, buffer: &mut Vec<u8>) {
        for types_section in &self.types_section {
            types_section.encode(buffer);
        }

        buffer.extend_from_slice(&self.code);

        buffer.extend_from_slice(&self.data_section);
    }

    /// Decodes an EOF container body from the given buffer and header.
    ///
    /// The declared body length must match the actual remainder exactly.
    pub fn decode(input: &Bytes, header: &EofHeader) -> Result<Self, EofDecodeError> {
        let header_len = header.size();
        let body_len = header.body_size();

        if input.len() < header_len + body_len {
            return Err(EofDecodeError::MissingInput);
        }

        if input.len() > header_len + body_len {
            return Err(EofDecodeError::DanglingData);
        }

        let mut body = EofBody::default();

        let mut types_input = &input[header_len..];
        for _ in 0..header.types_count() {
            let (types_section, local_input) = TypesSection::decode(types_input)?;
            types_input = local_input;
            body.types_section.push(types_section);
        }

        // Extract code sections.
        let start = header_len + header.types_size as usize;
        let mut code_end = 0;
        for size in header.code_sizes.iter().map(|x| *x as usize) {
            code_end += size;
            body.code_section.push(code_end);
        }
        body.code = input.slice(start..start + header.sum_code_sizes);

        body.data_section = input.slice(start + header.sum_code_sizes..);

        Ok(body)
    }
}
