//! Little-endian serialization for fixed-layout RIFF structures.
//!
//! [`WriteBytesLe`] is implemented for the primitive widths a WAVE header
//! uses, for arrays and vectors of them, and via `#[derive(ToBytes)]` for
//! structs whose fields are all serializable.

pub trait WriteBytesLe {
    fn write_le(&self, dst: &mut Vec<u8>);
}

macro_rules! impl_num_le {
    ($($t:ty),+) => { $(
        impl WriteBytesLe for $t { #[inline] fn write_le(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_le_bytes()); }}
    )+ }
}

impl_num_le!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl<T: WriteBytesLe> WriteBytesLe for Vec<T> {
    #[inline]
    fn write_le(&self, dst: &mut Vec<u8>) {
        self.iter().for_each(|item| item.write_le(dst));
    }
}

impl<T: WriteBytesLe, const N: usize> WriteBytesLe for [T; N] {
    #[inline]
    fn write_le(&self, dst: &mut Vec<u8>) {
        self.iter().for_each(|item| item.write_le(dst));
    }
}

impl<T: WriteBytesLe> WriteBytesLe for [T] {
    #[inline]
    fn write_le(&self, dst: &mut Vec<u8>) {
        self.iter().for_each(|item| item.write_le(dst));
    }
}

/// Concatenates the little-endian encoding of each argument.
///
/// ```
/// use audiokit::join_bytes_le;
///
/// let bytes = join_bytes_le!(*b"data", 4u32, 1i16, -1i16);
/// assert_eq!(bytes, [b'd', b'a', b't', b'a', 4, 0, 0, 0, 1, 0, 0xFF, 0xFF]);
/// ```
#[macro_export]
macro_rules! join_bytes_le {
    ( $($value:expr),+ $(,)? ) => {{
        let mut vec = Vec::<u8>::new();
        $( $crate::byteorder::WriteBytesLe::write_le(&$value, &mut vec); )+
        vec
    }};
}

#[cfg(test)]
mod tests {
    use crate::byteorder::WriteBytesLe;
    use audiokit_macros::ToBytes;

    #[derive(ToBytes)]
    struct Mini {
        a: u16,
        b: u32,
        tag: [u8; 4],
    }

    #[test]
    fn derived_struct_writes_fields_in_order() {
        let s = Mini {
            a: 0x1234,
            b: 0xABCDEF01,
            tag: *b"TEST",
        };

        let mut vec_le = Vec::new();
        s.write_le(&mut vec_le);

        let expected_le = [0x34, 0x12, 0x01, 0xEF, 0xCD, 0xAB, b'T', b'E', b'S', b'T'];
        assert_eq!(&vec_le[..], &expected_le);
    }

    #[test]
    fn join_mixes_widths() {
        let bytes = join_bytes_le!(1u8, -2i16, 0x0102_0304u32, vec![7u8, 8u8]);
        assert_eq!(bytes, [1, 0xFE, 0xFF, 0x04, 0x03, 0x02, 0x01, 7, 8]);
    }
}
