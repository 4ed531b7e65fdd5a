//! Little-endian encoding of primitive values.
//!
//! Every multi-byte value in the container format is stored little-endian with no alignment padding.
//! [`LeValue`] is the single place where that layout is defined, so the read and write sides can not
//! drift apart.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

/// A primitive with a fixed little-endian byte layout.
pub trait LeValue: Copy + Default {
    /// Number of bytes occupied on disk
    const SIZE: usize;

    /// Decode from the first [`LeValue::SIZE`] bytes of `bytes`.
    ///
    /// Returns `None` when fewer than [`LeValue::SIZE`] bytes are available.
    fn decode_le(bytes: &[u8]) -> Option<Self>;

    /// Append exactly [`LeValue::SIZE`] bytes to `out`.
    fn encode_le(self, out: &mut Vec<u8>);
}

impl LeValue for u8 {
    const SIZE: usize = 1;

    fn decode_le(mut bytes: &[u8]) -> Option<Self> {
        bytes.read_u8().ok()
    }

    fn encode_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl LeValue for i8 {
    const SIZE: usize = 1;

    fn decode_le(mut bytes: &[u8]) -> Option<Self> {
        bytes.read_i8().ok()
    }

    fn encode_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }
}

/// Stored as a single byte, any non-zero value reads back as `true`.
impl LeValue for bool {
    const SIZE: usize = 1;

    fn decode_le(mut bytes: &[u8]) -> Option<Self> {
        bytes.read_u8().ok().map(|b| b != 0)
    }

    fn encode_le(self, out: &mut Vec<u8>) {
        out.push(u8::from(self));
    }
}

macro_rules! impl_le_value {
    ($($ty:ty => $read:ident, $write:ident;)*) => {
        $(
            impl LeValue for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn decode_le(mut bytes: &[u8]) -> Option<Self> {
                    bytes.$read::<LittleEndian>().ok()
                }

                fn encode_le(self, out: &mut Vec<u8>) {
                    let start = out.len();
                    out.resize(start + Self::SIZE, 0);
                    LittleEndian::$write(&mut out[start..], self);
                }
            }
        )*
    };
}

impl_le_value! {
    u16 => read_u16, write_u16;
    i16 => read_i16, write_i16;
    u32 => read_u32, write_u32;
    i32 => read_i32, write_i32;
    u64 => read_u64, write_u64;
    i64 => read_i64, write_i64;
    f32 => read_f32, write_f32;
    f64 => read_f64, write_f64;
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::LeValue;

    fn encoded<T: LeValue>(value: T) -> Vec<u8> {
        let mut out = Vec::new();
        value.encode_le(&mut out);
        out
    }

    #[test]
    fn sizes() {
        assert_eq!(<u8 as LeValue>::SIZE, 1);
        assert_eq!(<bool as LeValue>::SIZE, 1);
        assert_eq!(<i16 as LeValue>::SIZE, 2);
        assert_eq!(<u32 as LeValue>::SIZE, 4);
        assert_eq!(<f32 as LeValue>::SIZE, 4);
        assert_eq!(<i64 as LeValue>::SIZE, 8);
        assert_eq!(<f64 as LeValue>::SIZE, 8);
    }

    #[test]
    fn encode_layout() {
        assert_eq!(encoded(0x12345678u32), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(encoded(-2i16), [0xFE, 0xFF]);
        assert_eq!(encoded(0x0102030405060708u64), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(encoded(1.0f32), [0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(encoded(true), [0x01]);
        assert_eq!(encoded(-1i8), [0xFF]);
    }

    #[test]
    fn encode_appends() {
        let mut out = vec![0xAA];
        7u16.encode_le(&mut out);
        assert_eq!(out, [0xAA, 0x07, 0x00]);
    }

    #[test]
    fn decode_layout() {
        assert_eq!(u32::decode_le(&[0x78, 0x56, 0x34, 0x12]), Some(0x12345678));
        assert_eq!(i32::decode_le(&[0xFF, 0xFF, 0xFF, 0xFF]), Some(-1));
        assert_eq!(f64::decode_le(&encoded(-0.5f64)), Some(-0.5));
        assert_eq!(u16::decode_le(&[0x01, 0x02, 0x03]), Some(0x0201));
    }

    #[test]
    fn decode_bool_accepts_any_non_zero() {
        assert_eq!(bool::decode_le(&[0x00]), Some(false));
        assert_eq!(bool::decode_le(&[0x01]), Some(true));
        assert_eq!(bool::decode_le(&[0x7F]), Some(true));
    }

    #[test]
    fn decode_short_input() {
        assert_eq!(u32::decode_le(&[0x01, 0x02, 0x03]), None);
        assert_eq!(u8::decode_le(&[]), None);
        assert_eq!(f64::decode_le(&[0; 7]), None);
    }
}
