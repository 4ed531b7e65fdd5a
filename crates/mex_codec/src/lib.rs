//! Small byte codecs shared by the MEX container crates.
//!
//! # Base64
//!
//! [`base64::encode`] produces the standard RFC 4648 alphabet (`A-Z a-z 0-9 + /`) padded with `=` to a
//! multiple of four characters. There is no line wrapping and no URL-safe variant.
//!
//! [`base64::decode`] is lenient: it stops at the first character outside the alphabet
//! (padding included) and returns whatever was decoded up to that point. Malformed input never produces
//! an error, only a shorter result.
//!
//! # Hashing
//!
//! | Function                 | Algorithm                                     | Empty input |
//! |--------------------------|-----------------------------------------------|-------------|
//! | [`hash::crc32`]          | CRC-32/ISO-HDLC (poly `0xEDB88320`, reflected) | `0`         |
//! | [`hash::xxhash32`]       | XXH32 with seed `0`                           | `0`         |
//!
//! Both digests map zero-length input to `0`, which the identifier types treat as "empty / invalid".
//! For XXH32 this differs from the reference implementation, where the empty digest is `0x02CC5D05`.
//!

pub mod base64;
pub mod hash;

pub use hash::{crc32, crc32_str, xxhash32, xxhash32_str, Crc32Stream};
