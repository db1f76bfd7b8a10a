use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A type whose values can be rendered as byte strings whose
/// lexicographic order matches the type's natural order.
///
/// The tree sorts leaves by these bytes. Unsigned integers map to their
/// big-endian encoding, signed integers additionally flip the sign bit,
/// and string or byte-vector types are used as-is.
pub trait KeyBytes {
    /// Container holding the rendered bytes; borrows from `self` for
    /// types that already store their bytes.
    type Bytes<'a>: AsRef<[u8]>
    where
        Self: 'a;

    /// Renders the value as an ordered byte string.
    fn key_bytes(&self) -> Self::Bytes<'_>;
}

macro_rules! unsigned_key_bytes {
    ($($t:ty),*) => {$(
        impl KeyBytes for $t {
            type Bytes<'a> = [u8; std::mem::size_of::<$t>()];

            fn key_bytes(&self) -> Self::Bytes<'static> {
                self.to_be_bytes()
            }
        }
    )*};
}

macro_rules! signed_key_bytes {
    ($($t:ty),*) => {$(
        impl KeyBytes for $t {
            type Bytes<'a> = [u8; std::mem::size_of::<$t>()];

            fn key_bytes(&self) -> Self::Bytes<'static> {
                (self ^ (1 << (<$t>::BITS - 1))).to_be_bytes()
            }
        }
    )*};
}

unsigned_key_bytes!(u8, u16, u32, u64, u128);
signed_key_bytes!(i8, i16, i32, i64, i128);

macro_rules! borrowed_key_bytes {
    ($($t:ty => |$v:ident| $body:expr),* $(,)?) => {$(
        impl KeyBytes for $t {
            type Bytes<'a> = &'a [u8] where Self: 'a;

            fn key_bytes(&self) -> Self::Bytes<'_> {
                let $v = self;
                $body
            }
        }
    )*};
}

borrowed_key_bytes! {
    String => |v| v.as_bytes(),
    str => |v| v.as_bytes(),
    &str => |v| v.as_bytes(),
    Rc<str> => |v| v.as_bytes(),
    Arc<str> => |v| v.as_bytes(),
    Vec<u8> => |v| v.as_slice(),
    [u8] => |v| v,
    &[u8] => |v| v,
    Box<[u8]> => |v| v,
    Cow<'_, [u8]> => |v| v.as_ref(),
}

#[cfg(test)]
mod tests {
    use super::KeyBytes;

    fn ordered<K: KeyBytes>(items: &[K]) -> bool {
        items.windows(2).all(|w| {
            let a = w[0].key_bytes();
            let b = w[1].key_bytes();
            a.as_ref() < b.as_ref()
        })
    }

    #[test]
    fn unsigned_order_is_preserved() {
        assert!(ordered(&[0u32, 1, 255, 256, 65535, 65536, u32::MAX]));
        assert!(ordered(&[0u8, 1, 127, 128, 255]));
    }

    #[test]
    fn signed_order_is_preserved() {
        assert!(ordered(&[i32::MIN, -65536, -1, 0, 1, 65536, i32::MAX]));
        assert!(ordered(&[i8::MIN, -1, 0, 1, i8::MAX]));
    }

    #[test]
    fn strings_render_verbatim() {
        assert_eq!("abc".key_bytes(), b"abc");
        assert_eq!(vec![0u8, 1, 2].key_bytes(), &[0, 1, 2]);
    }
}
