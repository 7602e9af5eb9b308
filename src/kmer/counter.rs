use num_traits::{PrimInt, Unsigned};
use std::fmt::{Debug, Display};

/// An unsigned accumulator of configurable width.
///
/// Every increment and every merge in the crate goes through a saturating
/// add, so a counter that reaches its maximum value stays there instead of
/// wrapping. The saturation value is `Self::max_value()`.
pub trait Counter: PrimInt + Unsigned + Default + Display + Debug + 'static {
    /// Bytes occupied by the serialized counter in the store.
    const WIDTH: usize;

    fn write_le(self, out: &mut Vec<u8>);
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_counter {
    ($($ty:ty),*) => {$(
        impl Counter for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(&bytes[..std::mem::size_of::<$ty>()]);
                <$ty>::from_le_bytes(buf)
            }
        }
    )*};
}

impl_counter!(u8, u16, u32, u64);
