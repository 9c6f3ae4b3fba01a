//! Fixed-width values.

use std::fmt::{self, Debug};

use static_assertions::assert_impl_all;

use crate::utils::*;

/// Fixed-width bit vector.
///
/// Bit 0 is the least significant bit. The width is a runtime property, so a value of one width can be
/// carried by a component configured for any `DATA_WIDTH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bits {
    inner: Vec<bool>,
}

assert_impl_all!(Bits: Send, Sync);

impl Bits {
    /// Creates new bits from LSB-first booleans.
    pub fn new(inner: Vec<bool>) -> Self { Self { inner } }

    /// All-zero bits of the given width.
    pub fn zero(width: usize) -> Self { Self { inner: vec![false; width] } }

    /// Bits of an integer, truncated to `width`.
    pub fn from_u64(width: usize, value: u64) -> Self { Self { inner: u64_to_bitvec(width, value) } }

    /// Bit width.
    pub fn width(&self) -> usize { self.inner.len() }

    /// Returns the bit at `index`.
    pub fn get(&self, index: usize) -> Option<bool> { self.inner.get(index).copied() }

    /// LSB-first booleans.
    pub fn as_slice(&self) -> &[bool] { &self.inner }

    /// Integer value, if it fits in `u64`.
    pub fn to_u64(&self) -> Option<u64> { bitvec_to_u64(&self.inner) }

    /// Resizes to `width` bits, dropping upper bits or zero-extending.
    #[must_use]
    pub fn resize(mut self, width: usize) -> Self {
        self.inner.resize(width, false);
        self
    }
}

impl From<Vec<bool>> for Bits {
    fn from(inner: Vec<bool>) -> Self { Self::new(inner) }
}

impl<const N: usize> From<[bool; N]> for Bits {
    fn from(inner: [bool; N]) -> Self { Self::new(inner.to_vec()) }
}

impl FromIterator<bool> for Bits {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self { Self::new(iter.into_iter().collect()) }
}

/// Verilog literal, e.g. `32'h2a`.
impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self
            .inner
            .chunks(4)
            .rev()
            .map(|nibble| nibble.iter().rev().fold(0u32, |acc, bit| (acc << 1) | u32::from(*bit)))
            .skip_while(|digit| *digit == 0)
            .map(|digit| char::from_digit(digit, 16).unwrap_or('x'))
            .collect::<String>();
        let digits = if digits.is_empty() { "0".to_string() } else { digits };
        write!(f, "{}'h{}", self.width(), digits)
    }
}

/// Bit-representable values.
///
/// Typed payloads travel through components as [`Bits`] of width `Self::WIDTH`, produced by `transl` and
/// restored by `from_transl`.
pub trait Signal: 'static + Debug + Clone {
    /// Signal's bit width.
    const WIDTH: usize;

    /// LSB-first bit representation, exactly `Self::WIDTH` long.
    fn transl(self) -> Vec<bool>;

    /// Restores a value from its bit representation.
    ///
    /// Returns `None` if `bits` is not `Self::WIDTH` long or does not encode a value of this type.
    fn from_transl(bits: &[bool]) -> Option<Self>;

    /// Converts into bits.
    fn into_bits(self) -> Bits { Bits::new(self.transl()) }

    /// Restores a value from bits.
    fn from_bits(bits: &Bits) -> Option<Self> { Self::from_transl(bits.as_slice()) }
}

impl Signal for () {
    const WIDTH: usize = 0;

    fn transl(self) -> Vec<bool> { vec![] }

    fn from_transl(bits: &[bool]) -> Option<Self> { bits.is_empty().then_some(()) }
}

impl Signal for bool {
    const WIDTH: usize = 1;

    fn transl(self) -> Vec<bool> { vec![self] }

    fn from_transl(bits: &[bool]) -> Option<Self> {
        match bits {
            [bit] => Some(*bit),
            _ => None,
        }
    }
}

macro_rules! impl_signal {
    ($typ:ty) => {
        impl Signal for $typ {
            const WIDTH: usize = ::std::mem::size_of::<$typ>() * 8;

            fn transl(self) -> Vec<bool> { (0..Self::WIDTH).map(|i| (self >> i) & 1 == 1).collect() }

            fn from_transl(bits: &[bool]) -> Option<Self> {
                if bits.len() != Self::WIDTH {
                    return None;
                }
                Some(bits.iter().rev().fold(<$typ>::MIN, |acc, bit| (acc << 1) | <$typ>::from(*bit)))
            }
        }
    };
}

impl_signal!(u8);
impl_signal!(u16);
impl_signal!(u32);
impl_signal!(u64);
impl_signal!(u128);
impl_signal!(usize);

macro_rules! impl_signal_tuple {
    ($($a:ident $idx:tt)+) => {
        impl<$($a: Signal,)+> Signal for ($($a,)+) {
            const WIDTH: usize = 0 $(+ <$a as Signal>::WIDTH)+;

            fn transl(self) -> Vec<bool> { ::std::iter::empty()$(.chain(self.$idx.transl()))+.collect() }

            #[allow(unused_assignments)]
            fn from_transl(bits: &[bool]) -> Option<Self> {
                if bits.len() != Self::WIDTH {
                    return None;
                }
                let mut offset = 0;
                Some(($({
                    let member = <$a as Signal>::from_transl(&bits[offset..offset + <$a as Signal>::WIDTH])?;
                    offset += <$a as Signal>::WIDTH;
                    member
                },)+))
            }
        }
    };
}

impl_signal_tuple! { V1 0 }
impl_signal_tuple! { V1 0 V2 1 }
impl_signal_tuple! { V1 0 V2 1 V3 2 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 }
impl_signal_tuple! { V1 0 V2 1 V3 2 V4 3 V5 4 V6 5 }
