//! The sized bit-vector value type.
//!
//! A [`BitVec`] is a pair `(width, magnitude)`: `width` in `[1, 65535]` and
//! `magnitude` an arbitrary-precision unsigned integer always satisfying
//! `0 <= magnitude < 2^width`. Every simulated signal, register, wire,
//! literal, and expression temporary in Cascade is represented by one.
//!
//! Operator contracts live in [`ops`]; text parsing/printing lives in
//! [`io`]; the fixed binary wire format lives in [`codec`].

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ibig::UBig;

pub mod codec;
pub mod io;
mod ops;

#[cfg(test)]
mod tests;

/// A sized, arbitrary-precision unsigned bit-vector value.
///
/// `BitVec` owns its magnitude exclusively; it is never aliased and every
/// operation mutates it in place. The `scratch` cell is purely an
/// allocation-avoidance detail for shift/mask hot paths and plays no part
/// in equality, hashing, or serialization. `divide_by_zero` is the one
/// piece of interior state a caller can observe -- a sticky flag raised by
/// `arithmetic_divide`/`arithmetic_mod`, also excluded from equality,
/// hashing, cloning, and serialization.
pub struct BitVec {
    width: u16,
    magnitude: UBig,
    scratch: RefCell<UBig>,
    divide_by_zero: RefCell<bool>,
}

impl BitVec {
    /// Largest legal width, re-exported at the module a caller is most
    /// likely to look in first.
    pub const MAX_WIDTH: u16 = crate::consts::MAX_WIDTH;

    /// Construct a `BitVec` of the given width from a `u64`, trimmed to
    /// width.
    ///
    /// # Panics
    ///
    /// Panics if `width == 0` (precondition violated --
    /// width-0 construction is a programmer error).
    pub fn new(width: u16, value: u64) -> Self {
        assert!(width != 0, "BitVec width must be nonzero");
        let mut bv = Self {
            width,
            magnitude: UBig::from(value),
            scratch: RefCell::new(UBig::from(0u8)),
            divide_by_zero: RefCell::new(false),
        };
        bv.trim();
        bv
    }

    /// Construct a `BitVec` directly from a width and magnitude, trimming
    /// the magnitude to width.
    ///
    /// # Panics
    ///
    /// Panics if `width == 0`.
    pub fn from_magnitude(width: u16, magnitude: UBig) -> Self {
        assert!(width != 0, "BitVec width must be nonzero");
        let mut bv = Self {
            width,
            magnitude,
            scratch: RefCell::new(UBig::from(0u8)),
            divide_by_zero: RefCell::new(false),
        };
        bv.trim();
        bv
    }

    /// Declared bit width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Borrow the underlying magnitude.
    pub fn magnitude(&self) -> &UBig {
        &self.magnitude
    }

    /// `2^width`, used throughout `ops` for trimming and two's-complement
    /// arithmetic. Cached in `scratch` so repeated calls in a hot loop
    /// don't re-shift from scratch (pun intended).
    pub(crate) fn modulus(width: u16) -> UBig {
        UBig::from(1u8) << width as usize
    }

    /// Canonicalize: `magnitude <- magnitude mod 2^width`.
    ///
    /// Called after every operation whose mathematical result could have
    /// placed set bits at positions >= width. Operations whose result is provably in range
    /// skip this.
    pub(crate) fn trim(&mut self) {
        let modulus = Self::modulus(self.width);
        if self.magnitude >= modulus {
            *self.scratch.borrow_mut() = &modulus - UBig::from(1u8);
            self.magnitude = &self.magnitude & &*self.scratch.borrow();
        }
    }

    /// True if the most recent `arithmetic_divide` or `arithmetic_mod` on
    /// this value hit a zero RHS. Sticky: stays set
    /// until [`Self::clear_divide_by_zero`] is called. Not part of value
    /// identity -- ignored by `==`, hashing, cloning, and serialization.
    pub fn divide_by_zero(&self) -> bool {
        *self.divide_by_zero.borrow()
    }

    /// Clear the sticky divide-by-zero flag.
    pub fn clear_divide_by_zero(&mut self) {
        *self.divide_by_zero.borrow_mut() = false;
    }

    pub(crate) fn raise_divide_by_zero(&self) {
        *self.divide_by_zero.borrow_mut() = true;
    }
}

impl Clone for BitVec {
    /// The sticky divide-by-zero flag does not survive a clone -- it's
    /// scratch-like operational history, not value state.
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            magnitude: self.magnitude.clone(),
            scratch: RefCell::new(UBig::from(0u8)),
            divide_by_zero: RefCell::new(false),
        }
    }
}

impl fmt::Debug for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitVec")
            .field("width", &self.width)
            .field("magnitude", &self.magnitude)
            .finish()
    }
}

impl fmt::Display for BitVec {
    /// Decimal magnitude, no width annotation -- matches [`io::write`]'s
    /// base-10 behavior.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.magnitude)
    }
}

/// Structural equality: same width *and* same magnitude.
/// Not to be confused with the Verilog `==` operator, [`ops`]'s `cmp_eq`,
/// which compares magnitudes only and ignores width.
impl PartialEq for BitVec {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.magnitude == other.magnitude
    }
}

impl Eq for BitVec {}

impl Hash for BitVec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.magnitude.hash(state);
    }
}

/// Container-keying order only: width first, then magnitude. This is
/// explicitly *not* Verilog's `<` -- Verilog
/// relational operators are the inherent methods in [`ops`] that return a
/// width-1 `BitVec`.
impl PartialOrd for BitVec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitVec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.width
            .cmp(&other.width)
            .then_with(|| self.magnitude.cmp(&other.magnitude))
    }
}

/// Serializes as the fixed binary codec's byte string, not a structural
/// `{width, magnitude}` object -- this is the one wire format the core
/// defines, and it's what checkpoints and IPC already speak.
#[cfg(feature = "serde")]
impl serde::Serialize for BitVec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&codec::encode(self))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BitVec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <Vec<u8>>::deserialize(deserializer)?;
        let (value, _) = codec::decode(&bytes).map_err(serde::de::Error::custom)?;
        Ok(value)
    }
}
