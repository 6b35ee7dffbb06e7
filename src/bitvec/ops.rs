//! Verilog operator semantics for [`BitVec`].
//!
//! Every operation here mutates the receiver in place and returns
//! `&mut Self`, matching the contract table: binary word-valued ops produce
//! width `max(w_a, w_b)`; boolean-valued ops (logical, comparison,
//! reduction) collapse the receiver to width 1; shifts keep the left
//! operand's width; `concat` produces `w_a + w_b`; slices produce
//! `msb - lsb + 1`; `**` keeps `w_a`. The handful of methods that return a
//! plain value instead of `&mut Self` (`read_word`, `to_bool`, `to_int`,
//! `eq_bit`, `eq_range`) are queries, not operators, and leave the receiver
//! untouched.

use ibig::UBig;

use super::BitVec;

/// `2^bits` as a fresh [`UBig`]. Used throughout for trim masks and
/// two's-complement arithmetic; not cached beyond a single call since most
/// call sites only need it once.
fn pow2(bits: usize) -> UBig {
    UBig::from(1u8) << bits
}

/// `base^exp` by repeated squaring. `ibig::UBig` has no built-in `pow`
/// that accepts an arbitrary-width exponent register value, so `**`
/// is implemented directly against the primitives the
/// magnitude type is guaranteed to offer (multiply, shift).
fn ubig_pow(base: &UBig, mut exp: u64) -> UBig {
    let mut result = UBig::from(1u8);
    let mut b = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &b;
        }
        b = &b * &b;
        exp >>= 1;
    }
    result
}

/// Population count of a magnitude, computed byte-wise since `ibig`
/// doesn't expose a direct popcount for arbitrary-width `UBig`.
fn popcount(m: &UBig) -> u32 {
    let mut n = m.clone();
    let byte_mask = UBig::from(0xFFu32);
    let zero = UBig::from(0u8);
    let mut count = 0u32;
    while n != zero {
        let byte = &n & &byte_mask;
        let byte: u8 = u8::try_from(&byte).expect("masked by 0xFF");
        count += byte.count_ones();
        n = n >> 8usize;
    }
    count
}

/// Types `BitVec::read_word`/`write_word` can address a window as.
pub trait WordInt: Copy {
    /// Size of the window, in bytes.
    const BYTES: usize;
    /// Widen to `u64` for windowed extraction.
    fn from_u64(v: u64) -> Self;
    /// Narrow from the windowed `u64` accumulator.
    fn to_u64(self) -> u64;
}

macro_rules! impl_word_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl WordInt for $t {
                const BYTES: usize = std::mem::size_of::<$t>();

                fn from_u64(v: u64) -> Self {
                    v as $t
                }

                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_word_int!(u8, u16, u32, u64);

impl BitVec {
    fn bit_at(&self, i: u16) -> bool {
        ((self.magnitude() >> i as usize) & UBig::from(1u8)) == UBig::from(1u8)
    }

    fn set_bit(&mut self, i: u16, bit: bool) {
        let mask = UBig::from(1u8) << i as usize;
        let current = self.magnitude() & &mask;
        let cleared = self.magnitude() - &current;
        self.magnitude = if bit { cleared | mask } else { cleared };
    }

    fn binary_width(&self, other: &BitVec) -> u16 {
        self.width.max(other.width)
    }

    /// Collapse the receiver to a width-1 boolean result, the shape every
    /// reduction, comparison, and logical operator produces.
    fn set_bool_result(&mut self, value: bool) -> &mut Self {
        self.width = 1;
        self.magnitude = UBig::from(value as u8);
        self
    }

    // ---- Bitwise ----------------------------------------------------

    /// Pointwise AND; width = max. Result is provably `< 2^w`, so no trim.
    pub fn bitwise_and(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = self.magnitude() & other.magnitude();
        self
    }

    /// Pointwise OR; width = max. Provably in range: no trim.
    pub fn bitwise_or(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = self.magnitude() | other.magnitude();
        self
    }

    /// Pointwise XOR; width = max. Provably in range: no trim.
    pub fn bitwise_xor(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = self.magnitude() ^ other.magnitude();
        self
    }

    /// `NOT(XOR)`; width = max.
    pub fn bitwise_xnor(&mut self, other: &BitVec) -> &mut Self {
        let w = self.binary_width(other);
        let xor = self.magnitude() ^ other.magnitude();
        *self.scratch.borrow_mut() = &pow2(w as usize) - UBig::from(1u8);
        self.magnitude = &*self.scratch.borrow() - &xor;
        self.width = w;
        self
    }

    /// `(2^w - 1) - m`; width unchanged.
    pub fn bitwise_not(&mut self) -> &mut Self {
        *self.scratch.borrow_mut() = &pow2(self.width as usize) - UBig::from(1u8);
        self.magnitude = &*self.scratch.borrow() - &self.magnitude;
        self
    }

    /// Logical/arithmetic left shift. Bits shifted past `w - 1` are
    /// dropped; width unchanged. `SLL` and `SAL` share this behavior since
    /// there is no sign-dependent case on the left.
    pub fn shift_left(&mut self, amount: &BitVec) -> &mut Self {
        let k = amount.to_int();
        if k >= self.width as u64 {
            self.magnitude = UBig::from(0u8);
            return self;
        }
        self.magnitude = &self.magnitude << k as usize;
        self.trim();
        self
    }

    /// Logical right shift (`SLR`): zero-fill from the top.
    pub fn shift_right_logical(&mut self, amount: &BitVec) -> &mut Self {
        let k = amount.to_int();
        if k >= self.width as u64 {
            self.magnitude = UBig::from(0u8);
            return self;
        }
        self.magnitude = &self.magnitude >> k as usize;
        self
    }

    /// Arithmetic right shift (`SAR`): divide, then sign-extend from the
    /// original MSB
    pub fn shift_right_arithmetic(&mut self, amount: &BitVec) -> &mut Self {
        let w = self.width;
        let sign = self.bit_at(w - 1);
        let k = amount.to_int();

        if k >= w as u64 {
            self.magnitude = if sign {
                *self.scratch.borrow_mut() = &pow2(w as usize) - UBig::from(1u8);
                self.scratch.borrow().clone()
            } else {
                UBig::from(0u8)
            };
            return self;
        }

        let k = k as u16;
        self.magnitude = &self.magnitude >> k as usize;
        if sign && k > 0 {
            *self.scratch.borrow_mut() = &pow2(k as usize) - UBig::from(1u8);
            let mask = &*self.scratch.borrow() << (w - k) as usize;
            self.magnitude = &self.magnitude | &mask;
        }
        self
    }

    // ---- Arithmetic ---------------------------------------------------

    /// Unary `+`: identity.
    pub fn unary_plus(&mut self) -> &mut Self {
        self
    }

    /// Two's-complement negation within width `w`.
    pub fn unary_minus(&mut self) -> &mut Self {
        let zero = UBig::from(0u8);
        if self.magnitude != zero {
            let modulus = pow2(self.width as usize);
            self.magnitude = &modulus - &self.magnitude;
        }
        self
    }

    /// Integer add, truncated to `max(w)` bits.
    pub fn arithmetic_plus(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = self.magnitude() + other.magnitude();
        self.trim();
        self
    }

    /// Integer subtract, truncated to `max(w)` bits. Computed as addition
    /// of the two's complement to avoid an unsigned-underflow panic from
    /// the big-integer magnitude when `b > a`.
    pub fn arithmetic_minus(&mut self, other: &BitVec) -> &mut Self {
        let w = self.binary_width(other);
        *self.scratch.borrow_mut() = pow2(w as usize);
        let complement = &*self.scratch.borrow() - other.magnitude();
        self.width = w;
        self.magnitude = self.magnitude() + &complement;
        self.trim();
        self
    }

    /// Integer multiply, truncated to `max(w)` bits.
    pub fn arithmetic_mul(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = self.magnitude() * other.magnitude();
        self.trim();
        self
    }

    /// Truncated division toward zero. Divide-by-zero yields magnitude 0
    /// and raises the sticky [`BitVec::divide_by_zero`] flag rather than
    /// propagating an error (Verilog `x` is not modeled here).
    pub fn arithmetic_divide(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = if *other.magnitude() == UBig::from(0u8) {
            self.raise_divide_by_zero();
            tracing::warn!(width = self.width, "arithmetic_divide by zero");
            UBig::from(0u8)
        } else {
            self.magnitude() / other.magnitude()
        };
        self
    }

    /// Truncated modulo. Divide-by-zero yields magnitude 0 and raises the
    /// sticky flag, same as [`Self::arithmetic_divide`].
    pub fn arithmetic_mod(&mut self, other: &BitVec) -> &mut Self {
        self.width = self.binary_width(other);
        self.magnitude = if *other.magnitude() == UBig::from(0u8) {
            self.raise_divide_by_zero();
            tracing::warn!(width = self.width, "arithmetic_mod by zero");
            UBig::from(0u8)
        } else {
            self.magnitude() % other.magnitude()
        };
        self
    }

    /// `self^exponent`, truncated to `self`'s own width (not `max`).
    pub fn arithmetic_pow(&mut self, exponent: &BitVec) -> &mut Self {
        let exp = exponent.to_int();
        self.magnitude = ubig_pow(self.magnitude(), exp);
        self.trim();
        self
    }

    // ---- Logical --------------------------------------------------------
    //
    // Collapse the receiver to width 1, matching reductions and comparisons.

    /// `&&` over `to_bool()`; receiver collapses to width 1.
    pub fn logical_and(&mut self, other: &BitVec) -> &mut Self {
        let result = self.to_bool() && other.to_bool();
        self.set_bool_result(result)
    }

    /// `||` over `to_bool()`; receiver collapses to width 1.
    pub fn logical_or(&mut self, other: &BitVec) -> &mut Self {
        let result = self.to_bool() || other.to_bool();
        self.set_bool_result(result)
    }

    /// `!` over `to_bool()`; receiver collapses to width 1.
    pub fn logical_not(&mut self) -> &mut Self {
        let result = !self.to_bool();
        self.set_bool_result(result)
    }

    // ---- Comparison (Verilog `==`/`!=`/`<`/`<=`/`>`/`>=`) ----------------
    //
    // Unsigned magnitude compare; receiver collapses to width 1.
    // Deliberately distinct from `PartialEq`/`Ord` on `BitVec` itself,
    // which compare width too and exist only for container keying.

    /// Verilog `==`.
    pub fn cmp_eq(&mut self, other: &BitVec) -> &mut Self {
        let result = self.magnitude == other.magnitude;
        self.set_bool_result(result)
    }

    /// Verilog `!=`.
    pub fn cmp_ne(&mut self, other: &BitVec) -> &mut Self {
        let result = self.magnitude != other.magnitude;
        self.set_bool_result(result)
    }

    /// Verilog `<`.
    pub fn cmp_lt(&mut self, other: &BitVec) -> &mut Self {
        let result = self.magnitude < other.magnitude;
        self.set_bool_result(result)
    }

    /// Verilog `<=`.
    pub fn cmp_le(&mut self, other: &BitVec) -> &mut Self {
        let result = self.magnitude <= other.magnitude;
        self.set_bool_result(result)
    }

    /// Verilog `>`.
    pub fn cmp_gt(&mut self, other: &BitVec) -> &mut Self {
        let result = self.magnitude > other.magnitude;
        self.set_bool_result(result)
    }

    /// Verilog `>=`.
    pub fn cmp_ge(&mut self, other: &BitVec) -> &mut Self {
        let result = self.magnitude >= other.magnitude;
        self.set_bool_result(result)
    }

    // ---- Reduction --------------------------------------------------
    //
    // Receiver collapses to width 1.

    /// `popcount(m) == w`.
    pub fn reduce_and(&mut self) -> &mut Self {
        *self.scratch.borrow_mut() = &pow2(self.width as usize) - UBig::from(1u8);
        let result = self.magnitude == *self.scratch.borrow();
        self.set_bool_result(result)
    }

    /// Complement of [`Self::reduce_and`].
    pub fn reduce_nand(&mut self) -> &mut Self {
        self.reduce_and();
        let result = !self.to_bool();
        self.set_bool_result(result)
    }

    /// `m != 0`.
    pub fn reduce_or(&mut self) -> &mut Self {
        let result = self.magnitude != UBig::from(0u8);
        self.set_bool_result(result)
    }

    /// Complement of [`Self::reduce_or`].
    pub fn reduce_nor(&mut self) -> &mut Self {
        self.reduce_or();
        let result = !self.to_bool();
        self.set_bool_result(result)
    }

    /// Parity of `m` (LSB of popcount).
    pub fn reduce_xor(&mut self) -> &mut Self {
        let result = popcount(&self.magnitude) % 2 == 1;
        self.set_bool_result(result)
    }

    /// Complement of [`Self::reduce_xor`].
    pub fn reduce_xnor(&mut self) -> &mut Self {
        self.reduce_xor();
        let result = !self.to_bool();
        self.set_bool_result(result)
    }

    // ---- Structural -------------------------------------------------

    /// `m <- (m << w_b) | m_b`; `w <- w_a + w_b`.
    ///
    /// # Panics
    ///
    /// Panics if the combined width would exceed
    /// [`crate::consts::MAX_WIDTH`].
    pub fn concat(&mut self, other: &BitVec) -> &mut Self {
        let new_width = self.width as u32 + other.width as u32;
        assert!(
            new_width <= crate::consts::MAX_WIDTH as u32,
            "concat width {new_width} exceeds MAX_WIDTH"
        );
        self.magnitude = (self.magnitude() << other.width as usize) | other.magnitude();
        self.width = new_width as u16;
        self
    }

    /// Bit at position `i`; receiver collapses to width 1.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width`.
    pub fn slice_bit(&mut self, i: u16) -> &mut Self {
        assert!(i < self.width, "slice index {i} out of range for width {}", self.width);
        let result = self.bit_at(i);
        self.set_bool_result(result)
    }

    /// Bits `[lsb..=msb]` of `self`, without mutating the receiver. Shared
    /// by [`Self::slice_range`] (which collapses the receiver to this
    /// value) and [`Self::eq_range`] (which only needs to compare it).
    ///
    /// # Panics
    ///
    /// Panics if `msb >= width` or `msb < lsb`.
    fn sliced_range(&self, msb: u16, lsb: u16) -> BitVec {
        assert!(
            msb < self.width && msb >= lsb,
            "invalid slice [{msb}:{lsb}] for width {}",
            self.width
        );
        let result_width = msb - lsb + 1;
        let shifted = self.magnitude() >> lsb as usize;
        *self.scratch.borrow_mut() = &pow2(result_width as usize) - UBig::from(1u8);
        let masked = &shifted & &*self.scratch.borrow();
        BitVec::from_magnitude(result_width, masked)
    }

    /// Bits `[lsb..=msb]`; receiver collapses to width `msb - lsb + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `msb >= width` or `msb < lsb`.
    pub fn slice_range(&mut self, msb: u16, lsb: u16) -> &mut Self {
        let result = self.sliced_range(msb, lsb);
        self.width = result.width();
        self.magnitude = result.magnitude().clone();
        self
    }

    /// Flip bit `i` in place; width unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width`.
    pub fn flip(&mut self, i: u16) -> &mut Self {
        assert!(i < self.width, "flip index {i} out of range for width {}", self.width);
        let flipped = !self.bit_at(i);
        self.set_bit(i, flipped);
        self
    }

    /// Set bit `i` in place; width unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width`.
    pub fn set(&mut self, i: u16, bit: bool) -> &mut Self {
        assert!(i < self.width, "set index {i} out of range for width {}", self.width);
        self.set_bit(i, bit);
        self
    }

    /// Copy `rhs`'s magnitude, then canonicalize to the receiver's width.
    pub fn assign(&mut self, rhs: &BitVec) -> &mut Self {
        self.magnitude = rhs.magnitude.clone();
        self.trim();
        self
    }

    /// Assign bit `i` = `rhs[0]`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width`.
    pub fn assign_bit(&mut self, i: u16, rhs: &BitVec) -> &mut Self {
        assert!(i < self.width, "assign index {i} out of range for width {}", self.width);
        let bit = rhs.bit_at(0);
        self.set_bit(i, bit);
        self
    }

    /// Replace bit range `[lsb..=msb]` with the low `msb - lsb + 1` bits
    /// of `rhs`.
    ///
    /// # Panics
    ///
    /// Panics if `msb >= width` or `msb < lsb`.
    pub fn assign_range(&mut self, msb: u16, lsb: u16, rhs: &BitVec) -> &mut Self {
        assert!(
            msb < self.width && msb >= lsb,
            "invalid assign range [{msb}:{lsb}] for width {}",
            self.width
        );
        let window = msb - lsb + 1;
        *self.scratch.borrow_mut() = &pow2(window as usize) - UBig::from(1u8);
        let rhs_low = rhs.magnitude() & &*self.scratch.borrow();
        let placed = &rhs_low << lsb as usize;
        let full_mask = &*self.scratch.borrow() << lsb as usize;
        let cleared = self.magnitude() - (self.magnitude() & &full_mask);
        self.magnitude = cleared | placed;
        self
    }

    /// `self[i] == rhs[0]`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width`.
    pub fn eq_bit(&self, rhs: &BitVec, i: u16) -> bool {
        assert!(i < self.width, "eq_bit index {i} out of range for width {}", self.width);
        self.bit_at(i) == rhs.bit_at(0)
    }

    /// Slice `[lsb..=msb]` of self == magnitude of `rhs`. A pure query: does
    /// not mutate the receiver (unlike [`Self::slice_range`]).
    ///
    /// # Panics
    ///
    /// Panics if `msb >= width` or `msb < lsb`.
    pub fn eq_range(&self, rhs: &BitVec, msb: u16, lsb: u16) -> bool {
        *self.sliced_range(msb, lsb).magnitude() == *rhs.magnitude()
    }

    // ---- Word access --------------------------------------------------

    /// Extract bits `[n * 8 * size_of::<T>(), (n+1) * 8 * size_of::<T>())`
    /// as an unsigned integer of type `T`, clipped to `width`.
    pub fn read_word<T: WordInt>(&self, n: usize) -> T {
        let bit_offset = n * 8 * T::BYTES;
        let width = self.width as usize;
        if bit_offset >= width {
            return T::from_u64(0);
        }
        let avail_bits = (width - bit_offset).min(8 * T::BYTES);
        let shifted = self.magnitude() >> bit_offset;
        *self.scratch.borrow_mut() = &pow2(avail_bits) - UBig::from(1u8);
        let windowed = &shifted & &*self.scratch.borrow();
        let raw = u64::try_from(&windowed).expect("windowed value fits in <= 64 bits");
        T::from_u64(raw)
    }

    /// Clear the `n`th `T`-sized window and OR in `t`; width unchanged.
    pub fn write_word<T: WordInt>(&mut self, n: usize, t: T) -> &mut Self {
        let bit_offset = n * 8 * T::BYTES;
        let width = self.width as usize;
        if bit_offset >= width {
            return self;
        }
        let avail_bits = (width - bit_offset).min(8 * T::BYTES);
        *self.scratch.borrow_mut() = &pow2(avail_bits) - UBig::from(1u8);
        let full_mask = &*self.scratch.borrow() << bit_offset;
        let t_masked = &UBig::from(t.to_u64()) & &*self.scratch.borrow();
        let placed = t_masked << bit_offset;
        let cleared = self.magnitude() - (self.magnitude() & &full_mask);
        self.magnitude = cleared | placed;
        self
    }

    // ---- Conversions --------------------------------------------------

    /// `m != 0`.
    pub fn to_bool(&self) -> bool {
        self.magnitude != UBig::from(0u8)
    }

    /// Low 64 bits of `m`.
    ///
    /// # Panics
    ///
    /// Panics if `width > 64` (precondition violated).
    pub fn to_int(&self) -> u64 {
        assert!(self.width <= 64, "to_int precondition: width {} > 64", self.width);
        u64::try_from(&self.magnitude).expect("magnitude fits width <= 64 by invariant")
    }

    /// If `n < width`, truncate `m` to `n` bits; `width <- n`. Widening
    /// (`n >= width`) leaves `m` unchanged since it already fits.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn resize(&mut self, n: u16) -> &mut Self {
        assert!(n != 0, "resize to width 0 is a precondition violation");
        self.width = n;
        self.trim();
        self
    }

    /// Shorthand: value becomes the LSB, width becomes 1.
    pub fn resize_to_bool(&mut self) -> &mut Self {
        let b = self.to_bool();
        self.set_bool_result(b)
    }
}
