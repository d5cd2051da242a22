//! Letter sets packed into 5-bit lanes.
//!
//! Up to twelve letter codes fit in the low 60 bits of a `u64`. Membership is a
//! branch-free "is any lane zero" test after XOR-ing every lane with the letter,
//! see <https://graphics.stanford.edu/~seander/bithacks.html#ValueInWord>.
//! Unused lanes hold [`WILDCARD_CODE`], which no stored letter can equal.

use super::alphabet::WILDCARD_CODE;

/// Number of letters a [`LetterLanes`] can hold.
pub const LANES: usize = 12;

const LANE_BITS: usize = 5;
/// Lowest bit of every lane. Multiplying by a letter broadcasts it to all lanes.
const LOW_BITS: u64 = 0x0084_2108_4210_8421;
/// Highest bit of every lane.
const HIGH_BITS: u64 = LOW_BITS << (LANE_BITS - 1);

const NARROW_LANES: usize = LANES / 2;
const NARROW_MASK: u64 = (1 << (NARROW_LANES * LANE_BITS)) - 1;
const NARROW_LOW_BITS: u32 = 0x0210_8421;
const NARROW_HIGH_BITS: u32 = NARROW_LOW_BITS << (LANE_BITS - 1);

/// True if any of the twelve 5-bit lanes of `input` is zero.
#[inline(always)]
pub fn has_zero_lane(input: u64) -> bool {
    (input.wrapping_sub(LOW_BITS) & !input & HIGH_BITS) != 0
}

/// True if any of the twelve 5-bit lanes of `input` equals `letter`.
#[inline(always)]
pub fn has_letter(input: u64, letter: u8) -> bool {
    has_zero_lane(input ^ LOW_BITS.wrapping_mul(u64::from(letter)))
}

/// True if any of the six 5-bit lanes of `input` is zero.
#[inline(always)]
pub fn has_zero_lane_narrow(input: u32) -> bool {
    (input.wrapping_sub(NARROW_LOW_BITS) & !input & NARROW_HIGH_BITS) != 0
}

/// True if any of the six 5-bit lanes of `input` equals `letter`.
#[inline(always)]
pub fn has_letter_narrow(input: u32, letter: u8) -> bool {
    has_zero_lane_narrow(input ^ NARROW_LOW_BITS.wrapping_mul(u32::from(letter)))
}

/// Up to twelve letter codes packed into one `u64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterLanes(u64);

impl LetterLanes {
    /// Packs `letters`, padding unused lanes with the wildcard code.
    /// Returns `None` if there are more than [`LANES`] letters.
    pub fn pack(letters: &[u8]) -> Option<Self> {
        if letters.len() > LANES {
            return None;
        }
        let bits = (0..LANES).fold(0u64, |bits, lane| {
            let letter = letters.get(lane).copied().unwrap_or(WILDCARD_CODE);
            bits | u64::from(letter & WILDCARD_CODE) << (lane * LANE_BITS)
        });
        Some(LetterLanes(bits))
    }

    /// The packed bits.
    #[inline]
    pub fn bits(self) -> u64 {
        self.0
    }

    /// True if `letter` occupies any lane.
    #[inline(always)]
    pub fn contains(self, letter: u8) -> bool {
        has_letter(self.0, letter)
    }

    /// Splits the lanes into two 32-bit halves of six lanes each.
    #[inline]
    pub fn narrow(self) -> NarrowLetterLanes {
        NarrowLetterLanes {
            high: (self.0 >> (NARROW_LANES * LANE_BITS)) as u32,
            low: (self.0 & NARROW_MASK) as u32,
        }
    }
}

/// The same twelve lanes as [`LetterLanes`], split across two `u32`s for targets
/// without cheap 64-bit arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NarrowLetterLanes {
    high: u32,
    low: u32,
}

impl NarrowLetterLanes {
    /// Same as [`LetterLanes::contains`].
    #[inline(always)]
    pub fn contains(self, letter: u8) -> bool {
        has_letter_narrow(self.high, letter) || has_letter_narrow(self.low, letter)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn broadcast_constant() {
        assert_eq!(LOW_BITS, ((1u64 << 60) - 1) / 31);
        assert_eq!(u64::from(NARROW_LOW_BITS), ((1u64 << 30) - 1) / 31);
    }

    #[test]
    fn zero_lanes() {
        assert!(!has_zero_lane(
            0b1111110011100111001110011010111001110011100111000010011100100001
        ));
        assert!(has_zero_lane(
            0b1111110011100111001110011100111001110011100111001110011100100000
        ));
        assert!(has_zero_lane(
            0b1111110010000111001110011100111001110010000011001110011100100010
        ));
        assert!(!has_letter(
            0b1111110010000111001110011100111001110010000011001110011100100100,
            0b00010
        ));
        assert!(!has_letter(
            0b1111110010000111001110011100111001110010000011001110011100111111,
            0b00010
        ));
    }

    #[test]
    fn absent_letter_is_never_found() {
        let mut rng = StdRng::seed_from_u64(7);
        for letter in 0..32u8 {
            let letters: Vec<u8> = (0..LANES)
                .map(|_| {
                    let l = rng.gen_range(0..31u8);
                    if l == letter {
                        (l + 1) % 32
                    } else {
                        l
                    }
                })
                .collect();
            let lanes = LetterLanes::pack(&letters).unwrap();
            assert!(!lanes.contains(letter), "{letter} in {letters:?}");
            assert!(!lanes.narrow().contains(letter), "{letter} in {letters:?}");
        }
    }

    #[test]
    fn present_letter_is_found_in_any_lane() {
        let mut rng = StdRng::seed_from_u64(11);
        for letter in 0..31u8 {
            for lane in 0..LANES {
                let mut letters: Vec<u8> = (0..LANES).map(|_| rng.gen_range(0..31u8)).collect();
                letters[lane] = letter;
                let lanes = LetterLanes::pack(&letters).unwrap();
                assert!(lanes.contains(letter), "{letter} in {letters:?}");
                assert!(lanes.narrow().contains(letter), "{letter} in {letters:?}");
            }
        }
    }

    #[test]
    fn padding_matches_nothing() {
        let lanes = LetterLanes::pack(&[3, 4]).unwrap();
        assert!(lanes.contains(3));
        assert!(lanes.contains(4));
        assert!((0..31u8).filter(|l| lanes.contains(*l)).eq([3, 4]));
        assert!((0..31u8).filter(|l| lanes.narrow().contains(*l)).eq([3, 4]));
        assert_eq!(LetterLanes::pack(&[]).unwrap().bits(), (1u64 << 60) - 1);
    }

    #[test]
    fn too_many_letters() {
        assert!(LetterLanes::pack(&[0; LANES]).is_some());
        assert!(LetterLanes::pack(&[0; LANES + 1]).is_none());
    }
}
