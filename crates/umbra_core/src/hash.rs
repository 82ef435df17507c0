//! # Keyed Field Hash
//!
//! MiMC-style Feistel sponge over the proving circuit's scalar field.
//!
//! ## Why an algebraic hash?
//!
//! Planet identities must be provable inside an arithmetic circuit later, so
//! the hash is built from field additions and fifth powers rather than bit
//! operations. The same `(key, inputs)` pair yields the same output on every
//! platform; there is no hidden state and no floating point.
//!
//! ## Channels
//!
//! Distinct keys behave as independent pseudorandom functions of the same
//! coordinate: one key answers "is there a planet here", two more drive the
//! space-type and biome noise channels without correlating with it.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use once_cell::sync::Lazy;

use crate::rng::XorShift64;

/// The BN254 scalar field prime, shared with the zero-knowledge proving
/// circuit. Every hash output lies in `[0, P)`.
pub static FIELD_PRIME: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(
        b"21888242871839275222246405745257275088548364400416034343698204186575808495617",
        10,
    )
    .expect("field prime literal parses")
});

/// Feistel rounds per permutation call.
const ROUNDS: usize = 220;

/// Seed for the round-constant expansion. Fixed forever; changing it forks
/// the universe.
const CONSTANTS_SEED: u64 = 0x554D_4252_4121_7C5F;

/// Round constants `C[0..ROUNDS)`, expanded once from the fixed seed and
/// reduced into the field. `C[0]` is zero by sponge convention.
static ROUND_CONSTANTS: Lazy<Vec<BigUint>> = Lazy::new(|| {
    let mut rng = XorShift64::new(CONSTANTS_SEED);
    let mut constants = Vec::with_capacity(ROUNDS);
    constants.push(BigUint::from(0u8));
    for _ in 1..ROUNDS {
        let mut bytes = [0u8; 32];
        for word in 0..4 {
            bytes[word * 8..word * 8 + 8].copy_from_slice(&rng.next_u64().to_le_bytes());
        }
        constants.push(BigUint::from_bytes_le(&bytes) % &*FIELD_PRIME);
    }
    constants
});

/// Maps a signed lattice integer into the field: negatives wrap to
/// `P - (|v| mod P)`, exactly as the circuit encodes them.
#[must_use]
pub fn to_field_element(v: i64) -> BigUint {
    if v >= 0 {
        BigUint::from(v.unsigned_abs()) % &*FIELD_PRIME
    } else {
        let magnitude = BigUint::from(v.unsigned_abs()) % &*FIELD_PRIME;
        if magnitude == BigUint::from(0u8) {
            magnitude
        } else {
            &*FIELD_PRIME - magnitude
        }
    }
}

/// `t^5 mod P`.
fn pow5(t: &BigUint) -> BigUint {
    let t2 = (t * t) % &*FIELD_PRIME;
    let t4 = (&t2 * &t2) % &*FIELD_PRIME;
    (t4 * t) % &*FIELD_PRIME
}

/// Keyed hash over the field.
///
/// One hasher per logical channel; construction is cheap (the constant table
/// is shared).
///
/// # Example
///
/// ```rust,ignore
/// let planet = MimcHasher::new(1);
/// let h = planet.hash(&[x, y]);
/// let is_planet = h < threshold;
/// ```
#[derive(Clone, Debug)]
pub struct MimcHasher {
    /// The channel key, already mapped into the field.
    key: BigUint,
}

impl MimcHasher {
    /// Creates a hasher for the given channel key.
    #[must_use]
    pub fn new(key: u64) -> Self {
        Self {
            key: BigUint::from(key) % &*FIELD_PRIME,
        }
    }

    /// One Feistel permutation of the sponge state.
    fn permute(&self, l: &mut BigUint, r: &mut BigUint) {
        for constant in ROUND_CONSTANTS.iter() {
            let t = (&*l + &self.key + constant) % &*FIELD_PRIME;
            let next_l = (&*r + pow5(&t)) % &*FIELD_PRIME;
            *r = std::mem::replace(l, next_l);
        }
    }

    /// Hashes field elements, returning a value in `[0, P)`.
    #[must_use]
    pub fn hash_elements(&self, inputs: &[BigUint]) -> BigUint {
        let mut l = BigUint::from(0u8);
        let mut r = BigUint::from(0u8);
        for input in inputs {
            l = (l + input) % &*FIELD_PRIME;
            self.permute(&mut l, &mut r);
        }
        l
    }

    /// Hashes signed lattice integers, returning a value in `[0, P)`.
    #[must_use]
    pub fn hash(&self, inputs: &[i64]) -> BigUint {
        let elements: Vec<BigUint> = inputs.iter().map(|&v| to_field_element(v)).collect();
        self.hash_elements(&elements)
    }

    /// Hash reduced modulo 16: selects one of the 16 fixed gradient vectors.
    #[must_use]
    pub fn rand16(&self, inputs: &[i64]) -> usize {
        (self.hash(inputs) % BigUint::from(16u8))
            .to_usize()
            .expect("residue mod 16 fits usize")
    }
}
