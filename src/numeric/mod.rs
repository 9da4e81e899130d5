// ============================================================================
// Numeric Module
// Arbitrary-precision integers for prices and sizes
// ============================================================================
//
// Prices and sizes are unbounded non-negative integers backed by
// `num_bigint::BigUint`. Every value is owned, so reducing a resting order's
// size never touches a buffer the caller still holds.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

/// Price of a level, in the instrument's smallest price unit
pub type Price = BigUint;

/// Order size, in the instrument's smallest size unit
pub type Quantity = BigUint;

/// Sum a sequence of quantities
pub fn total<'a, I>(quantities: I) -> Quantity
where
    I: IntoIterator<Item = &'a Quantity>,
{
    quantities
        .into_iter()
        .fold(Quantity::zero(), |acc, quantity| acc + quantity)
}

/// Whether `value` is a whole multiple of `step`.
///
/// A zero step accepts every value.
pub fn is_multiple_of(value: &BigUint, step: &BigUint) -> bool {
    step.is_zero() || (value % step).is_zero()
}

/// Signed difference `a - b`
pub fn signed_difference(a: &BigUint, b: &BigUint) -> BigInt {
    BigInt::from(a.clone()) - BigInt::from(b.clone())
}
