//! Conversion of caller-supplied numbers into `uint256` call arguments.
//!
//! Sell order ids, bid ids, NFT ids and prices reach the SDK either as native
//! integers or as arbitrary-precision values (a `U256` or a numeric string).
//! Every representation is converted without arithmetic, and anything that
//! cannot be encoded exactly is rejected instead of being truncated.

use alloy::primitives::U256;
use thiserror::Error;

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_EXACT_F64: f64 = 9_007_199_254_740_991.0;

/// Errors raised when a value has no exact `uint256` encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
	#[error("Value is empty")]
	Empty,
	#[error("Value is negative: {0}")]
	Negative(String),
	#[error("Value is not an exact integer: {0}")]
	NotInteger(String),
	#[error("Value does not fit in uint256: {0}")]
	Overflow(String),
	#[error("Malformed numeric string: '{0}'")]
	Malformed(String),
}

/// Conversion into the on-chain `uint256` encoding.
pub trait ToUint256 {
	fn to_uint256(&self) -> Result<U256, IdentifierError>;
}

macro_rules! impl_unsigned {
	($($ty:ty),*) => {
		$(
			impl ToUint256 for $ty {
				fn to_uint256(&self) -> Result<U256, IdentifierError> {
					Ok(U256::from(*self))
				}
			}
		)*
	};
}

macro_rules! impl_signed {
	($($ty:ty),*) => {
		$(
			impl ToUint256 for $ty {
				fn to_uint256(&self) -> Result<U256, IdentifierError> {
					if *self < 0 {
						return Err(IdentifierError::Negative(self.to_string()));
					}
					Ok(U256::from(self.unsigned_abs()))
				}
			}
		)*
	};
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_signed!(i8, i16, i32, i64, i128, isize);

impl ToUint256 for U256 {
	fn to_uint256(&self) -> Result<U256, IdentifierError> {
		Ok(*self)
	}
}

impl ToUint256 for f64 {
	fn to_uint256(&self) -> Result<U256, IdentifierError> {
		if !self.is_finite() || self.fract() != 0.0 {
			return Err(IdentifierError::NotInteger(self.to_string()));
		}
		if *self < 0.0 {
			return Err(IdentifierError::Negative(self.to_string()));
		}
		// Past 2^53 the float no longer identifies a single integer.
		if *self > MAX_EXACT_F64 {
			return Err(IdentifierError::NotInteger(self.to_string()));
		}
		Ok(U256::from(*self as u64))
	}
}

impl ToUint256 for str {
	fn to_uint256(&self) -> Result<U256, IdentifierError> {
		parse_uint256(self)
	}
}

impl ToUint256 for String {
	fn to_uint256(&self) -> Result<U256, IdentifierError> {
		parse_uint256(self)
	}
}

impl<T: ToUint256 + ?Sized> ToUint256 for &T {
	fn to_uint256(&self) -> Result<U256, IdentifierError> {
		(**self).to_uint256()
	}
}

/// Parses a decimal or `0x`-prefixed hexadecimal string into a `U256`.
///
/// Signs, whitespace and digit separators are rejected so that the string
/// maps to exactly one value.
pub fn parse_uint256(input: &str) -> Result<U256, IdentifierError> {
	if input.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if input.starts_with('-') {
		return Err(IdentifierError::Negative(input.to_string()));
	}

	let (digits, radix) = match input
		.strip_prefix("0x")
		.or_else(|| input.strip_prefix("0X"))
	{
		Some(hex_digits) => (hex_digits, 16),
		None => (input, 10),
	};

	let well_formed = !digits.is_empty()
		&& digits.chars().all(|c| match radix {
			16 => c.is_ascii_hexdigit(),
			_ => c.is_ascii_digit(),
		});
	if !well_formed {
		return Err(IdentifierError::Malformed(input.to_string()));
	}

	// Digits are valid at this point, so a failed parse can only be overflow.
	U256::from_str_radix(digits, radix).map_err(|_| IdentifierError::Overflow(input.to_string()))
}
