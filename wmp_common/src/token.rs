use std::{
    fmt::Display,
    iter::Sum,
    ops::Add,
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const WLD_CURRENCY_CODE: &str = "WLD";
pub const USDCE_CURRENCY_CODE: &str = "USDCE";

//--------------------------------------     Token       -------------------------------------------------------------

/// The tokens that the wallet host can transfer on behalf of a mini-app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    Wld,
    Usdce,
}

impl Token {
    pub fn symbol(&self) -> &'static str {
        match self {
            Token::Wld => WLD_CURRENCY_CODE,
            Token::Usdce => USDCE_CURRENCY_CODE,
        }
    }

    /// The number of decimal places in one whole token. Amounts on the wire are always expressed in the
    /// smallest unit, i.e. `whole * 10^decimals`.
    pub fn decimals(&self) -> u32 {
        match self {
            Token::Wld => 18,
            Token::Usdce => 6,
        }
    }

    /// Converts a whole-token amount into the smallest-unit representation the wallet host expects.
    pub fn to_base_units(self, amount: f64) -> Result<TokenAmount, TokenConversionError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(TokenConversionError(format!("{amount} is not a valid {} amount", self.symbol())));
        }
        let scaled = amount * 10f64.powi(self.decimals() as i32);
        if scaled >= u128::MAX as f64 {
            return Err(TokenConversionError(format!("{amount} {} overflows the base-unit range", self.symbol())));
        }
        #[allow(clippy::cast_sign_loss)]
        Ok(TokenAmount(scaled.round() as u128))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Token {
    type Err = TokenConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            WLD_CURRENCY_CODE => Ok(Token::Wld),
            USDCE_CURRENCY_CODE | "USDC.E" => Ok(Token::Usdce),
            other => Err(TokenConversionError(format!("Unknown token symbol: {other}"))),
        }
    }
}

//--------------------------------------     TokenAmount       -------------------------------------------------------

/// An amount in a token's smallest units. Serialized as a decimal string, since 18-decimal tokens
/// overflow the integer range of most JSON consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl Add for TokenAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>().map(TokenAmount).map_err(|e| de::Error::custom(format!("Invalid token amount ({s}): {e}")))
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in base token units: {0}")]
pub struct TokenConversionError(String);
