mod secret;
mod token;

pub use secret::Secret;
pub use token::{Token, TokenAmount, TokenConversionError, WLD_CURRENCY_CODE, USDCE_CURRENCY_CODE};
