//! Token model consumed by the grammar engine
//!
//! - [`Token`] is an ordered, copyable identifier with an `Eof` sentinel.
//! - Category tokens (`Types`, `Literals`, ...) stand for sets of tokens and
//!   are tested with [`Token::has`].
//! - [`SpannedToken`] pairs a token with its source location for the driver.

pub mod token;

pub use token::Token;

use crate::utils::Spanned;

/// A token together with the source range it came from
pub type SpannedToken = Spanned<Token>;
