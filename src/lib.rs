//! Venmo API Client Library
//!
//! This library provides a blocking client for the private API used by the
//! Venmo mobile app. It logs a user in (including the SMS two-factor
//! challenge), keeps the resulting session, and exposes account, social and
//! device operations on top of one uniform request path.
//!
//! # Modules
//!
//! - `config` - Client settings, credentials and `.env` loading
//! - `error` - The error type shared by every operation
//! - `prompt` - Sources of two-factor codes (terminal, channel, closure)
//! - `session` - The authenticated session and pending challenge state
//! - `transport` - The HTTP seam and its `reqwest` implementation
//! - `types` - Request payloads and small enums
//! - `utils` - Cookie parsing and device id helpers
//! - `venmo` - The client and all API operations
//!
//! # Example
//!
//! ```
//! use venmo_client::{config::{self, ClientConfig, Credentials}, venmo::Venmo};
//!
//! fn main() -> venmo_client::Res<()> {
//!     config::load_env()?;
//!     let mut venmo = Venmo::new(ClientConfig::from_env()?)?;
//!     venmo.login_with(&Credentials::from_env()?)?;
//!     let account = venmo.account()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod prompt;
pub mod session;
pub mod transport;
pub mod types;
pub mod utils;
pub mod venmo;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate returns this, with [`Error`] as the
/// error type so callers can match on the failure kind.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use venmo_client::Res;
///
/// fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used by interactive prompts to tell the
/// person at the terminal what is happening.
///
/// # Example
///
/// ```
/// info!("Verification code sent via {}", channel);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues the person at the terminal should notice.
///
/// # Example
///
/// ```
/// warning!("Code delivery reported status '{}'", status);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
