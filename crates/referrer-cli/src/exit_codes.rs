//! Process exit codes.
//! Registry failures use `RegistryError::exit_code` (1, 2, 5, 6); plugin decode failures use the
//! plugin error code (5, 7). Codes here stay clear of both ranges.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_VERIFICATION_FAILED: i32 = 3; // Envelope decoded but reports failure
pub const EXIT_INTERNAL_ERROR: i32 = 70; // EX_SOFTWARE
