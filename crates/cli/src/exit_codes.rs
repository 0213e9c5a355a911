//! CLI Exit Code Registry
//!
//! Single source of truth for exit codes. Scripts rely on these.
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, missing file) |
//! | 10-19   | ai        | Credential / assistant codes             |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// No API key configured and the command needs one.
pub const EXIT_AI_MISSING_KEY: u8 = 11;
