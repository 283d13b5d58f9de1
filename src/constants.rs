//! Limits and status codes shared by the shell modules.

/// Longest raw input line handed to the tokenizer, in bytes.
pub const MAX_LINE_LENGTH: usize = 1024;

/// Most tokens a single command line may carry.
pub const MAX_TOKENS: usize = 200;

/// Bytes that separate tokens on a command line.
pub const SEPARATORS: [u8; 4] = [b' ', b'\t', b'\n', b'\r'];

/// Exit status of a child whose program could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit status of a child whose program was found but could not be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Printed after the clock in the prompt.
pub const PROMPT_SUFFIX: &str = "# ";
