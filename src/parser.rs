use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::slice;

use crate::constants::{MAX_TOKENS, SEPARATORS};
use crate::errors::TokenizeError;

/// The words of one command line. Index 0 is the command name.
///
/// The vector length is the end marker; there is no sentinel slot to read past.
/// Words keep their exact bytes, valid UTF-8 or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector {
    tokens: Vec<OsString>,
}

impl ArgumentVector {
    pub fn new(tokens: Vec<OsString>) -> Result<Self, TokenizeError> {
        if tokens.len() > MAX_TOKENS {
            return Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS });
        }
        Ok(ArgumentVector { tokens })
    }

    pub fn command(&self) -> Option<&OsStr> {
        self.arg(0)
    }

    pub fn arg(&self, index: usize) -> Option<&OsStr> {
        self.tokens.get(index).map(OsString::as_os_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, OsString> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[OsString] {
        &self.tokens
    }
}

/// Splits a raw line into words on runs of spaces, tabs and line breaks.
///
/// Every other byte is taken verbatim: there is no quoting, escaping or expansion.
pub fn tokenize(line: impl AsRef<[u8]>) -> Result<ArgumentVector, TokenizeError> {
    let mut current_token: Vec<u8> = Vec::new();
    let mut tokens: Vec<OsString> = Vec::new();

    for &byte in line.as_ref() {
        if SEPARATORS.contains(&byte) {
            if !current_token.is_empty() {
                push_token(&mut tokens, &mut current_token)?;
            }
        } else {
            current_token.push(byte);
        }
    }
    if !current_token.is_empty() {
        push_token(&mut tokens, &mut current_token)?;
    }

    ArgumentVector::new(tokens)
}

fn push_token(tokens: &mut Vec<OsString>, current_token: &mut Vec<u8>) -> Result<(), TokenizeError> {
    if tokens.len() == MAX_TOKENS {
        return Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS });
    }
    let word = std::mem::take(current_token);
    tokens.push(OsStr::from_bytes(&word).to_os_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(argv: &ArgumentVector) -> Vec<&str> {
        argv.iter().map(|word| word.to_str().unwrap()).collect()
    }

    #[test]
    fn tokenizes_basic_command() {
        let argv = tokenize("ls -l /tmp\n").unwrap();
        assert_eq!(vec!["ls", "-l", "/tmp"], words(&argv));
        assert_eq!(Some(OsStr::new("ls")), argv.command());
        assert_eq!(None, argv.arg(3));
    }

    #[test]
    fn separator_only_lines_have_no_tokens() {
        for line in ["", "\n", "   \n", "\t", " \t \r\n"] {
            let argv = tokenize(line).unwrap();
            assert!(argv.is_empty(), "{line:?} produced {argv:?}");
            assert_eq!(None, argv.command());
        }
    }

    #[test]
    fn collapses_runs_of_mixed_separators() {
        let argv = tokenize("  cd\t\t /var/log  \r\n").unwrap();
        assert_eq!(vec!["cd", "/var/log"], words(&argv));
    }

    #[test]
    fn quotes_and_dollars_are_literal() {
        let argv = tokenize("echo \"a b\" $HOME 'c'\\d").unwrap();
        assert_eq!(vec!["echo", "\"a", "b\"", "$HOME", "'c'\\d"], words(&argv));
    }

    #[test]
    fn rejoining_tokens_is_stable() {
        let line = "  grep  -n\tfoo   bar.txt \n";
        let first = tokenize(line).unwrap();
        let joined = words(&first).join(" ");
        assert_eq!("grep -n foo bar.txt", joined);
        assert_eq!(first, tokenize(&joined).unwrap());
    }

    #[test]
    fn non_utf8_bytes_are_kept_verbatim() {
        let argv = tokenize(b"cat caf\xff\n").unwrap();
        assert_eq!(2, argv.len());
        assert_eq!(&b"caf\xff"[..], argv.arg(1).unwrap().as_bytes());
    }

    #[test]
    fn accepts_the_token_limit() {
        let line = vec!["x"; MAX_TOKENS].join(" ");
        assert_eq!(MAX_TOKENS, tokenize(line).unwrap().len());
    }

    #[test]
    fn rejects_lines_over_the_token_limit() {
        let line = vec!["x"; MAX_TOKENS + 1].join(" ");
        assert_eq!(
            Err(TokenizeError::TooManyTokens { limit: MAX_TOKENS }),
            tokenize(line)
        );
    }

    #[test]
    fn new_enforces_the_token_limit() {
        let tokens = vec![OsString::from("y"); MAX_TOKENS + 1];
        assert!(ArgumentVector::new(tokens).is_err());
    }
}
