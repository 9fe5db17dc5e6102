use std::fmt;

/// Error codes for expression diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer
/// - E1xxx: Parser
/// - E2xxx: Constant folding
/// - E3xxx: Printf segmentation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Integer literal too large to be exact (info)
    E0004,
    /// Unknown escape sequence (warning)
    E0005,

    // Parser (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid assignment or update target
    E1005,
    /// Empty expression
    E1006,

    // Folding (E2xxx)
    /// Constant division or modulo by zero
    E2001,

    // Printf (E3xxx)
    /// Unterminated `%spec[` bracket (warning)
    E3001,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E3001 => "E3001",
        }
    }

    /// Short human-readable name of the problem.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "invalid character",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "inexact integer literal",
            ErrorCode::E0005 => "unknown escape sequence",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "invalid assignment target",
            ErrorCode::E1006 => "empty expression",
            ErrorCode::E2001 => "constant division by zero",
            ErrorCode::E3001 => "unterminated format bracket",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
