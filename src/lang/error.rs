/// A diagnostic produced while converting between text and P-file.
///
/// Fatal encode errors and advisory warnings share this shape. Line and
/// column are 0-based positions in the source text.
#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line: usize,
    column: usize,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $($msg:tt)+) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message(format!($($msg)+))
    };
    ($err:ident, $line:expr, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line($line)
            .in_column($col)
    };
    ($err:ident, $line:expr, ..$col:expr; $($msg:tt)+) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line($line)
            .in_column($col)
            .message(format!($($msg)+))
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line: 0,
            column: 0,
            message: String::new(),
        }
    }

    pub fn in_line(self, line: usize) -> Error {
        Error { line, ..self }
    }

    pub fn in_column(self, column: usize) -> Error {
        Error { column, ..self }
    }

    pub fn message<S: Into<String>>(self, message: S) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.into(),
            ..self
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn is_warning(&self) -> bool {
        self.code.is_warning()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError,
    CommandExpected,
    LineNumber,
    LineOrder,
    UnterminatedString,
    InvalidNumber,
    Overflow,
    SpecialCode,
    Include,
    StartLine,
    UnknownDirective,
    SystemVariable,
    InvalidPFile,
    KeywordName,
    DerivedSystemVariable,
}

impl ErrorCode {
    pub fn is_warning(self) -> bool {
        use ErrorCode::*;
        matches!(self, KeywordName | DerivedSystemVariable)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let s = match self {
            SyntaxError => "SYNTAX ERROR",
            CommandExpected => "COMMAND EXPECTED",
            LineNumber => "INVALID LINE NUMBER",
            LineOrder => "LINE OUT OF ORDER",
            UnterminatedString => "UNTERMINATED STRING",
            InvalidNumber => "INVALID NUMBER",
            Overflow => "OVERFLOW",
            SpecialCode => "BAD SPECIAL CODE",
            Include => "INCLUDE FAILED",
            StartLine => "START LINE NOT FOUND",
            UnknownDirective => "UNKNOWN COMMAND IN HEADER",
            SystemVariable => "BAD SYSTEM VARIABLE",
            InvalidPFile => "INVALID P-FILE",
            KeywordName => "KEYWORD AS NAME",
            DerivedSystemVariable => "DERIVED SYSTEM VARIABLE",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} IN {}:{}", self.code, self.line, self.column)?;
        if !self.message.is_empty() {
            write!(f, "; {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = error!(LineOrder, 3, ..7; "line {} after {}", 10, 20);
        assert_eq!(e.to_string(), "LINE OUT OF ORDER IN 3:7; line 10 after 20");
        assert_eq!(e.line(), 3);
        assert_eq!(e.column(), 7);
        assert!(!e.is_warning());
    }

    #[test]
    fn test_bare() {
        let e = error!(KeywordName);
        assert_eq!(e.to_string(), "KEYWORD AS NAME IN 0:0");
        assert!(e.is_warning());
    }
}
