use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open input file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file {} is empty or holds no numbers", path.display())]
    Empty { path: PathBuf },

    #[error("{}:{line}: invalid number {token:?}", path.display())]
    InvalidToken {
        path: PathBuf,
        line: usize,
        token: String,
    },
}

/// A token that could not be read as a number, with its 1-based line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadToken {
    pub line: usize,
    pub token: String,
}

/// Parse whitespace/newline separated floating-point tokens.
/// NaN is rejected since it has no place in an ordering.
pub fn parse_numbers(text: &str) -> Result<Vec<f64>, BadToken> {
    let mut values = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            match token.parse::<f64>() {
                Ok(v) if !v.is_nan() => values.push(v),
                _ => {
                    return Err(BadToken {
                        line: line_num + 1,
                        token: token.to_string(),
                    });
                }
            }
        }
    }

    Ok(values)
}

/// Read a file of numbers. A file with no tokens at all is an error.
pub fn read_numbers<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, ReadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ReadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let values = parse_numbers(&text).map_err(|bad| ReadError::InvalidToken {
        path: path.to_path_buf(),
        line: bad.line,
        token: bad.token,
    })?;

    if values.is_empty() {
        return Err(ReadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(values)
}
