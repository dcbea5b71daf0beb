//! A line-oriented DIMACS CNF reader.
//!
//! Skips `c` comment lines, validates the `p cnf <vars> <clauses>` header, and accumulates
//! `0`-terminated integer clauses that may wrap line boundaries. Transparently decompresses
//! gzip input so `.cnf.gz` files work without a separate flag.

use std::io::{self, BufRead, BufReader, Read};

use cdcl_core::Lit;
use flate2::read::GzDecoder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedInput { line: usize, token: String },
    #[error("line {line}: literal index is too large: {token}")]
    LiteralTooLarge { line: usize, token: String },
    #[error("line {line}: invalid header syntax: '{header}'")]
    InvalidHeader { line: usize, header: String },
    #[error("unterminated clause at end of input")]
    UnterminatedClause,
    #[error("formula has {actual} variables while the header declares {declared}")]
    VarCount { actual: u32, declared: u32 },
    #[error("formula has {actual} clauses while the header declares {declared}")]
    ClauseCount { actual: usize, declared: usize },
    #[error("I/O error reading DIMACS input: {0}")]
    Io(#[from] io::Error),
}

/// The variable/clause counts declared in a DIMACS header.
#[derive(Clone, Copy, Debug)]
pub struct DimacsHeader {
    pub num_vars: u32,
    pub num_clauses: usize,
}

/// A fully parsed CNF formula: an optional header plus the clauses themselves, each as a
/// sequence of already-decoded literals.
#[derive(Debug, Default)]
pub struct CnfFormula {
    pub header: Option<DimacsHeader>,
    pub clauses: Vec<Vec<Lit>>,
}

/// Opens `path`, transparently decompressing it first if its name ends in `.gz`.
pub fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    let file = std::fs::File::open(path)?;
    if path.ends_with(".gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Parses a complete DIMACS CNF document from `input`.
pub fn parse(input: impl Read) -> Result<CnfFormula, DimacsError> {
    let reader = BufReader::new(input);
    let mut formula = CnfFormula::default();
    let mut partial: Vec<i32> = vec![];

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if trimmed.starts_with('p') {
            formula.header = Some(parse_header(line_no, trimmed)?);
            continue;
        }

        for token in trimmed.split_whitespace() {
            let v: i32 = token.parse().map_err(|_| {
                if token.chars().all(|c| c.is_ascii_digit() || c == '-') {
                    DimacsError::LiteralTooLarge { line: line_no, token: token.to_string() }
                } else {
                    DimacsError::UnexpectedInput { line: line_no, token: token.to_string() }
                }
            })?;
            if v == 0 {
                formula.clauses.push(partial.drain(..).map(Lit::from).collect());
            } else {
                partial.push(v);
            }
        }
    }

    if !partial.is_empty() {
        return Err(DimacsError::UnterminatedClause);
    }

    if let Some(header) = formula.header {
        let actual_clauses = formula.clauses.len();
        if actual_clauses != header.num_clauses {
            return Err(DimacsError::ClauseCount {
                actual: actual_clauses,
                declared: header.num_clauses,
            });
        }
        let actual_vars = formula
            .clauses
            .iter()
            .flatten()
            .map(|l| l.var().idx() + 1)
            .max()
            .unwrap_or(0);
        if actual_vars > header.num_vars {
            return Err(DimacsError::VarCount { actual: actual_vars, declared: header.num_vars });
        }
    }

    Ok(formula)
}

fn parse_header(line_no: usize, line: &str) -> Result<DimacsHeader, DimacsError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 || fields[0] != "p" || fields[1] != "cnf" {
        return Err(DimacsError::InvalidHeader { line: line_no, header: line.to_string() });
    }
    let num_vars: u32 = fields[2]
        .parse()
        .map_err(|_| DimacsError::InvalidHeader { line: line_no, header: line.to_string() })?;
    let num_clauses: usize = fields[3]
        .parse()
        .map_err(|_| DimacsError::InvalidHeader { line: line_no, header: line.to_string() })?;
    Ok(DimacsHeader { num_vars, num_clauses })
}
