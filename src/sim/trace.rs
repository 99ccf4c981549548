use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PagingError, PagingResult};
use crate::region::PageNumber;

/// Whether a touch reads or writes its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One touch of a page in a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub kind: AccessKind,
    pub page: PageNumber,
}

impl Access {
    pub fn read(page: u32) -> Self {
        Self {
            kind: AccessKind::Read,
            page: PageNumber(page),
        }
    }

    pub fn write(page: u32) -> Self {
        Self {
            kind: AccessKind::Write,
            page: PageNumber(page),
        }
    }
}

/// Parses a workload trace.
///
/// One access per line, `r <page>` or `w <page>`. Everything after a
/// `#` is a comment; blank lines are skipped.
pub fn parse(input: &str) -> PagingResult<Vec<Access>> {
    let mut accesses = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let number = index + 1;
        let mut parts = line.split_whitespace();
        let kind = match parts.next() {
            Some("r") | Some("R") => AccessKind::Read,
            Some("w") | Some("W") => AccessKind::Write,
            Some(op) => {
                return Err(PagingError::TraceParse {
                    line: number,
                    reason: format!("unknown operation {:?}", op),
                })
            }
            None => continue,
        };
        let page = parts
            .next()
            .ok_or_else(|| PagingError::TraceParse {
                line: number,
                reason: "missing page number".to_string(),
            })?
            .parse::<u32>()
            .map_err(|e| PagingError::TraceParse {
                line: number,
                reason: format!("bad page number: {}", e),
            })?;
        if parts.next().is_some() {
            return Err(PagingError::TraceParse {
                line: number,
                reason: "trailing input after page number".to_string(),
            });
        }
        accesses.push(Access {
            kind,
            page: PageNumber(page),
        });
    }
    Ok(accesses)
}

/// Loads a trace file in the [`parse`] format.
pub fn load(path: &Path) -> PagingResult<Vec<Access>> {
    let input = fs::read_to_string(path)?;
    parse(&input)
}

/// Generates `length` random touches over pages `0..page_count`.
///
/// Each touch is a write with probability `write_ratio` (must lie in
/// `0.0..=1.0`). The same seed reproduces the same workload.
pub fn random(length: usize, page_count: u32, write_ratio: f64, seed: u64) -> Vec<Access> {
    assert!(page_count > 0, "workload needs at least one page");
    assert!(
        (0.0..=1.0).contains(&write_ratio),
        "write ratio {} is not a probability",
        write_ratio
    );
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length)
        .map(|_| {
            let page = rng.gen_range(0..page_count);
            if rng.gen_bool(write_ratio) {
                Access::write(page)
            } else {
                Access::read(page)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_and_writes() {
        let trace = parse("r 1\nw 2\nR 3\nW 4\n").unwrap();
        assert_eq!(
            trace,
            vec![
                Access::read(1),
                Access::write(2),
                Access::read(3),
                Access::write(4),
            ]
        );
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let input = "# warm-up\n\nr 1\n  w 2  # flush\n\n# done\n";
        let trace = parse(input).unwrap();
        assert_eq!(trace, vec![Access::read(1), Access::write(2)]);
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let err = parse("r 1\nx 2\n").unwrap_err();
        assert!(matches!(err, PagingError::TraceParse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_missing_page() {
        let err = parse("r\n").unwrap_err();
        assert!(
            matches!(err, PagingError::TraceParse { line: 1, reason } if reason.contains("missing"))
        );
    }

    #[test]
    fn test_parse_rejects_bad_page_number() {
        let err = parse("w seven\n").unwrap_err();
        assert!(matches!(err, PagingError::TraceParse { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_trailing_input() {
        let err = parse("r 1 2\n").unwrap_err();
        assert!(
            matches!(err, PagingError::TraceParse { reason, .. } if reason.contains("trailing"))
        );
    }

    #[test]
    fn test_load_trace_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workload.trace");
        fs::write(&path, "r 0\nw 1\n").unwrap();

        let trace = load(&path).unwrap();
        assert_eq!(trace, vec![Access::read(0), Access::write(1)]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.trace")).unwrap_err();
        assert!(matches!(err, PagingError::Io(_)));
    }

    #[test]
    fn test_random_is_reproducible() {
        let first = random(100, 16, 0.3, 42);
        let second = random(100, 16, 0.3, 42);
        assert_eq!(first, second);

        let other_seed = random(100, 16, 0.3, 43);
        assert_ne!(first, other_seed);
    }

    #[test]
    fn test_random_respects_bounds() {
        let trace = random(200, 8, 0.5, 7);
        assert_eq!(trace.len(), 200);
        assert!(trace.iter().all(|a| a.page.0 < 8));
    }

    #[test]
    fn test_random_ratio_extremes() {
        assert!(random(50, 4, 0.0, 1)
            .iter()
            .all(|a| a.kind == AccessKind::Read));
        assert!(random(50, 4, 1.0, 1)
            .iter()
            .all(|a| a.kind == AccessKind::Write));
    }
}
