use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseError;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").expect("duration pattern is a valid regex")
});

/// Parse a platform duration code (`PT1H2M3S`, `PT90S`, `P1DT2H`, `P0D`) into whole seconds.
///
/// Absent components count as zero, so the degenerate `PT` is 0 seconds.
pub fn parse_duration(code: &str) -> Result<u64, ParseError> {
  let code = code.trim();
  let caps = DURATION_RE.captures(code).filter(|_| code != "P").ok_or_else(|| ParseError(code.to_string()))?;

  let part = |idx: usize| -> Result<u64, ParseError> {
    match caps.get(idx) {
      Some(m) => m.as_str().parse::<u64>().map_err(|_| ParseError(code.to_string())),
      None => Ok(0),
    }
  };

  let (days, hours, minutes, seconds) = (part(1)?, part(2)?, part(3)?, part(4)?);
  days
    .checked_mul(86_400)
    .and_then(|d| hours.checked_mul(3_600).and_then(|h| d.checked_add(h)))
    .and_then(|t| minutes.checked_mul(60).and_then(|m| t.checked_add(m)))
    .and_then(|t| t.checked_add(seconds))
    .ok_or_else(|| ParseError(code.to_string()))
}
