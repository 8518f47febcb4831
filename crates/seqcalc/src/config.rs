//! Application configuration from CLI flags and environment.

use clap::Parser;

use seqcalc_service::ServiceConfig;

/// SeqCalc-rs — linear-recurrence sequence calculator.
#[derive(Parser, Debug)]
#[command(name = "seqcalc", version, about)]
pub struct AppConfig {
    /// Sequence to compute (fibonacci, lucas, pell, tribonacci, or a
    /// name registered via --initial/--coefficients).
    #[arg(short, long, default_value = "fibonacci", env = "SEQCALC_SEQUENCE")]
    pub sequence: String,

    /// Single term index to compute (ignored in range/batch mode).
    #[arg(short = 'n', long, default_value = "100", env = "SEQCALC_INDEX")]
    pub index: i64,

    /// Range start (used with --end).
    #[arg(long, requires = "end")]
    pub start: Option<i64>,

    /// Range end (used with --start).
    #[arg(long, requires = "start")]
    pub end: Option<i64>,

    /// Comma-separated batch of indices.
    #[arg(long)]
    pub indices: Option<String>,

    /// Custom definition: comma-separated initial terms.
    #[arg(long, requires = "coefficients")]
    pub initial: Option<String>,

    /// Custom definition: comma-separated coefficients.
    #[arg(long, requires = "initial")]
    pub coefficients: Option<String>,

    /// Custom definition: index of the first initial term.
    #[arg(long, default_value = "0")]
    pub base_index: i64,

    /// Cache capacity in entries (0 = default).
    #[arg(long, default_value = "0", env = "SEQCALC_CAPACITY")]
    pub capacity: usize,

    /// Maximum index a request may ask for (0 = default).
    #[arg(long, default_value = "0")]
    pub max_index: i64,

    /// Maximum contiguous range size (0 = default).
    #[arg(long, default_value = "0")]
    pub max_range: usize,

    /// Computation timeout (e.g. "30s", "5m", "500ms").
    #[arg(long, default_value = "30s", env = "SEQCALC_TIMEOUT")]
    pub timeout: String,

    /// Print a metrics snapshot as JSON after the request.
    #[arg(long)]
    pub metrics: bool,

    /// Quiet mode (only output the values).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the service configuration from the flags.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn service_config(&self) -> ServiceConfig {
        let timeout = parse_duration(&self.timeout)
            .unwrap_or(seqcalc_core::constants::DEFAULT_COMPUTATION_TIMEOUT);
        ServiceConfig {
            cache_capacity: self.capacity,
            max_index: self.max_index,
            max_range: self.max_range,
            computation_timeout_ms: timeout.as_millis() as u64,
        }
        .normalize()
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms".
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(std::time::Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(std::time::Duration::from_secs(n * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(std::time::Duration::from_secs(n * 3600))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(std::time::Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(std::time::Duration::from_secs(n))
    }
}
