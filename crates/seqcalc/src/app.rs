//! Application entry point and dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use seqcalc_core::arith;
use seqcalc_core::definition::RecurrenceDefinition;
use seqcalc_core::metrics::{AtomicMetrics, MetricsSink};
use seqcalc_service::{Coordinator, DefinitionRegistry};

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    let registry = Arc::new(DefinitionRegistry::with_builtins());

    if let (Some(initial), Some(coefficients)) = (&config.initial, &config.coefficients) {
        let definition = RecurrenceDefinition::new(
            parse_terms(initial)?,
            parse_terms(coefficients)?,
            config.base_index,
        )?;
        registry.register(&config.sequence, definition);
    }

    let metrics = Arc::new(AtomicMetrics::new());
    let coordinator = Coordinator::new(
        config.service_config(),
        Arc::clone(&registry),
        Arc::clone(&metrics) as Arc<dyn MetricsSink>,
    );

    // Ctrl+C cancels in-flight requests instead of killing the process.
    let cancel = coordinator.cancellation_token().clone();
    let _ = ctrlc::set_handler(move || cancel.cancel());

    let started = Instant::now();
    run_request(config, &coordinator)?;

    if config.verbose && !config.quiet {
        println!("Duration: {:.3?}", started.elapsed());
    }
    if config.metrics {
        println!("{}", serde_json::to_string_pretty(&metrics.snapshot())?);
    }
    Ok(())
}

fn run_request(config: &AppConfig, coordinator: &Coordinator) -> Result<()> {
    if let Some(raw) = &config.indices {
        let indices = parse_indices(raw)?;
        let resolved = coordinator.resolve_decimal(&config.sequence, &indices)?;
        present_batch(config, &resolved);
        return Ok(());
    }

    if let (Some(start), Some(end)) = (config.start, config.end) {
        let terms = coordinator.resolve_range_decimal(&config.sequence, start, end)?;
        present_range(config, start, &terms);
        return Ok(());
    }

    let resolved = coordinator.resolve_decimal(&config.sequence, &[config.index])?;
    present_batch(config, &resolved);
    Ok(())
}

fn present_batch(config: &AppConfig, resolved: &BTreeMap<i64, String>) {
    for (index, value) in resolved {
        if config.quiet {
            println!("{value}");
        } else {
            println!("{}({index}) = {value}", config.sequence);
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
fn present_range(config: &AppConfig, start: i64, terms: &[String]) {
    for (offset, value) in terms.iter().enumerate() {
        if config.quiet {
            println!("{value}");
        } else {
            let index = start + offset as i64;
            println!("{}({index}) = {value}", config.sequence);
        }
    }
}

fn parse_terms(raw: &str) -> Result<Vec<num_bigint::BigInt>> {
    raw.split(',')
        .map(|part| arith::parse_decimal(part).map_err(anyhow::Error::new))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid term list: {raw:?}"))
}

fn parse_indices(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("index {part:?} is not a 64-bit integer"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_terms_accepts_negatives() {
        let terms = parse_terms("0, 1, -1").unwrap();
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[2], num_bigint::BigInt::from(-1));
    }

    #[test]
    fn parse_terms_rejects_garbage() {
        assert!(parse_terms("1,x").is_err());
    }

    #[test]
    fn parse_indices_list() {
        assert_eq!(parse_indices("3, 1, 2").unwrap(), vec![3, 1, 2]);
        assert!(parse_indices("1,two").is_err());
    }
}
