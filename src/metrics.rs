use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    pub runs: IntCounter,
    pub rewrites: IntCounterVec,
}

impl Metrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let runs = IntCounter::new("pipeline_runs_total", "Number of pipeline runs")?;
        let rewrites = IntCounterVec::new(
            Opts::new("rewrites_total", "Number of replacements made, by stage"),
            &["stage"],
        )?;
        registry.register(Box::new(runs.clone()))?;
        registry.register(Box::new(rewrites.clone()))?;
        Ok(Self { runs, rewrites })
    }
}

/// Everything in `registry`, in the Prometheus text exposition format.
pub fn render_metrics(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
