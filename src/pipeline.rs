//! Ordered composition of the rewrite stages.
//!
//! Each stage reads the previous stage's complete output and returns a new
//! string; nothing is shared between stages besides that text.

use std::fmt;

use tracing::debug;

use crate::booleans::fold_booleans;
use crate::config::PipelineConfig;
use crate::errors::RuleError;
use crate::escapes::decode_escapes;
use crate::hex_literals;
use crate::metrics::Metrics;
use crate::property_access::{self, KeyPolicy};
use crate::renamer::IdentifierRenamer;
use crate::string_table::StringTableResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RenameIdentifiers,
    HexLiterals,
    StringTables,
    Escapes,
    PropertyAccess,
    Booleans,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::RenameIdentifiers => "rename_identifiers",
            Stage::HexLiterals => "hex_literals",
            Stage::StringTables => "string_tables",
            Stage::Escapes => "escapes",
            Stage::PropertyAccess => "property_access",
            Stage::Booleans => "booleans",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the pipeline to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Every enabled stage.
    #[default]
    Full,
    /// Hex literal normalization only, for inspecting the intermediate text.
    HexOnly,
    /// The stages that follow hex normalization, applied to an
    /// intermediate text written by `HexOnly`.
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub rewrites: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn total(&self) -> usize {
        self.stages.iter().map(|s| s.rewrites).sum()
    }

    pub fn rewrites_for(&self, stage: Stage) -> Option<usize> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.rewrites)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub text: String,
    pub report: PipelineReport,
}

pub struct Pipeline {
    renamer: IdentifierRenamer,
    string_tables: StringTableResolver,
    decode_escapes: bool,
    fold_booleans: bool,
    key_policy: KeyPolicy,
    metrics: Option<Metrics>,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self, RuleError> {
        Ok(Self {
            renamer: IdentifierRenamer::new(&config.tables.renames)?,
            string_tables: StringTableResolver::new(&config.tables.string_tables)?,
            decode_escapes: config.decode_escapes,
            fold_booleans: config.fold_booleans,
            key_policy: config.key_policy,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The stages `mode` will run, in order.
    pub fn stages(&self, mode: Mode) -> Vec<Stage> {
        if mode == Mode::HexOnly {
            return vec![Stage::HexLiterals];
        }
        let mut stages = Vec::with_capacity(6);
        if !self.renamer.is_empty() {
            stages.push(Stage::RenameIdentifiers);
        }
        stages.push(Stage::HexLiterals);
        if !self.string_tables.is_empty() {
            stages.push(Stage::StringTables);
        }
        if self.decode_escapes {
            stages.push(Stage::Escapes);
        }
        stages.push(Stage::PropertyAccess);
        if self.fold_booleans {
            stages.push(Stage::Booleans);
        }
        if mode == Mode::Resume {
            let after_hex = stages
                .iter()
                .position(|s| *s == Stage::HexLiterals)
                .map_or(0, |i| i + 1);
            stages.drain(..after_hex);
        }
        stages
    }

    pub fn run(&self, input: &str, mode: Mode) -> PipelineOutput {
        let mut text = input.to_string();
        let mut report = PipelineReport::default();

        for stage in self.stages(mode) {
            let (next, rewrites) = self.apply(stage, &text);
            debug!(%stage, rewrites, "stage complete");
            if let Some(metrics) = &self.metrics {
                metrics
                    .rewrites
                    .with_label_values(&[stage.as_str()])
                    .inc_by(rewrites as u64);
            }
            report.stages.push(StageReport { stage, rewrites });
            text = next;
        }

        if let Some(metrics) = &self.metrics {
            metrics.runs.inc();
        }
        PipelineOutput { text, report }
    }

    fn apply(&self, stage: Stage, text: &str) -> (String, usize) {
        match stage {
            Stage::RenameIdentifiers => self.renamer.rename(text),
            Stage::HexLiterals => hex_literals::normalize_counting(text),
            Stage::StringTables => self.string_tables.resolve(text),
            Stage::Escapes => decode_escapes(text),
            Stage::PropertyAccess => property_access::rewrite_counting(text, self.key_policy),
            Stage::Booleans => fold_booleans(text),
        }
    }
}

/// Hex normalization followed by property access rewriting, with no
/// rewrite tables and the permissive key policy.
pub fn deobfuscate(input: &str) -> String {
    let hex = hex_literals::normalize_hex_literals(input);
    property_access::rewrite_property_access(&hex, KeyPolicy::Permissive)
}

/// Hex normalization alone.
pub fn normalize_only(input: &str) -> String {
    hex_literals::normalize_hex_literals(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteTables;
    use prometheus::Registry;

    fn config_with_tables() -> PipelineConfig {
        let mut tables = RewriteTables::default();
        tables
            .renames
            .insert("_0x1c226f".to_string(), "whatsappIcon".to_string());
        tables
            .string_tables
            .entry("_3304620".to_string())
            .or_default()
            .insert("365".to_string(), "createElement".to_string());
        PipelineConfig {
            tables,
            decode_escapes: true,
            fold_booleans: true,
            key_policy: KeyPolicy::Permissive,
        }
    }

    #[test]
    fn default_pipeline_has_two_stages() {
        let pipeline = Pipeline::new(&PipelineConfig::default()).unwrap();
        assert_eq!(
            pipeline.stages(Mode::Full),
            vec![Stage::HexLiterals, Stage::PropertyAccess]
        );
        assert_eq!(pipeline.stages(Mode::HexOnly), vec![Stage::HexLiterals]);
        assert_eq!(pipeline.stages(Mode::Resume), vec![Stage::PropertyAccess]);
    }

    #[test]
    fn full_stage_order() {
        let pipeline = Pipeline::new(&config_with_tables()).unwrap();
        assert_eq!(
            pipeline.stages(Mode::Full),
            vec![
                Stage::RenameIdentifiers,
                Stage::HexLiterals,
                Stage::StringTables,
                Stage::Escapes,
                Stage::PropertyAccess,
                Stage::Booleans,
            ]
        );
        assert_eq!(
            pipeline.stages(Mode::Resume),
            vec![Stage::StringTables, Stage::Escapes, Stage::PropertyAccess, Stage::Booleans]
        );
    }

    #[test]
    fn renames_before_hex_and_resolves_lookups_after() {
        let pipeline = Pipeline::new(&config_with_tables()).unwrap();
        let src = r#"var _0x1c226f = document[_3304620(0x16d)]("div"); _0x1c226f["hidden"] = !0;"#;
        let out = pipeline.run(src, Mode::Full);
        assert_eq!(
            out.text,
            r#"var whatsappIcon = document.createElement("div"); whatsappIcon.hidden = true;"#
        );
        assert_eq!(out.report.rewrites_for(Stage::RenameIdentifiers), Some(2));
        assert_eq!(out.report.rewrites_for(Stage::StringTables), Some(1));
    }

    #[test]
    fn hex_only_mode_skips_everything_else() {
        let pipeline = Pipeline::new(&config_with_tables()).unwrap();
        let out = pipeline.run(r#"_0x1c226f["a"] = 0x10"#, Mode::HexOnly);
        assert_eq!(out.text, r#"_1843823["a"] = 16"#);
        assert_eq!(out.report.total(), 2);
    }

    #[test]
    fn metrics_count_rewrites_per_stage() {
        let registry = Registry::new();
        let metrics = Metrics::new(&registry).unwrap();
        let pipeline = Pipeline::new(&PipelineConfig::default())
            .unwrap()
            .with_metrics(metrics.clone());
        pipeline.run(r#"a["b"] = 0x1 + 0x2"#, Mode::Full);
        assert_eq!(metrics.runs.get(), 1);
        assert_eq!(metrics.rewrites.with_label_values(&["hex_literals"]).get(), 2);
        assert_eq!(metrics.rewrites.with_label_values(&["property_access"]).get(), 1);
    }

    #[test]
    fn free_functions_cover_both_core_stages() {
        assert_eq!(deobfuscate("const a = 1;"), "const a = 1;");
        assert_eq!(normalize_only("x = 0x1A;"), "x = 26;");
        assert_eq!(deobfuscate("obj['foo']['bar']"), "obj.foo.bar");
    }
}
