//! Check command implementation for the wikilink CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser};
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wikilink_core::{
    DetectorConfig, GeometryKind, IssueReport, KnowledgeBase, TagSet, WikimediaLinkIssueDetector,
    countries::{BuiltinCountryLanguages, CountryLanguages},
    distance::location_from_lat_lon,
};
use wikilink_data::{SqliteKnowledgeBase, fs::open_utf8_file};

use crate::{
    ARG_CACHE_DB, ARG_DISTANCE_WARNING_KM, ARG_FEATURES, CliError, ENV_CHECK_CACHE_DB,
    ENV_CHECK_FEATURES, require_existing,
};

/// CLI arguments for the `check` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Check a JSON array of features against the entity cache. \
                 Each feature carries its geometry kind, its tags and, \
                 optionally, an id and a lat/lon location. One JSON line is \
                 printed per finding.",
    about = "Check features for broken Wikipedia and Wikidata links"
)]
#[ortho_config(prefix = "WIKILINK")]
pub(crate) struct CheckArgs {
    /// Path to a JSON file holding an array of features.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) features: Option<Utf8PathBuf>,
    /// Path to the SQLite entity cache written by `wikilink import`.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Distance in kilometres above which a far-away entity is noted.
    #[arg(long = ARG_DISTANCE_WARNING_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) distance_warning_km: Option<f64>,
    /// Also print informational findings.
    #[arg(long, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) informational: bool,
}

impl CheckArgs {
    pub(crate) fn into_config(self) -> Result<CheckConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CheckConfig::try_from(merged)
    }
}

/// Resolved `check` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CheckConfig {
    /// Path to the features JSON file.
    pub(crate) features: Utf8PathBuf,
    /// Path to the entity cache.
    pub(crate) cache_db: Utf8PathBuf,
    /// Detector thresholds.
    pub(crate) detector: DetectorConfig,
    /// Whether informational findings are printed.
    pub(crate) informational: bool,
}

impl CheckConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.features, ARG_FEATURES)?;
        require_existing(&self.cache_db, ARG_CACHE_DB)
    }
}

impl TryFrom<CheckArgs> for CheckConfig {
    type Error = CliError;

    fn try_from(args: CheckArgs) -> Result<Self, Self::Error> {
        let features = args.features.ok_or(CliError::MissingArgument {
            field: ARG_FEATURES,
            env: ENV_CHECK_FEATURES,
        })?;
        let cache_db = args.cache_db.ok_or(CliError::MissingArgument {
            field: ARG_CACHE_DB,
            env: ENV_CHECK_CACHE_DB,
        })?;
        let mut detector = DetectorConfig::default();
        if let Some(value) = args.distance_warning_km {
            if !(value.is_finite() && value > 0.0) {
                return Err(CliError::InvalidDistanceThreshold { value });
            }
            detector.distance_warning_km = value;
        }
        Ok(Self {
            features,
            cache_db,
            detector,
            informational: args.informational,
        })
    }
}

/// One feature to check, as read from the features file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct FeatureRecord {
    /// Caller-chosen identifier echoed in findings.
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Geometry kind of the feature.
    pub(crate) geometry: GeometryKind,
    /// Tags of the feature.
    #[serde(default)]
    pub(crate) tags: TagSet,
    /// Latitude in degrees.
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub(crate) lon: Option<f64>,
}

/// Names the feature a finding belongs to: its id, or its position in the
/// input array when it has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub(crate) enum FeatureLabel {
    Id(String),
    Index(usize),
}

/// A finding printed as one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Finding {
    pub(crate) feature: FeatureLabel,
    pub(crate) issue: IssueReport,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_check_with(args, &mut stdout).map(|_| ())
}

/// Run `check`, writing findings to `writer` and returning how many were
/// written.
pub(crate) fn run_check_with(args: CheckArgs, writer: &mut dyn Write) -> Result<usize, CliError> {
    let config = resolve_check_config(args)?;
    let features = load_features(&config.features)?;
    let cache = SqliteKnowledgeBase::open(&config.cache_db)?;
    let detector =
        WikimediaLinkIssueDetector::with_parts(cache, BuiltinCountryLanguages, config.detector)?;
    debug!(
        "checking {} features, distance warning above {} km",
        features.len(),
        detector.config().distance_warning_km
    );
    let findings = check_features(&detector, &features, config.informational);
    write_findings(writer, &findings)?;
    let critical = findings
        .iter()
        .filter(|finding| finding.issue.is_critical())
        .count();
    info!("{} findings, {critical} critical", findings.len());
    Ok(findings.len())
}

fn resolve_check_config(args: CheckArgs) -> Result<CheckConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads the JSON array of features from disk.
pub(crate) fn load_features(path: &Utf8Path) -> Result<Vec<FeatureRecord>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field: ARG_FEATURES,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseFeatures {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect findings for every feature, keeping input order. A feature's
/// structural finding precedes its informational one.
pub(crate) fn check_features<K, C>(
    detector: &WikimediaLinkIssueDetector<K, C>,
    features: &[FeatureRecord],
    informational: bool,
) -> Vec<Finding>
where
    K: KnowledgeBase,
    C: CountryLanguages,
{
    let mut findings = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let label = feature
            .id
            .clone()
            .map_or(FeatureLabel::Index(index), FeatureLabel::Id);
        let structural = detector.critical_structural_issue_report(feature.geometry, &feature.tags);
        let extra = if informational {
            let location = location_from_lat_lon(feature.lat, feature.lon);
            detector.informational_issue_report(feature.geometry, &feature.tags, location)
        } else {
            None
        };
        for issue in structural.into_iter().chain(extra) {
            debug!("feature {label:?}: {}", issue.kind);
            findings.push(Finding {
                feature: label.clone(),
                issue,
            });
        }
    }
    findings
}

fn write_findings(writer: &mut dyn Write, findings: &[Finding]) -> Result<(), CliError> {
    for finding in findings {
        let line = serde_json::to_string(finding).map_err(CliError::SerialiseFinding)?;
        writer
            .write_all(line.as_bytes())
            .map_err(CliError::WriteFindings)?;
        writer.write_all(b"\n").map_err(CliError::WriteFindings)?;
    }
    writer.flush().map_err(CliError::WriteFindings)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<CheckConfig, CliError> {
    let merged = CheckArgs::merge_from_layers(layers).map_err(CliError::from)?;
    CheckConfig::try_from(merged)
}
