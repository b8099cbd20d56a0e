use std::sync::Arc;

use quotesearch_core::config::{AppConfig, LoadOptions};
use quotesearch_core::{Fulfillment, QuoteDataset};
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_DATASET};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const SAMPLE_REQUEST: &[u8] = br#"{"result":{"action":"get_quote_event","parameters":{}}}"#;

/// Exit code follows the first failing check: config issues exit 2, dataset
/// and sample fulfillment issues exit 3.
pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = exit_code(&report);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn exit_code(report: &DoctorReport) -> u8 {
    match report.checks.iter().find(|check| check.status == CheckStatus::Fail) {
        None => 0,
        Some(check) if check.name == "config_validation" => EXIT_CONFIG,
        Some(_) => EXIT_DATASET,
    }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match check_dataset(&config) {
                (check, Some(dataset)) => {
                    checks.push(check);
                    checks.push(check_sample_fulfillment(dataset));
                }
                (check, None) => {
                    checks.push(check);
                    checks.push(skipped("sample_fulfillment", "dataset did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("dataset_load", "configuration did not load"));
            checks.push(skipped("sample_fulfillment", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

fn check_dataset(config: &AppConfig) -> (DoctorCheck, Option<QuoteDataset>) {
    match QuoteDataset::from_path(&config.dataset.path) {
        Ok(dataset) if dataset.is_empty() => (
            DoctorCheck {
                name: "dataset_load",
                status: CheckStatus::Fail,
                details: format!("`{}` has a header but no quotes", config.dataset.path.display()),
            },
            None,
        ),
        Ok(dataset) => {
            let stats = dataset.stats();
            (
                DoctorCheck {
                    name: "dataset_load",
                    status: CheckStatus::Pass,
                    details: format!(
                        "loaded {} quotes, {} authors, {} topics, {} bios from `{}`",
                        stats.quotes,
                        stats.authors,
                        stats.topics,
                        stats.bios,
                        config.dataset.path.display()
                    ),
                },
                Some(dataset),
            )
        }
        Err(error) => (
            DoctorCheck {
                name: "dataset_load",
                status: CheckStatus::Fail,
                details: error.to_string(),
            },
            None,
        ),
    }
}

fn check_sample_fulfillment(dataset: QuoteDataset) -> DoctorCheck {
    let fulfillment = Fulfillment::new(Arc::new(dataset));
    match fulfillment.handle(SAMPLE_REQUEST) {
        Ok(fulfilled) if fulfilled.found() => DoctorCheck {
            name: "sample_fulfillment",
            status: CheckStatus::Pass,
            details: "get_quote_event without slots returned a quote".to_string(),
        },
        Ok(_) => DoctorCheck {
            name: "sample_fulfillment",
            status: CheckStatus::Fail,
            details: "get_quote_event without slots found no quote".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "sample_fulfillment",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
