use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use survey_flow::{FlowConfig, QuestionRecord, QuestionSet, SurveyFlow};
use survey_flow_dialoguer::{DialoguerError, DialoguerRunner};
use tracing::{info, warn};

mod files;
mod telemetry;

use files::{FileSource, JsonSink};

#[derive(Parser, Debug)]
#[command(
    name = "survey-cli",
    about = "Run a survey in the terminal and write the answers as JSON",
    version
)]
struct Cli {
    /// Question set JSON file; the bundled survey is used if it cannot be read
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Flow configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Survey id, also selects the bundled fallback survey
    #[arg(long, default_value = "onboarding")]
    survey_id: String,
    /// Override the configured survey language
    #[arg(long)]
    language: Option<String>,
    /// Write the answers to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Disable colored prompts
    #[arg(long)]
    plain: bool,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    let mut config = load_config(cli.config.as_ref()).await?;
    if let Some(language) = cli.language.clone() {
        config = config.with_language(language);
    }

    let fallback = bundled(&cli.survey_id)?;
    let questions = match &cli.questions {
        Some(path) => {
            QuestionSet::load(&FileSource::new(path), &cli.survey_id, fallback, &config).await
        }
        None => QuestionSet::from_records(fallback, &config),
    };
    info!(survey_id = %cli.survey_id, questions = questions.len(), "survey loaded");

    let mut flow = SurveyFlow::new(cli.survey_id.clone(), questions, &config);
    let runner = if cli.plain {
        DialoguerRunner::plain()
    } else {
        DialoguerRunner::new()
    };
    let sink = JsonSink::new(cli.output.clone());

    match runner.run(&mut flow, &sink).await {
        Ok(receipt) => {
            if let Some(path) = receipt.reference {
                eprintln!("Answers written to {path}");
            }
            Ok(())
        }
        Err(DialoguerError::Cancelled) => {
            eprintln!("Survey cancelled");
            flow.close();
            Ok(())
        }
        Err(err) => Err(err).context("survey failed"),
    }
}

async fn load_config(path: Option<&PathBuf>) -> Result<FlowConfig> {
    let Some(path) = path else {
        return Ok(FlowConfig::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config {}", path.display()))?;
    FlowConfig::from_json_str(&json).with_context(|| format!("invalid config {}", path.display()))
}

/// The bundled survey for `survey_id`, or the onboarding survey.
fn bundled(survey_id: &str) -> Result<Vec<QuestionRecord>> {
    let records = match example_surveys::by_id(survey_id) {
        Some(records) => records,
        None => {
            warn!(survey_id, "no bundled survey with this id, using onboarding");
            example_surveys::onboarding()
        }
    };
    records.context("bundled survey is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["survey-cli"]);
        assert_eq!(cli.survey_id, "onboarding");
        assert_eq!(cli.log_level, "warn");
        assert!(cli.questions.is_none());
        assert!(!cli.plain);
    }

    #[test]
    fn all_flags() {
        let cli = Cli::parse_from([
            "survey-cli",
            "--questions",
            "q.json",
            "--config",
            "c.json",
            "--survey-id",
            "rewards_ru",
            "--output",
            "out.json",
            "--plain",
        ]);
        assert_eq!(cli.questions, Some(PathBuf::from("q.json")));
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert_eq!(cli.survey_id, "rewards_ru");
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.plain);
    }

    #[test]
    fn unknown_survey_falls_back_to_onboarding() {
        assert_eq!(bundled("missing").unwrap().len(), 8);
        assert_eq!(bundled("rewards_ru").unwrap().len(), 6);
    }

    #[tokio::test]
    async fn missing_config_path_uses_defaults() {
        assert_eq!(load_config(None).await.unwrap(), FlowConfig::default());
    }
}
