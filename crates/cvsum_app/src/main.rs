mod args;
mod config;
mod controller;
mod effects;
mod logging;
mod render;
mod report;

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use cvsum_core::{parse_questions, LifecyclePhase, Msg, UploadFile};
use cvsum_engine::ReqwestGateway;
use cvsum_logging::{cvsum_error, cvsum_info};

use args::{parse_args, CliArgs, Command, USAGE};
use config::{ClientConfig, DEFAULT_CONFIG_PATH};
use controller::Controller;

const EXIT_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config =
        ClientConfig::load(&config_path)?.with_overrides(|key| env::var(key).ok(), &args);
    logging::initialize(config.log_destination, logging::level_for(args.verbose));
    cvsum_info!(
        "Using {} (mock={}, sync={})",
        config.api_base_url,
        config.use_mock,
        args.sync
    );

    let question_text = collect_questions(&args)?;
    let file = args.file.as_deref().map(load_upload).transpose()?;

    let gateway = ReqwestGateway::new(config.gateway_settings()).context("configuring gateway")?;
    let mut controller =
        Controller::new(Arc::new(gateway), io::stdout()).context("starting engine")?;

    let submit = if args.sync {
        Msg::SummarizeClicked
    } else {
        Msg::SubmitClicked
    };
    let view = controller.run(vec![
        Msg::FileSelected(file),
        Msg::QuestionsChanged(question_text.clone()),
        Msg::UseMockToggled(config.use_mock),
        submit,
    ]);
    controller.teardown();

    let result = match (view.phase, view.result.as_ref()) {
        (LifecyclePhase::Completed, Some(result)) => result,
        _ => return Ok(ExitCode::from(EXIT_FAILED)),
    };
    println!();
    print!("{}", render::report(result));

    if let Some(target) = &args.save {
        let questions = parse_questions(&question_text);
        match report::save_report(
            target,
            view.current_job_id.as_deref(),
            &questions,
            result,
            Utc::now(),
        ) {
            Ok(path) => println!("\nSaved report to {}", path.display()),
            Err(err) => {
                cvsum_error!("{:#}", err);
                eprintln!("error: {err:#}");
                return Ok(ExitCode::from(EXIT_FAILED));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Questions from `--question` flags first, then from `--questions-file`, one per line.
fn collect_questions(args: &CliArgs) -> Result<String> {
    let mut lines = args.questions.clone();
    if let Some(path) = &args.questions_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading questions from {}", path.display()))?;
        lines.extend(content.lines().map(str::to_string));
    }
    Ok(lines.join("\n"))
}

fn load_upload(path: &Path) -> Result<UploadFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(filename, mime_for(path), bytes))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn flags_and_file_questions_are_merged() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Which languages?\n\nYears of Rust?").unwrap();
        let args = CliArgs {
            questions: vec!["What is the candidate's experience?".to_string()],
            questions_file: Some(file.path().to_path_buf()),
            ..CliArgs::default()
        };

        let text = collect_questions(&args).unwrap();
        assert_eq!(
            parse_questions(&text),
            vec![
                "What is the candidate's experience?".to_string(),
                "Which languages?".to_string(),
                "Years of Rust?".to_string(),
            ]
        );
    }

    #[test]
    fn upload_keeps_file_name_and_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Resume.PDF");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let upload = load_upload(&path).unwrap();
        assert_eq!(upload.filename, "Resume.PDF");
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.bytes, b"%PDF-1.7".to_vec());
        assert_eq!(mime_for(Path::new("cv.docx")), "application/octet-stream");
    }

    #[test]
    fn missing_upload_is_reported_with_path() {
        let err = load_upload(Path::new("/nonexistent/cv.pdf")).unwrap_err();
        assert_eq!(err.to_string(), "reading /nonexistent/cv.pdf");
    }
}
