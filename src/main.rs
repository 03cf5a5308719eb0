//! Resume tailor: role-targeted resume restructuring and keyword coverage tool

use clap::Parser;
use colored::Colorize;
use log::{error, info, warn};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction};
use resume_tailor::external::{CommandTypesetter, DirectoryUploader, Typesetter, Uploader};
use resume_tailor::output::{resolve_report_path, save_report_to_file, ReportGenerator};
use resume_tailor::workflow::{GenerateRequest, Workflow};
use resume_tailor::{Config, Result, ResumeTailorError};
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, &config, cli.config.as_deref()) {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands, config: &Config, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Generate {
            resume,
            job_type,
            template,
            structure,
            role,
            keywords,
            output,
            basename,
            pdf,
            upload,
            no_formatting,
        } => {
            if let Some(structure) = &structure {
                cli::validate_file_extension(structure, &["json"])
                    .map_err(|e| ResumeTailorError::InvalidInput(format!("Structure file: {}", e)))?;
            }

            let typesetter = if pdf {
                Some(CommandTypesetter::from_config(&config.typesetting)?)
            } else {
                None
            };
            let uploader = if upload {
                let destination = config.upload_destination().ok_or_else(|| {
                    ResumeTailorError::Configuration("upload.destination is not set".to_string())
                })?;
                Some(DirectoryUploader::new(destination))
            } else {
                None
            };

            let mut workflow = Workflow::new(config);
            let base = GenerateRequest {
                structure,
                role,
                keywords,
                output_dir: output,
                basename,
                apply_formatting: no_formatting.then_some(false),
                ..GenerateRequest::default()
            };
            let request = match resume {
                Some(resume) => GenerateRequest { resume, ..base },
                None => {
                    let job_type = job_type.as_deref().unwrap_or(&config.job_types.default_job_type);
                    workflow.job_type_request(job_type, template.as_deref(), base)?
                }
            };

            info!("Generating resume from {}", request.resume.display());
            let outcome = workflow.generate(
                &request,
                typesetter.as_ref().map(|t| t as &dyn Typesetter),
                uploader.as_ref().map(|u| u as &dyn Uploader),
            )?;

            println!(
                "{} {}",
                "Resume written:".green().bold(),
                outcome.output.display()
            );
            println!(
                "Source keyword coverage: {:.1}% ({} missing)",
                outcome.coverage.percentage,
                outcome.coverage.missing.len()
            );
            if let Some(artifact) = &outcome.artifact {
                println!("{} {}", "PDF:".green().bold(), artifact.display());
            }
            if let Some(receipt) = &outcome.upload {
                let verb = if receipt.created { "Uploaded:" } else { "Updated:" };
                println!("{} {}", verb.green().bold(), receipt.destination.display());
            }
            for warning in &outcome.warnings {
                println!("{} {}", "Warning:".yellow().bold(), warning);
            }
        }

        Commands::Analyze {
            resume,
            role,
            keywords,
            output,
            save,
        } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeTailorError::InvalidInput)?,
                None => config.output.format,
            };

            let mut workflow = Workflow::new(config);
            let report = workflow.analyze(&resume, role.as_deref(), keywords.as_deref())?;

            let use_colors = config.output.color_output && save.is_none();
            let content = ReportGenerator::with_options(use_colors, true)
                .with_missing_limit(config.output.missing_limit)
                .generate_report(&report, &format)?;

            match save {
                Some(save) => {
                    let path = resolve_report_path(&save, &format, &resume);
                    save_report_to_file(&content, &path)?;
                    println!("{} {}", "Report saved:".green().bold(), path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Keywords { input, output, role } => {
            let role = role.as_deref().unwrap_or(&config.corpus.default_role);
            let workflow = Workflow::new(config);
            let top = workflow.build_corpus(&input, &output, role)?;

            println!("{} {}", "Corpus written:".green().bold(), output.display());
            if !top.is_empty() {
                println!("Top high priority keywords: {}", top.join(", "));
            }
        }

        Commands::Parse { resume, save } => {
            let mut workflow = Workflow::new(config);
            let (_, structure) = workflow.parse(&resume)?;
            if structure.is_empty() {
                warn!("No sections found in {}", resume.display());
            }
            let json = serde_json::to_string_pretty(&structure)?;

            match save {
                Some(path) => {
                    save_report_to_file(&json, &path)?;
                    println!("{} {}", "Structure saved:".green().bold(), path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(config)
                    .map_err(|e| ResumeTailorError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                let path = config_path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("{} {}", "Configuration reset:".green().bold(), path.display());
            }

            Some(ConfigAction::Path) => {
                let path = config_path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}
