//! sqltpl - a terminal editor for sectioned SQL templates
//!
//! Loads DML/DDL scripts split by `--#Section` markers, shows them per tab
//! and exports them as XML or canonical SQL. Without a subcommand the TUI
//! starts; `example` and `export` run headless.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::{App, EditRequest};
use crate::component::Component;
use crate::config::Config;
use crate::model::{CommandType, Workspace};
use crate::services::export::{render, write_file};
use crate::services::{ExportFormat, FileLoader, LoadOutcome};
use crate::tui::Tui;
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use crossterm::event::Event;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "sqltpl", version, about = "Edit and export sectioned SQL templates")]
struct Cli {
    /// Preload a file into the DML tab
    #[arg(long, value_name = "FILE")]
    dml: Option<PathBuf>,

    /// Preload a file into the DDL tab
    #[arg(long, value_name = "FILE")]
    ddl: Option<PathBuf>,

    /// Bytes read per chunk when loading files
    #[arg(long, global = true, env = "SQLTPL_CHUNK_SIZE")]
    chunk_size: Option<usize>,

    /// Directory exports are written to
    #[arg(long, global = true, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the example template
    Example {
        /// Output path (default: example.sql in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a file and export it without starting the TUI
    Export {
        input: PathBuf,

        /// Command type of the script
        #[arg(long = "type", default_value = "DML", value_parser = parse_command_type)]
        command_type: CommandType,

        /// Output format (default: from config)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Output path (default: <stem>_<type>.<ext> in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_command_type(value: &str) -> Result<CommandType, String> {
    match CommandType::from_tag(value) {
        CommandType::None => Err(format!("expected DML or DDL, got '{}'", value)),
        command_type => Ok(command_type),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(chunk_size) = cli.chunk_size.filter(|size| *size > 0) {
        config.chunk_size = chunk_size;
    }
    if let Some(ref dir) = cli.export_dir {
        config.export_dir = dir.display().to_string();
    }

    match cli.command {
        Some(Commands::Example { output }) => {
            logging::init_stderr()?;
            let path = services::write_example(output.as_deref(), &config.export_dir())?;
            println!("{}", path.display());
            Ok(())
        }
        Some(Commands::Export {
            input,
            command_type,
            format,
            output,
        }) => {
            logging::init_stderr()?;
            let format = format.unwrap_or(config.export_format);
            let path = export_headless(&config, &input, command_type, format, output)?;
            println!("{}", path.display());
            Ok(())
        }
        None => run_tui(config, cli.dml, cli.ddl),
    }
}

/// Load `input` through the chunked loader and export it
fn export_headless(
    config: &Config,
    input: &std::path::Path,
    command_type: CommandType,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let mut loader = FileLoader::new(config.chunk_size);
    if !loader.start(command_type, input) {
        bail!("nothing to load from '{}'", input.display());
    }

    let mut workspace = Workspace::new();
    match loader.wait(command_type) {
        Some(LoadOutcome::Loaded {
            file_name, text, ..
        }) => {
            workspace.load(command_type, text, file_name);
        }
        Some(LoadOutcome::Failed { error, .. }) => return Err(error.into()),
        None => bail!("load of '{}' did not start", input.display()),
    }

    let controller = workspace
        .controller(command_type)
        .ok_or_else(|| anyhow!("no {} content loaded", command_type))?;

    match output {
        Some(path) => {
            if !controller.download_enabled() {
                bail!("'{}' has no content to export", input.display());
            }
            write_file(&path, &render(controller, format)?)?;
            Ok(path)
        }
        None => services::export_tab(controller, format, &config.export_dir())?
            .ok_or_else(|| anyhow!("'{}' has no content to export", input.display())),
    }
}

fn run_tui(config: Config, dml: Option<PathBuf>, ddl: Option<PathBuf>) -> Result<()> {
    match logging::init_file() {
        Ok(Some(path)) => tracing::info!(log = %path.display(), "sqltpl starting"),
        Ok(None) => {}
        Err(e) => eprintln!("Logging disabled: {}", e),
    }

    let mut app = App::new(config, Config::config_path());
    for (command_type, path) in [(CommandType::Dml, dml), (CommandType::Ddl, ddl)] {
        if let Some(path) = path {
            app.update(Action::ImportFile(command_type, path.display().to_string()))?;
        }
    }

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "sqltpl exited with an error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("sqltpl exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        if let Some(request) = app.pending_edit.take() {
            launch_external_editor(tui, app, &request)?;
            continue;
        }

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Paste(text) => Some(Action::Paste(text)),
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

/// Hand a buffer or section to the external editor and apply the result
fn launch_external_editor(tui: &mut Tui, app: &mut App, request: &EditRequest) -> Result<()> {
    let Some(seed) = app.edit_seed(request) else {
        return Ok(());
    };

    let path = std::env::temp_dir().join(request.file_name());
    if let Err(e) = fs::write(&path, &seed) {
        app.error = Some(format!("Could not create {}: {}", path.display(), e));
        return Ok(());
    }

    let editor = app.config.editor_command();
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        app.error = Some("No editor configured".to_string());
        return Ok(());
    };
    tracing::info!(editor = %editor, file = %path.display(), "launching editor");

    tui.suspend()?;
    let status = Command::new(program).args(parts).arg(&path).status();
    tui.resume()?;

    match status {
        Ok(exit_status) if exit_status.success() => match fs::read_to_string(&path) {
            Ok(text) => app.apply_edit(request, text),
            Err(e) => app.error = Some(format!("Could not read edited file: {}", e)),
        },
        Ok(exit_status) => {
            app.error = Some(format!("Editor exited with status: {}", exit_status));
        }
        Err(e) => {
            app.error = Some(format!("Failed to launch editor '{}': {}", editor, e));
        }
    }

    if let Err(e) = fs::remove_file(&path) {
        tracing::debug!(file = %path.display(), error = %e, "could not remove scratch file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        Config {
            export_dir: dir.path().display().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_command_type() {
        assert_eq!(parse_command_type("ddl"), Ok(CommandType::Ddl));
        assert_eq!(parse_command_type(" DML "), Ok(CommandType::Dml));
        assert!(parse_command_type("dcl").is_err());
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "sqltpl", "export", "a.sql", "--type", "ddl", "--format", "sql", "-o", "out.sql",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Export {
                command_type,
                format,
                output,
                ..
            }) => {
                assert_eq!(command_type, CommandType::Ddl);
                assert_eq!(format, Some(ExportFormat::Sql));
                assert_eq!(output, Some(PathBuf::from("out.sql")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_export_headless_into_export_dir() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("orders.sql");
        fs::write(&input, "--#MainSQL\r\n/*--!*/\r\nUPDATE t SET a = 1;\r\n").unwrap();

        let path = export_headless(
            &config_for(&dir),
            &input,
            CommandType::Dml,
            ExportFormat::Xml,
            None,
        )
        .unwrap();
        assert_eq!(path, dir.path().join("orders_dml.xml"));
        let xml = fs::read_to_string(path).unwrap();
        assert!(xml.contains("<MainSQL><![CDATA[UPDATE t SET a = 1;]]></MainSQL>"));
    }

    #[test]
    fn test_export_headless_explicit_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("schema.sql");
        fs::write(&input, "--#PreSQL\nCREATE TABLE t (id INT)").unwrap();
        let output = dir.path().join("out").join("schema.sql");

        export_headless(
            &config_for(&dir),
            &input,
            CommandType::Ddl,
            ExportFormat::Sql,
            Some(output.clone()),
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "--#PreSQL\n/*--!*/\nCREATE TABLE t (id INT)"
        );
    }

    #[test]
    fn test_export_headless_rejects_empty_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("blank.sql");
        fs::write(&input, "\n\n").unwrap();

        let result = export_headless(
            &config_for(&dir),
            &input,
            CommandType::Dml,
            ExportFormat::Xml,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_export_headless_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = export_headless(
            &config_for(&dir),
            &dir.path().join("nope.sql"),
            CommandType::Dml,
            ExportFormat::Xml,
            None,
        );
        assert!(result.is_err());
    }
}
