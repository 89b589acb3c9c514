//! rxc compiler driver
//!
//! Reads a JSON-serialized typed program, lowers it to IR and writes the
//! module as text or as JSON.

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use rxc_common::CompilerError;
use rxc_frontend::ir::Module;
use rxc_frontend::Frontend;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rxc")]
#[command(about = "rxc compiler - typed AST to IR lowering")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log lowering progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lower a typed program to IR
    Lower {
        /// Input typed AST (JSON)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Emit::Ir)]
        emit: Emit,

        /// Module name (defaults to the input file stem)
        #[arg(long)]
        module_name: Option<String>,
    },

    /// Lower a typed program and report errors without writing output
    Check {
        /// Input typed AST (JSON)
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Textual IR
    Ir,
    /// The module serialized as JSON
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Lower { input, output, emit, module_name } => {
            lower_file(&input, output.as_deref(), emit, module_name.as_deref())
        }
        Commands::Check { input } => check_file(&input),
    };

    if let Err(e) = result {
        eprintln!("{}", report(&e));
        std::process::exit(if e.is_internal() { 101 } else { 1 });
    }
}

fn report(e: &CompilerError) -> String {
    if e.is_internal() {
        format!("error: {e}\nnote: this is a bug in rxc, not in the input program")
    } else {
        format!("error: {e}")
    }
}

fn default_module_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main")
        .to_string()
}

fn lower_module(input: &Path, module_name: Option<&str>) -> Result<Module, CompilerError> {
    let json = fs::read_to_string(input)?;
    let name = module_name.map_or_else(|| default_module_name(input), str::to_string);
    info!("Lowering {} as module '{name}'", input.display());
    Frontend::lower_json(&json, &name)
}

fn render(module: &Module, emit: Emit) -> Result<String, CompilerError> {
    match emit {
        Emit::Ir => Ok(module.to_string()),
        Emit::Json => serde_json::to_string_pretty(module)
            .map_err(|e| CompilerError::InternalError {
                message: format!("failed to serialize module: {e}"),
            }),
    }
}

fn lower_file(
    input: &Path,
    output: Option<&Path>,
    emit: Emit,
    module_name: Option<&str>,
) -> Result<(), CompilerError> {
    let module = lower_module(input, module_name)?;
    debug!(
        "Module contains {} functions, {} structs, {} globals",
        module.functions.len(),
        module.structs.len(),
        module.globals.len()
    );

    let text = render(&module, emit)?;
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn check_file(input: &Path) -> Result<(), CompilerError> {
    let module = lower_module(input, None)?;
    println!("{}: ok ({} functions)", input.display(), module.functions.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lower_command() {
        let cli = Cli::try_parse_from(["rxc", "lower", "prog.json", "--emit", "json", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Lower { input, output, emit, module_name } => {
                assert_eq!(input, PathBuf::from("prog.json"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert_eq!(emit, Emit::Json);
                assert_eq!(module_name, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["rxc", "check", "prog.json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check { .. }));
    }

    #[test]
    fn test_default_module_name() {
        assert_eq!(default_module_name(Path::new("dir/demo.json")), "demo");
    }

    #[test]
    fn test_report_flags_internal_errors() {
        let input = CompilerError::input_error("bad json".to_string());
        assert_eq!(report(&input), "error: Invalid input: bad json");
        let internal = CompilerError::from("no open block".to_string());
        assert!(report(&internal).ends_with("not in the input program"));
    }

    #[test]
    fn test_render_ir_and_json() {
        let module = Module::new("empty".to_string());
        assert_eq!(render(&module, Emit::Ir).unwrap(), "; ModuleID = 'empty'\n");
        let json = render(&module, Emit::Json).unwrap();
        assert!(json.contains("\"name\": \"empty\""));
    }
}
