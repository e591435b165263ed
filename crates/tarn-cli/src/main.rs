use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use tarn::ast::{self, Block};
use tarn::{CompileError, Compiler, CompilerConfig, Module, VerbosityLevel};

#[derive(Parser)]
#[command(name = "tarn")]
#[command(about = "tarn - type check, run and compile tarn syntax trees")]
#[command(version = "0.1.0")]
#[command(author = "Gianluca Brigandi <gbrigand@gmail.com>")]
struct Cli {
    /// JSON file with compiler settings; flags override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type check a program without generating code.
    Check { input: PathBuf },

    /// JIT-compile a program and run it; its `main` result becomes the exit code.
    Run {
        input: PathBuf,

        #[arg(long)]
        print_clif: bool,
    },

    /// Write a relocatable object file.
    Build {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short = 'O', long)]
        optimize: bool,

        #[arg(long)]
        print_clif: bool,
    },

    /// Print the lowered IR.
    EmitIr {
        input: PathBuf,

        /// Print Cranelift IR instead of tarn IR.
        #[arg(long)]
        clif: bool,

        #[arg(long)]
        no_color: bool,

        #[arg(long, value_enum)]
        detail: Option<Detail>,
    },

    /// Print a program back as source text.
    Ast { input: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Detail {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl From<Detail> for VerbosityLevel {
    fn from(detail: Detail) -> Self {
        match detail {
            Detail::Quiet => VerbosityLevel::Quiet,
            Detail::Normal => VerbosityLevel::Normal,
            Detail::Verbose => VerbosityLevel::Verbose,
            Detail::Debug => VerbosityLevel::Debug,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };

    match cli.command {
        Commands::Check { input } => cmd_check(config, &input),
        Commands::Run { input, print_clif } => cmd_run(
            CompilerConfig {
                print_clif: print_clif || config.print_clif,
                ..config
            },
            &input,
        ),
        Commands::Build {
            input,
            output,
            optimize,
            print_clif,
        } => cmd_build(
            CompilerConfig {
                optimize: optimize || config.optimize,
                print_clif: print_clif || config.print_clif,
                output: output.unwrap_or(config.output.clone()),
                ..config
            },
            &input,
        ),
        Commands::EmitIr {
            input,
            clif,
            no_color,
            detail,
        } => {
            let mut config = config;
            if no_color {
                config.emitter.use_colors = false;
            }
            if let Some(detail) = detail {
                config.emitter.verbosity = detail.into();
            }
            cmd_emit_ir(config, &input, clif)
        }
        Commands::Ast { input } => cmd_ast(&input),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn module_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main")
        .to_string()
}

fn load(compiler: &Compiler, input: &Path) -> Result<Block> {
    compiler
        .load(input)
        .with_context(|| format!("failed to load {}", input.display()))
}

/// Diagnostics are printed one per line and end the process; any other
/// failure is handed back to `main`.
fn report(err: CompileError) -> anyhow::Error {
    if err.diagnostics().is_empty() {
        return err.into();
    }
    for diagnostic in err.diagnostics() {
        eprintln!("{} {}", "error:".bright_red().bold(), diagnostic);
    }
    std::process::exit(1)
}

fn lower(compiler: &Compiler, input: &Path) -> Result<Module> {
    let program = load(compiler, input)?;
    compiler
        .lower(&program, &module_name(input))
        .map_err(report)
}

fn cmd_check(config: CompilerConfig, input: &Path) -> Result<()> {
    let compiler = Compiler::new(config);
    let program = load(&compiler, input)?;

    match compiler.type_check(&program) {
        Ok(()) => {
            println!("{} {}", "VALID".bright_green().bold(), input.display());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "INVALID".bright_red().bold(), input.display());
            Err(report(e))
        }
    }
}

fn cmd_run(config: CompilerConfig, input: &Path) -> Result<()> {
    let compiler = Compiler::new(config);
    let module = lower(&compiler, input)?;
    let exit_code = compiler.execute(&module)?;
    std::process::exit(exit_code)
}

fn cmd_build(config: CompilerConfig, input: &Path) -> Result<()> {
    let compiler = Compiler::new(config);
    let module = lower(&compiler, input)?;
    let path = compiler.emit_object(&module, None)?;

    println!(
        "{} wrote {}",
        "SUCCESS:".bright_green().bold(),
        path.display()
    );
    Ok(())
}

fn cmd_emit_ir(config: CompilerConfig, input: &Path, clif: bool) -> Result<()> {
    let compiler = Compiler::new(config);
    let module = lower(&compiler, input)?;

    let text = if clif {
        compiler.clif_listing(&module)?
    } else {
        compiler.emit_ir(&module)?
    };
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_ast(input: &Path) -> Result<()> {
    let compiler = Compiler::default();
    let program = load(&compiler, input)?;
    print!("{}", ast::render_program(&program));
    Ok(())
}
