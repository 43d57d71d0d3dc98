use std::fs;
use std::io::stdout;
use std::path::{Path, PathBuf};

use bool_script::Interpreter;
use bool_script::Lexer;
use bool_script::Parser;
use bool_script::eval::UndefinedVariableError;
use bool_script::lex::LexicalError;
use bool_script::parse::{NestingTooDeep, SyntaxError};
use bool_script::trace::Tracer;
use bool_script::tree::TreeBuilder;
use clap::Parser as _;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::WrapErr;

#[derive(clap::Parser, Debug)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every token of the file.
    Tokenize { filename: PathBuf },
    /// Echo the tokens the parser consumes, without evaluating.
    Trace { filename: PathBuf },
    /// Print each statement as an s-expression.
    Parse { filename: PathBuf },
    /// Evaluate the file, printing one line per `print` statement.
    Run { filename: PathBuf },
}

impl Commands {
    fn filename(&self) -> &Path {
        match self {
            Commands::Tokenize { filename }
            | Commands::Trace { filename }
            | Commands::Parse { filename }
            | Commands::Run { filename } => filename,
        }
    }
}

/// Prints the one-line summary and the rendered report, then exits if the
/// error is one of ours.
fn report(e: miette::Error) -> miette::Error {
    let code = if let Some(lexical) = e.downcast_ref::<LexicalError>() {
        eprintln!(
            "Scanner Error: at line {} char {}",
            lexical.line(),
            lexical.column()
        );
        65
    } else if let Some(syntax) = e.downcast_ref::<SyntaxError>() {
        eprintln!(
            "Parser Error: {syntax} at line {} char {}",
            syntax.line(),
            syntax.column()
        );
        65
    } else if let Some(nested) = e.downcast_ref::<NestingTooDeep>() {
        eprintln!(
            "Parser Error: {nested} at line {} char {}",
            nested.line(),
            nested.column()
        );
        65
    } else if let Some(undefined) = e.downcast_ref::<UndefinedVariableError>() {
        eprintln!(
            "Runtime Error: {undefined} at line {} char {}",
            undefined.line(),
            undefined.column()
        );
        70
    } else {
        return e;
    };
    eprintln!("{e:?}");
    std::process::exit(code);
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    let filename = args.command.filename();
    let file_contents = fs::read_to_string(filename)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;
    let name = filename.to_str();

    match &args.command {
        Commands::Tokenize { .. } => {
            let lexer = Lexer::new(name, &file_contents);
            let eof = lexer.eof();
            for token in lexer {
                let token = token.map_err(report)?;
                println!("{token}");
            }
            println!("{eof}");
        }
        Commands::Trace { .. } => {
            Parser::new(name, &file_contents, Tracer::new(stdout().lock()))
                .and_then(Parser::parse)
                .map_err(report)?;
        }
        Commands::Parse { .. } => {
            let statements = Parser::new(name, &file_contents, TreeBuilder::default())
                .and_then(Parser::parse)
                .map_err(report)?
                .into_statements();
            for statement in statements {
                println!("{statement}");
            }
        }
        Commands::Run { .. } => {
            Interpreter::new(name, &file_contents)
                .run(stdout().lock())
                .map_err(report)?;
        }
    }
    Ok(())
}
