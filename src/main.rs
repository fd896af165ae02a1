use clap::{Parser as ClapParser, Subcommand};
use docexpr::cli::{self, CliError, CompileCommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "docexpr")]
#[command(about = "docexpr - compile filter and sort expressions over JSON documents to SQLite")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression to a SQL fragment
    Compile {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,

        /// Column holding the document root
        #[arg(long)]
        root: Option<String>,

        /// Column holding the row identifier
        #[arg(long)]
        row_id: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Print the optimized syntax tree instead of SQL
        #[arg(long)]
        ast: bool,
    },

    /// List the tokens of an expression
    Tokens {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,
    },

    /// Show the language reference
    Docs,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            expression,
            root,
            row_id,
            pretty,
            ast,
        } => run_compile(expression, root, row_id, pretty, ast),
        Commands::Tokens { expression } => run_tokens(expression),
        Commands::Docs => {
            print!("{}", cli::get_docs());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_expression(expression: Option<String>) -> Result<String, CliError> {
    match expression {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_compile(
    expression: Option<String>,
    root: Option<String>,
    row_id: Option<String>,
    pretty: bool,
    ast: bool,
) -> Result<(), CliError> {
    let command = CompileCommand {
        expression: read_expression(expression)?,
        root_column: root,
        row_id_column: row_id,
        ast,
    };

    let output = cli::execute_compile(&command)?;
    println!("{}", output.render(pretty));
    Ok(())
}

fn run_tokens(expression: Option<String>) -> Result<(), CliError> {
    let expression = read_expression(expression)?;
    for line in cli::execute_tokens(&expression)? {
        println!("{line}");
    }
    Ok(())
}
