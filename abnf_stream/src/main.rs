use abnf_stream::config::runtime::RuntimeConfig;
use abnf_stream::syntax::{self, Library, Matcher, PRODUCTIONS};
use abnf_stream::utils::{line_of, Span};
use abnf_stream::{lexical, logging, Token};
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    // Validate module configuration
    lexical::init_lexical_analysis_logging()?;
    syntax::init_syntax_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file> [--rule NAME] [--json]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let options = parse_options(&args[2..]);
    let source = match fs::read_to_string(&args[1]) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", args[1], error);
            std::process::exit(1);
        }
    };

    if let Err(error) = run(&source, &options) {
        eprintln!("\nFAILED: {}", error);
        eprintln!("  Code: {}", error.error_code());
        if let Some(span) = error.span() {
            print_location(&source, span);
        }
        std::process::exit(1);
    }

    Ok(())
}

struct Options {
    rule: String,
    json: bool,
}

fn print_help(program_name: &str) {
    println!("abnf_stream v{}", env!("CARGO_PKG_VERSION"));
    println!("Match a source file one token at a time against a grammar production");
    println!();
    println!("USAGE:");
    println!("    {} <file> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help          Show this help message");
    println!("    --rule NAME     Production to match (default: declaration)");
    println!("    --json          Print the match report as JSON");
    println!();
    println!("PRODUCTIONS:");
    println!("    {}", PRODUCTIONS.join(", "));
    println!();
    println!("ENVIRONMENT:");
    println!("    ABNF_TRACE_MATCHES=true            Log every token step at debug level");
    println!("    ABNF_LOGGING_ENABLE_CONSOLE=true   Print log events to the console");
    println!("    ABNF_LOGGING_MIN_LEVEL=debug       Minimum level to record");
    println!();
    if let Ok(preferences) = RuntimeConfig::current().to_toml() {
        println!("EFFECTIVE PREFERENCES:");
        println!("{}", preferences);
    }
    print!("{}", logging::get_system_diagnostics());
}

/// Echo the offending line with a caret under the start of `span`
fn print_location(source: &str, span: Span) {
    let start = span.start();
    if let Some(line) = line_of(source, start.line) {
        let indent = " ".repeat(start.column.saturating_sub(1) as usize);
        eprintln!("  {:>4} | {}", start.line, line);
        eprintln!("       | {}^", indent);
    }
}

fn parse_options(args: &[String]) -> Options {
    let mut options = Options {
        rule: "declaration".to_string(),
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--rule" => {
                if i + 1 < args.len() {
                    options.rule = args[i + 1].clone();
                    i += 1;
                } else {
                    eprintln!("Warning: --rule requires a production name");
                }
            }
            "--json" => {
                options.json = true;
            }
            _ => {
                eprintln!("Warning: Unknown option '{}'", args[i]);
            }
        }
        i += 1;
    }

    options
}

fn run(source: &str, options: &Options) -> syntax::SyntaxResult<()> {
    if options.json {
        let report = syntax::match_source(source, &options.rule)?;
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(error) => eprintln!("Error: cannot serialize report: {}", error),
        }
        return Ok(());
    }

    let mut library = Library::new();
    let root = library.require(&options.rule)?;
    let tokens = lexical::tokenize(source)?;

    println!("Matching {} tokens against '{}'", tokens.len(), options.rule);

    let mut matcher = Matcher::new(library.grammar_mut(), root);
    for token in tokens {
        let result = matcher.feed(token)?;
        let marker = match matcher.steps().last() {
            Some(step) if step.restarted => "*",
            _ => " ",
        };
        let text = if token.value == Token::Eof {
            ""
        } else {
            token.span.slice(source).unwrap_or("")
        };
        println!(
            "{:>10} {}{:<12} {:<16} {}",
            token.span.to_string(),
            marker,
            token.value.to_string(),
            result.to_string(),
            text
        );
    }

    let completions = matcher.completions();
    let report = matcher.into_report();
    println!();
    println!("SUCCESS: {} complete match(es)", completions);
    println!(
        "Grammar: {} rules, {} nested instances, max depth {}",
        report.grammar.rules, report.grammar.nested_instances, report.grammar.max_depth
    );

    Ok(())
}
