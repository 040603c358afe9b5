//! capa compiler CLI

use capac::commands::{
    build, check, explain_code, parse_build_options, BuildOptions, CommandError, Report,
};

fn main() {
    capac::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: capac build <units.json> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  -o, --out=<dir>     Output directory (default: generated)");
                eprintln!("  --package=<pkg>     Java package of the generated sources");
                eprintln!("  --factory=<Name>    Entry-point class name (default: Dsl)");
                eprintln!("  --runtime=<pkg>     Package of Sql/Query (default: capa.runtime)");
                eprintln!("  --max-warnings=<n>  Report at most n warnings");
                eprintln!("  -v, --verbose       List every written file");
                std::process::exit(1);
            }
            let options = collect_options(&args[2..]);
            match build(&options) {
                Ok(report) => {
                    print_warnings(&report);
                    if options.verbose {
                        for path in &report.written {
                            println!("wrote {}", path.display());
                        }
                    }
                    println!(
                        "{} definitions written to {}",
                        report.written.len(),
                        options.output_dir().display()
                    );
                }
                Err(err) => fail(&err),
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: capac check <units.json> [--factory=<Name>] [--runtime=<pkg>]");
                std::process::exit(1);
            }
            let options = collect_options(&args[2..]);
            match check(&options) {
                Ok(report) => {
                    print_warnings(&report);
                    println!(
                        "ok: {} definitions, {} warnings",
                        report.definitions,
                        report.warnings.len()
                    );
                }
                Err(err) => fail(&err),
            }
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: capac explain <CODE>");
                eprintln!("Example: capac explain E2003");
                std::process::exit(1);
            }
            let Some(description) = explain_code(&args[2]) else {
                eprintln!("Unknown error code: {}", args[2]);
                eprintln!();
                eprintln!("Codes have the format EXXXX (errors) or WXXXX (warnings).");
                std::process::exit(1);
            };
            println!("{}: {description}", args[2].to_uppercase());
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("capa compiler {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Parse command arguments one at a time, handling `-o <dir>` specially
/// (needs lookahead).
fn collect_options(args: &[String]) -> BuildOptions {
    let mut options = BuildOptions::default();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-o" && i + 1 < args.len() {
            options.out_dir = Some(std::path::PathBuf::from(&args[i + 1]));
            i += 2;
        } else {
            let parsed = parse_build_options(&args[i..=i]);
            options.merge(&parsed);
            i += 1;
        }
    }
    options
}

fn print_warnings(report: &Report) {
    for warning in &report.warnings {
        eprintln!("{}", warning.render());
    }
}

fn fail(err: &CommandError) -> ! {
    let diagnostics = err.diagnostics();
    if diagnostics.is_empty() {
        eprintln!("error: {err}");
    } else {
        for diagnostic in &diagnostics {
            eprintln!("{}", diagnostic.render());
        }
    }
    std::process::exit(1);
}

fn print_usage() {
    println!("capa compiler");
    println!();
    println!("Usage: capac <command> [options]");
    println!();
    println!("Commands:");
    println!("  build <units.json>   Compile declaration units to Java sources");
    println!("  check <units.json>   Compile without writing anything");
    println!("  explain <code>       Explain a diagnostic code (e.g., E2003)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Build options:");
    println!("  -o, --out=<dir>     Output directory (default: generated)");
    println!("  --package=<pkg>     Java package of the generated sources");
    println!("  --factory=<Name>    Entry-point class name (default: Dsl)");
    println!("  --runtime=<pkg>     Package of Sql/Query (default: capa.runtime)");
    println!("  --max-warnings=<n>  Report at most n warnings");
    println!("  -v, --verbose       List every written file");
    println!();
    println!("Examples:");
    println!("  capac build grammar.json --out=src/main/java/sql --package=com.example.sql");
    println!("  capac check grammar.json");
    println!("  capac explain W4001");
    println!();
    println!("Set RUST_LOG=capa_model=debug for engine traces.");
}
