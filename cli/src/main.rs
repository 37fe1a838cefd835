//! ruta CLI — driving adapter for the ruta routing engine.
//!
//! Subcommands:
//! - `check <routes>` — validate a route table loads without conflicts
//! - `resolve <routes> <METHOD> <PATH>` — resolve one request against the table
//! - `routes <routes>` — print the registered route table

use std::process;

use ruta::{Method, RouteOutcome, RouteTableConfig, Router};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "check" => cmd_check(&args[2..]),
        "resolve" => cmd_resolve(&args[2..]),
        "routes" => cmd_routes(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("check requires a route table file path".into());
    }

    let router = load_router(&args[0])?;
    println!("Route table valid ({} routes)", router.len());
    Ok(())
}

fn cmd_resolve(args: &[String]) -> Result<(), String> {
    if args.len() < 3 {
        return Err("resolve requires <routes> <METHOD> <PATH>".into());
    }

    let router = load_router(&args[0])?;
    let method: Method = args[1]
        .parse()
        .map_err(|e| format!("invalid method: {e}"))?;

    let mut bindings = router.bindings();
    match router.find(method, &args[2], &mut bindings) {
        RouteOutcome::Matched(action) => {
            println!("{action}");
            if let Some(pattern) = bindings.matched_pattern() {
                println!("  pattern: {pattern}");
            }
            for (name, value) in bindings.iter() {
                println!("  {name} = {value}");
            }
        }
        RouteOutcome::MethodNotAllowed { allowed } => {
            let allowed: Vec<&str> = allowed.iter().map(Method::as_str).collect();
            println!("(method not allowed — allowed: {})", allowed.join(", "));
        }
        RouteOutcome::NotFound => println!("(not found)"),
    }

    Ok(())
}

fn cmd_routes(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("routes requires a route table file path".into());
    }

    let router = load_router(&args[0])?;
    for route in router.routes() {
        let method = route.method.map_or("ANY", |m| m.as_str());
        println!("{method:<7} {}", route.pattern);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Route table loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_router(path: &str) -> Result<Router<String>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: RouteTableConfig = if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))?
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))?
    };

    config
        .into_router()
        .map_err(|e| format!("route table invalid: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Usage
// ═══════════════════════════════════════════════════════════════════════════════

fn print_usage() {
    eprintln!(
        "ruta — radix-trie URL router

USAGE:
    ruta check <routes.{{yaml,json}}>
    ruta resolve <routes.{{yaml,json}}> <METHOD> <PATH>
    ruta routes <routes.{{yaml,json}}>

EXAMPLES:
    ruta check routes.yaml
    ruta resolve routes.yaml GET /users/42
    ruta routes routes.yaml"
    );
}
