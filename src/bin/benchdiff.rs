use std::{env, process};

use benchdiff::{cli::CommandLineConfig, pipeline};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let summary = match pipeline::run(&config.compare) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("error: {err}");
                process::exit(1);
            }
        }
    } else {
        print!("{}", summary.render_text());
    }
}
