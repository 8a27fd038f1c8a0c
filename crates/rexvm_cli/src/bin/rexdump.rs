use rexvm::compiler::parser;
use rexvm::{RegexOptions, compile};
use std::env;

fn print_usage() {
    println!("Usage: rexdump [-imnsxre] [--tree] <pattern>");
    println!();
    println!("  -i  ignore case            -m  multiline");
    println!("  -n  explicit capture       -s  singleline");
    println!("  -x  ignore whitespace      -r  right to left");
    println!("  -e  ECMAScript             --tree  also print the parse tree");
}

fn parse_flags(flags: &str, options: &mut RegexOptions) -> Result<(), char> {
    for ch in flags.chars() {
        let flag = match ch {
            'i' => RegexOptions::IGNORE_CASE,
            'm' => RegexOptions::MULTILINE,
            'n' => RegexOptions::EXPLICIT_CAPTURE,
            's' => RegexOptions::SINGLELINE,
            'x' => RegexOptions::IGNORE_PATTERN_WHITESPACE,
            'r' => RegexOptions::RIGHT_TO_LEFT,
            'e' => RegexOptions::ECMA_SCRIPT,
            _ => return Err(ch),
        };
        options.insert(flag);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let mut options = RegexOptions::empty();
    let mut show_tree = false;
    let mut pattern = None;

    for arg in env::args().skip(1) {
        if arg == "--tree" {
            show_tree = true;
        } else if arg == "-h" || arg == "--help" {
            print_usage();
            return;
        } else if pattern.is_none() && arg.len() > 1 && arg.starts_with('-') {
            if let Err(ch) = parse_flags(&arg[1..], &mut options) {
                eprintln!("Unknown flag '-{}'", ch);
                std::process::exit(2);
            }
        } else if pattern.is_none() {
            pattern = Some(arg);
        } else {
            eprintln!("Unexpected argument '{}'", arg);
            std::process::exit(2);
        }
    }

    let Some(pattern) = pattern else {
        print_usage();
        std::process::exit(0);
    };

    if show_tree {
        match parser::parse(&pattern, options) {
            Ok(tree) => {
                println!("=== Tree ===");
                println!("{}", tree.dump());
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    match compile(&pattern, options) {
        Ok(program) => {
            println!("=== Program ===");
            print!("{}", program);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
