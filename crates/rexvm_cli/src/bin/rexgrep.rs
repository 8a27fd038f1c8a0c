use log::debug;
use rexvm::{Match, Regex, RegexConfig, RegexOptions};
use std::env;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Duration;

struct Args {
    pattern: String,
    files: Vec<String>,
    config: RegexConfig,
    line_numbers: bool,
    only_matching: bool,
    count: bool,
    json: bool,
}

fn print_usage() {
    println!("Usage: rexgrep [options] <pattern> [file...]");
    println!();
    println!("  -i, -m, -n, -s, -x, -r, -e   regex options (see rexdump)");
    println!("  --line-number                prefix output with line numbers");
    println!("  --only-matching              print each match instead of the line");
    println!("  --count                      print the number of matching lines");
    println!("  --timeout <ms>               per-match time limit");
    #[cfg(feature = "json")]
    println!("  --json                       one JSON object per match");
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut config = RegexConfig::default();
    let mut pattern = None;
    let mut files = Vec::new();
    let mut line_numbers = false;
    let mut only_matching = false;
    let mut count = false;
    let mut json = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--line-number" => line_numbers = true,
            "--only-matching" => only_matching = true,
            "--count" => count = true,
            "--json" if cfg!(feature = "json") => json = true,
            "--timeout" => {
                let ms = args
                    .next()
                    .and_then(|v| v.parse::<u64>().ok())
                    .ok_or("--timeout expects milliseconds")?;
                config.match_timeout = Some(Duration::from_millis(ms));
            }
            flags if pattern.is_none() && flags.len() > 1 && flags.starts_with('-') => {
                for ch in flags[1..].chars() {
                    config.options.insert(match ch {
                        'i' => RegexOptions::IGNORE_CASE,
                        'm' => RegexOptions::MULTILINE,
                        'n' => RegexOptions::EXPLICIT_CAPTURE,
                        's' => RegexOptions::SINGLELINE,
                        'x' => RegexOptions::IGNORE_PATTERN_WHITESPACE,
                        'r' => RegexOptions::RIGHT_TO_LEFT,
                        'e' => RegexOptions::ECMA_SCRIPT,
                        _ => return Err(format!("Unknown flag '-{}'", ch)),
                    });
                }
            }
            _ if pattern.is_none() => pattern = Some(arg.clone()),
            _ => files.push(arg.clone()),
        }
    }

    let Some(pattern) = pattern else {
        return Ok(None);
    };
    Ok(Some(Args {
        pattern,
        files,
        config,
        line_numbers,
        only_matching,
        count,
        json,
    }))
}

struct Searcher<'a> {
    args: &'a Args,
    regex: Regex,
    out: io::StdoutLock<'static>,
}

impl Searcher<'_> {
    /// Returns the number of matching lines.
    fn search<R: BufRead>(&mut self, name: &str, reader: R) -> io::Result<usize> {
        let mut matched_lines = 0;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let mut matches = Vec::new();
            for m in self.regex.matches(&line) {
                match m {
                    Ok(m) => matches.push(m),
                    Err(e) => {
                        eprintln!("{}:{}: {}", name, line_no, e);
                        break;
                    }
                }
                if !self.args.only_matching && !self.args.json {
                    break;
                }
            }
            if matches.is_empty() {
                continue;
            }
            matched_lines += 1;
            if !self.args.count {
                self.report(name, line_no, &line, &matches)?;
            }
        }
        Ok(matched_lines)
    }

    fn report(&mut self, name: &str, line_no: usize, line: &str, matches: &[Match]) -> io::Result<()> {
        if self.args.json {
            return self.report_json(name, line_no, matches);
        }

        let prefix = match (self.args.files.len() > 1, self.args.line_numbers) {
            (true, true) => format!("{}:{}:", name, line_no),
            (true, false) => format!("{}:", name),
            (false, true) => format!("{}:", line_no),
            (false, false) => String::new(),
        };
        if self.args.only_matching {
            for m in matches {
                writeln!(self.out, "{}{}", prefix, m.value())?;
            }
        } else {
            writeln!(self.out, "{}{}", prefix, line)?;
        }
        Ok(())
    }
}

impl Searcher<'_> {
    #[cfg(feature = "json")]
    fn report_json(&mut self, name: &str, line_no: usize, matches: &[Match]) -> io::Result<()> {
        for m in matches {
            let record = serde_json::json!({
                "file": name,
                "line": line_no,
                "index": m.index(),
                "length": m.length(),
                "value": m.value(),
                "groups": m.groups(),
            });
            writeln!(self.out, "{}", record)?;
        }
        Ok(())
    }

    #[cfg(not(feature = "json"))]
    fn report_json(&mut self, _name: &str, _line_no: usize, _matches: &[Match]) -> io::Result<()> {
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let regex = match Regex::with_config(&args.pattern, &args.config) {
        Ok(regex) => regex,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut searcher = Searcher {
        args: &args,
        regex,
        out: io::stdout().lock(),
    };

    let mut total = 0;
    let mut failed = false;
    if args.files.is_empty() {
        match searcher.search("(standard input)", io::stdin().lock()) {
            Ok(n) => total += n,
            Err(e) => {
                eprintln!("(standard input): {}", e);
                failed = true;
            }
        }
    } else {
        for file in &args.files {
            debug!("searching {}", file);
            let result = fs::File::open(file).and_then(|f| searcher.search(file, BufReader::new(f)));
            match result {
                Ok(n) if args.count && args.files.len() > 1 => {
                    let _ = writeln!(searcher.out, "{}:{}", file, n);
                    total += n;
                }
                Ok(n) => total += n,
                Err(e) => {
                    eprintln!("{}: {}", file, e);
                    failed = true;
                }
            }
        }
    }

    if args.count && args.files.len() <= 1 {
        let _ = writeln!(searcher.out, "{}", total);
    }
    let code = if failed {
        2
    } else if total == 0 {
        1
    } else {
        0
    };
    std::process::exit(code);
}
