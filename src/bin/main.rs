//! Entry point for the binary.

use std::io::Write;

use log::{info, Level};
use wfolearn::common::*;

/// Formats log records.
fn format(
    fmt: &mut env_logger::fmt::Formatter,
    record: &log::Record,
    styles: &Styles,
) -> std::io::Result<()> {
    let mut s = String::new();
    match record.level() {
        Level::Error => {
            s.push_str(&format!("({}\n\"", styles.bad("error")));
            let mut pref = "";
            for line in format!("{}", record.args()).lines() {
                s.push_str(&format!("{}{}", pref, line));
                pref = "\n"
            }
            s.push_str("\"\n)")
        }
        Level::Warn => {
            s.push_str(&format!("; {}", styles.sad("|===| Warning:")));
            for line in format!("{}", record.args()).lines() {
                s.push_str(&format!("\n; {} {}", styles.sad("|"), line))
            }
            s.push_str(&format!("\n; {}", styles.sad("|===|")))
        }
        Level::Trace => {
            s.push_str(&format!(
                "; |===| Trace ({}):",
                styles.emph(record.target())
            ));
            for line in format!("{}", record.args()).lines() {
                s.push_str(&format!("\n; | {}", line))
            }
            s.push_str("\n; |===|")
        }
        Level::Info | Level::Debug => {
            let mut pref = "; ";
            for line in format!("{}", record.args()).lines() {
                if line.is_empty() {
                    s.push('\n')
                } else {
                    s.push_str(pref);
                    s.push_str(line)
                }
                pref = "\n; "
            }
        }
    }
    writeln!(fmt, "{}", s)
}

fn main() {
    let conf = Config::clap();

    // Initialize log.
    let styles = conf.styles().clone();
    if let Err(e) = env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .format(move |fmt, record| format(fmt, record, &styles))
        .filter(None, conf.log_filter())
        .try_init()
    {
        println!("Error while initializing logger:");
        println!("{}", e);
        std::process::exit(2)
    }

    // Work and report error if any.
    match wfolearn::work(&conf) {
        Ok(res) => {
            info!(
                "{} after {} iteration(s), {} failed engine run(s) ({} timeout(s)): {}",
                conf.happy("done"),
                res.iterations,
                res.failed_tasks,
                res.timeouts,
                res.status.desc()
            );
            std::process::exit(0)
        }
        Err(errs) => {
            print_err(&errs);
            std::process::exit(2)
        }
    }
}
