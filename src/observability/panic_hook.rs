//! Custom panic hook for structured crash reports.
//!
//! Any panic that escapes the pipeline is a bug. The report says which
//! command, phase and snapshot were active so it can be reproduced.

use super::context::{get_current_context, PipelineContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the crash-report hook. Call once at the start of `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();

    eprintln!();
    print_rule('=');
    print_line("REPOPULSE CRASH REPORT");
    print_line(&format!("Version: {VERSION}"));
    print_line(&format!("Platform: {}", std::env::consts::OS));
    print_rule('-');
    print_panic_details(info);
    print_context_section(&context);
    print_rule('-');
    if std::env::var("RUST_BACKTRACE").is_ok() {
        print_line("STACK TRACE:");
        print_rule('=');
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        print_line("Run with RUST_BACKTRACE=1 for stack trace");
        print_rule('=');
    }
    if let Some(snapshot) = &context.snapshot {
        eprintln!("Include this report and the snapshot: {}", snapshot.display());
    }
}

fn print_rule(ch: char) {
    eprintln!("{}", ch.to_string().repeat(WIDTH));
}

fn print_line(text: &str) {
    eprintln!("  {}", truncate(text, WIDTH - 2));
}

fn print_panic_details(info: &PanicHookInfo<'_>) {
    print_line(&format!("PANIC: {}", extract_panic_message(info)));
    if let Some(location) = info.location() {
        print_line(&format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }
}

fn print_context_section(context: &PipelineContext) {
    print_line("OPERATION CONTEXT:");
    if let Some(command) = &context.command {
        print_line(&format!("  Command: {command}"));
    }
    match &context.phase {
        Some(phase) => print_line(&format!("  Phase: {phase}")),
        None => print_line("  Phase: (not set - crash occurred before the pipeline started)"),
    }
    if let Some(metadata) = Span::current().metadata() {
        print_line(&format!("  Span: {}", metadata.name()));
    }
    if let Some(snapshot) = &context.snapshot {
        print_line(&format!("  Snapshot: {}", snapshot.display()));
    }
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("snapshot path that is far too long to fit", 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
