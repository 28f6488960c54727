use console::{Color, Term, style};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

fn stderr_is_tty() -> bool {
    Term::stderr().is_term()
}

fn format_label(label: &str, color: Color, is_tty: bool) -> String {
    if is_tty {
        style(label).bold().fg(color).to_string()
    } else {
        label.to_string()
    }
}

fn write_labeled(
    label: &str,
    color: Color,
    msg: &str,
    w: &mut dyn Write,
    is_tty: bool,
) -> io::Result<()> {
    let label = format_label(label, color, is_tty);
    if msg.is_empty() {
        writeln!(w, "{label}")
    } else {
        writeln!(w, "{label} {msg}")
    }
}

pub fn action(label: &str, msg: &str) {
    let _ = write_labeled(label, Color::Cyan, msg, &mut io::stderr(), stderr_is_tty());
}

pub fn success(label: &str, msg: &str) {
    let _ = write_labeled(label, Color::Green, msg, &mut io::stderr(), stderr_is_tty());
}

pub fn fail(label: &str, msg: &str) {
    let _ = write_labeled(label, Color::Red, msg, &mut io::stderr(), stderr_is_tty());
}

pub fn note(msg: &str) {
    let _ = write_labeled("Note", Color::Yellow, msg, &mut io::stderr(), stderr_is_tty());
}

pub fn detail(msg: &str) {
    let line = if stderr_is_tty() {
        style(format!("  {msg}")).dim().to_string()
    } else {
        format!("  {msg}")
    };
    let _ = writeln!(io::stderr(), "{line}");
}

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}
