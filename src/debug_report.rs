use dictrans::{Error, RunResult, Term, TermSet};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub struct Report<'a> {
    pub input: &'a str,
    pub target_lang: &'a str,
    pub translator: &'a str,
    pub terms: &'a TermSet,
    pub skipped: &'a [Error],
    pub run: &'a RunResult,
}

pub fn print_run(report: &Report<'_>, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Translating: \"{}\"", report.input), ansi::CYAN)));
    println!(
        "  {} {}  {} {}",
        palette.dim("to:"),
        palette.paint(report.target_lang, ansi::BLUE),
        palette.dim("│ as:"),
        palette.paint(report.translator, ansi::BLUE),
    );

    println!("\n{}", palette.paint("━━━ Dictionary ━━━", ansi::GRAY));
    print_terms(report, &palette);

    println!("\n{}", palette.paint("━━━ Backend ━━━", ansi::GRAY));
    print_backend(report.run, &palette);

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(&report.run.text, ansi::GREEN)));

    let timings = &report.run.metrics.timings;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Prepare: {}  │  Backend: {}  │  Finish: {}",
        palette.paint(format!("{:?}", timings.total), ansi::GREEN),
        palette.paint(format!("{:?}", timings.prepare), ansi::CYAN),
        palette.paint(format!("{:?}", timings.backend), ansi::CYAN),
        palette.dim(format!("{:?}", timings.finish)),
    );
    println!();
}

fn print_terms(report: &Report<'_>, palette: &ansi::Palette) {
    let user = report.terms.len() - report.terms.builtin_len();
    println!(
        "  {} {}  {} {}",
        palette.dim("loaded:"),
        palette.paint(format!("{user} terms"), ansi::GREEN),
        palette.dim("│ built-in:"),
        palette.paint(report.terms.builtin_len().to_string(), ansi::BLUE),
    );
    for term in report.terms.user_terms().take(10) {
        let config = term.config();
        println!(
            "    {} {} {}",
            palette.paint(format!("{:<11}", config.stage.as_str()), ansi::CYAN),
            palette.dim(format!("p{:+}", config.priority)),
            term.source(),
        );
    }
    if user > 10 {
        println!("    {}", palette.dim(format!("... +{} more", user - 10)));
    }

    if report.skipped.is_empty() {
        return;
    }
    println!("  {} {}", palette.dim("skipped:"), palette.paint(report.skipped.len().to_string(), ansi::YELLOW));
    for err in report.skipped.iter().take(5) {
        println!("    {}", palette.paint(err.to_string(), ansi::YELLOW));
    }
    if report.skipped.len() > 5 {
        println!("    {}", palette.dim(format!("... +{} more", report.skipped.len() - 5)));
    }
}

fn print_backend(run: &RunResult, palette: &ansi::Palette) {
    let metrics = &run.metrics;
    println!(
        "  {} {}  {} {}",
        palette.dim("markers:"),
        palette.paint(metrics.markers.to_string(), ansi::YELLOW),
        palette.dim("│ escaped:"),
        palette.paint(metrics.escaped.to_string(), ansi::YELLOW),
    );
    println!("  {} {}", palette.paint("sent:    ", ansi::BLUE), metrics.encoded);
    if metrics.translated == metrics.encoded {
        println!("  {} {}", palette.paint("received:", ansi::BLUE), palette.dim("(unchanged)"));
    } else {
        println!("  {} {}", palette.paint("received:", ansi::BLUE), metrics.translated);
    }
}
