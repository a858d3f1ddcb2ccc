use std::io::{self, Write};

use camino::Utf8Path;

const RULE_WIDTH: usize = 50;

const NOTEBOOKS: [&str; 6] = [
    "1_data_aggregator.ipynb",
    "2_data_splitter.ipynb",
    "3_alpha_signals_generator.ipynb",
    "4_rnn_trainer.ipynb",
    "5_erl_trainer.ipynb",
    "6_erl_evaluator.ipynb",
];

/// Human-readable progress output. Not a stable format.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn banner(&mut self) -> io::Result<()> {
        self.line("🚀 FinRL Pipeline Data Setup")?;
        self.rule()
    }

    pub fn provisioning_started(&mut self) -> io::Result<()> {
        self.line("Creating directory structure...")
    }

    pub fn dir_ready(&mut self, dir: &Utf8Path) -> io::Result<()> {
        writeln!(self.out, "✓ Created: {}", dir)
    }

    pub fn dir_exists(&mut self, dir: &Utf8Path) -> io::Result<()> {
        writeln!(self.out, "✓ Exists: {}", dir)
    }

    pub fn dir_planned(&mut self, dir: &Utf8Path) -> io::Result<()> {
        writeln!(self.out, "  would create: {}", dir)
    }

    pub fn provisioning_finished(&mut self, dry_run: bool) -> io::Result<()> {
        if dry_run {
            self.line("\nDirectory structure checked (dry run).")
        } else {
            self.line("\nDirectory structure created successfully!")
        }
    }

    pub fn readme_written(&mut self, path: &str) -> io::Result<()> {
        writeln!(self.out, "✓ Created {} with detailed information", path)
    }

    pub fn readme_planned(&mut self, path: &str) -> io::Result<()> {
        writeln!(self.out, "  would write: {}", path)
    }

    pub fn completed(&mut self, dry_run: bool) -> io::Result<()> {
        self.line("")?;
        self.rule()?;
        if dry_run {
            self.line("✅ Dry run complete, nothing was changed.")?;
        } else {
            self.line("✅ Setup complete!")?;
        }
        self.line("\nNext steps:")?;
        self.line(
            "1. Place your BTC_1sec_with_sentiment_risk_train.csv file in the data/ directory",
        )?;
        self.line("2. Run the pipeline notebooks in sequence:")?;
        for notebook in NOTEBOOKS {
            writeln!(self.out, "   - {}", notebook)?;
        }
        self.line("\nFor detailed instructions, see README.md")
    }
}
