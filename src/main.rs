mod cli;
mod logging;
mod manifest;
mod provision;
mod readme;
mod report;
mod runner;
mod templates;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
