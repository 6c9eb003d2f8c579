use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let args = iif_journal::args::parse();
    iif_journal::cli::main(args)
}
