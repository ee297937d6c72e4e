fn main() -> anyhow::Result<()> {
    lbahqr::cli::run_cli()
}
