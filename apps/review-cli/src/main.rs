fn main() -> anyhow::Result<()> {
    review_cli::run()
}
