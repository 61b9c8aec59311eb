fn main() -> anyhow::Result<()> {
    welcome_ngin::start()
}
