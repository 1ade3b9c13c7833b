fn main() -> anyhow::Result<()> {
    xtaskops::tasks::main()
}
