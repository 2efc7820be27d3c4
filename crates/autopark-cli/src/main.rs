mod command;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    command::run()
}
