mod cli;
mod paths;
mod run;
mod state;

use anyhow::Result;
use cli::Command;
use fieldgen::SceneKind;
use renderer::PainterBackend;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Scenes) => {
            list_scenes();
            Ok(())
        }
        None => run::run(cli.run),
    }
}

fn list_scenes() {
    println!("Available scenes:");
    for kind in SceneKind::all() {
        println!(
            "  {:<10} {:<20} default backend: {}",
            kind.id(),
            kind.name(),
            PainterBackend::default_for(*kind)
        );
    }
}
