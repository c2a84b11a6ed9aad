use clap::CommandFactory;
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

#[path = "src/cli.rs"]
mod cli;

const BIN_NAME: &str = "switchgen";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let cmd = cli::Cli::command();

    write_man_pages(&out_dir.join("man"), &cmd)?;
    write_completions(&out_dir.join("completions"), cmd)?;

    Ok(())
}

/// `switchgen.1` plus one `switchgen-<subcommand>.1` page per subcommand
fn write_man_pages(man_dir: &Path, cmd: &clap::Command) -> Result<()> {
    fs::create_dir_all(man_dir)?;
    render_man(man_dir, Man::new(cmd.clone()), BIN_NAME)?;

    for sub in cmd.get_subcommands() {
        let page = format!("{BIN_NAME}-{}", sub.get_name());
        render_man(man_dir, Man::new(sub.clone()).title(page.clone()), &page)?;
    }
    Ok(())
}

fn render_man(man_dir: &Path, man: Man, page: &str) -> Result<()> {
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join(format!("{page}.1")), buffer)
}

fn write_completions(comp_dir: &Path, mut cmd: clap::Command) -> Result<()> {
    fs::create_dir_all(comp_dir)?;
    for shell in [Shell::Bash, Shell::Fish, Shell::Zsh] {
        generate_to(shell, &mut cmd, BIN_NAME, comp_dir)?;
    }
    Ok(())
}
