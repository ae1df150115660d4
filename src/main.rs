use clap::Parser;
use git_tutor::core::{
    error::Result,
    output::{print_error, print_hint, print_info, print_outcome, print_step_header, print_success},
};
use git_tutor::tutorial::TutorialEngine;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-tutor")]
#[command(about = "An interactive, state-checked Git tutorial")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Directory holding the session (workspace and simulated remote).
    /// Defaults to a per-process directory under the system temp dir.
    #[arg(long)]
    session_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let session_dir = cli.session_dir.unwrap_or_else(|| {
        env::temp_dir().join(format!("git-tutor-{}", std::process::id()))
    });
    std::fs::create_dir_all(&session_dir)?;

    let mut engine = TutorialEngine::new(&session_dir);
    engine.initialize()?;

    print_info("Welcome to git-tutor. Type :help for the session commands.");
    show_step(&engine);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == ":quit" || trimmed == ":q" {
            break;
        }

        let before = engine.state().current_step;
        if let Err(err) = handle_line(&mut engine, trimmed, &mut lines) {
            print_error(&err.to_string());
        }
        if engine.state().is_completed {
            print_success("Tutorial completed. Well done!");
            break;
        }
        if engine.state().current_step != before {
            show_step(&engine);
        }
    }

    Ok(())
}

fn show_step(engine: &TutorialEngine) {
    let step = engine.current_step();
    print_step_header(step.id, step.title, step.instruction);
    if let Some(label) = step.validation_button_label {
        print_info(&format!("{label} with :check when you are done."));
    }
}

fn handle_line(
    engine: &mut TutorialEngine,
    line: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    if !line.starts_with(':') {
        let outcome = engine.execute_command(line)?;
        print_outcome(&outcome);
        return Ok(());
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        ":next" | ":n" => {
            if !engine.next_step() {
                print_error("This step completes through repository state, not :next");
            }
        }
        ":check" => {
            let result = engine.validate_current_step()?;
            if result.passed {
                print_success(&result.message);
            } else {
                print_error(&result.message);
                if let Some(hint) = &result.hint {
                    print_hint(hint);
                }
            }
        }
        ":edit" if !rest.is_empty() => {
            println!("Enter the file content; finish with a single '.' line:");
            let mut content = String::new();
            for entry in lines {
                let entry = entry?;
                if entry == "." {
                    break;
                }
                content.push_str(&entry);
                content.push('\n');
            }
            let outcome = engine.edit_file(rest, &content)?;
            print_outcome(&outcome);
        }
        ":open" if !rest.is_empty() => match engine.read_file(rest) {
            Ok(content) => print!("{content}"),
            Err(err) => print_error(&err.to_string()),
        },
        ":files" => {
            for path in engine.get_file_list()? {
                println!("{path}");
            }
        }
        ":state" => {
            let tutorial = serde_json::to_string_pretty(engine.state())?;
            let git = serde_json::to_string_pretty(&engine.git_state()?)?;
            println!("{tutorial}\n{git}");
        }
        ":stage" if !rest.is_empty() => print_outcome(&engine.stage_file(rest)?),
        ":unstage" if !rest.is_empty() => print_outcome(&engine.unstage_file(rest)?),
        ":commit" if !rest.is_empty() => print_outcome(&engine.commit(rest)?),
        ":push" => print_outcome(&engine.push()?),
        ":hint" => {
            let hints = engine.current_step().hints;
            if hints.is_empty() {
                print_info("No hints for this step.");
            } else {
                for hint in hints {
                    print_hint(hint);
                }
            }
        }
        ":switch" if !rest.is_empty() => print_outcome(&engine.switch_branch(rest)?),
        ":branch" if !rest.is_empty() => print_outcome(&engine.create_branch(rest)?),
        ":reset" => {
            engine.reset()?;
            print_success("Session reset");
            show_step(engine);
        }
        ":help" | ":h" => print_help(),
        other => print_error(&format!("Unknown session command: {other}")),
    }
    Ok(())
}

fn print_help() {
    print_info(
        "Type git commands directly (e.g. git status), or use:\n\
         :next             advance past an instructional step\n\
         :check            check the current step's requirements\n\
         :hint             show the current step's hints\n\
         :edit <path>      edit a workspace file (end input with '.')\n\
         :open <path>      print a workspace file\n\
         :files            list workspace files\n\
         :state            dump tutorial and repository state as JSON\n\
         :stage <path>     stage a file (interface action)\n\
         :unstage <path>   unstage a file (interface action)\n\
         :commit <msg>     commit staged changes (interface action)\n\
         :push             push the current branch (interface action)\n\
         :switch <branch>  switch branches (interface action)\n\
         :branch <name>    create and switch to a branch (interface action)\n\
         :reset            wipe the session and start over\n\
         :quit             leave the tutorial",
    )
}
