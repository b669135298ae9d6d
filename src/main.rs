use std::io::Write;
use std::process;

use kancil::{
    executor::{query::QueryEngine, scan::ScanIterator},
    planner::{command::Command, parser::CommandParser},
    types::error::Result as DbResult,
};
use rustyline::{DefaultEditor, error::ReadlineError};

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: kancil <database> [command]");
        process::exit(1);
    };
    let engine = match QueryEngine::open(&path) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    match args.next() {
        Some(command) => {
            if let Err(err) = run_command(&engine, &command) {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
        None => {
            if let Err(err) = run_shell(&engine) {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
    }
}

fn run_command(engine: &QueryEngine, input: &str) -> DbResult<()> {
    let command = CommandParser::new().parse(input)?;
    match command {
        Command::DbInfo => {
            let info = engine.database_info()?;
            println!("database page size: {}", info.page_size);
            println!("number of tables: {}", info.object_count);
        }
        Command::Tables => {
            for name in engine.object_names()? {
                println!("{}", name);
            }
        }
        Command::CountRows { table } => {
            println!("{}", engine.count_rows(&table)?);
        }
        Command::Select { table, columns } => {
            let scanner = engine.select_columns(&table, &columns)?;
            for row in ScanIterator::new(scanner) {
                let row = row?;
                let line = row
                    .values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("|");
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn read_multiline_command(rl: &mut DefaultEditor) -> rustyline::Result<String> {
    let mut input = String::new();
    let mut prompt = "kancil> ".to_string();
    loop {
        let line = rl.readline(&prompt)?;
        let trimmed = line.trim_end();
        // A trailing backslash continues the command on the next line.
        if let Some(without_backslash) = trimmed.strip_suffix('\\') {
            input.push_str(without_backslash);
            input.push(' ');
            prompt = "     -> ".to_string();
        } else {
            input.push_str(trimmed);
            break;
        }
    }
    Ok(input)
}

fn print_help() {
    println!(
        r#"
Available commands:
  .dbinfo                       - Page size and number of tables
  .tables                       - List table names
  select count(*) from <table>  - Count rows
  select <cols> from <table>    - Project columns, one row per line
  help, h                       - Show this help message
  clear                         - Clear the screen
  exit, quit, q                 - Leave the shell

Use '\' at the end of a line for multiline input.
Use Up/Down arrows to navigate command history.
"#
    );
}

fn run_shell(engine: &QueryEngine) -> rustyline::Result<()> {
    println!(
        "kancil shell over {} — 'help' for commands",
        engine.database().path.display()
    );
    let mut rl = DefaultEditor::new()?;
    loop {
        match read_multiline_command(&mut rl) {
            Ok(input) => {
                let command = input.trim();
                if command.is_empty() {
                    continue;
                }
                rl.add_history_entry(command)?;
                match command.to_lowercase().as_str() {
                    "exit" | "quit" | "q" => {
                        println!("Goodbye!");
                        break;
                    }
                    "help" | "h" => print_help(),
                    "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                        let _ = std::io::stdout().flush();
                    }
                    _ => {
                        // A failed query ends the command, not the shell.
                        if let Err(err) = run_command(engine, command) {
                            eprintln!("{}", err);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
