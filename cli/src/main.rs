mod command;
mod dialog;

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use clap::Parser;
use todo_core::{TodoPage, TodoService, TodoStore, UreqTransport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use command::{Command, HELP};
use dialog::TerminalDialog;

/// Terminal client for the todo API.
#[derive(Debug, Parser)]
#[command(name = "todo", version, about)]
struct Args {
    /// Base URL of the todo API.
    #[arg(long, env = "TODO_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,
}

type Page = TodoPage<UreqTransport, TerminalDialog>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    tracing::debug!(api_url = %args.api_url, "starting");

    let mut page = TodoPage::new(
        TodoService::connect(&args.api_url),
        TodoStore::new(),
        TerminalDialog,
    );

    let dirty = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dirty);
    page.store_mut().subscribe(move |_| flag.set(true));

    page.mount();
    print!("{}", page.render());
    println!("type `help` for commands");
    dirty.set(false);

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(command::CommandError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        run(&mut page, &command);
        if dirty.replace(false) || command.redraws() {
            print!("{}", page.render());
        }
    }

    Ok(())
}

fn run(page: &mut Page, command: &Command) {
    match command {
        Command::List => {
            page.mount();
        }
        Command::Add { title, description } => {
            page.set_title(title.as_str());
            page.set_description(description.clone().unwrap_or_default());
            page.submit();
        }
        Command::Toggle(row) => {
            if let Some(id) = row_id(page, *row) {
                page.toggle(id);
            }
        }
        Command::Edit(row) => {
            if let Some(id) = row_id(page, *row) {
                page.start_edit(id);
            }
        }
        Command::Title(text) => {
            if !page.set_edit_title(text.as_str()) {
                println!("not editing; use `edit <n>` first");
            }
        }
        Command::Desc(text) => {
            if !page.set_edit_description(text.as_str()) {
                println!("not editing; use `edit <n>` first");
            }
        }
        Command::Save => {
            if page.editing().is_none() {
                println!("not editing; use `edit <n>` first");
            } else {
                page.save_edit();
            }
        }
        Command::Cancel => page.cancel_edit(),
        Command::Delete(row) => {
            if let Some(id) = row_id(page, *row) {
                page.delete(id);
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn row_id(page: &Page, row: usize) -> Option<Uuid> {
    let id = page.todo_id_at(row);
    if id.is_none() {
        println!("no row {row}");
    }
    id
}
