use crate::cmd::ContextCommand;
use owo_colors::OwoColorize;
use stepctx::{Result, context::ContextState, prompt::{Prompter, setup_context}};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "AUTHORITY")]
    authority: String,
    #[tabled(rename = "PROFILE")]
    profile: String,
}

pub fn handle(action: ContextCommand, state: &mut ContextState, prompter: &dyn Prompter) -> Result<()> {
    match action {
        ContextCommand::Current => match state.current() {
            Some(ctx) => println!("{}", ctx.name),
            None => println!("No current context set."),
        },
        ContextCommand::List => {
            let current = state.current().map(|ctx| ctx.name.clone());
            let rows: Vec<Row> = state
                .list_alphabetical()
                .into_iter()
                .map(|ctx| Row {
                    marker: if current.as_deref() == Some(ctx.name.as_str()) { "*" } else { "" },
                    name: ctx.name.clone(),
                    authority: ctx.authority.clone(),
                    profile: ctx.profile.clone(),
                })
                .collect();

            if rows.is_empty() {
                println!("No contexts configured.");
            } else {
                println!("{}", Table::new(rows).with(Style::blank()));
            }
        }
        ContextCommand::Select { name } => {
            state.save_current(&name)?;
            println!("Current context set to '{}'.", name.bold());
        }
        ContextCommand::Add {
            name,
            authority,
            profile,
        } => {
            let ctx = setup_context(prompter, &name, authority, profile)?;
            let was_current = state.current().is_some();
            state.add(ctx)?;

            if was_current {
                println!("Context '{}' saved.", name.bold());
            } else {
                println!("Context '{}' saved and set as current.", name.bold());
            }
        }
        ContextCommand::Remove { name } => {
            state.remove(&name)?;
            println!("Removed context '{}'.", name.bold());
        }
    }

    Ok(())
}
