use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Actor, CompletionFunction, Engine};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub username: String,
        pub password: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "sponsor_admin")]
#[command(about = "Admin utilities for the sponsorship service (users, followers, origins, completion rules)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./sponsor.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Follower(Follower),
    Origin(Origin),
    Journal(Journal),
    Rule(Rule),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Follower {
    #[command(subcommand)]
    command: FollowerCommand,
}

#[derive(Subcommand, Debug)]
enum FollowerCommand {
    /// Assign the user following substitute searches for a language.
    Set(FollowerSetArgs),
}

#[derive(Args, Debug)]
struct FollowerSetArgs {
    /// Two-letter language code, e.g. `fr`.
    #[arg(long)]
    lang: String,
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Origin {
    #[command(subcommand)]
    command: OriginCommand,
}

#[derive(Subcommand, Debug)]
enum OriginCommand {
    Create(OriginCreateArgs),
}

#[derive(Args, Debug)]
struct OriginCreateArgs {
    #[arg(long)]
    name: String,
    /// Origin type; `sub` marks substitute sponsorships.
    #[arg(long = "type", default_value = "sub")]
    kind: String,
}

#[derive(Args, Debug)]
struct Journal {
    #[command(subcommand)]
    command: JournalCommand,
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    Create(JournalCreateArgs),
}

#[derive(Args, Debug)]
struct JournalCreateArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Rule {
    #[command(subcommand)]
    command: RuleCommand,
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    Create(RuleCreateArgs),
}

#[derive(Args, Debug)]
struct RuleCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value_t = 10)]
    sequence: i32,
    /// `get_from_amount`, `get_from_move_line_ref` or `get_from_payment_line`.
    #[arg(long, value_parser = parse_function)]
    function: CompletionFunction,
    /// Journals enabling the rule (repeatable).
    #[arg(long = "journal")]
    journals: Vec<Uuid>,
}

fn parse_function(raw: &str) -> Result<CompletionFunction, String> {
    CompletionFunction::try_from(raw).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db.clone()).build().await?;
    let actor = Actor::System;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::Follower(Follower {
            command: FollowerCommand::Set(args),
        }) => {
            engine
                .set_sds_follower(&args.lang, &args.username, &actor)
                .await?;
            println!("{} follows substitutes for {}", args.username, args.lang);
        }
        Command::Origin(Origin {
            command: OriginCommand::Create(args),
        }) => {
            let origin_id = engine.new_origin(&args.name, &args.kind, &actor).await?;
            println!("created origin: {} ({origin_id})", args.name);
        }
        Command::Journal(Journal {
            command: JournalCommand::Create(args),
        }) => {
            let journal_id = engine.new_journal(&args.name, &actor).await?;
            println!("created journal: {} ({journal_id})", args.name);
        }
        Command::Rule(Rule {
            command: RuleCommand::Create(args),
        }) => {
            let rule_id = engine
                .new_completion_rule(
                    &args.name,
                    args.sequence,
                    args.function,
                    &args.journals,
                    &actor,
                )
                .await?;
            println!(
                "created rule: {} ({rule_id}) running {}",
                args.name,
                args.function.label()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rule_create_parses_function_and_journals() {
        let journal = Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "sponsor_admin",
            "--database-url",
            "sqlite::memory:",
            "rule",
            "create",
            "--name",
            "Supplier invoices",
            "--function",
            "get_from_amount",
            "--journal",
            &journal.to_string(),
        ])
        .unwrap();

        let Command::Rule(Rule {
            command: RuleCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected rule create");
        };
        assert_eq!(args.sequence, 10);
        assert_eq!(args.function, CompletionFunction::FromAmount);
        assert_eq!(args.journals, vec![journal]);
    }

    #[test]
    fn unknown_function_is_rejected() {
        let res = Cli::try_parse_from([
            "sponsor_admin",
            "rule",
            "create",
            "--name",
            "x",
            "--function",
            "get_from_nowhere",
        ]);
        assert!(res.is_err());
    }
}
