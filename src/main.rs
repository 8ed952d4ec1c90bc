use std::{path::PathBuf, process::ExitCode};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use persons::{
    app::{
        app::{PersonsApp, ShellError},
        options::AppOptions,
    },
    model::{
        date::parse_date,
        person::Person,
        update::{PersonUpdate, UpdateStatement},
    },
};

/// 📇 Persons App, keeps a list of contacts in an XML file
///
/// Starts from the last opened or saved file. Without one it starts from a fixed
/// list of nine persons, or from random persons with `--random`.
#[derive(Parser, Debug)]
struct Cli {
    /// Preferences file that remembers the last opened file. Defaults to the user config directory
    #[clap(long)]
    preferences: Option<PathBuf>,

    /// Start with this many random persons instead of the last opened file
    #[clap(long)]
    random: Option<usize>,

    /// First names for random persons, one per line
    #[clap(long, default_value = "data/first_names.txt")]
    first_names: PathBuf,

    /// Last names for random persons, one per line
    #[clap(long, default_value = "data/last_names.txt")]
    last_names: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists all persons
    List,
    /// Shows every detail of one person
    Show { index: usize },
    /// Adds a person, unspecified details get placeholder values
    Add(PersonArgs),
    /// Edits a person, only the given details change
    Edit {
        index: usize,

        #[clap(flatten)]
        details: PersonArgs,

        /// Removes the birthday
        #[clap(long, conflicts_with = "birthday")]
        clear_birthday: bool,
    },
    /// Deletes a person
    Delete { index: usize },
    /// Shows how many persons have their birthday in each month
    Stats,
    /// Opens a person file and makes it the current file
    Open { file: PathBuf },
    /// Saves to the given file, or to the current file
    Save { file: Option<PathBuf> },
    /// Starts a new, empty list and forgets the current file
    New,
    /// Writes random persons to a file and makes it the current file
    Generate {
        count: usize,

        #[clap(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PersonArgs {
    #[clap(long)]
    first_name: Option<String>,

    #[clap(long)]
    last_name: Option<String>,

    #[clap(long)]
    street: Option<String>,

    #[clap(long, allow_negative_numbers = true)]
    postal_code: Option<i32>,

    #[clap(long)]
    city: Option<String>,

    /// Birthday as dd.mm.yyyy
    #[clap(long, value_parser = parse_date)]
    birthday: Option<NaiveDate>,
}

impl PersonArgs {
    fn to_update(&self) -> PersonUpdate {
        PersonUpdate {
            first_name: UpdateStatement::from_option(self.first_name.clone()),
            last_name: UpdateStatement::from_option(self.last_name.clone()),
            street: UpdateStatement::from_option(self.street.clone()),
            postal_code: UpdateStatement::from_option(self.postal_code),
            city: UpdateStatement::from_option(self.city.clone()),
            birthday: UpdateStatement::from_option(self.birthday),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn app_options(args: &Cli) -> AppOptions {
    let options = AppOptions::default()
        .set_random_persons(args.random)
        .set_word_lists(args.first_names.clone(), args.last_names.clone());

    match &args.preferences {
        Some(preferences) => options.set_preferences_path(preferences.clone()),
        None => options,
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    // Commands that do not start from the previous state
    match &args.command {
        Command::Open { file } => {
            let mut app = PersonsApp::new(app_options(&args));

            app.open(file)?;
            print_persons(&app);

            return Ok(());
        }
        Command::New => {
            let mut app = PersonsApp::new(app_options(&args));

            app.new_document();
            log::info!("Started a new person list");

            return Ok(());
        }
        Command::Generate { count, output } => {
            let mut app = PersonsApp::new(app_options(&args).set_random_persons(Some(*count)));

            app.load_initial_data()?;

            if *count > 0 && app.is_empty() {
                anyhow::bail!("No persons generated, check the word lists");
            }

            app.save_as(output)?;
            log::info!("Wrote {} random persons to [{}]", app.len(), output.display());

            return Ok(());
        }
        _ => {}
    }

    let mut app = PersonsApp::new(app_options(&args));

    // A broken last file is reported, the app carries on with an empty list
    if let Err(e) = app.load_initial_data() {
        report_error(&anyhow::Error::from(e));
    }

    match args.command {
        Command::List => print_persons(&app),
        Command::Show { index } => {
            let person = app
                .person(index)
                .ok_or_else(|| anyhow::anyhow!("No person at position {}", index))?;

            print_person(person);
        }
        Command::Add(details) => {
            let index = app.create_person(&details.to_update())?;
            log::info!("Added person at position {}", index);

            persist(&mut app)?;
        }
        Command::Edit {
            index,
            details,
            clear_birthday,
        } => {
            let mut update = details.to_update();

            if clear_birthday {
                update.birthday = UpdateStatement::Unset;
            }

            if update.is_empty() {
                log::warn!("Nothing to change");
                return Ok(());
            }

            app.update_person(index, &update)?;
            persist(&mut app)?;
        }
        Command::Delete { index } => {
            let person = app.delete_person(index)?;
            log::info!("Deleted {}", person);

            persist(&mut app)?;
        }
        Command::Stats => print!("{}", app.birthday_statistics()),
        Command::Save { file } => match file {
            Some(file) => app.save_as(&file)?,
            None => app.save()?,
        },
        Command::Open { .. } | Command::New | Command::Generate { .. } => {}
    }

    Ok(())
}

/// Writes changes back to the current file, if there is one
fn persist(app: &mut PersonsApp) -> anyhow::Result<()> {
    if app.current_file().is_some() {
        app.save()?;
    } else if app.is_dirty() {
        log::warn!("Changes were not saved, use `save <file>` to write them to a file");
    }

    Ok(())
}

fn print_persons(app: &PersonsApp) {
    println!("{}", app.title());

    for (index, person) in app.persons().iter().enumerate() {
        println!(
            "{:>3}  {:<15} {:<15} {}",
            index,
            person.first_name().unwrap_or(""),
            person.last_name().unwrap_or(""),
            person.birthday_text()
        );
    }
}

fn print_person(person: &Person) {
    println!("First Name:  {}", person.first_name().unwrap_or(""));
    println!("Last Name:   {}", person.last_name().unwrap_or(""));
    println!("Street:      {}", person.street());
    println!("City:        {}", person.city());
    println!("Postal Code: {}", person.postal_code());
    println!("Birthday:    {}", person.birthday_text());
}

fn report_error(error: &anyhow::Error) {
    log::error!("{}", error_report(error));
}

/// Headline and the whole cause chain
fn error_report(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ShellError>() {
        Some(shell_error) => format!("{}: {:#}", shell_error.header(), error),
        None => format!("{:#}", error),
    }
}
