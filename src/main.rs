use clap::{Parser, Subcommand};
use dialoguer::{console::Term, Confirm};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use staffusr::api::{set_silent, HttpUserApi};
use staffusr::config::{self, PanelConfig};
use staffusr::controller::{EditOutcome, UserTableController};
use staffusr::models::{parse_seed_rows, FormFields, UserRecord};
use staffusr::notify::{render_terminal, Notification};
use staffusr::panel::PanelSession;
use staffusr::util::{hostname_from_url, spinner};
use staffusr::PanelError;

#[derive(Parser)]
#[command(
    name = "staffusr",
    author,
    version,
    about = "Manage staff user accounts",
    long_about = r#"staffusr — create, edit and delete staff accounts through the /staff/usr API.

Every change is sent to the server first; the user table only reflects what the server confirmed.
Use `--root` or SERVER_ROOT to point at the server, and SESSION_COOKIE to forward a staff session.

Examples:
  1) Add a reporter:
      staffusr create --username kim --fullname "Kim Lee" --role reporter --password s3cret
  2) Rename a user (blank fields are left untouched):
      staffusr edit kim --fullname "Kim Park"
  3) Work interactively over an exported listing:
      staffusr panel --rows users.json --html panel.html
"#,
    after_help = "Use `staffusr <subcommand> --help` to get subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
    /// Server root the /staff/usr paths are appended to (overrides SERVER_ROOT)
    #[arg(long, global = true)]
    root: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user
    #[command(long_about = "Submit the create form. The new row is printed once the server confirms it.")]
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        fullname: String,
        /// user, reporter, admin or a :role/... token
        #[arg(long)]
        role: String,
        #[arg(long)]
        password: Option<String>,
        /// Extra form field as name=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Edit a user; fields left out or blank are not sent
    Edit {
        username: String,
        #[arg(long)]
        fullname: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Extra form field as name=value (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Delete a user
    Delete {
        username: String,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Interactive panel over a user table
    #[command(long_about = "Start an interactive panel. The table starts from --rows (a JSON array of {username, fullname, role}); type `help` for commands.")]
    Panel {
        #[arg(long)]
        rows: Option<PathBuf>,
        /// Re-write this HTML page after every command
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Print a user listing as a table, or write it as an HTML page
    Render {
        #[arg(long)]
        rows: PathBuf,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Show the resolved configuration
    CheckConfig,
}

fn load_rows(path: Option<&Path>) -> Result<Vec<UserRecord>, PanelError> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            Ok(parse_seed_rows(&text)?)
        }
        None => Ok(Vec::new()),
    }
}

fn build_form(base: &[(&str, Option<&str>)], extra: &[String]) -> Result<FormFields, PanelError> {
    let mut form = FormFields::new();
    form.assign_all(extra.iter().map(String::as_str))
        .map_err(PanelError::Config)?;
    for (name, value) in base {
        form.set_opt(name, *value);
    }
    form.normalize_role();
    Ok(form)
}

fn print_banners(banners: &[Notification]) {
    for n in banners {
        println!("{}", render_terminal(n));
    }
}

fn confirm_delete(username: &str) -> Result<bool, PanelError> {
    let confirmed = Confirm::new()
        .with_prompt(format!("Delete {}?", username))
        .default(false)
        .interact_on(&Term::stderr())?;
    Ok(confirmed)
}

async fn run(cli: Cli) -> Result<bool, PanelError> {
    config::load_env_file(cli.env_file.as_deref());
    let mut panel_config = PanelConfig::from_env();
    if let Some(root) = cli.root.as_deref() {
        panel_config = panel_config.with_server_root(root);
    }

    match cli.command {
        Commands::CheckConfig => {
            println!("{} {}", yansi::Paint::new("Server root:").bold(), panel_config.server_root);
            println!("{} {}", yansi::Paint::new("Host:").bold(), hostname_from_url(&panel_config.server_root));
            println!("{} {}", yansi::Paint::new("Users endpoint:").bold(), panel_config.users_url());
            println!("{} {}s", yansi::Paint::new("Request timeout:").bold(), panel_config.request_timeout.as_secs());
            println!(
                "{} {}",
                yansi::Paint::new("Session cookie:").bold(),
                if panel_config.session_cookie.is_some() { "set" } else { "not set" }
            );
            Ok(true)
        }
        Commands::Render { rows, html } => {
            let api = HttpUserApi::new(panel_config.clone())?;
            let session = PanelSession::new(UserTableController::new(api, load_rows(Some(rows.as_path()))?), panel_config, None);
            match html {
                Some(path) => {
                    session.write_html(&path)?;
                    println!("{} {}", yansi::Paint::new("Wrote").green(), path.display());
                }
                None => println!("{}", session.controller().table().render_terminal()),
            }
            Ok(true)
        }
        Commands::Panel { rows, html } => {
            let api = HttpUserApi::new(panel_config.clone())?;
            let controller = UserTableController::new(api, load_rows(rows.as_deref())?);
            let mut session = PanelSession::new(controller, panel_config, html);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            session.run(stdin, &mut stdout).await?;
            Ok(true)
        }
        Commands::Create { username, fullname, role, password, fields } => {
            let form = build_form(
                &[
                    ("username", Some(username.as_str())),
                    ("fullname", Some(fullname.as_str())),
                    ("role", Some(role.as_str())),
                    ("password", password.as_deref()),
                ],
                &fields,
            )?;
            let mut controller = UserTableController::new(HttpUserApi::new(panel_config)?, Vec::new());
            *controller.create_form_mut() = form;
            let pb = spinner("Creating user");
            let n = controller.submit_create().await;
            pb.finish_and_clear();
            print_banners(&controller.take_banners());
            if !n.is_error() {
                println!("{}", controller.table().render_terminal());
            }
            Ok(!n.is_error())
        }
        Commands::Edit { username, fullname, role, password, fields } => {
            let form = build_form(
                &[
                    ("fullname", fullname.as_deref()),
                    ("role", role.as_deref()),
                    ("password", password.as_deref()),
                ],
                &fields,
            )?;
            let mut controller = UserTableController::new(HttpUserApi::new(panel_config)?, Vec::new());
            controller.open_edit_dialog(&username);
            *controller.edit_form_mut() = form;
            let pb = spinner("Saving user");
            let outcome = controller.save_edit().await;
            pb.finish_and_clear();
            print_banners(&controller.take_banners());
            match outcome {
                EditOutcome::Saved(update) => {
                    let mut changes = Vec::new();
                    if let Some(f) = update.fullname.as_deref().filter(|f| !f.is_empty()) {
                        changes.push(format!("fullname: {}", f));
                    }
                    if let Some(r) = update.role {
                        changes.push(format!("role: {}", r));
                    }
                    println!(
                        "{} {} {}",
                        yansi::Paint::new("Updated").green(),
                        username,
                        changes.join(", ")
                    );
                    Ok(true)
                }
                EditOutcome::NotSent => {
                    eprintln!("{}", yansi::Paint::new("Nothing to update: username is blank").red());
                    Ok(false)
                }
                EditOutcome::Failed(_) => Ok(false),
            }
        }
        Commands::Delete { username, yes } => {
            if !yes && !confirm_delete(&username)? {
                println!("{}", yansi::Paint::new("Cancelled").yellow());
                return Ok(true);
            }
            let mut controller = UserTableController::new(HttpUserApi::new(panel_config)?, Vec::new());
            controller.open_delete_dialog(&username);
            let pb = spinner("Deleting user");
            let n = controller.confirm_delete().await;
            pb.finish_and_clear();
            print_banners(&controller.take_banners());
            Ok(n.is_some_and(|n| !n.is_error()))
        }
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with tables and banners
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        set_silent(true);
    }

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            tracing::error!(%e, "command failed");
            eprintln!("{}: {}", yansi::Paint::new("Error").red(), e);
            process::exit(1);
        }
    }
}
