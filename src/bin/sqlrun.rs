//! Command-line front end for the sqlrun task registry and runner.
//!
//! Usage:
//!
//! ```text
//! sqlrun [--database-url <url>] [-v] <command>
//! ```
//!
//! Every command prints its result as pretty JSON on stdout. Settings are
//! read from flags, then from `SQLRUN_*` environment variables, which may be
//! supplied through a `.env` file in the working directory.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mockable::DefaultClock;
use serde_json::{Value, json};
use sqlrun::config::{RunSettings, SettingsError};
use sqlrun::environment::{
    adapters::postgres::PostgresEnvironmentConfigRepository,
    domain::{ConnectionParams, Environment},
    services::EnvironmentConfigService,
};
use sqlrun::identifier::{adapters::postgres::PostgresCounterStore, services::IdAllocator};
use sqlrun::listing::{DEFAULT_PAGE_LIMIT, PageRequest};
use sqlrun::postgres::{PgPool, connect_pool, run_migrations};
use sqlrun::run::{
    adapters::{mysql::MySqlQueryExecutor, postgres::PostgresRunRepository},
    domain::RunId,
    services::{ExecuteRunRequest, RunService},
};
use sqlrun::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::TaskId,
    services::{CreateTaskRequest, TaskService, UpdateTaskRequest},
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};


/// Manage SQL tasks and execute them against per-environment databases.
#[derive(Debug, Parser)]
#[command(name = "sqlrun", author, version, about, long_about = None)]
struct Cli {
    /// Metadata database URL
    #[arg(long, env = "SQLRUN_DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Maximum connections held by the metadata pool
    #[arg(long, env = "SQLRUN_POOL_SIZE", default_value_t = 4, global = true)]
    pool_size: u32,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending metadata migrations and seed the identifier counters
    Migrate,
    /// Register, inspect and maintain tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Execute tasks and inspect run records
    Run {
        #[command(subcommand)]
        command: RunCommand,
    },
    /// Manage connection settings per database and environment
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Register a new task
    Create {
        /// Human-readable purpose of the task
        #[arg(long)]
        description: String,
        /// Logical database the task targets
        #[arg(long)]
        db_name: String,
        /// SQL text to execute
        #[arg(long)]
        sql: String,
        /// SELECT, INSERT, UPDATE or DELETE
        #[arg(long)]
        query_type: String,
        /// Author of the task
        #[arg(long)]
        created_by: String,
    },
    /// Show one task
    Get {
        /// Task identifier, e.g. TSK-000001
        task_id: String,
    },
    /// Change task fields from a JSON object of new values
    Update {
        /// Task identifier, e.g. TSK-000001
        task_id: String,
        /// JSON object, e.g. '{"sql_query": "SELECT 2"}'
        #[arg(long)]
        patch: String,
    },
    /// Delete a task
    Delete {
        /// Task identifier, e.g. TSK-000001
        task_id: String,
    },
    /// List tasks in creation order
    List(ListArgs),
}

#[derive(Debug, Subcommand)]
enum RunCommand {
    /// Execute a task once against an environment
    Execute {
        /// Task identifier, e.g. TSK-000001
        task_id: String,
        /// Environment tag, e.g. DEV or PROD
        #[arg(long)]
        environment: String,
        /// Person or system requesting the run
        #[arg(long)]
        requested_by: String,
        #[command(flatten)]
        runner: RunnerArgs,
    },
    /// Show one run
    Get {
        /// Run identifier, e.g. RUN-000001
        run_id: String,
    },
    /// List runs in creation order
    List(ListArgs),
}

#[derive(Debug, Subcommand)]
enum EnvCommand {
    /// Register or replace connection settings
    Set {
        /// Logical database name tasks refer to
        config_key: String,
        /// Environment tag, e.g. DEV or PROD
        environment: String,
        /// Target host
        #[arg(long)]
        host: String,
        /// Target port
        #[arg(long, default_value_t = 3306)]
        port: u16,
        /// Schema to select after connecting
        #[arg(long, default_value = "")]
        database: String,
        /// Login user
        #[arg(long)]
        username: String,
        /// Login password
        #[arg(long, env = "SQLRUN_TARGET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show every environment registered for a database
    Show {
        /// Logical database name
        config_key: String,
    },
    /// Remove connection settings
    Remove {
        /// Logical database name
        config_key: String,
        /// Environment tag
        environment: String,
    },
}

/// Paging and search flags shared by the list commands.
#[derive(Debug, Args)]
struct ListArgs {
    /// Number of matching records to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,
    /// Maximum number of records to return
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: usize,
    /// Case-insensitive substring filter
    #[arg(long)]
    search: Option<String>,
}

impl ListArgs {
    fn page(&self) -> PageRequest {
        PageRequest::new(self.skip, self.limit)
            .with_search(self.search.as_deref().unwrap_or_default())
    }
}

/// Runner limits; unset values keep the library defaults.
#[derive(Debug, Args)]
struct RunnerArgs {
    /// Seconds the live phase may take before it is recorded as failed
    #[arg(long, env = "SQLRUN_QUERY_TIMEOUT_SECS")]
    query_timeout_secs: Option<u64>,
    /// Maximum result rows stored with a run
    #[arg(long, env = "SQLRUN_ROW_LIMIT")]
    row_limit: Option<usize>,
    /// Maximum rows captured for a rollback pre-image
    #[arg(long, env = "SQLRUN_PRE_IMAGE_ROW_LIMIT")]
    pre_image_row_limit: Option<usize>,
}

impl RunnerArgs {
    fn settings(&self) -> Result<RunSettings, SettingsError> {
        let mut settings = RunSettings::default();
        if let Some(secs) = self.query_timeout_secs {
            settings = settings.with_query_timeout(Duration::from_secs(secs))?;
        }
        if let Some(limit) = self.row_limit {
            settings = settings.with_row_limit(limit)?;
        }
        if let Some(limit) = self.pre_image_row_limit {
            settings = settings.with_pre_image_row_limit(limit)?;
        }
        Ok(settings)
    }
}

type Tasks = TaskService<PostgresTaskRepository, DefaultClock>;
type Environments = EnvironmentConfigService<PostgresEnvironmentConfigRepository, DefaultClock>;
type Runs = RunService<
    PostgresTaskRepository,
    PostgresEnvironmentConfigRepository,
    PostgresRunRepository,
    MySqlQueryExecutor,
    DefaultClock,
>;

/// Services wired to the metadata database.
struct App {
    pool: PgPool,
    allocator: IdAllocator,
    tasks: Tasks,
    environments: Environments,
    runs: Runs,
}

impl App {
    fn new(pool: PgPool) -> Self {
        let clock = Arc::new(DefaultClock);
        let allocator = IdAllocator::new(Arc::new(PostgresCounterStore::new(pool.clone())));
        let task_repository = Arc::new(PostgresTaskRepository::new(pool.clone()));
        let config_repository = Arc::new(PostgresEnvironmentConfigRepository::new(pool.clone()));
        Self {
            tasks: TaskService::new(
                Arc::clone(&task_repository),
                allocator.clone(),
                Arc::clone(&clock),
            ),
            environments: EnvironmentConfigService::new(
                Arc::clone(&config_repository),
                Arc::clone(&clock),
            ),
            runs: RunService::new(
                task_repository,
                EnvironmentConfigService::new(config_repository, Arc::clone(&clock)),
                Arc::new(PostgresRunRepository::new(pool.clone())),
                Arc::new(MySqlQueryExecutor::new()),
                allocator.clone(),
                clock,
            ),
            allocator,
            pool,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        return Err(err).context("failed to load .env");
    }
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let database_url = cli
        .database_url
        .as_deref()
        .context("metadata database URL is required; set --database-url or SQLRUN_DATABASE_URL")?;
    let pool = connect_pool(database_url, cli.pool_size)
        .context("failed to connect to the metadata database")?;
    let app = App::new(pool);

    let output = dispatch(app, cli.command).await?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn dispatch(app: App, command: Command) -> Result<Value> {
    match command {
        Command::Migrate => migrate(&app).await,
        Command::Task { command } => task_command(&app, command).await,
        Command::Run { command } => run_command(app, command).await,
        Command::Env { command } => env_command(&app, command).await,
    }
}

async fn migrate(app: &App) -> Result<Value> {
    let applied = run_migrations(&app.pool).await?;
    app.allocator.seed_all().await?;
    Ok(json!({ "applied": applied }))
}

async fn task_command(app: &App, command: TaskCommand) -> Result<Value> {
    let value = match command {
        TaskCommand::Create {
            description,
            db_name,
            sql,
            query_type,
            created_by,
        } => {
            let request = CreateTaskRequest::new(description, db_name, sql, query_type, created_by);
            serde_json::to_value(app.tasks.create(request).await?)?
        }
        TaskCommand::Get { task_id } => {
            serde_json::to_value(app.tasks.get(TaskId::parse(&task_id)?).await?)?
        }
        TaskCommand::Update { task_id, patch } => {
            let id = TaskId::parse(&task_id)?;
            let payload: Value =
                serde_json::from_str(&patch).context("--patch must be a JSON object")?;
            let request = UpdateTaskRequest::from_json(&payload)?;
            serde_json::to_value(app.tasks.update(id, request).await?)?
        }
        TaskCommand::Delete { task_id } => {
            let id = TaskId::parse(&task_id)?;
            app.tasks.delete(id).await?;
            json!({ "deleted": id })
        }
        TaskCommand::List(args) => serde_json::to_value(app.tasks.list(&args.page()).await?)?,
    };
    Ok(value)
}

async fn run_command(app: App, command: RunCommand) -> Result<Value> {
    let value = match command {
        RunCommand::Execute {
            task_id,
            environment,
            requested_by,
            runner,
        } => {
            let request = ExecuteRunRequest::new(
                TaskId::parse(&task_id)?,
                Environment::new(&environment)?,
                requested_by,
            );
            let service = app.runs.with_settings(runner.settings()?);
            serde_json::to_value(service.execute(request).await?)?
        }
        RunCommand::Get { run_id } => {
            serde_json::to_value(app.runs.get(RunId::parse(&run_id)?).await?)?
        }
        RunCommand::List(args) => serde_json::to_value(app.runs.list(&args.page()).await?)?,
    };
    Ok(value)
}

async fn env_command(app: &App, command: EnvCommand) -> Result<Value> {
    let value = match command {
        EnvCommand::Set {
            config_key,
            environment,
            host,
            port,
            database,
            username,
            password,
        } => {
            let connection = ConnectionParams::new(&host, port, &database, &username, password)?;
            let config = app
                .environments
                .upsert(&config_key, &environment, connection)
                .await?;
            serde_json::to_value(config)?
        }
        EnvCommand::Show { config_key } => {
            serde_json::to_value(app.environments.list_for_key(&config_key).await?)?
        }
        EnvCommand::Remove {
            config_key,
            environment,
        } => {
            let tag = Environment::new(&environment)?;
            app.environments.remove(&config_key, &tag).await?;
            json!({ "removed": { "config_key": config_key, "environment": tag } })
        }
    };
    Ok(value)
}
