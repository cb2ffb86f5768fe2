use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sql_facade::{DatabaseType, FacadeConfig, RowValues, SqlFacadeError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a single statement through sql-facade")]
pub(crate) struct Args {
    /// JSON file describing the backend and pool, e.g. `{"backend":"sqlite","path":"app.db"}`
    #[arg(long, required_unless_present = "target", conflicts_with = "target")]
    pub(crate) config: Option<PathBuf>,
    /// Backend for `--target`, with default pool settings.
    #[arg(long, value_enum, requires = "target")]
    pub(crate) backend: Option<DatabaseType>,
    /// Postgres connection string or `SQLite` file path.
    #[arg(long, requires = "backend")]
    pub(crate) target: Option<String>,
    /// Also append log lines to this file.
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(long, short)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Args {
    pub(crate) fn facade_config(&self) -> Result<FacadeConfig, SqlFacadeError> {
        match (&self.config, self.backend, &self.target) {
            (Some(path), _, _) => FacadeConfig::from_json_file(path),
            (None, Some(backend), Some(target)) => {
                Ok(FacadeConfig::for_target(backend, target.clone()))
            }
            _ => Err(SqlFacadeError::ConfigError(
                "pass --config, or --backend together with --target".to_string(),
            )),
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Buffer every row, then print them as JSON lines.
    Select(Statement),
    /// Print rows as JSON lines while the cursor yields them.
    Stream(Statement),
    /// Run an INSERT/UPDATE/DELETE and print the write summary.
    Write(Statement),
}

#[derive(clap::Args, Debug)]
pub(crate) struct Statement {
    pub(crate) sql: String,
    /// Positional parameter; `null`, `true`/`false`, integers and floats are
    /// bound as such, anything else as text.
    #[arg(long = "param", value_parser = parse_param)]
    pub(crate) params: Vec<RowValues>,
}

#[allow(clippy::unnecessary_wraps)]
fn parse_param(raw: &str) -> Result<RowValues, String> {
    Ok(RowValues::parse_literal(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_their_order_and_kind() {
        let args = Args::try_parse_from([
            "facade-cli",
            "--config",
            "db.json",
            "select",
            "SELECT * FROM t WHERE a = ? AND b = ?",
            "--param",
            "7",
            "--param",
            "seven",
        ])
        .expect("valid arguments");

        let Command::Select(statement) = args.command else {
            panic!("expected select subcommand");
        };
        assert_eq!(
            statement.params,
            vec![RowValues::Int(7), RowValues::Text("seven".into())]
        );
    }

    #[test]
    fn config_or_target_is_required() {
        assert!(Args::try_parse_from(["facade-cli", "write", "DELETE FROM t"]).is_err());
        assert!(
            Args::try_parse_from(["facade-cli", "--target", "app.db", "write", "DELETE FROM t"])
                .is_err()
        );
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn backend_and_target_replace_the_config_file() {
        let args = Args::try_parse_from([
            "facade-cli",
            "--backend",
            "sqlite",
            "--target",
            "app.db",
            "stream",
            "SELECT 1",
        ])
        .expect("valid arguments");
        assert_eq!(args.backend, Some(DatabaseType::Sqlite));
        assert_eq!(
            args.facade_config().expect("config from target"),
            FacadeConfig::sqlite("app.db")
        );
    }
}
