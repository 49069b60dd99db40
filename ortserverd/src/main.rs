mod logging;

use clap::Parser;
use ortserver_common::{
    config::{Database, OrphanRemoval},
    db,
};
use ortserver_module_fundamental::{
    authorization::NoopAuthorizationService, orphans::service::OrphanRemovalService,
};
use ortserver_module_ingestor::graph::Graph;
use ortserver_server::config::HttpServerConfig;
use ortserver_worker_reporter::{FileSystemReportStorage, ReporterRunner, ReporterWorker};
use std::{
    path::PathBuf,
    process::{ExitCode, Termination},
    sync::Arc,
};

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Migrate the database and serve the API
    Api {
        #[command(flatten)]
        http: HttpServerConfig,
    },
    /// Migrate the database
    Migrate,
    /// Remove shared rows no run refers to any more
    Orphans {
        #[command(flatten)]
        removal: OrphanRemoval,
    },
    /// Create the reports of a reporter job
    Report {
        /// The id of the reporter job
        #[arg(long)]
        job_id: i64,

        /// The directory to store the reports in, one directory per ORT run
        #[arg(long, env = "REPORT_DIR", default_value = "reports")]
        report_dir: PathBuf,
    },
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "ortserverd",
    long_about = None
)]
pub struct OrtServerd {
    #[command(subcommand)]
    pub(crate) command: Command,

    #[command(flatten)]
    pub database: Database,
}

impl OrtServerd {
    async fn run(self) -> ExitCode {
        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        let db = db::Database::new(&self.database).await?;

        match self.command {
            Command::Api { http } => {
                db.migrate().await?;
                ortserver_server::run(&http, db, Arc::new(NoopAuthorizationService)).await?;
            }
            Command::Migrate => {
                db.migrate().await?;
                log::info!("Database is up to date");
            }
            Command::Orphans { removal } => {
                let counts = OrphanRemovalService::new(db)
                    .delete_runs_orphaned_entities(&removal)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&counts)?);
            }
            Command::Report { job_id, report_dir } => {
                let runner = ReporterRunner::new(Arc::new(FileSystemReportStorage::new(report_dir)))
                    .with_builtin_reporters();
                let status = ReporterWorker::new(Graph::new(db), runner)
                    .run(job_id)
                    .await?;

                log::info!("Reporter job {job_id} finished: {status:?}");
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

#[actix_web::main]
async fn main() -> impl Termination {
    logging::init();
    OrtServerd::parse().run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        OrtServerd::command().debug_assert();
    }

    #[test]
    fn report_command() {
        let cli = OrtServerd::parse_from(["ortserverd", "report", "--job-id", "42"]);
        assert!(matches!(
            cli.command,
            Command::Report { job_id: 42, .. }
        ));
    }
}
