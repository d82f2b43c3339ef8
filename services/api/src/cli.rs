use crate::demo::{run_demo, run_reconcile, DemoArgs, ReconcileArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use torre_controle::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Torre de Controle",
    about = "Reconcile order/SLA exports with the driver roster from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Reconcile an orders CSV export against a roster CSV export
    Reconcile(ReconcileArgs),
    /// Run the built-in reconciliation scenario
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured match precedence (legacy or refined)
    #[arg(long, value_parser = crate::infra::parse_cascade)]
    pub(crate) cascade: Option<torre_controle::reconciliation::CascadeMode>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Reconcile(args) => run_reconcile(args),
        Command::Demo(args) => run_demo(args),
    }
}
