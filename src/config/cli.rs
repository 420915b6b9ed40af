use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "voucher-gateway")]
#[command(about = "Voucher lifecycle API backed by the legacy stored procedure")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "voucher-gateway.toml")]
    pub config: String,

    /// Override the bind address from config
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port from config
    #[arg(long)]
    pub port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
